use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse2};

use super::field_utils::{field_options, is_box_type, is_option_type, rename_rule};

/// Derive macro for the Model trait.
///
/// Every named field becomes a member. Fields marked `#[model(nested)]`
/// are reachable through `Model::child`; `Option<T>` fields yield `None`
/// while unset.
pub fn expand(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match parse2(input) {
        Ok(i) => i,
        Err(e) => return e.to_compile_error(),
    };

    match generate(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error(),
    }
}

fn generate(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Model)] only supports structs with named fields",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Model)] only supports structs with named fields",
        ));
    };

    let rule = rename_rule(&input.attrs)?;

    let mut members = Vec::new();
    let mut children = Vec::new();

    for field in &fields.named {
        let options = field_options(&field.attrs)?;
        if options.skip {
            continue;
        }

        let Some(ident) = &field.ident else { continue };
        let raw = ident.to_string();
        let member = options
            .rename
            .unwrap_or_else(|| rule.apply(raw.trim_start_matches("r#")));

        if options.nested {
            let child = if is_option_type(&field.ty) {
                quote! { self.#ident.as_ref().map(|value| value as &dyn ::editform::Model) }
            } else if is_box_type(&field.ty) {
                quote! { ::core::option::Option::Some(&*self.#ident as &dyn ::editform::Model) }
            } else {
                quote! { ::core::option::Option::Some(&self.#ident as &dyn ::editform::Model) }
            };
            children.push(quote! { #member => #child, });
        }

        members.push(member);
    }

    Ok(quote! {
        impl #impl_generics ::editform::Model for #name #ty_generics #where_clause {
            fn members(&self) -> &'static [&'static str] {
                &[#(#members),*]
            }

            fn child(&self, member: &str) -> ::core::option::Option<&dyn ::editform::Model> {
                match member {
                    #(#children)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}
