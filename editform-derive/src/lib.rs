mod macros;

use proc_macro::TokenStream;

#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    macros::model::expand(input.into()).into()
}
