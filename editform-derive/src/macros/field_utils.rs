//! Shared utilities for inspecting model fields.

use syn::{Attribute, Type};

/// Check if a type's last path segment is `name`.
fn last_segment_is(ty: &Type, name: &str) -> bool {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
    {
        return segment.ident == name;
    }
    false
}

/// Check if a type is Option<T>
pub fn is_option_type(ty: &Type) -> bool {
    last_segment_is(ty, "Option")
}

/// Check if a type is Box<T>
pub fn is_box_type(ty: &Type) -> bool {
    last_segment_is(ty, "Box")
}

/// Options from a field's #[model(...)] attributes.
#[derive(Debug, Default)]
pub struct FieldOptions {
    pub rename: Option<String>,
    pub nested: bool,
    pub skip: bool,
}

/// Parse #[model(rename = "...", nested, skip)] on a field.
pub fn field_options(attrs: &[Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("model")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
            } else if meta.path.is_ident("nested") {
                options.nested = true;
            } else if meta.path.is_ident("skip") {
                options.skip = true;
            } else {
                return Err(meta.error("expected `rename`, `nested` or `skip`"));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

/// Member naming convention from #[model(rename_all = "...")].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenameRule {
    #[default]
    None,
    PascalCase,
    CamelCase,
}

impl RenameRule {
    /// Apply the rule to a snake_case field name.
    pub fn apply(self, field: &str) -> String {
        match self {
            Self::None => field.to_string(),
            Self::PascalCase => pascal_case(field),
            Self::CamelCase => {
                let pascal = pascal_case(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => pascal,
                }
            }
        }
    }
}

fn pascal_case(field: &str) -> String {
    field
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Parse #[model(rename_all = "...")] on the struct.
pub fn rename_rule(attrs: &[Attribute]) -> syn::Result<RenameRule> {
    let mut rule = RenameRule::None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("model")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: syn::LitStr = meta.value()?.parse()?;
                rule = match value.value().as_str() {
                    "PascalCase" => RenameRule::PascalCase,
                    "camelCase" => RenameRule::CamelCase,
                    "snake_case" => RenameRule::None,
                    _ => {
                        return Err(syn::Error::new_spanned(
                            &value,
                            "expected \"PascalCase\", \"camelCase\" or \"snake_case\"",
                        ));
                    }
                };
                Ok(())
            } else {
                Err(meta.error("expected `rename_all`"))
            }
        })?;
    }
    Ok(rule)
}
