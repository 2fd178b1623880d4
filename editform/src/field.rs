//! Field identity and nested path resolution.

use serde::Serialize;

use crate::model::{Model, walk};

/// Identifies one renderable input: the object that owns the member, and
/// the member's name.
///
/// The owner is addressed by its dot-path from the root model, with `""`
/// standing for the root itself. Two identifiers with the same full path
/// are still distinct when they name different owners: `("Address",
/// "Street")` is not `("", "Address.Street")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FieldIdentifier {
    owner: String,
    field_name: String,
}

impl FieldIdentifier {
    /// Create an identifier for a member of the object at `owner`.
    pub fn new(owner: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            field_name: field_name.into(),
        }
    }

    /// Create an identifier for a member of the root model.
    pub fn root(field_name: impl Into<String>) -> Self {
        Self::new(String::new(), field_name)
    }

    /// Dot-path of the owning object (`""` for the root model).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Member name on the owning object.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Check if the owner is the root model.
    pub fn is_root(&self) -> bool {
        self.owner.is_empty()
    }

    /// Full dot-path from the root model.
    pub fn path(&self) -> String {
        match (self.owner.is_empty(), self.field_name.is_empty()) {
            (true, _) => self.field_name.clone(),
            (false, true) => self.owner.clone(),
            (false, false) => format!("{}.{}", self.owner, self.field_name),
        }
    }
}

impl std::fmt::Display for FieldIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.owner.is_empty() {
            write!(f, "{}", self.field_name)
        } else {
            write!(f, "{}::{}", self.owner, self.field_name)
        }
    }
}

/// Resolve a validator property path to the field it belongs to.
///
/// `"A.B.C"` resolves to the object reached via `A` then `B`, member `C`.
/// If any intermediate segment is missing or unset the whole path is kept
/// on the root model instead.
pub fn resolve_field(model: &dyn Model, property_path: &str) -> FieldIdentifier {
    let segments: Vec<&str> = property_path.split('.').collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return FieldIdentifier::root(property_path);
    };

    if parents.is_empty() {
        return FieldIdentifier::root(*leaf);
    }

    match walk(model, parents) {
        Some(_) => FieldIdentifier::new(parents.join("."), *leaf),
        None => FieldIdentifier::root(property_path),
    }
}
