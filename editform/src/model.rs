//! Navigation over form models.
//!
//! Validators name failing members with dot-separated paths such as
//! `"Address.Street"`. To map such a path back onto an input, the bridge
//! walks the model one segment at a time through [`Model::child`]. Models
//! usually get this from `#[derive(Model)]`:
//!
//! ```ignore
//! #[derive(Clone, Default, Model)]
//! #[model(rename_all = "PascalCase")]
//! struct Person {
//!     name: String,
//!     #[model(nested)]
//!     address: Address,
//! }
//! ```

/// A type that can be bound to an [`EditContext`](crate::EditContext).
pub trait Model: Send + Sync + 'static {
    /// Member names in declaration order.
    fn members(&self) -> &'static [&'static str];

    /// The nested object stored under `member`.
    ///
    /// Returns `None` when the member is unknown, is not an object, or is
    /// currently unset.
    fn child(&self, member: &str) -> Option<&dyn Model>;

    /// Check whether `member` is declared on this model.
    fn has_member(&self, member: &str) -> bool {
        self.members().contains(&member)
    }
}

/// Walk `segments` from `root`, returning the innermost object reached.
///
/// Returns `None` as soon as a segment cannot be followed.
pub fn walk<'a>(root: &'a dyn Model, segments: &[&str]) -> Option<&'a dyn Model> {
    segments
        .iter()
        .try_fold(root, |current, segment| current.child(segment))
}
