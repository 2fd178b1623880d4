//! Tests for #[derive(Model)].

use editform::Model;

#[derive(Default, Model)]
struct Plain {
    first_name: String,
    age: u32,
}

#[derive(Default, Model)]
#[model(rename_all = "PascalCase")]
struct Order {
    order_number: String,
    #[model(nested)]
    customer: Customer,
    #[model(nested)]
    shipping: Option<Address>,
    #[model(nested)]
    billing: Box<Address>,
    #[model(skip)]
    cache_key: u64,
    #[model(rename = "Notes")]
    internal_notes: String,
}

#[derive(Default, Model)]
#[model(rename_all = "camelCase")]
struct Customer {
    display_name: String,
}

#[derive(Default, Model)]
#[model(rename_all = "PascalCase")]
struct Address {
    street: String,
}

#[derive(Default, Model)]
struct Generic<T: Send + Sync + 'static> {
    value: T,
}

// =============================================================================
// Members
// =============================================================================

#[test]
fn test_members_keep_field_names() {
    let plain = Plain::default();
    assert_eq!(plain.members(), &["first_name", "age"]);
    assert!(plain.has_member("age"));
    assert!(!plain.has_member("Age"));
}

#[test]
fn test_members_pascal_case() {
    let order = Order::default();
    assert_eq!(
        order.members(),
        &["OrderNumber", "Customer", "Shipping", "Billing", "Notes"]
    );
}

#[test]
fn test_members_camel_case() {
    assert_eq!(Customer::default().members(), &["displayName"]);
}

#[test]
fn test_skipped_field_is_not_a_member() {
    let order = Order::default();
    assert!(!order.has_member("CacheKey"));
    assert!(!order.has_member("InternalNotes"));
}

#[test]
fn test_generic_model() {
    let model = Generic { value: 7u8 };
    assert_eq!(model.members(), &["value"]);
    assert!(model.child("value").is_none());
}

// =============================================================================
// Children
// =============================================================================

#[test]
fn test_nested_child() {
    let order = Order::default();
    let customer = order.child("Customer").unwrap();
    assert_eq!(customer.members(), &["displayName"]);
}

#[test]
fn test_optional_child_follows_value() {
    let mut order = Order::default();
    assert!(order.child("Shipping").is_none());

    order.shipping = Some(Address::default());
    assert_eq!(order.child("Shipping").unwrap().members(), &["Street"]);
}

#[test]
fn test_boxed_child() {
    let order = Order::default();
    assert_eq!(order.child("Billing").unwrap().members(), &["Street"]);
}

#[test]
fn test_non_nested_member_has_no_child() {
    let order = Order::default();
    assert!(order.child("OrderNumber").is_none());
    assert!(order.child("Missing").is_none());
}

#[test]
fn test_walk_through_derived_models() {
    let order = Order {
        shipping: Some(Address::default()),
        ..Order::default()
    };
    let reached = editform::model::walk(&order, &["Shipping"]).unwrap();
    assert!(reached.has_member("Street"));
    assert!(editform::model::walk(&order, &["Customer", "displayName"]).is_none());
}

// =============================================================================
// Hygiene
// =============================================================================

mod shadowed {
    use ::editform::Model;

    /// A local item named like the library must not capture generated paths.
    #[allow(dead_code)]
    mod editform {}

    #[derive(Default, Model)]
    pub struct Local {
        pub value: String,
    }
}

#[test]
fn test_generated_paths_ignore_local_editform() {
    let local = shadowed::Local::default();
    assert_eq!(local.members(), &["value"]);
}
