//! Tests for field identifiers and property path resolution.

use editform::{FieldIdentifier, Model, resolve_field};

#[derive(Debug, Clone, Default, Model)]
#[model(rename_all = "PascalCase")]
struct Person {
    name: String,
    #[model(nested)]
    address: Address,
    #[model(nested)]
    billing: Option<Address>,
}

#[derive(Debug, Clone, Default, Model)]
#[model(rename_all = "PascalCase")]
struct Address {
    street: String,
    #[model(nested)]
    geo: Geo,
}

#[derive(Debug, Clone, Default, Model)]
#[model(rename_all = "PascalCase")]
struct Geo {
    lat: f64,
}

// =============================================================================
// FieldIdentifier
// =============================================================================

#[test]
fn test_root_identifier() {
    let field = FieldIdentifier::root("Name");
    assert!(field.is_root());
    assert_eq!(field.owner(), "");
    assert_eq!(field.field_name(), "Name");
    assert_eq!(field.path(), "Name");
    assert_eq!(field.to_string(), "Name");
}

#[test]
fn test_nested_identifier() {
    let field = FieldIdentifier::new("Address.Geo", "Lat");
    assert!(!field.is_root());
    assert_eq!(field.path(), "Address.Geo.Lat");
    assert_eq!(field.to_string(), "Address.Geo::Lat");
}

#[test]
fn test_identifier_equality_includes_owner() {
    assert_eq!(
        FieldIdentifier::new("Address", "Street"),
        FieldIdentifier::new("Address", "Street")
    );
    assert_ne!(
        FieldIdentifier::new("Address", "Street"),
        FieldIdentifier::root("Address.Street")
    );
}

#[test]
fn test_identifier_serializes() {
    let json = serde_json::to_value(FieldIdentifier::new("Address", "Street")).unwrap();
    assert_eq!(json["owner"], "Address");
    assert_eq!(json["field_name"], "Street");
}

// =============================================================================
// resolve_field
// =============================================================================

#[test]
fn test_resolve_single_segment() {
    let person = Person::default();
    assert_eq!(resolve_field(&person, "Name"), FieldIdentifier::root("Name"));
}

#[test]
fn test_resolve_nested_member() {
    let person = Person::default();
    assert_eq!(
        resolve_field(&person, "Address.Street"),
        FieldIdentifier::new("Address", "Street")
    );
}

#[test]
fn test_resolve_deeply_nested_member() {
    let person = Person::default();
    assert_eq!(
        resolve_field(&person, "Address.Geo.Lat"),
        FieldIdentifier::new("Address.Geo", "Lat")
    );
}

#[test]
fn test_resolve_unset_intermediate_falls_back_to_root() {
    let person = Person::default();
    assert_eq!(
        resolve_field(&person, "Billing.Street"),
        FieldIdentifier::root("Billing.Street")
    );
}

#[test]
fn test_resolve_set_optional_intermediate() {
    let person = Person {
        billing: Some(Address::default()),
        ..Person::default()
    };
    assert_eq!(
        resolve_field(&person, "Billing.Street"),
        FieldIdentifier::new("Billing", "Street")
    );
}

#[test]
fn test_resolve_unknown_intermediate_falls_back_to_root() {
    let person = Person::default();
    assert_eq!(
        resolve_field(&person, "Employer.Name"),
        FieldIdentifier::root("Employer.Name")
    );
}

#[test]
fn test_resolve_non_object_intermediate_falls_back_to_root() {
    let person = Person::default();
    assert_eq!(
        resolve_field(&person, "Name.Length"),
        FieldIdentifier::root("Name.Length")
    );
}

#[test]
fn test_resolve_keeps_unknown_leaf() {
    // The leaf is not checked against the owner's members.
    let person = Person::default();
    assert_eq!(
        resolve_field(&person, "Address.Zip"),
        FieldIdentifier::new("Address", "Zip")
    );
}
