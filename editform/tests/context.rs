//! Tests for the edit context and validation message stores.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use editform::event::EventKind;
use editform::{EditContext, FieldIdentifier, Model, ValidationMessageStore, wakeup};

#[derive(Debug, Clone, Default, Model)]
#[model(rename_all = "PascalCase")]
struct Person {
    name: String,
    age: u32,
}

fn name() -> FieldIdentifier {
    FieldIdentifier::root("Name")
}

fn age() -> FieldIdentifier {
    FieldIdentifier::root("Age")
}

// =============================================================================
// Model and modification tracking
// =============================================================================

#[test]
fn test_context_ids_are_unique() {
    let a = EditContext::new(Person::default());
    let b = EditContext::new(Person::default());
    assert_ne!(a.id(), b.id());
    assert!(a.id().to_string().starts_with("__edit_context_"));
}

#[test]
fn test_set_field_updates_model_and_marks_modified() {
    let cx = EditContext::new(Person::default());
    assert!(!cx.is_modified());

    cx.set_field(name(), |p| p.name = "Ada".into());

    assert_eq!(cx.model().name, "Ada");
    assert!(cx.is_modified());
    assert!(cx.is_field_modified(&name()));
    assert!(!cx.is_field_modified(&age()));
}

#[test]
fn test_snapshots_keep_old_value() {
    let cx = EditContext::new(Person::default());
    let before = cx.model();

    cx.update(|p| p.age = 42);

    assert_eq!(before.age, 0);
    assert_eq!(cx.model().age, 42);
}

#[test]
fn test_update_does_not_notify() {
    let cx = EditContext::new(Person::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let _sub = cx.on_field_changed({
        let calls = Arc::clone(&calls);
        move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    });

    cx.update(|p| p.name = "quiet".into());

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!cx.is_modified());
}

#[test]
fn test_mark_as_unmodified() {
    let cx = EditContext::new(Person::default());
    cx.notify_field_changed(name());
    cx.notify_field_changed(age());

    cx.mark_field_as_unmodified(&name());
    assert!(!cx.is_field_modified(&name()));
    assert!(cx.is_field_modified(&age()));

    cx.mark_as_unmodified();
    assert!(!cx.is_modified());
}

// =============================================================================
// Subscriptions
// =============================================================================

#[test]
fn test_field_changed_reaches_subscribers() {
    let cx = EditContext::new(Person::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let _sub = cx.on_field_changed({
        let seen = Arc::clone(&seen);
        move |event| seen.lock().unwrap().push(event.field.clone())
    });

    cx.set_field(age(), |p| p.age = 7);
    cx.set_field(name(), |p| p.name = "x".into());

    assert_eq!(*seen.lock().unwrap(), vec![age(), name()]);
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let cx = EditContext::new(Person::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let sub = cx.on_validation_requested({
        let calls = Arc::clone(&calls);
        move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    });

    cx.request_validation();
    assert!(cx.unsubscribe(sub));
    cx.request_validation();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!cx.unsubscribe(sub));
}

#[test]
fn test_handler_count_per_kind() {
    let cx = EditContext::new(Person::default());
    let a = cx.on_validation_requested(|_| {});
    let _b = cx.on_field_changed(|_| {});
    let _c = cx.on_field_changed(|_| {});

    assert_eq!(cx.handler_count(EventKind::ValidationRequested), 1);
    assert_eq!(cx.handler_count(EventKind::FieldChanged), 2);
    assert_eq!(cx.handler_count(EventKind::ValidationStateChanged), 0);
    assert_eq!(a.kind(), EventKind::ValidationRequested);
}

#[test]
fn test_handler_may_unsubscribe_itself() {
    let cx = EditContext::new(Person::default());
    let slot = Arc::new(Mutex::new(None));
    let sub = cx.on_validation_requested({
        let cx = Arc::downgrade(&cx);
        let slot = Arc::clone(&slot);
        move |_| {
            if let (Some(cx), Some(sub)) = (cx.upgrade(), slot.lock().unwrap().take()) {
                cx.unsubscribe(sub);
            }
        }
    });
    *slot.lock().unwrap() = Some(sub);

    cx.request_validation();

    assert_eq!(cx.handler_count(EventKind::ValidationRequested), 0);
}

#[test]
fn test_state_changed_sends_wakeup() {
    let cx = EditContext::new(Person::default());
    let (tx, mut rx) = wakeup::channel();
    cx.install_wakeup(tx);

    cx.notify_validation_state_changed();
    cx.notify_validation_state_changed();

    assert_eq!(rx.drain(), 2);
    assert_eq!(rx.drain(), 0);
}

// =============================================================================
// Message stores
// =============================================================================

#[test]
fn test_store_messages_are_visible_on_context() {
    let cx = EditContext::new(Person::default());
    let store = ValidationMessageStore::new(&cx);

    store.add(name(), "Name is required.");

    assert_eq!(store.get(&name()), vec!["Name is required."]);
    assert_eq!(cx.field_messages(&name()), vec!["Name is required."]);
    assert_eq!(cx.messages(), vec!["Name is required."]);
    assert_eq!(cx.invalid_fields(), vec![name()]);
    assert!(!cx.is_valid());
}

#[test]
fn test_store_deduplicates_in_insertion_order() {
    let cx = EditContext::new(Person::default());
    let store = ValidationMessageStore::new(&cx);

    store.add_all(name(), ["b", "a", "b"]);

    assert_eq!(store.get(&name()), vec!["b", "a"]);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_store_clear_field_keeps_other_fields() {
    let cx = EditContext::new(Person::default());
    let store = ValidationMessageStore::new(&cx);
    store.add(name(), "bad name");
    store.add(age(), "bad age");

    store.clear_field(&name());

    assert!(store.get(&name()).is_empty());
    assert_eq!(store.get(&age()), vec!["bad age"]);
}

#[test]
fn test_stores_are_isolated() {
    let cx = EditContext::new(Person::default());
    let first = ValidationMessageStore::new(&cx);
    let second = ValidationMessageStore::new(&cx);
    first.add(name(), "from first");
    second.add(name(), "from second");

    first.clear();

    assert!(first.is_empty());
    assert_eq!(cx.field_messages(&name()), vec!["from second"]);
}

#[test]
fn test_store_clones_share_messages() {
    let cx = EditContext::new(Person::default());
    let store = ValidationMessageStore::new(&cx);
    let clone = store.clone();

    clone.add(age(), "too young");

    assert_eq!(store.id(), clone.id());
    assert_eq!(store.get(&age()), vec!["too young"]);
}

#[test]
fn test_empty_context_is_valid() {
    let cx = EditContext::new(Person::default());
    let _store = ValidationMessageStore::new(&cx);
    assert!(cx.is_valid());
    assert!(cx.invalid_fields().is_empty());
}
