use std::sync::atomic::{AtomicU64, Ordering};

use crate::field::FieldIdentifier;

/// Fired when the form is submitted and the whole model should be validated.
#[derive(Debug, Clone, Default)]
pub struct ValidationRequested;

/// Fired when the value bound to a field changes.
#[derive(Debug, Clone)]
pub struct FieldChanged {
    /// The field that changed.
    pub field: FieldIdentifier,
}

/// Fired after validation messages were updated, so dependants can re-render.
#[derive(Debug, Clone, Default)]
pub struct ValidationStateChanged;

/// Unique identifier for an event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__subscription_{}", self.0)
    }
}

/// Which notification a subscription listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ValidationRequested,
    FieldChanged,
    ValidationStateChanged,
}

/// Token returned when subscribing to an edit context.
///
/// Pass it back to [`EditContext::unsubscribe`](crate::EditContext::unsubscribe)
/// to stop receiving notifications. Dropping the token does not
/// unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    pub(crate) id: SubscriptionId,
    pub(crate) kind: EventKind,
}

impl Subscription {
    /// The subscription's id.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The notification this subscription listens to.
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}
