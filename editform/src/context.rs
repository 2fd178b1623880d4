//! The edit context: a bound model plus its change notifications.
//!
//! `EditContext` is the host side of a form. Inputs write through it and
//! report field changes, the submit button requests validation, and
//! validation message stores write their messages into it. Everything that
//! renders the form reads messages back from it.
//!
//! # Example
//!
//! ```ignore
//! let cx = EditContext::new(Person::default());
//!
//! let sub = cx.on_field_changed(|event| log::info!("{} changed", event.field));
//! cx.set_field(FieldIdentifier::root("Name"), |p| p.name = "Ada".into());
//! cx.unsubscribe(sub);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use crate::event::{
    EventKind, FieldChanged, Subscription, SubscriptionId, ValidationRequested,
    ValidationStateChanged,
};
use crate::field::FieldIdentifier;
use crate::messages::StoreId;
use crate::model::Model;
use crate::wakeup::{WakeupHandle, WakeupSender};

/// Unique identifier for an edit context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__edit_context_{}", self.0)
    }
}

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Subscribers of one notification, in subscription order.
struct Handlers<E> {
    entries: Mutex<Vec<(SubscriptionId, Handler<E>)>>,
}

impl<E> Handlers<E> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    fn add(&self, handler: Handler<E>) -> SubscriptionId {
        let id = SubscriptionId::new();
        lock(&self.entries).push((id, handler));
        id
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        entries.len() != before
    }

    fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Invoke every handler.
    ///
    /// Handlers are cloned out first so they may subscribe or unsubscribe
    /// while running.
    fn emit(&self, event: &E) {
        let handlers: Vec<Handler<E>> = lock(&self.entries)
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(event);
        }
    }
}

type FieldMessages = BTreeMap<FieldIdentifier, Vec<String>>;

/// A form's bound model, its modification state, and its validation
/// messages.
pub struct EditContext<M: Model> {
    id: ContextId,
    model: RwLock<Arc<M>>,
    modified: Mutex<BTreeSet<FieldIdentifier>>,
    messages: Mutex<BTreeMap<StoreId, FieldMessages>>,
    validation_requested: Handlers<ValidationRequested>,
    field_changed: Handlers<FieldChanged>,
    validation_state_changed: Handlers<ValidationStateChanged>,
    wakeup: WakeupHandle,
}

impl<M: Model> EditContext<M> {
    /// Create a new edit context bound to `model`.
    pub fn new(model: M) -> Arc<Self> {
        let cx = Arc::new(Self {
            id: ContextId::new(),
            model: RwLock::new(Arc::new(model)),
            modified: Mutex::new(BTreeSet::new()),
            messages: Mutex::new(BTreeMap::new()),
            validation_requested: Handlers::new(),
            field_changed: Handlers::new(),
            validation_state_changed: Handlers::new(),
            wakeup: WakeupHandle::default(),
        });
        log::debug!("EditContext {} created", cx.id);
        cx
    }

    /// The context's id.
    pub fn id(&self) -> ContextId {
        self.id
    }

    // -------------------------------------------------------------------------
    // Model
    // -------------------------------------------------------------------------

    /// Snapshot of the current model.
    pub fn model(&self) -> Arc<M> {
        self.model
            .read()
            .map(|guard| Arc::clone(&*guard))
            .unwrap_or_else(|poisoned| Arc::clone(&*poisoned.into_inner()))
    }

    /// Mutate the model without notifying anyone.
    ///
    /// Snapshots handed out earlier by [`model`](Self::model) keep the old
    /// value.
    pub fn update<F>(&self, f: F)
    where
        M: Clone,
        F: FnOnce(&mut M),
    {
        let mut guard = self
            .model
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(Arc::make_mut(&mut *guard));
    }

    /// Mutate the model on behalf of an input bound to `field`.
    ///
    /// Marks the field as modified and fires the field-changed
    /// notification once the write lock is released.
    pub fn set_field<F>(&self, field: FieldIdentifier, f: F)
    where
        M: Clone,
        F: FnOnce(&mut M),
    {
        self.update(f);
        self.notify_field_changed(field);
    }

    // -------------------------------------------------------------------------
    // Modification tracking
    // -------------------------------------------------------------------------

    /// Check if any field has been modified.
    pub fn is_modified(&self) -> bool {
        !lock(&self.modified).is_empty()
    }

    /// Check if `field` has been modified.
    pub fn is_field_modified(&self, field: &FieldIdentifier) -> bool {
        lock(&self.modified).contains(field)
    }

    /// Clear the modification flag of every field.
    pub fn mark_as_unmodified(&self) {
        lock(&self.modified).clear();
    }

    /// Clear the modification flag of `field`.
    pub fn mark_field_as_unmodified(&self, field: &FieldIdentifier) {
        lock(&self.modified).remove(field);
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Subscribe to form submission.
    pub fn on_validation_requested<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&ValidationRequested) + Send + Sync + 'static,
    {
        let id = self.validation_requested.add(Arc::new(handler));
        log::debug!("EditContext {}: subscribed {} to validation requests", self.id, id);
        Subscription {
            id,
            kind: EventKind::ValidationRequested,
        }
    }

    /// Subscribe to field changes.
    pub fn on_field_changed<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&FieldChanged) + Send + Sync + 'static,
    {
        let id = self.field_changed.add(Arc::new(handler));
        log::debug!("EditContext {}: subscribed {} to field changes", self.id, id);
        Subscription {
            id,
            kind: EventKind::FieldChanged,
        }
    }

    /// Subscribe to validation state changes.
    pub fn on_validation_state_changed<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&ValidationStateChanged) + Send + Sync + 'static,
    {
        let id = self.validation_state_changed.add(Arc::new(handler));
        Subscription {
            id,
            kind: EventKind::ValidationStateChanged,
        }
    }

    /// Remove a subscription.
    ///
    /// Returns `false` if it was already removed.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let removed = match subscription.kind {
            EventKind::ValidationRequested => self.validation_requested.remove(subscription.id),
            EventKind::FieldChanged => self.field_changed.remove(subscription.id),
            EventKind::ValidationStateChanged => {
                self.validation_state_changed.remove(subscription.id)
            }
        };
        if removed {
            log::debug!("EditContext {}: unsubscribed {}", self.id, subscription.id);
        }
        removed
    }

    /// Number of live subscriptions for `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::ValidationRequested => self.validation_requested.len(),
            EventKind::FieldChanged => self.field_changed.len(),
            EventKind::ValidationStateChanged => self.validation_state_changed.len(),
        }
    }

    /// Install the sender used to request a redraw.
    pub fn install_wakeup(&self, sender: WakeupSender) {
        self.wakeup.install(sender);
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    /// Request validation of the whole model, as a form submit does.
    pub fn request_validation(&self) {
        log::debug!("EditContext {}: validation requested", self.id);
        self.validation_requested.emit(&ValidationRequested);
    }

    /// Mark `field` as modified and notify subscribers.
    pub fn notify_field_changed(&self, field: FieldIdentifier) {
        lock(&self.modified).insert(field.clone());
        log::debug!("EditContext {}: field {} changed", self.id, field);
        self.field_changed.emit(&FieldChanged { field });
    }

    /// Notify subscribers that validation messages changed.
    pub fn notify_validation_state_changed(&self) {
        self.validation_state_changed.emit(&ValidationStateChanged);
        self.wakeup.send();
    }

    // -------------------------------------------------------------------------
    // Messages
    // -------------------------------------------------------------------------

    /// All current validation messages, across every store.
    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages)
            .values()
            .flat_map(|fields| fields.values().flatten().cloned())
            .collect()
    }

    /// Current validation messages for `field`, across every store.
    pub fn field_messages(&self, field: &FieldIdentifier) -> Vec<String> {
        lock(&self.messages)
            .values()
            .filter_map(|fields| fields.get(field))
            .flatten()
            .cloned()
            .collect()
    }

    /// Fields that currently have at least one message.
    pub fn invalid_fields(&self) -> Vec<FieldIdentifier> {
        let messages = lock(&self.messages);
        let fields: BTreeSet<&FieldIdentifier> = messages
            .values()
            .flat_map(|fields| fields.keys())
            .collect();
        fields.into_iter().cloned().collect()
    }

    /// Check if there are no validation messages.
    pub fn is_valid(&self) -> bool {
        lock(&self.messages)
            .values()
            .all(|fields| fields.values().all(Vec::is_empty))
    }

    pub(crate) fn store_add(&self, store: StoreId, field: FieldIdentifier, message: String) {
        let mut messages = lock(&self.messages);
        let entry = messages.entry(store).or_default().entry(field).or_default();
        if !entry.contains(&message) {
            entry.push(message);
        }
    }

    pub(crate) fn store_get(&self, store: StoreId, field: &FieldIdentifier) -> Vec<String> {
        lock(&self.messages)
            .get(&store)
            .and_then(|fields| fields.get(field))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn store_len(&self, store: StoreId) -> usize {
        lock(&self.messages)
            .get(&store)
            .map(|fields| fields.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub(crate) fn store_clear(&self, store: StoreId) {
        lock(&self.messages).remove(&store);
    }

    pub(crate) fn store_clear_field(&self, store: StoreId, field: &FieldIdentifier) {
        if let Some(fields) = lock(&self.messages).get_mut(&store) {
            fields.remove(field);
        }
    }
}

impl<M: Model> std::fmt::Debug for EditContext<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditContext")
            .field("id", &self.id)
            .field("model", &std::any::type_name::<M>())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
