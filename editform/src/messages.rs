use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::context::EditContext;
use crate::field::FieldIdentifier;
use crate::model::Model;

/// Unique identifier for a message store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreId(u64);

impl StoreId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

/// Validation messages written by one producer into one edit context.
///
/// Several stores can feed the same context; clearing a store only removes
/// the messages that store added. Messages for a field behave as a set:
/// adding the same message twice keeps one copy, in first-added order.
pub struct ValidationMessageStore<M: Model> {
    id: StoreId,
    context: Arc<EditContext<M>>,
}

impl<M: Model> Clone for ValidationMessageStore<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            context: Arc::clone(&self.context),
        }
    }
}

impl<M: Model> std::fmt::Debug for ValidationMessageStore<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationMessageStore")
            .field("id", &self.id)
            .field("context", &self.context.id())
            .finish()
    }
}

impl<M: Model> ValidationMessageStore<M> {
    /// Create an empty store attached to `context`.
    pub fn new(context: &Arc<EditContext<M>>) -> Self {
        Self {
            id: StoreId::new(),
            context: Arc::clone(context),
        }
    }

    /// The store's id.
    pub fn id(&self) -> StoreId {
        self.id
    }

    /// The edit context this store writes into.
    pub fn context(&self) -> &Arc<EditContext<M>> {
        &self.context
    }

    /// Add a message for `field`.
    pub fn add(&self, field: FieldIdentifier, message: impl Into<String>) {
        let message = message.into();
        log::trace!("store {:?}: add {} => {}", self.id, field, message);
        self.context.store_add(self.id, field, message);
    }

    /// Add several messages for `field`.
    pub fn add_all<I, S>(&self, field: FieldIdentifier, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for message in messages {
            self.add(field.clone(), message);
        }
    }

    /// Messages this store holds for `field`.
    pub fn get(&self, field: &FieldIdentifier) -> Vec<String> {
        self.context.store_get(self.id, field)
    }

    /// Total number of messages in this store.
    pub fn len(&self) -> usize {
        self.context.store_len(self.id)
    }

    /// Check if this store holds no messages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every message this store added.
    pub fn clear(&self) {
        log::trace!("store {:?}: clear", self.id);
        self.context.store_clear(self.id);
    }

    /// Remove the messages this store added for `field`.
    pub fn clear_field(&self, field: &FieldIdentifier) {
        log::trace!("store {:?}: clear {}", self.id, field);
        self.context.store_clear_field(self.id, field);
    }
}
