//! Form validation for edit contexts.
//!
//! An [`EditContext`] holds a form's model and announces submits and field
//! changes. A [`FormValidationBridge`] listens to those announcements, runs
//! a [`Validator`](validation::Validator) and writes the failures back as
//! per-field messages that the form renders.

pub mod bridge;
pub mod context;
pub mod error;
pub mod event;
pub mod field;
pub mod messages;
pub mod model;
pub mod services;
pub mod validation;
pub mod wakeup;

pub use bridge::{BridgeOptions, BridgeParameters, BridgeStatus, FormValidationBridge, ValidationMode};
pub use context::{ContextId, EditContext};
pub use error::{ConfigError, UnhandledError, UnhandledErrorKind, ValidatorError};
pub use field::{FieldIdentifier, resolve_field};
pub use messages::ValidationMessageStore;
pub use model::Model;
pub use services::{ServiceProvider, TypeDescriptor};

pub use editform_derive::Model;

#[doc(hidden)]
pub use inventory;

pub mod prelude {
    pub use crate::bridge::{
        BridgeOptions, BridgeParameters, BridgeStatus, FormValidationBridge, ValidationMode,
    };
    pub use crate::context::EditContext;
    pub use crate::error::{ConfigError, ValidatorError};
    pub use crate::event::{FieldChanged, ValidationRequested, ValidationStateChanged};
    pub use crate::field::FieldIdentifier;
    pub use crate::messages::ValidationMessageStore;
    pub use crate::model::Model;
    pub use crate::register_validator;
    pub use crate::services::{ServiceProvider, TypeDescriptor};
    pub use crate::validation::{
        CascadeMode, MemberSelector, RuleSet, ValidationFailure, ValidationRequest,
        ValidationResult, Validator,
    };

    pub use editform_derive::Model;
}
