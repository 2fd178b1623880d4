//! Error types for bridge configuration and validation.

use std::any::Any;

use crate::context::ContextId;

/// Errors raised while applying bridge parameters.
///
/// These are fatal configuration problems. They are returned synchronously
/// from [`FormValidationBridge::set_parameters`](crate::FormValidationBridge::set_parameters)
/// before any validation runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No edit context was supplied.
    #[error("FormValidationBridge must be hosted inside an edit form")]
    MissingEditContext,

    /// Neither a validator instance nor a validator type was supplied.
    #[error("one of validator_type or validator_instance must be set")]
    MissingValidator,

    /// Both a validator instance and a validator type were supplied.
    #[error("only one of validator_type or validator_instance may be set")]
    AmbiguousValidator,

    /// The validator type does not validate the form's model type.
    #[error("{type_name} must implement Validator<{model}>")]
    NotAValidator {
        type_name: &'static str,
        model: &'static str,
    },

    /// The validator type is not registered with the service provider.
    #[error("validator of type {type_name} was not found in the service provider")]
    UnresolvedValidator { type_name: &'static str },

    /// The bridge has already been disposed.
    #[error("FormValidationBridge has been disposed")]
    Disposed,
}

/// Errors a validator may return instead of a result.
///
/// Rule violations are not errors; they are reported through
/// [`ValidationResult`](crate::validation::ValidationResult).
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    /// The validator could not complete.
    #[error("validation failed: {0}")]
    Failed(String),

    /// Any other error surfaced by a validator implementation.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ValidatorError {
    /// Creates a new failure with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// A validation run that ended without applying its result.
///
/// Sent to the error channel configured in
/// [`BridgeOptions`](crate::BridgeOptions).
#[derive(Debug)]
pub struct UnhandledError {
    /// The edit context the run was dispatched for.
    pub context: ContextId,
    /// What went wrong.
    pub kind: UnhandledErrorKind,
}

/// The kind of unhandled error.
#[derive(Debug)]
pub enum UnhandledErrorKind {
    /// The validator returned an error.
    Validator(ValidatorError),
    /// The validation task panicked.
    Panic {
        /// Panic message extracted from the panic payload.
        message: String,
    },
}

impl std::fmt::Display for UnhandledError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            UnhandledErrorKind::Validator(error) => {
                write!(f, "validation for {} failed: {}", self.context, error)
            }
            UnhandledErrorKind::Panic { message } => {
                write!(f, "validation for {} panicked: {}", self.context, message)
            }
        }
    }
}

impl std::error::Error for UnhandledError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            UnhandledErrorKind::Validator(error) => Some(error),
            UnhandledErrorKind::Panic { .. } => None,
        }
    }
}

/// Extract a human-readable message from a panic payload.
///
/// Panics can contain either `&str` or `String` payloads. This function
/// attempts to extract either, falling back to a generic message.
pub fn extract_panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
