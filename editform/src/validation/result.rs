use serde::Serialize;

/// A single rule violation reported by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    /// Dot-separated path of the failing member, e.g. `"Address.Street"`.
    pub property_path: String,
    /// Error message.
    pub message: String,
}

impl ValidationFailure {
    /// Creates a new failure.
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: property_path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.property_path, self.message)
    }
}

/// Result of validating a model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum ValidationResult {
    /// Every selected rule passed.
    #[default]
    Valid,
    /// One or more rules failed, in rule declaration order.
    Invalid(Vec<ValidationFailure>),
}

impl ValidationResult {
    /// Build a result from a list of failures.
    pub fn from_failures(failures: Vec<ValidationFailure>) -> Self {
        if failures.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(failures)
        }
    }

    /// Check if all rules passed.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Check if any rule failed.
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Get all failures.
    pub fn errors(&self) -> &[ValidationFailure] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    /// Get the first failure (if any).
    pub fn first_error(&self) -> Option<&ValidationFailure> {
        self.errors().first()
    }

    /// Failures reported for exactly `property_path`.
    pub fn errors_for<'a>(
        &'a self,
        property_path: &'a str,
    ) -> impl Iterator<Item = &'a ValidationFailure> + 'a {
        self.errors()
            .iter()
            .filter(move |failure| failure.property_path == property_path)
    }
}

impl From<Vec<ValidationFailure>> for ValidationResult {
    fn from(failures: Vec<ValidationFailure>) -> Self {
        Self::from_failures(failures)
    }
}
