//! Rules for the demo models.

use async_trait::async_trait;
use editform::prelude::*;

use crate::models::{Address, Person};

pub const NAME_REQUIRED: &str = "Name is required.";
pub const NAME_TOO_SHORT: &str = "Name must be at least 3 characters.";
pub const STREET_REQUIRED: &str = "Street is required.";
pub const CITY_REQUIRED: &str = "City is required.";

/// Validates an [`Address`].
pub struct AddressValidator {
    rules: RuleSet<Address>,
}

impl AddressValidator {
    fn rules() -> RuleSet<Address> {
        RuleSet::<Address>::new()
            .rule_for("Street", |a| &a.street)
            .required(STREET_REQUIRED)
            .rule_for("City", |a| &a.city)
            .required(CITY_REQUIRED)
            .build()
    }
}

impl Default for AddressValidator {
    fn default() -> Self {
        Self {
            rules: Self::rules(),
        }
    }
}

#[async_trait]
impl Validator<Address> for AddressValidator {
    async fn validate(
        &self,
        request: ValidationRequest<Address>,
    ) -> Result<ValidationResult, ValidatorError> {
        self.rules.validate(request).await
    }
}

/// Validates a [`Person`], including its address.
pub struct PersonValidator {
    rules: RuleSet<Person>,
}

impl Default for PersonValidator {
    fn default() -> Self {
        let rules = RuleSet::<Person>::new()
            .rule_for("Name", |p| &p.name)
            .required(NAME_REQUIRED)
            .min_length(3, NAME_TOO_SHORT)
            .rule_for("Address", |p| &p.address)
            .set_validator(AddressValidator::rules())
            .build();
        Self { rules }
    }
}

#[async_trait]
impl Validator<Person> for PersonValidator {
    async fn validate(
        &self,
        request: ValidationRequest<Person>,
    ) -> Result<ValidationResult, ValidatorError> {
        self.rules.validate(request).await
    }
}

register_validator!(PersonValidator => Person);
register_validator!(AddressValidator => Address);
