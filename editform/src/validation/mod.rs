//! Validation capability and rule builder.
//!
//! A [`Validator`] turns a [`ValidationRequest`] into a [`ValidationResult`].
//! Any type can implement it; [`RuleSet`] is a fluent, rule-based
//! implementation covering the common cases.
//!
//! # Example
//!
//! ```ignore
//! use editform::validation::{MemberSelector, RuleSet};
//!
//! let rules = RuleSet::<Signup>::new()
//!     .rule_for("Username", |s| &s.username)
//!         .required("Username is required")
//!         .min_length(3, "Username must be at least 3 characters")
//!     .rule_for("Email", |s| &s.email)
//!         .required("Email is required")
//!         .email("Please enter a valid email")
//!     .rule_for("AcceptTerms", |s| &s.accept_terms)
//!         .checked("You must accept the terms")
//!     .build();
//!
//! let result = rules.check(&signup, &MemberSelector::All).await;
//! if result.is_valid() {
//!     // Proceed with form submission
//! }
//! ```

mod request;
mod result;
mod validator;

pub use request::{MemberSelector, ValidationRequest};
pub use result::{ValidationFailure, ValidationResult};
pub use validator::{BoxFuture, CascadeMode, RuleBuilder, RuleSet, Validator};
