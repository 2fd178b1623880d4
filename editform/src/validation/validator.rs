//! The validator capability and a fluent rule builder implementing it.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use super::request::{MemberSelector, ValidationRequest};
use super::result::{ValidationFailure, ValidationResult};
use crate::error::ValidatorError;
use crate::model::Model;

/// Type alias for boxed futures used in async validation.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Type alias for sync validation rule closures.
type SyncRule<V> = Box<dyn Fn(&V) -> Result<(), String> + Send + Sync>;

/// Type alias for async validation rule closures.
type AsyncRule<V> = Box<dyn Fn(&V) -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

/// Something that can validate a model of type `M`.
///
/// Implementations report rule violations through the returned
/// [`ValidationResult`]; `Err` is reserved for validators that could not
/// run at all.
#[async_trait]
pub trait Validator<M: Model>: Send + Sync {
    /// Validate the members of `request.model()` selected by the request.
    async fn validate(
        &self,
        request: ValidationRequest<M>,
    ) -> Result<ValidationResult, ValidatorError>;
}

/// What to do after a rule of a property fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CascadeMode {
    /// Keep running the property's remaining rules (default).
    #[default]
    Continue,
    /// Skip the property's remaining rules and nested validators.
    Stop,
}

enum Rule<V> {
    Sync(SyncRule<V>),
    Async(AsyncRule<V>),
}

/// The rules of one property, type-erased over the property's value type.
trait PropertyRules<M>: Send + Sync {
    fn check<'a>(
        &'a self,
        model: &'a M,
        selector: &'a MemberSelector,
        prefix: &'a str,
    ) -> BoxFuture<'a, Vec<ValidationFailure>>;
}

struct Property<M, V> {
    path: String,
    accessor: fn(&M) -> &V,
    cascade: CascadeMode,
    rules: Vec<Rule<V>>,
    children: Vec<RuleSet<V>>,
}

impl<M, V> PropertyRules<M> for Property<M, V>
where
    M: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn check<'a>(
        &'a self,
        model: &'a M,
        selector: &'a MemberSelector,
        prefix: &'a str,
    ) -> BoxFuture<'a, Vec<ValidationFailure>> {
        Box::pin(async move {
            let path = join_path(prefix, &self.path);
            let mut failures = Vec::new();

            if !selector.enters(&path) {
                return failures;
            }

            let value = (self.accessor)(model);

            if selector.selects(&path) {
                for rule in &self.rules {
                    let outcome = match rule {
                        Rule::Sync(rule) => rule(value),
                        Rule::Async(rule) => rule(value).await,
                    };
                    if let Err(message) = outcome {
                        failures.push(ValidationFailure::new(path.clone(), message));
                        if self.cascade == CascadeMode::Stop {
                            return failures;
                        }
                    }
                }
            }

            for child in &self.children {
                failures.extend(child.run(value, selector, &path).await);
            }

            failures
        })
    }
}

fn join_path(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_string()
    } else {
        format!("{}.{}", prefix, path)
    }
}

/// A set of property rules for values of type `M`.
///
/// # Example
///
/// ```ignore
/// let address = RuleSet::<Address>::new()
///     .rule_for("Street", |a| &a.street)
///         .required("Street is required")
///     .build();
///
/// let person = RuleSet::<Person>::new()
///     .rule_for("Name", |p| &p.name)
///         .required("Name is required")
///         .min_length(3, "Name must be at least 3 characters")
///     .rule_for("Address", |p| &p.address)
///         .set_validator(address)
///     .build();
///
/// let result = person.check(&model, &MemberSelector::All).await;
/// ```
pub struct RuleSet<M> {
    properties: Vec<Box<dyn PropertyRules<M>>>,
}

impl<M: Send + Sync + 'static> RuleSet<M> {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
        }
    }

    /// Start declaring rules for the property at `path`.
    pub fn rule_for<V>(self, path: impl Into<String>, accessor: fn(&M) -> &V) -> RuleBuilder<M, V>
    where
        V: Send + Sync + 'static,
    {
        RuleBuilder {
            set: self,
            property: Property {
                path: path.into(),
                accessor,
                cascade: CascadeMode::default(),
                rules: Vec::new(),
                children: Vec::new(),
            },
        }
    }

    /// Append every property of `other` to this set.
    pub fn include(mut self, other: RuleSet<M>) -> Self {
        self.properties.extend(other.properties);
        self
    }

    /// Number of properties with rules.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if no rules are declared.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Run the rules selected by `selector` against `model`.
    pub async fn check(&self, model: &M, selector: &MemberSelector) -> ValidationResult {
        ValidationResult::from_failures(self.run(model, selector, "").await)
    }

    fn run<'a>(
        &'a self,
        model: &'a M,
        selector: &'a MemberSelector,
        prefix: &'a str,
    ) -> BoxFuture<'a, Vec<ValidationFailure>> {
        Box::pin(async move {
            let mut failures = Vec::new();
            for property in &self.properties {
                failures.extend(property.check(model, selector, prefix).await);
            }
            failures
        })
    }
}

impl<M: Send + Sync + 'static> Default for RuleSet<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<M: Model> Validator<M> for RuleSet<M> {
    async fn validate(
        &self,
        request: ValidationRequest<M>,
    ) -> Result<ValidationResult, ValidatorError> {
        Ok(self.check(request.model(), request.selector()).await)
    }
}

/// Builder for adding validation rules to a single property.
pub struct RuleBuilder<M, V> {
    set: RuleSet<M>,
    property: Property<M, V>,
}

impl<M, V> RuleBuilder<M, V>
where
    M: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Add a custom synchronous validation rule.
    pub fn rule<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        self.property.rules.push(Rule::Sync(Box::new(move |v| {
            if f(v) { Ok(()) } else { Err(msg.clone()) }
        })));
        self
    }

    /// Add a custom asynchronous validation rule.
    ///
    /// The rule receives its own copy of the value.
    pub fn rule_async<F, Fut>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        V: Clone,
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let msg = msg.into();
        self.property.rules.push(Rule::Async(Box::new(move |v| {
            let fut = f(v.clone());
            let msg = msg.clone();
            Box::pin(async move { if fut.await { Ok(()) } else { Err(msg) } })
        })));
        self
    }

    /// Validate the property's value with a nested rule set.
    ///
    /// Nested failures are reported under this property's path.
    pub fn set_validator(mut self, rules: RuleSet<V>) -> Self {
        self.property.children.push(rules);
        self
    }

    /// Set what happens after one of this property's rules fails.
    pub fn cascade(mut self, mode: CascadeMode) -> Self {
        self.property.cascade = mode;
        self
    }

    /// Continue with the next property.
    pub fn rule_for<V2>(self, path: impl Into<String>, accessor: fn(&M) -> &V2) -> RuleBuilder<M, V2>
    where
        V2: Send + Sync + 'static,
    {
        self.build().rule_for(path, accessor)
    }

    /// Finish the rule set.
    pub fn build(self) -> RuleSet<M> {
        let mut set = self.set;
        set.properties.push(Box::new(self.property));
        set
    }
}

// Built-in rules for String values
impl<M: Send + Sync + 'static> RuleBuilder<M, String> {
    /// Require the value to be non-blank.
    pub fn required(self, msg: impl Into<String>) -> Self {
        self.rule(|v| !v.trim().is_empty(), msg)
    }

    /// Require minimum length (in characters).
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.chars().count() >= min, msg)
    }

    /// Require maximum length (in characters).
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.chars().count() <= max, msg)
    }

    /// Require the value to match a regex pattern.
    pub fn pattern(self, pattern: &str, msg: impl Into<String>) -> Result<Self, regex::Error> {
        let re = regex::Regex::new(pattern)?;
        Ok(self.rule(move |v| re.is_match(v), msg))
    }

    /// Require a valid email address.
    ///
    /// Empty values pass; combine with [`required`](Self::required).
    pub fn email(self, msg: impl Into<String>) -> Self {
        self.rule(
            |v| v.is_empty() || email_address::EmailAddress::is_valid(v),
            msg,
        )
    }

    /// Require the value to equal another value.
    pub fn equals(self, other: impl Into<String>, msg: impl Into<String>) -> Self {
        let other = other.into();
        self.rule(move |v| v == &other, msg)
    }

    /// Require the value to contain a substring.
    pub fn contains(self, substr: impl Into<String>, msg: impl Into<String>) -> Self {
        let substr = substr.into();
        self.rule(move |v| v.contains(&substr), msg)
    }
}

// Built-in rules for bool values
impl<M: Send + Sync + 'static> RuleBuilder<M, bool> {
    /// Require the value to be `true`.
    pub fn checked(self, msg: impl Into<String>) -> Self {
        self.rule(|&v| v, msg)
    }

    /// Require the value to be `false`.
    pub fn unchecked(self, msg: impl Into<String>) -> Self {
        self.rule(|&v| !v, msg)
    }
}

// Built-in rules for optional values
impl<M, T> RuleBuilder<M, Option<T>>
where
    M: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    /// Require a value to be present.
    pub fn selected(self, msg: impl Into<String>) -> Self {
        self.rule(Option::is_some, msg)
    }
}
