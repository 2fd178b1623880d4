//! Validator lookup by type.
//!
//! Forms may name their validator by type instead of passing an instance.
//! The [`ServiceProvider`] maps validator types to instances or factories.
//! Validators declared with [`register_validator!`](crate::register_validator)
//! are collected with `inventory` and can all be added at once with
//! [`ServiceProvider::from_registry`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::model::Model;
use crate::validation::Validator;

/// Runtime handle naming a type.
///
/// Equality only considers the `TypeId`.
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    /// Descriptor for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The type's `TypeId`.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The type's full name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type's name without its module path.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl std::hash::Hash for TypeDescriptor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Type-erased `Arc<dyn Validator<M>>`.
type ErasedValidator = Arc<dyn Any + Send + Sync>;

/// Validator registration entry for inventory.
pub struct ValidatorRegistration {
    validator: fn() -> TypeDescriptor,
    model: fn() -> TypeId,
    factory: fn() -> ErasedValidator,
}

impl ValidatorRegistration {
    /// Create a registration for validator `V` of model `M`.
    pub const fn new<V, M>() -> Self
    where
        V: Validator<M> + Default + 'static,
        M: Model,
    {
        Self {
            validator: TypeDescriptor::of::<V>,
            model: TypeId::of::<M>,
            factory: erased_factory::<V, M>,
        }
    }

    /// The registered validator type.
    pub fn validator(&self) -> TypeDescriptor {
        (self.validator)()
    }

    /// The model type the validator validates.
    pub fn model(&self) -> TypeId {
        (self.model)()
    }
}

inventory::collect!(ValidatorRegistration);

/// Get all registered validators.
pub fn registered_validators() -> impl Iterator<Item = &'static ValidatorRegistration> {
    inventory::iter::<ValidatorRegistration>()
}

fn erased_factory<V, M>() -> ErasedValidator
where
    V: Validator<M> + Default + 'static,
    M: Model,
{
    let validator: Arc<dyn Validator<M>> = Arc::new(V::default());
    Arc::new(validator)
}

/// Register a validator type for [`ServiceProvider::from_registry`].
///
/// The validator must implement `Default`.
///
/// ```ignore
/// register_validator!(PersonValidator => Person);
/// ```
#[macro_export]
macro_rules! register_validator {
    ($validator:ty => $model:ty) => {
        $crate::inventory::submit! {
            $crate::services::ValidatorRegistration::new::<$validator, $model>()
        }
    };
}

enum Provision {
    Singleton(ErasedValidator),
    Transient(fn() -> ErasedValidator),
}

struct Service {
    model: TypeId,
    provision: Provision,
}

/// Resolves validators by type.
#[derive(Default)]
pub struct ServiceProvider {
    services: HashMap<TypeId, Service>,
}

impl ServiceProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider holding every validator registered with
    /// [`register_validator!`](crate::register_validator).
    pub fn from_registry() -> Self {
        let mut provider = Self::new();
        provider.add_registered_validators();
        provider
    }

    /// Add every registered validator not already present.
    ///
    /// Registered validators are transient: each resolution builds a new
    /// instance.
    pub fn add_registered_validators(&mut self) -> &mut Self {
        for registration in registered_validators() {
            let validator = registration.validator();
            log::debug!("ServiceProvider: registering {}", validator);
            self.services.entry(validator.id()).or_insert(Service {
                model: registration.model(),
                provision: Provision::Transient(registration.factory),
            });
        }
        self
    }

    /// Register a shared validator instance.
    ///
    /// Replaces any earlier registration of `V`.
    pub fn add_validator<M, V>(&mut self, validator: V) -> &mut Self
    where
        M: Model,
        V: Validator<M> + 'static,
    {
        let shared: Arc<dyn Validator<M>> = Arc::new(validator);
        self.services.insert(
            TypeId::of::<V>(),
            Service {
                model: TypeId::of::<M>(),
                provision: Provision::Singleton(Arc::new(shared)),
            },
        );
        self
    }

    /// Register a validator built anew on every resolution.
    pub fn add_validator_factory<M, V>(&mut self) -> &mut Self
    where
        M: Model,
        V: Validator<M> + Default + 'static,
    {
        self.services.insert(
            TypeId::of::<V>(),
            Service {
                model: TypeId::of::<M>(),
                provision: Provision::Transient(erased_factory::<V, M>),
            },
        );
        self
    }

    /// Check if `descriptor` names a validator of `M`.
    ///
    /// Both this provider's registrations and the global registry count,
    /// so a registered validator type is recognised even when this
    /// provider was built without it.
    pub fn implements_validator<M: Model>(&self, descriptor: &TypeDescriptor) -> bool {
        let model = TypeId::of::<M>();
        if let Some(service) = self.services.get(&descriptor.id()) {
            return service.model == model;
        }
        registered_validators().any(|registration| {
            registration.validator() == *descriptor && registration.model() == model
        })
    }

    /// Resolve the validator registered under `descriptor`.
    pub fn resolve<M: Model>(&self, descriptor: &TypeDescriptor) -> Option<Arc<dyn Validator<M>>> {
        let service = self.services.get(&descriptor.id())?;
        let erased = match &service.provision {
            Provision::Singleton(instance) => Arc::clone(instance),
            Provision::Transient(factory) => factory(),
        };
        erased.downcast_ref::<Arc<dyn Validator<M>>>().cloned()
    }

    /// Number of registered validator types.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Check if no validators are registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl std::fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("validators", &self.services.len())
            .finish()
    }
}
