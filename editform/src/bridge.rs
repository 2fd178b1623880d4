//! Binds a validator to an edit context.
//!
//! [`FormValidationBridge`] listens to an [`EditContext`]: a submit
//! validates the whole model, a field change validates that one field. The
//! validator's failures are written into a [`ValidationMessageStore`] on the
//! context, keyed by the field each failure path resolves to.
//!
//! # Example
//!
//! ```ignore
//! let services = Arc::new(ServiceProvider::from_registry());
//! let bridge = FormValidationBridge::new(services, BridgeOptions::default());
//!
//! let cx = EditContext::new(Person::default());
//! bridge.set_parameters(
//!     BridgeParameters::new()
//!         .edit_context(&cx)
//!         .validator_type(TypeDescriptor::of::<PersonValidator>()),
//! )?;
//!
//! cx.request_validation();
//! bridge.settle().await;
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tokio_util::task::TaskTracker;

use crate::context::{ContextId, EditContext};
use crate::error::{
    ConfigError, UnhandledError, UnhandledErrorKind, ValidatorError, extract_panic_message,
};
use crate::event::Subscription;
use crate::field::{FieldIdentifier, resolve_field};
use crate::messages::ValidationMessageStore;
use crate::model::Model;
use crate::services::{ServiceProvider, TypeDescriptor};
use crate::validation::{ValidationRequest, ValidationResult, Validator};

/// Parameters supplied by the host on every render of the form.
pub struct BridgeParameters<M: Model> {
    /// The surrounding form's edit context.
    pub edit_context: Option<Arc<EditContext<M>>>,
    /// A ready-made validator.
    pub validator_instance: Option<Arc<dyn Validator<M>>>,
    /// A validator type to resolve from the service provider.
    pub validator_type: Option<TypeDescriptor>,
}

impl<M: Model> BridgeParameters<M> {
    /// Create empty parameters.
    pub fn new() -> Self {
        Self {
            edit_context: None,
            validator_instance: None,
            validator_type: None,
        }
    }

    /// Set the edit context.
    pub fn edit_context(mut self, context: &Arc<EditContext<M>>) -> Self {
        self.edit_context = Some(Arc::clone(context));
        self
    }

    /// Set the validator instance.
    pub fn validator_instance(mut self, validator: Arc<dyn Validator<M>>) -> Self {
        self.validator_instance = Some(validator);
        self
    }

    /// Set the validator type.
    pub fn validator_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.validator_type = Some(descriptor);
        self
    }
}

impl<M: Model> Default for BridgeParameters<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Clone for BridgeParameters<M> {
    fn clone(&self) -> Self {
        Self {
            edit_context: self.edit_context.clone(),
            validator_instance: self.validator_instance.clone(),
            validator_type: self.validator_type,
        }
    }
}

/// How validations triggered close together interact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Every event starts its own validation right away. Messages are
    /// cleared synchronously in the event handler; results are applied in
    /// completion order, so the last run to finish wins per field.
    #[default]
    Concurrent,
    /// Validations run one at a time in arrival order, each clearing and
    /// applying only once the previous one finished.
    Queued,
}

/// Bridge configuration.
#[derive(Debug, Clone, Default)]
pub struct BridgeOptions {
    mode: ValidationMode,
    errors: Option<UnboundedSender<UnhandledError>>,
}

impl BridgeOptions {
    /// Default options: concurrent validation, errors only logged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the validation mode.
    pub fn mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Forward failed and panicked validations to `sender`.
    pub fn report_errors(mut self, sender: UnboundedSender<UnhandledError>) -> Self {
        self.errors = Some(sender);
        self
    }

    /// The configured validation mode.
    pub fn validation_mode(&self) -> ValidationMode {
        self.mode
    }
}

/// Observable state of a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeStatus {
    /// No parameters accepted yet.
    Uninitialized,
    /// Configured, no validation running.
    Idle,
    /// Configured, at least one validation running.
    Validating,
    /// Disposed; no further events are handled.
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Configured,
    Disposed,
}

/// Subscriptions and message store for the current edit context.
struct Binding<M: Model> {
    context: Arc<EditContext<M>>,
    store: ValidationMessageStore<M>,
    subscriptions: Vec<Subscription>,
}

impl<M: Model> Binding<M> {
    fn release(self) {
        for subscription in self.subscriptions {
            self.context.unsubscribe(subscription);
        }
        log::debug!("bridge released edit context {}", self.context.id());
    }
}

struct State<M: Model> {
    lifecycle: Lifecycle,
    validator_instance: Option<Arc<dyn Validator<M>>>,
    validator_type: Option<TypeDescriptor>,
    validator: Option<Arc<dyn Validator<M>>>,
    binding: Option<Binding<M>>,
    /// Completion signal of the last queued run.
    queue_tail: Option<oneshot::Receiver<()>>,
}

struct Shared<M: Model> {
    services: Arc<ServiceProvider>,
    options: BridgeOptions,
    state: Mutex<State<M>>,
    tasks: TaskTracker,
}

#[derive(Debug, Clone)]
enum Job {
    Model,
    Field(FieldIdentifier),
}

/// One validation run, owning everything it touches.
///
/// A run keeps writing into the store it was dispatched with, so a result
/// arriving after the edit context was replaced lands on the old context.
struct Run<M: Model> {
    job: Job,
    context: Arc<EditContext<M>>,
    store: ValidationMessageStore<M>,
    validator: Arc<dyn Validator<M>>,
}

impl<M: Model> Run<M> {
    fn clear(&self) {
        match &self.job {
            Job::Model => self.store.clear(),
            Job::Field(field) => self.store.clear_field(field),
        }
    }

    async fn execute(self) -> Result<(), ValidatorError> {
        let model = self.context.model();
        let request = match &self.job {
            Job::Model => ValidationRequest::whole(Arc::clone(&model)),
            Job::Field(field) => ValidationRequest::members(Arc::clone(&model), [field.path()]),
        };

        let result = self.validator.validate(request).await?;
        self.apply(&model, &result);
        Ok(())
    }

    /// Paths resolve against the snapshot that was validated.
    fn apply(&self, model: &M, result: &ValidationResult) {
        for failure in result.errors() {
            let field = resolve_field(model, &failure.property_path);
            self.store.add(field, failure.message.clone());
        }
        log::debug!(
            "edit context {}: applied {} failure(s) for {:?}",
            self.context.id(),
            result.errors().len(),
            self.job
        );
        self.context.notify_validation_state_changed();
    }
}

impl<M: Model> Shared<M> {
    fn dispatch(shared: &Arc<Self>, origin: ContextId, job: Job) {
        let Ok(handle) = Handle::try_current() else {
            log::error!("edit context {}: no tokio runtime, validation dropped", origin);
            return;
        };

        let (run, turn) = {
            let mut state = lock(&shared.state);
            let (Some(binding), Some(validator)) = (&state.binding, &state.validator) else {
                return;
            };
            if binding.context.id() != origin {
                log::debug!("ignoring event from superseded edit context {}", origin);
                return;
            }
            let run = Run {
                job,
                context: Arc::clone(&binding.context),
                store: binding.store.clone(),
                validator: Arc::clone(validator),
            };

            // A queued run takes its place in line here, before any task is
            // polled, and waits for the run ahead of it.
            let turn = match shared.options.mode {
                ValidationMode::Concurrent => None,
                ValidationMode::Queued => {
                    let (done, next) = oneshot::channel();
                    Some((state.queue_tail.replace(next), done))
                }
            };
            (run, turn)
        };

        match turn {
            None => {
                run.clear();
                shared.spawn(&handle, origin, run.execute());
            }
            Some((previous, done)) => {
                shared.spawn(&handle, origin, async move {
                    // Dropped on completion, failure or panic alike.
                    let _done: oneshot::Sender<()> = done;
                    if let Some(previous) = previous {
                        let _ = previous.await;
                    }
                    run.clear();
                    run.execute().await
                });
            }
        }
    }

    fn spawn<F>(&self, handle: &Handle, context: ContextId, future: F)
    where
        F: Future<Output = Result<(), ValidatorError>> + Send + 'static,
    {
        let errors = self.options.errors.clone();
        self.tasks.spawn_on(
            async move {
                let kind = match AssertUnwindSafe(future).catch_unwind().await {
                    Ok(Ok(())) => return,
                    Ok(Err(error)) => UnhandledErrorKind::Validator(error),
                    Err(panic) => UnhandledErrorKind::Panic {
                        message: extract_panic_message(&panic),
                    },
                };
                let error = UnhandledError { context, kind };
                log::error!("{}", error);
                if let Some(errors) = errors {
                    // Ignore send errors - nobody is listening anymore
                    let _ = errors.send(error);
                }
            },
            handle,
        );
    }

    fn load_validator(
        &self,
        params: &BridgeParameters<M>,
    ) -> Result<Arc<dyn Validator<M>>, ConfigError> {
        if let Some(instance) = &params.validator_instance {
            return Ok(Arc::clone(instance));
        }

        let descriptor = params.validator_type.ok_or(ConfigError::MissingValidator)?;
        let validator = self.services.resolve::<M>(&descriptor).ok_or(
            ConfigError::UnresolvedValidator {
                type_name: descriptor.name(),
            },
        )?;
        log::debug!("bridge resolved validator {}", descriptor);
        Ok(validator)
    }
}

fn bind<M: Model>(shared: &Arc<Shared<M>>, context: Arc<EditContext<M>>) -> Binding<M> {
    let store = ValidationMessageStore::new(&context);
    let origin = context.id();

    let weak: Weak<Shared<M>> = Arc::downgrade(shared);
    let on_submit = context.on_validation_requested({
        let weak = weak.clone();
        move |_| {
            if let Some(shared) = weak.upgrade() {
                Shared::dispatch(&shared, origin, Job::Model);
            }
        }
    });
    let on_change = context.on_field_changed(move |event| {
        if let Some(shared) = weak.upgrade() {
            Shared::dispatch(&shared, origin, Job::Field(event.field.clone()));
        }
    });

    log::debug!("bridge bound to edit context {}", origin);
    Binding {
        context,
        store,
        subscriptions: vec![on_submit, on_change],
    }
}

/// Validates an [`EditContext`]'s model on submit and on field changes.
///
/// Disposed when dropped.
pub struct FormValidationBridge<M: Model> {
    shared: Arc<Shared<M>>,
}

impl<M: Model> FormValidationBridge<M> {
    /// Create an unconfigured bridge.
    pub fn new(services: Arc<ServiceProvider>, options: BridgeOptions) -> Self {
        Self {
            shared: Arc::new(Shared {
                services,
                options,
                state: Mutex::new(State {
                    lifecycle: Lifecycle::Uninitialized,
                    validator_instance: None,
                    validator_type: None,
                    validator: None,
                    binding: None,
                    queue_tail: None,
                }),
                tasks: TaskTracker::new(),
            }),
        }
    }

    /// Accept a new set of parameters.
    ///
    /// The validator is reloaded when the supplied instance or type differs
    /// (by reference) from the previous one, and the bridge rebinds when the
    /// edit context differs. On error nothing changes.
    pub fn set_parameters(&self, params: BridgeParameters<M>) -> Result<(), ConfigError> {
        let shared = &self.shared;
        let mut state = lock(&shared.state);

        if state.lifecycle == Lifecycle::Disposed {
            return Err(ConfigError::Disposed);
        }

        let context = check_parameters(&shared.services, &params)
            .inspect_err(|e| log::warn!("bridge rejected parameters: {}", e))?;

        let first = state.lifecycle == Lifecycle::Uninitialized;
        let validator_changed = !same_instance(&state.validator_instance, &params.validator_instance)
            || state.validator_type != params.validator_type;
        let context_changed = state
            .binding
            .as_ref()
            .is_none_or(|binding| !Arc::ptr_eq(&binding.context, &context));

        if first || validator_changed {
            let validator = shared.load_validator(&params)?;
            state.validator = Some(validator);
        }

        if first || context_changed {
            if let Some(old) = state.binding.take() {
                old.release();
            }
            state.binding = Some(bind(shared, context));
        }

        state.validator_instance = params.validator_instance;
        state.validator_type = params.validator_type;
        state.lifecycle = Lifecycle::Configured;
        Ok(())
    }

    /// Current status.
    pub fn status(&self) -> BridgeStatus {
        match lock(&self.shared.state).lifecycle {
            Lifecycle::Uninitialized => BridgeStatus::Uninitialized,
            Lifecycle::Disposed => BridgeStatus::Disposed,
            Lifecycle::Configured if self.shared.tasks.is_empty() => BridgeStatus::Idle,
            Lifecycle::Configured => BridgeStatus::Validating,
        }
    }

    /// Number of validations still running.
    pub fn in_flight(&self) -> usize {
        self.shared.tasks.len()
    }

    /// Wait until every running validation has finished.
    pub async fn settle(&self) {
        let tasks = &self.shared.tasks;
        tasks.close();
        tasks.wait().await;
        tasks.reopen();
    }

    /// The edit context currently bound.
    pub fn edit_context(&self) -> Option<Arc<EditContext<M>>> {
        lock(&self.shared.state)
            .binding
            .as_ref()
            .map(|binding| Arc::clone(&binding.context))
    }

    /// The message store for the current edit context.
    pub fn message_store(&self) -> Option<ValidationMessageStore<M>> {
        lock(&self.shared.state)
            .binding
            .as_ref()
            .map(|binding| binding.store.clone())
    }

    /// The validator currently loaded.
    pub fn validator(&self) -> Option<Arc<dyn Validator<M>>> {
        lock(&self.shared.state).validator.clone()
    }

    /// The bridge's options.
    pub fn options(&self) -> &BridgeOptions {
        &self.shared.options
    }

    /// Stop handling events.
    ///
    /// Unsubscribes from the edit context. Messages already shown stay in
    /// the context. Running validations are not cancelled. Calling this
    /// more than once has no further effect.
    pub fn dispose(&self) {
        let mut state = lock(&self.shared.state);
        if state.lifecycle == Lifecycle::Disposed {
            return;
        }
        if let Some(binding) = state.binding.take() {
            binding.release();
        }
        state.lifecycle = Lifecycle::Disposed;
        log::debug!("bridge disposed");
    }
}

impl<M: Model> Drop for FormValidationBridge<M> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<M: Model> std::fmt::Debug for FormValidationBridge<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormValidationBridge")
            .field("status", &self.status())
            .field("options", &self.shared.options)
            .finish_non_exhaustive()
    }
}

/// Check the parameters, returning the edit context they carry.
fn check_parameters<M: Model>(
    services: &ServiceProvider,
    params: &BridgeParameters<M>,
) -> Result<Arc<EditContext<M>>, ConfigError> {
    let context = params
        .edit_context
        .clone()
        .ok_or(ConfigError::MissingEditContext)?;

    match (&params.validator_instance, &params.validator_type) {
        (None, None) => return Err(ConfigError::MissingValidator),
        (Some(_), Some(_)) => return Err(ConfigError::AmbiguousValidator),
        _ => {}
    }

    if let Some(descriptor) = &params.validator_type
        && !services.implements_validator::<M>(descriptor)
    {
        return Err(ConfigError::NotAValidator {
            type_name: descriptor.name(),
            model: std::any::type_name::<M>(),
        });
    }

    Ok(context)
}

fn same_instance<M: Model>(
    previous: &Option<Arc<dyn Validator<M>>>,
    next: &Option<Arc<dyn Validator<M>>>,
) -> bool {
    match (previous, next) {
        (Some(previous), Some(next)) => Arc::ptr_eq(previous, next),
        (None, None) => true,
        _ => false,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
