//! Registration surface
//!
//! [`ContainerBuilder`] is the mutation-only API used before compilation.
//! It owns the engine by value, so exclusive access during the registration
//! phase is checked by the compiler rather than guarded at runtime, and
//! [`ContainerBuilder::build`] is the one-way transition into the read-only
//! resolution surface.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use wirebox::ContainerBuilder;
//!
//! struct Repository {
//!     dsn: String,
//! }
//!
//! struct Service {
//!     repository: Arc<Repository>,
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder.add(|| Repository {
//!     dsn: "postgres://localhost".into(),
//! })?;
//! builder.add(|repository: Arc<Repository>| Service { repository })?;
//!
//! let container = builder.build()?;
//! let service = container.get::<Service>()?;
//! assert_eq!(service.repository.dsn, "postgres://localhost");
//! # Ok::<(), wirebox::Error>(())
//! ```

use std::sync::Arc;

use crate::construct::{Construct, TryConstruct};
use crate::container::Container;
use crate::dispose::{dispose_hook, Dispose, DisposeFn};
use crate::engine::ContainerEngine;
use crate::error::Result;
use crate::key::{DependencyToken, ServiceKey};
use crate::registration::{ErasedConstructor, Registration, SharedInstance};

/// Mutation-only registration surface; compiles into a [`Container`].
#[derive(Debug)]
pub struct ContainerBuilder {
    engine: ContainerEngine,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            engine: ContainerEngine::new(),
        }
    }

    /// Register an unnamed constructor producing one service value.
    pub fn add<Args, F>(&mut self, constructor: F) -> Result<&mut Self>
    where
        F: Construct<Args>,
    {
        self.register_erased(
            ServiceKey::of::<F::Service>(),
            F::inputs(),
            constructor.erase(),
            None,
        )
    }

    /// Register a named ("keyed") constructor producing one service value.
    ///
    /// Named registrations are resolved only by explicit name; auto-wired
    /// constructor parameters always target unnamed registrations.
    pub fn add_named<Args, F>(&mut self, name: impl Into<Arc<str>>, constructor: F) -> Result<&mut Self>
    where
        F: Construct<Args>,
    {
        self.register_erased(
            ServiceKey::named::<F::Service>(name),
            F::inputs(),
            constructor.erase(),
            None,
        )
    }

    /// Register an unnamed constructor that may report a failure value.
    pub fn add_fallible<Args, F>(&mut self, constructor: F) -> Result<&mut Self>
    where
        F: TryConstruct<Args>,
    {
        self.register_erased(
            ServiceKey::of::<F::Service>(),
            F::inputs(),
            constructor.erase(),
            None,
        )
    }

    /// Register a named constructor that may report a failure value.
    pub fn add_named_fallible<Args, F>(
        &mut self,
        name: impl Into<Arc<str>>,
        constructor: F,
    ) -> Result<&mut Self>
    where
        F: TryConstruct<Args>,
    {
        self.register_erased(
            ServiceKey::named::<F::Service>(name),
            F::inputs(),
            constructor.erase(),
            None,
        )
    }

    /// Register a fixed pre-built value.
    ///
    /// Behaves like a zero-argument constructor that always returns the same
    /// instance; the value is shared, never rebuilt.
    pub fn add_instance<T>(&mut self, value: T) -> Result<&mut Self>
    where
        T: Send + Sync + 'static,
    {
        let shared: Arc<T> = Arc::new(value);
        let constructor: ErasedConstructor =
            Box::new(move |_args| Ok(shared.clone() as SharedInstance));
        self.register_erased(ServiceKey::of::<T>(), Vec::new(), constructor, None)
    }

    /// Register an unnamed constructor whose output exposes the [`Dispose`]
    /// capability; the hook is captured now and invoked in reverse
    /// construction order by [`Container::dispose`].
    pub fn add_disposable<Args, F>(&mut self, constructor: F) -> Result<&mut Self>
    where
        F: Construct<Args>,
        F::Service: Dispose,
    {
        self.register_erased(
            ServiceKey::of::<F::Service>(),
            F::inputs(),
            constructor.erase(),
            Some(dispose_hook::<F::Service>()),
        )
    }

    /// Named variant of [`ContainerBuilder::add_disposable`].
    pub fn add_named_disposable<Args, F>(
        &mut self,
        name: impl Into<Arc<str>>,
        constructor: F,
    ) -> Result<&mut Self>
    where
        F: Construct<Args>,
        F::Service: Dispose,
    {
        self.register_erased(
            ServiceKey::named::<F::Service>(name),
            F::inputs(),
            constructor.erase(),
            Some(dispose_hook::<F::Service>()),
        )
    }

    /// Register only if no unnamed registration for the type exists yet.
    pub fn try_add<Args, F>(&mut self, constructor: F) -> Result<&mut Self>
    where
        F: Construct<Args>,
    {
        if self.engine.contains(&ServiceKey::of::<F::Service>()) {
            return Ok(self);
        }
        self.add(constructor)
    }

    /// Whether an unnamed registration for `T` exists.
    pub fn contains<T: 'static>(&self) -> bool {
        self.engine.contains(&ServiceKey::of::<T>())
    }

    /// Whether a named registration for `T` exists.
    pub fn contains_named<T: 'static>(&self, name: &str) -> bool {
        self.engine.contains(&ServiceKey::named::<T>(name))
    }

    /// Read-only view of the registration stored under `key`.
    pub fn registration(&self, key: &ServiceKey) -> Option<&Registration> {
        self.engine.registration(key)
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    /// Whether anything has been registered.
    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    /// Compile the dependency graph and freeze further registration.
    ///
    /// Orders all registrations topologically, eagerly constructs every
    /// instance in dependency order, and returns the read-only resolution
    /// surface. Any cycle, missing dependency, or constructor failure is
    /// terminal: no partial container is produced.
    pub fn build(self) -> Result<Container> {
        let mut engine = self.engine;
        engine.compile()?;
        Ok(Container::new(engine))
    }

    fn register_erased(
        &mut self,
        key: ServiceKey,
        inputs: Vec<DependencyToken>,
        constructor: ErasedConstructor,
        disposer: Option<DisposeFn>,
    ) -> Result<&mut Self> {
        let implementation = key.type_name();
        let mut registration = Registration::new(key, implementation, constructor, inputs);
        if let Some(hook) = disposer {
            registration = registration.with_disposer(hook);
        }
        self.engine.register(registration)?;
        Ok(self)
    }
}
