//! Registration records
//!
//! A [`Registration`] is one constructor binding: the declared service key,
//! the type-erased constructor, the ordered dependency tokens its parameter
//! list declared, the optional disposal hook, and the dense service id
//! cached at compile time. Records are created by the registration surface
//! and never mutated after compilation.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::dispose::DisposeFn;
use crate::error::Result;
use crate::key::{DependencyToken, Lifetime, ServiceId, ServiceKey};

/// A constructed instance shared through the singleton table.
pub type SharedInstance = Arc<dyn std::any::Any + Send + Sync>;

/// Type-erased constructor: ordered dependency values in, instance out.
///
/// This is the positional form every typed constructor erases into; the
/// values arrive in declared input order.
pub type ErasedConstructor =
    Box<dyn Fn(&[SharedInstance]) -> Result<SharedInstance> + Send + Sync>;

/// One constructor binding owned exclusively by the engine.
pub struct Registration {
    key: ServiceKey,
    implementation: &'static str,
    lifetime: Lifetime,
    constructor: ErasedConstructor,
    inputs: Vec<DependencyToken>,
    disposer: Option<DisposeFn>,
    /// Dense id assigned once during compile for O(1) table indexing.
    id: OnceCell<ServiceId>,
}

impl Registration {
    pub(crate) fn new(
        key: ServiceKey,
        implementation: &'static str,
        constructor: ErasedConstructor,
        inputs: Vec<DependencyToken>,
    ) -> Self {
        Self {
            key,
            implementation,
            lifetime: Lifetime::Singleton,
            constructor,
            inputs,
            disposer: None,
            id: OnceCell::new(),
        }
    }

    pub(crate) fn with_disposer(mut self, hook: DisposeFn) -> Self {
        self.disposer = Some(hook);
        self
    }

    /// The declared `(type, name)` key this registration serves.
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    /// Full path name of the implementation type.
    pub fn implementation(&self) -> &'static str {
        self.implementation
    }

    /// Lifetime class of the binding.
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Ordered dependency tokens declared by the constructor's parameters.
    pub fn inputs(&self) -> &[DependencyToken] {
        &self.inputs
    }

    /// The dense id cached at compile time, if compilation has run.
    pub fn id(&self) -> Option<ServiceId> {
        self.id.get().copied()
    }

    /// Cache the dense id assigned by the type registry. Idempotent: a
    /// second compile pass never reassigns.
    pub(crate) fn cache_id(&self, id: ServiceId) {
        let _ = self.id.set(id);
    }

    pub(crate) fn disposer(&self) -> Option<&DisposeFn> {
        self.disposer.as_ref()
    }

    /// Invoke the constructor with the positional dependency values.
    pub(crate) fn invoke(&self, args: &[SharedInstance]) -> Result<SharedInstance> {
        (self.constructor)(args)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("key", &self.key)
            .field("implementation", &self.implementation)
            .field("lifetime", &self.lifetime)
            .field("inputs", &self.inputs)
            .field("disposable", &self.disposer.is_some())
            .field("id", &self.id.get())
            .finish_non_exhaustive()
    }
}
