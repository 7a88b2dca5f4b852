//! Resolution surface
//!
//! [`Container`] is the read-only API served after compilation. Every
//! lookup is a map read plus an array index into the frozen singleton
//! table: no construction work, no locks, safe for unbounded concurrent
//! callers. The container is cheap to clone; all clones share the same
//! engine and the same one-shot disposal guard.

use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::engine::ContainerEngine;
use crate::error::{BoxedError, Error, Result};
use crate::key::ServiceKey;
use crate::registration::{Registration, SharedInstance};

/// Read-only resolution surface over a compiled engine.
#[derive(Clone)]
pub struct Container {
    engine: Arc<ContainerEngine>,
    disposed: Arc<AtomicBool>,
}

impl Container {
    pub(crate) fn new(engine: ContainerEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            disposed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Resolve the unnamed registration of `T` as a shared handle.
    ///
    /// Reference-style target: zero-copy, the same instance every call.
    pub fn get<T>(&self) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.downcast(self.engine.resolve(&ServiceKey::of::<T>())?)
    }

    /// Resolve the registration of `T` stored under `name`.
    pub fn get_named<T>(&self, name: &str) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.downcast(self.engine.resolve(&ServiceKey::named::<T>(name))?)
    }

    /// Resolve the unnamed registration of `T` as an owned copy.
    ///
    /// Value-style target: the shared registration is resolved first and
    /// its pointed-to value copied out, so later mutation of the returned
    /// value never affects the underlying singleton or subsequent
    /// resolutions.
    pub fn get_owned<T>(&self) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        Ok(self.get::<T>()?.as_ref().clone())
    }

    /// Resolve every registration whose declared type is `T`, named
    /// variants included, in construction order.
    pub fn get_all<T>(&self) -> Result<Vec<Arc<T>>>
    where
        T: Send + Sync + 'static,
    {
        self.engine
            .resolve_all(TypeId::of::<T>())?
            .into_iter()
            .map(|instance| self.downcast(instance))
            .collect()
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

    /// Registered keys in construction order, for diagnostics.
    pub fn service_keys(&self) -> Vec<ServiceKey> {
        self.engine.construction_order().to_vec()
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    /// Whether the container holds any registration.
    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    /// Release every constructed instance that captured a disposal hook, in
    /// reverse construction order.
    ///
    /// One-shot: the first caller wins the guard and runs the hooks; any
    /// later call is a no-op returning `Ok`. Failures from individual hooks
    /// are collected and returned together so one bad hook cannot leak the
    /// resources behind it.
    pub fn dispose(&self) -> Result<()> {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let mut failures: Vec<(String, BoxedError)> = Vec::new();
        let mut released = 0usize;
        for key in self.engine.construction_order().iter().rev() {
            let Some(registration) = self.engine.registration(key) else {
                continue;
            };
            let Some(hook) = registration.disposer() else {
                continue;
            };
            let Ok(instance) = self.engine.resolve(key) else {
                continue;
            };
            released += 1;
            if let Err(source) = hook(&instance) {
                tracing::error!(service = %key, error = %source, "disposal hook failed");
                failures.push((key.to_string(), source));
            }
        }

        tracing::info!(
            released,
            failures = failures.len(),
            "container disposed"
        );
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Disposal { failures })
        }
    }

    fn downcast<T>(&self, instance: SharedInstance) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        instance.downcast::<T>().map_err(|_| {
            Error::internal(format!(
                "instance table slot for {} holds a foreign type",
                type_name::<T>()
            ))
        })
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("services", &self.engine.len())
            .field("disposed", &self.disposed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Registered services:")?;
        for key in self.engine.construction_order() {
            writeln!(f, "  - {key}")?;
        }
        Ok(())
    }
}
