//! Dense service identity allocation
//!
//! Maps each distinct [`ServiceKey`] to a stable, sequential [`ServiceId`]
//! the first time it is seen. Pure bookkeeping: this component cannot fail,
//! and the ids it hands out never change for the lifetime of the engine.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::key::{ServiceId, ServiceKey};

/// Thread-safe allocator of dense service ids.
///
/// Lookups take the read lock only; allocation takes the write lock and
/// re-checks before assigning the next id, so concurrent first-use of the
/// same key always converges on a single id.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    inner: RwLock<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    ids: HashMap<ServiceKey, ServiceId>,
    keys: Vec<ServiceKey>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `key`, allocating the next sequential id on first
    /// use.
    pub fn id_of(&self, key: &ServiceKey) -> ServiceId {
        if let Some(id) = self.inner.read().ids.get(key) {
            return *id;
        }

        let mut inner = self.inner.write();
        // Re-check under the write guard: another thread may have allocated
        // between the read and write sections.
        if let Some(id) = inner.ids.get(key) {
            return *id;
        }
        let id = ServiceId(inner.keys.len());
        inner.keys.push(key.clone());
        inner.ids.insert(key.clone(), id);
        id
    }

    /// Reverse lookup, primarily for diagnostics.
    pub fn key_of(&self, id: ServiceId) -> Option<ServiceKey> {
        self.inner.read().keys.get(id.index()).cloned()
    }

    /// Number of distinct keys seen so far.
    pub fn len(&self) -> usize {
        self.inner.read().keys.len()
    }

    /// Whether any key has been assigned an id.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
