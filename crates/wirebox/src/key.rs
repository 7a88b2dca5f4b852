//! Service identity types
//!
//! Everything the container knows about a service is keyed by
//! [`ServiceKey`]: the declared Rust type plus an optional registration
//! name. Named registrations let several constructors share one declared
//! type ("keyed services") while remaining distinct entries.
//!
//! After compilation the string/TypeId world is left behind: every key is
//! assigned a dense [`ServiceId`] and all runtime lookups are plain array
//! indexing.

use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;

/// Dense numeric identity assigned to each distinct `(type, name)` pair.
///
/// Ids are allocated sequentially by the [`TypeRegistry`](crate::registry::TypeRegistry)
/// the first time a key is seen and stay stable for the lifetime of the
/// container, which makes the singleton table a flat array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(pub(crate) usize);

impl ServiceId {
    /// Position of this service in the singleton instance table.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifetime class of a registration.
///
/// The compiled engine builds every registration eagerly, exactly once, and
/// caches it in the singleton table. `Transient` is part of the public
/// vocabulary for forward compatibility but currently shares singleton
/// semantics; no per-call construction happens after compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// Built once during compilation, shared for the process lifetime.
    #[default]
    Singleton,
    /// Declared but not specially treated; behaves like `Singleton`.
    Transient,
}

/// A type token referencing an unnamed registration.
///
/// Constructor parameters are described by tokens rather than live
/// reflection: the typed registration surface derives one token per
/// parameter, in declaration order. Auto-wired dependencies always target
/// unnamed registrations, so a token carries no name component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DependencyToken {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
}

impl DependencyToken {
    /// Token for the type `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Full path name of the referenced type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The unnamed registration key this token resolves against.
    pub(crate) fn as_key(&self) -> ServiceKey {
        ServiceKey {
            type_id: self.type_id,
            type_name: self.type_name,
            name: None,
        }
    }
}

impl fmt::Display for DependencyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// Registration key: a declared service type plus an optional name.
///
/// Two registrations with the same declared type but different names are
/// distinct entries. Keys are immutable once created and are used as map
/// keys throughout the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceKey {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) name: Option<Arc<str>>,
}

impl ServiceKey {
    /// Key for an unnamed registration of `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            name: None,
        }
    }

    /// Key for a named registration of `T`.
    pub fn named<T: 'static>(name: impl Into<Arc<str>>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            name: Some(name.into()),
        }
    }

    /// Full path name of the declared type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Registration name, if this is a keyed service.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}[{}]", self.type_name, name),
            None => f.write_str(self.type_name),
        }
    }
}
