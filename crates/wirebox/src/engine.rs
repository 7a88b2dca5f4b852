//! Registration engine - the compile-then-serve core
//!
//! The engine is the only mutable authority before compilation and the only
//! resolution authority after it. Its life has exactly two states:
//!
//! ```text
//!  ContainerBuilder              compile()               Container
//! ───────────────────    ──────────────────────────    ─────────────
//!  register(..)    ──►    topological sort              resolve(..)
//!  register(..)           eager construction             resolve_all(..)
//!  register(..)           instance table frozen          dispose()
//! ```
//!
//! The transition is one-way: `register` is rejected afterwards and the
//! instance table is published read-only, which is what makes post-compile
//! resolution a lock-free array read safe under unbounded concurrency.

use std::any::TypeId;
use std::collections::HashMap;

use crate::error::{DependencyChain, Error, Result};
use crate::graph::DependencyGraph;
use crate::invoker::FactoryInvoker;
use crate::key::{DependencyToken, ServiceKey};
use crate::registration::{Registration, SharedInstance};
use crate::registry::TypeRegistry;

/// The dependency-resolution core shared by both public surfaces.
pub(crate) struct ContainerEngine {
    registrations: HashMap<ServiceKey, Registration>,
    graph: DependencyGraph,
    types: TypeRegistry,
    /// Dense singleton table indexed by `ServiceId`; written exactly once
    /// per slot during compile, read-only afterwards.
    instances: Vec<Option<SharedInstance>>,
    /// Keys in the order their instances were constructed.
    construction_order: Vec<ServiceKey>,
    compiled: bool,
}

impl ContainerEngine {
    pub(crate) fn new() -> Self {
        Self {
            registrations: HashMap::new(),
            graph: DependencyGraph::new(),
            types: TypeRegistry::new(),
            instances: Vec::new(),
            construction_order: Vec::new(),
            compiled: false,
        }
    }

    /// Store a registration and mirror it as a graph node.
    ///
    /// Registering the same key twice replaces the previous binding; the
    /// situation is legal (test setups override production wiring) but
    /// logged because it usually means two modules claim the same service.
    pub(crate) fn register(&mut self, registration: Registration) -> Result<()> {
        if self.compiled {
            return Err(Error::registration(format!(
                "cannot register {} after the container is compiled",
                registration.key()
            )));
        }

        let key = registration.key().clone();
        if self.registrations.contains_key(&key) {
            tracing::warn!(service = %key, "replacing existing registration");
        }

        let dependencies: Vec<ServiceKey> = registration
            .inputs()
            .iter()
            .map(DependencyToken::as_key)
            .collect();
        tracing::debug!(
            service = %key,
            implementation = registration.implementation(),
            dependencies = dependencies.len(),
            "service registered"
        );

        self.graph.add_node(key.clone(), dependencies);
        self.registrations.insert(key, registration);
        Ok(())
    }

    /// Order the graph and eagerly construct every durable instance.
    ///
    /// Idempotent: a second call performs no work and re-runs no
    /// constructor. Any failure is terminal for the compile and leaves the
    /// engine un-compiled.
    pub(crate) fn compile(&mut self) -> Result<()> {
        if self.compiled {
            return Ok(());
        }

        tracing::info!(services = self.registrations.len(), "compiling service graph");
        let sorted = self.graph.topological_sort()?;

        // One dense slot per distinct registered key.
        self.instances = vec![None; self.registrations.len()];
        let mut construction_order = Vec::with_capacity(sorted.len());

        for key in &sorted {
            let Some(registration) = self.registrations.get(key) else {
                continue;
            };
            let id = self.types.id_of(key);
            registration.cache_id(id);

            // Sort order guarantees every dependency already occupies its
            // slot, so construction needs no recursion here.
            let invoker = FactoryInvoker::new(&self.registrations, &self.instances);
            let instance = invoker.construct(registration, &DependencyChain::new())?;
            self.instances[id.index()] = Some(instance);
            construction_order.push(key.clone());
        }

        self.construction_order = construction_order;
        self.compiled = true;
        tracing::info!(
            constructed = self.construction_order.len(),
            "service graph compiled"
        );
        Ok(())
    }

    /// O(1) post-compile lookup of the instance registered under `key`.
    pub(crate) fn resolve(&self, key: &ServiceKey) -> Result<SharedInstance> {
        self.resolve_chain(key, &DependencyChain::new())
    }

    /// Lookup threading an accumulated requester chain into the not-found
    /// report.
    pub(crate) fn resolve_chain(
        &self,
        key: &ServiceKey,
        chain: &DependencyChain,
    ) -> Result<SharedInstance> {
        if !self.compiled {
            return Err(Error::internal(format!(
                "resolve of {key} before the container was compiled"
            )));
        }
        let registration = self
            .registrations
            .get(key)
            .ok_or_else(|| Error::not_found(key.to_string(), chain.clone()))?;
        let id = registration
            .id()
            .ok_or_else(|| Error::internal(format!("registration {key} has no assigned slot")))?;
        self.instances
            .get(id.index())
            .and_then(Clone::clone)
            .ok_or_else(|| Error::internal(format!("no constructed instance for {key}")))
    }

    /// Every instance whose declared type matches, named variants included,
    /// in construction order.
    pub(crate) fn resolve_all(&self, type_id: TypeId) -> Result<Vec<SharedInstance>> {
        self.construction_order
            .iter()
            .filter(|key| key.type_id() == type_id)
            .map(|key| self.resolve(key))
            .collect()
    }

    pub(crate) fn contains(&self, key: &ServiceKey) -> bool {
        self.registrations.contains_key(key)
    }

    pub(crate) fn registration(&self, key: &ServiceKey) -> Option<&Registration> {
        self.registrations.get(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.registrations.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Keys in the order their instances were constructed; disposal walks
    /// this in reverse.
    pub(crate) fn construction_order(&self) -> &[ServiceKey] {
        &self.construction_order
    }
}

impl std::fmt::Debug for ContainerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerEngine")
            .field("registrations", &self.registrations.len())
            .field("compiled", &self.compiled)
            .field("constructed", &self.construction_order.len())
            .finish_non_exhaustive()
    }
}
