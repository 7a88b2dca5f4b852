//! Dependency graph and construction ordering
//!
//! One node per registration key; each node lists the keys its constructor
//! requires. The graph's only job is to produce a construction order in
//! which every producer precedes its consumers, and to abort with a
//! path-annotated error when the registrations form a cycle.
//!
//! The sort runs over the set of registered keys, not over
//! referenced-but-unregistered types: an edge to a type nobody registered is
//! simply not followed, and the absence surfaces later at construction time
//! as a not-found condition rather than a sort-time error.

use std::collections::HashMap;

use crate::error::{DependencyChain, Error, Result};
use crate::key::ServiceKey;

/// Per-key node: dependency edges plus the transient traversal flags used
/// only during the one-time sort.
#[derive(Debug, Clone)]
struct GraphNode {
    dependencies: Vec<ServiceKey>,
    visited: bool,
    on_stack: bool,
}

/// The dependency graph over all registered keys.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: HashMap<ServiceKey, GraphNode>,
    /// Insertion order of first registration; replacing a node keeps its
    /// original position so construction order is reproducible.
    order: Vec<ServiceKey>,
}

impl DependencyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace the node for `key` with one edge per dependency.
    pub fn add_node(&mut self, key: ServiceKey, dependencies: Vec<ServiceKey>) {
        if !self.nodes.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.nodes.insert(
            key,
            GraphNode {
                dependencies,
                visited: false,
                on_stack: false,
            },
        );
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds any node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Produce a construction order in which every node appears after all
    /// nodes it depends on.
    ///
    /// Depth-first, post-order: for each unvisited node the traversal
    /// recursively visits its dependencies before appending the node
    /// itself. Reaching a node that is still on the active recursion stack
    /// signals a cycle and aborts with the accumulated path, the last entry
    /// annotated `(Circular)`.
    pub fn topological_sort(&mut self) -> Result<Vec<ServiceKey>> {
        for node in self.nodes.values_mut() {
            node.visited = false;
            node.on_stack = false;
        }

        let mut sorted = Vec::with_capacity(self.nodes.len());
        let roots = self.order.clone();
        for key in &roots {
            self.visit(key, &DependencyChain::new(), &mut sorted)?;
        }
        Ok(sorted)
    }

    fn visit(
        &mut self,
        key: &ServiceKey,
        chain: &DependencyChain,
        sorted: &mut Vec<ServiceKey>,
    ) -> Result<()> {
        let dependencies = match self.nodes.get_mut(key) {
            // Edge to an unregistered key: not followed; the gap surfaces at
            // construction time as not-found.
            None => return Ok(()),
            Some(node) if node.visited => return Ok(()),
            Some(node) if node.on_stack => {
                return Err(Error::CycleDetected {
                    chain: chain.pushed(format!("{key} (Circular)")),
                });
            }
            Some(node) => {
                node.on_stack = true;
                node.dependencies.clone()
            }
        };

        let chain = chain.pushed(key.to_string());
        for dependency in &dependencies {
            self.visit(dependency, &chain, sorted)?;
        }

        if let Some(node) = self.nodes.get_mut(key) {
            node.on_stack = false;
            node.visited = true;
        }
        sorted.push(key.clone());
        Ok(())
    }
}
