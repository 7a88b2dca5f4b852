//! Factory invocation against the singleton table
//!
//! Turns a registration plus the already-constructed prefix of the instance
//! table into one constructed instance. The compile pass walks keys in
//! topological order, so every dependency this component looks up is
//! guaranteed to occupy its slot already; a missing registration is the one
//! user-visible failure here and carries the accumulated dependency chain.

use std::collections::HashMap;

use crate::error::{DependencyChain, Error, Result};
use crate::key::ServiceKey;
use crate::registration::{Registration, SharedInstance};

/// Builds positional argument lists and runs constructors exactly once.
pub(crate) struct FactoryInvoker<'a> {
    registrations: &'a HashMap<ServiceKey, Registration>,
    table: &'a [Option<SharedInstance>],
}

impl<'a> FactoryInvoker<'a> {
    pub(crate) fn new(
        registrations: &'a HashMap<ServiceKey, Registration>,
        table: &'a [Option<SharedInstance>],
    ) -> Self {
        Self {
            registrations,
            table,
        }
    }

    /// Resolve the registration's declared inputs in order and invoke its
    /// constructor.
    ///
    /// `chain` is the path of requesters that led here; this registration is
    /// appended before resolving its own inputs so that a missing dependency
    /// reports the full route down to the offending type.
    pub(crate) fn construct(
        &self,
        registration: &Registration,
        chain: &DependencyChain,
    ) -> Result<SharedInstance> {
        let chain = chain.pushed(registration.key().to_string());

        let mut args = Vec::with_capacity(registration.inputs().len());
        for token in registration.inputs() {
            let dependency_key = token.as_key();
            let dependency = self.registrations.get(&dependency_key).ok_or_else(|| {
                Error::not_found(token.type_name(), chain.pushed(token.type_name()))
            })?;
            let id = dependency.id().ok_or_else(|| {
                Error::internal(format!("dependency {dependency_key} has no assigned slot"))
            })?;
            let instance = self
                .table
                .get(id.index())
                .and_then(Option::as_ref)
                .ok_or_else(|| {
                    Error::internal(format!(
                        "dependency {dependency_key} was not constructed before {}",
                        registration.key()
                    ))
                })?;
            args.push(instance.clone());
        }

        registration.invoke(&args)
    }
}
