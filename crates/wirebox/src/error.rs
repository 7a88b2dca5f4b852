//! Error handling types
//!
//! Failure reporting is a designed feature of the engine, not an
//! afterthought: cycle and not-found errors carry the full dependency chain
//! that led to the failure, rendered as an indented path ending in the
//! offending type, so a caller can see exactly which constructor pulled in
//! the missing or circular dependency.

use std::fmt;

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed failure value reported by user code (constructors and disposal
/// hooks declare their own error types; the engine carries them opaquely).
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for the container engine
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid registration: mutation after compile, or a constructor whose
    /// shape the typed surface cannot accept
    #[error("registration error: {message}")]
    Registration {
        /// Description of the registration error
        message: String,
    },

    /// A dependency cycle was found while ordering the graph
    #[error("circular dependency detected:{chain}")]
    CycleDetected {
        /// The traversal path, ending in the node that closed the cycle
        chain: DependencyChain,
    },

    /// No registration exists for the requested type and name
    #[error("no registration found for {service}{chain}")]
    NotFound {
        /// The service that was requested
        service: String,
        /// The chain of constructors that led to this lookup; empty for a
        /// direct top-level call
        chain: DependencyChain,
    },

    /// A constructor reported a failure value
    #[error("construction of {service} failed")]
    ConstructionFailed {
        /// The service whose constructor failed
        service: String,
        /// The failure reported by the constructor
        #[source]
        source: BoxedError,
    },

    /// One or more disposal hooks failed; remaining hooks still ran
    #[error("{}", disposal_summary(.failures))]
    Disposal {
        /// `(service, failure)` pairs collected in disposal order
        failures: Vec<(String, BoxedError)>,
    },

    /// Internal system error
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl Error {
    /// Create a registration error
    pub fn registration<S: Into<String>>(message: S) -> Self {
        Self::Registration {
            message: message.into(),
        }
    }

    /// Create a not-found error carrying the requesting chain
    pub fn not_found<S: Into<String>>(service: S, chain: DependencyChain) -> Self {
        Self::NotFound {
            service: service.into(),
            chain,
        }
    }

    /// Create a construction-failed error wrapping the constructor's failure
    pub fn construction<S: Into<String>>(service: S, source: BoxedError) -> Self {
        Self::ConstructionFailed {
            service: service.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

fn disposal_summary(failures: &[(String, BoxedError)]) -> String {
    let mut message = format!("disposal completed with {} failure(s)", failures.len());
    for (service, source) in failures {
        message.push_str(&format!("; {service}: {source}"));
    }
    message
}

/// The ordered list of requesting services recorded while recursively
/// resolving a dependency.
///
/// The chain is an explicit accumulator threaded through every recursive
/// resolution and construction call: each level works on its own copy, so
/// no shared trace state exists. Rendering indents one step per level and
/// ends in the offending type.
#[derive(Debug, Clone, Default)]
pub struct DependencyChain {
    entries: Vec<String>,
}

impl DependencyChain {
    /// An empty chain, for top-level calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// A new chain with `entry` appended; `self` is left untouched.
    pub fn pushed(&self, entry: impl Into<String>) -> Self {
        let mut entries = self.entries.clone();
        entries.push(entry.into());
        Self { entries }
    }

    /// Whether any requester has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded requesters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The recorded requesters, outermost first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl fmt::Display for DependencyChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, entry) in self.entries.iter().enumerate() {
            write!(f, "\n{:indent$}{entry}", "", indent = (depth + 1) * 2)?;
        }
        Ok(())
    }
}
