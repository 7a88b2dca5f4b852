//! # wirebox
//!
//! Compile-then-serve dependency injection: typed registration, one-time
//! topological construction, lock-free resolution.
//!
//! ## Architecture
//!
//! ```text
//! ContainerBuilder            build()                    Container
//! ────────────────   ───────────────────────────   ────────────────────
//! add(ctor)          1. topological sort            get::<T>()
//! add_named(..)      2. cycle detection             get_named::<T>(..)
//! add_instance(..)   3. eager construction in       get_all::<T>()
//! add_disposable(..)    dependency order            get_owned::<T>()
//! try_add(..)        4. instance table frozen       dispose()
//! ```
//!
//! Registration happens against a mutable builder; `build()` orders the
//! dependency graph, detects cycles with a path-annotated error, constructs
//! every instance exactly once (producers before consumers), and freezes
//! the result into a read-only container whose lookups are a map read plus
//! an array index - safe for unbounded concurrent callers.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`builder`] | Mutation-only registration surface |
//! | [`container`] | Read-only resolution surface and disposal |
//! | [`construct`] | Typed constructor contract over `Fn` arities |
//! | [`dispose`] | Optional resource-release capability |
//! | [`error`] | Error taxonomy and dependency-chain reporting |
//! | [`graph`] | Dependency graph and topological ordering |
//! | [`key`] | Service identity: keys, tokens, dense ids |
//! | [`registration`] | Constructor binding records |
//! | [`registry`] | Dense service-id allocation |
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use wirebox::ContainerBuilder;
//!
//! struct Config {
//!     dsn: String,
//! }
//!
//! struct Database {
//!     config: Arc<Config>,
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder.add_instance(Config {
//!     dsn: "postgres://localhost".into(),
//! })?;
//! builder.add(|config: Arc<Config>| Database { config })?;
//!
//! let container = builder.build()?;
//! let database = container.get::<Database>()?;
//! assert_eq!(database.config.dsn, "postgres://localhost");
//! # Ok::<(), wirebox::Error>(())
//! ```

// Public surface modules
pub mod builder;
pub mod construct;
pub mod container;
pub mod dispose;
pub mod error;
pub mod graph;
pub mod key;
pub mod registration;
pub mod registry;

// Engine internals: the single mutable authority before compile and the
// single resolution authority after it.
mod engine;
mod invoker;

// Re-export commonly used types
pub use builder::ContainerBuilder;
pub use construct::{Construct, TryConstruct};
pub use container::Container;
pub use dispose::Dispose;
pub use error::{BoxedError, DependencyChain, Error, Result};
pub use key::{DependencyToken, Lifetime, ServiceId, ServiceKey};
pub use registration::Registration;
pub use registry::TypeRegistry;
