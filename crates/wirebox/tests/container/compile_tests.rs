//! Compile-phase tests: ordering, cycles, missing dependencies, eager
//! construction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wirebox::{ContainerBuilder, Error};

struct Repository {
    built_at: usize,
}

struct Service {
    built_at: usize,
    _repository: Arc<Repository>,
}

struct Controller {
    built_at: usize,
    _service: Arc<Service>,
}

/// Registering consumers before producers must not matter: the compile
/// pass orders construction by the dependency graph, not by registration
/// sequence.
#[test]
fn producers_are_constructed_before_consumers() {
    super::init_logging();

    let sequence = Arc::new(AtomicUsize::new(0));
    let mut builder = ContainerBuilder::new();

    let seq = Arc::clone(&sequence);
    builder
        .add(move |service: Arc<Service>| Controller {
            built_at: seq.fetch_add(1, Ordering::SeqCst),
            _service: service,
        })
        .unwrap();
    let seq = Arc::clone(&sequence);
    builder
        .add(move |repository: Arc<Repository>| Service {
            built_at: seq.fetch_add(1, Ordering::SeqCst),
            _repository: repository,
        })
        .unwrap();
    let seq = Arc::clone(&sequence);
    builder
        .add(move || Repository {
            built_at: seq.fetch_add(1, Ordering::SeqCst),
        })
        .unwrap();

    let container = builder.build().unwrap();
    let repository = container.get::<Repository>().unwrap();
    let service = container.get::<Service>().unwrap();
    let controller = container.get::<Controller>().unwrap();

    assert!(repository.built_at < service.built_at);
    assert!(service.built_at < controller.built_at);
}

/// Each registered constructor executes exactly once, no matter how many
/// other registrations depend on it or how often it is resolved.
#[test]
fn constructors_run_exactly_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut builder = ContainerBuilder::new();

    let counter = Arc::clone(&calls);
    builder
        .add(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Repository { built_at: 0 }
        })
        .unwrap();
    builder
        .add(|repository: Arc<Repository>| Service {
            built_at: 0,
            _repository: repository,
        })
        .unwrap();
    builder
        .add(|service: Arc<Service>| Controller {
            built_at: 0,
            _service: service,
        })
        .unwrap();

    let container = builder.build().unwrap();
    for _ in 0..10 {
        container.get::<Repository>().unwrap();
        container.get::<Service>().unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

struct Ping {
    _pong: Arc<Pong>,
}

struct Pong {
    _ping: Arc<Ping>,
}

#[test]
fn cycle_fails_compilation_naming_both_parties() {
    let mut builder = ContainerBuilder::new();
    builder.add(|pong: Arc<Pong>| Ping { _pong: pong }).unwrap();
    builder.add(|ping: Arc<Ping>| Pong { _ping: ping }).unwrap();

    let error = builder.build().unwrap_err();
    assert!(matches!(error, Error::CycleDetected { .. }));

    let message = error.to_string();
    assert!(message.contains("Ping"), "missing Ping in: {message}");
    assert!(message.contains("Pong"), "missing Pong in: {message}");
    assert!(message.contains("(Circular)"), "missing marker in: {message}");
}

struct Deep;

struct Middle {
    _deep: Arc<Deep>,
}

struct Top {
    _middle: Arc<Middle>,
}

/// A referenced-but-unregistered type does not abort the sort; it surfaces
/// at construction time as a not-found error carrying the requester chain.
#[test]
fn missing_dependency_reports_the_requesting_chain() {
    let mut builder = ContainerBuilder::new();
    builder.add(|middle: Arc<Middle>| Top { _middle: middle }).unwrap();
    builder.add(|deep: Arc<Deep>| Middle { _deep: deep }).unwrap();
    // Deep is never registered.

    let error = builder.build().unwrap_err();
    assert!(matches!(error, Error::NotFound { .. }));

    let message = error.to_string();
    assert!(message.contains("Deep"), "missing Deep in: {message}");
    assert!(message.contains("Middle"), "missing Middle in: {message}");
}

#[derive(Debug, thiserror::Error)]
#[error("database unreachable")]
struct ConnectError;

struct Database;

#[test]
fn constructor_failure_aborts_compilation() {
    let mut builder = ContainerBuilder::new();
    builder
        .add_fallible(|| -> Result<Database, ConnectError> { Err(ConnectError) })
        .unwrap();

    let error = builder.build().unwrap_err();
    match &error {
        Error::ConstructionFailed { service, source } => {
            assert!(service.contains("Database"));
            assert_eq!(source.to_string(), "database unreachable");
        }
        other => panic!("expected ConstructionFailed, got: {other}"),
    }
}

#[test]
fn fallible_constructor_success_behaves_like_plain() {
    let mut builder = ContainerBuilder::new();
    builder
        .add_fallible(|| -> Result<Database, ConnectError> { Ok(Database) })
        .unwrap();

    let container = builder.build().unwrap();
    assert!(container.get::<Database>().is_ok());
}

#[test]
fn empty_builder_compiles_into_an_empty_container() {
    let container = ContainerBuilder::new().build().unwrap();
    assert!(container.is_empty());
    assert_eq!(container.len(), 0);
}
