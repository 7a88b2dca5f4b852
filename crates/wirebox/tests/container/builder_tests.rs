//! Registration surface tests: instances, conditional registration,
//! replacement, introspection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wirebox::ContainerBuilder;

#[derive(Clone)]
struct Settings {
    workers: usize,
}

#[test]
fn add_instance_serves_the_prebuilt_value() {
    let mut builder = ContainerBuilder::new();
    builder.add_instance(Settings { workers: 8 }).unwrap();

    let container = builder.build().unwrap();
    let first = container.get::<Settings>().unwrap();
    let second = container.get::<Settings>().unwrap();

    assert_eq!(first.workers, 8);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn try_add_keeps_the_first_registration() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut builder = ContainerBuilder::new();

    let counter = Arc::clone(&calls);
    builder
        .try_add(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Settings { workers: 1 }
        })
        .unwrap();
    let counter = Arc::clone(&calls);
    builder
        .try_add(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Settings { workers: 2 }
        })
        .unwrap();

    let container = builder.build().unwrap();
    assert_eq!(container.get::<Settings>().unwrap().workers, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// Plain `add` replaces: the last registration for a key wins and the
/// earlier constructor never runs.
#[test]
fn add_replaces_an_existing_registration() {
    super::init_logging();

    let mut builder = ContainerBuilder::new();
    builder.add(|| Settings { workers: 1 }).unwrap();
    builder.add(|| Settings { workers: 2 }).unwrap();
    assert_eq!(builder.len(), 1);

    let container = builder.build().unwrap();
    assert_eq!(container.get::<Settings>().unwrap().workers, 2);
}

#[test]
fn builder_reports_its_contents() {
    let mut builder = ContainerBuilder::new();
    assert!(builder.is_empty());

    builder.add(|| Settings { workers: 4 }).unwrap();
    builder
        .add_named("batch", || Settings { workers: 64 })
        .unwrap();

    assert_eq!(builder.len(), 2);
    assert!(builder.contains::<Settings>());
    assert!(builder.contains_named::<Settings>("batch"));

    let key = wirebox::ServiceKey::of::<Settings>();
    let registration = builder.registration(&key).expect("registered");
    assert!(registration.inputs().is_empty());
    // Ids are assigned at compile time, not at registration time.
    assert!(registration.id().is_none());
}

#[derive(Debug, thiserror::Error)]
#[error("bad pool size {0}")]
struct PoolError(usize);

struct Pool {
    size: usize,
}

#[test]
fn named_fallible_constructors_register_and_resolve() {
    let mut builder = ContainerBuilder::new();
    builder.add_instance(Settings { workers: 8 }).unwrap();
    builder
        .add_named_fallible("bounded", |settings: Arc<Settings>| {
            if settings.workers == 0 {
                Err(PoolError(0))
            } else {
                Ok(Pool {
                    size: settings.workers,
                })
            }
        })
        .unwrap();

    let container = builder.build().unwrap();
    let pool = container.get_named::<Pool>("bounded").unwrap();
    assert_eq!(pool.size, 8);
}

#[test]
fn chained_registration_reads_fluently() {
    let mut builder = ContainerBuilder::new();
    builder
        .add_instance(Settings { workers: 2 })
        .unwrap()
        .add(|settings: Arc<Settings>| Pool {
            size: settings.workers,
        })
        .unwrap();

    let container = builder.build().unwrap();
    assert_eq!(container.get::<Pool>().unwrap().size, 2);
}
