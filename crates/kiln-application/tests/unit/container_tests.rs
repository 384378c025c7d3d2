//! Tests for the service collection, provider and scopes

use kiln_application::{ResolverExt, ServiceCollection, ServiceProvider};
use kiln_domain::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

trait Store: Send + Sync {
    fn name(&self) -> &'static str;
}

struct MemoryStore;
struct DiskStore;

impl Store for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }
}

impl Store for DiskStore {
    fn name(&self) -> &'static str {
        "disk"
    }
}

struct Counter {
    id: usize,
}

fn counting_collection(
    counter: Arc<AtomicUsize>,
    register: fn(&mut ServiceCollection, Arc<AtomicUsize>),
) -> Arc<ServiceProvider> {
    let mut services = ServiceCollection::new();
    register(&mut services, counter);
    Arc::new(ServiceProvider::build(services))
}

#[test]
fn test_unregistered_capability_resolves_to_none() {
    let provider = ServiceProvider::build(ServiceCollection::new());
    assert!(provider.resolve::<dyn Store>().is_none());
    assert!(provider.resolve_all::<dyn Store>().is_empty());
}

#[test]
fn test_latest_registration_wins_and_resolve_all_keeps_order() {
    let mut services = ServiceCollection::new();
    services
        .add_instance::<dyn Store>(Arc::new(MemoryStore))
        .add_instance::<dyn Store>(Arc::new(DiskStore));
    let provider = ServiceProvider::build(services);

    assert_eq!(provider.resolve::<dyn Store>().unwrap().name(), "disk");
    let all: Vec<&str> = provider
        .resolve_all::<dyn Store>()
        .iter()
        .map(|s| s.name())
        .collect();
    assert_eq!(all, vec!["memory", "disk"]);
}

#[test]
fn test_singleton_factory_runs_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let provider = counting_collection(Arc::clone(&counter), |services, counter| {
        services.add_singleton::<Counter, _>(move |_| {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Counter { id }))
        });
    });

    let first = provider.resolve::<Counter>().unwrap();
    let second = provider.create_scope().resolve::<Counter>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_transient_factory_runs_per_resolution() {
    let counter = Arc::new(AtomicUsize::new(0));
    let provider = counting_collection(Arc::clone(&counter), |services, counter| {
        services.add_transient::<Counter, _>(move |_| {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Counter { id }))
        });
    });

    let a = provider.resolve::<Counter>().unwrap();
    let b = provider.resolve::<Counter>().unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn test_scoped_instances_are_per_scope() {
    let counter = Arc::new(AtomicUsize::new(0));
    let provider = counting_collection(Arc::clone(&counter), |services, counter| {
        services.add_scoped::<Counter, _>(move |_| {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Counter { id }))
        });
    });

    let scope_a = provider.create_scope();
    let scope_b = provider.create_scope();
    let a1 = scope_a.resolve::<Counter>().unwrap();
    let a2 = scope_a.resolve::<Counter>().unwrap();
    let b1 = scope_b.resolve::<Counter>().unwrap();

    assert!(Arc::ptr_eq(&a1, &a2));
    assert!(!Arc::ptr_eq(&a1, &b1));
}

#[test]
fn test_factories_resolve_their_dependencies() {
    let mut services = ServiceCollection::new();
    services
        .add_instance::<dyn Store>(Arc::new(MemoryStore))
        .add_singleton::<String, _>(|resolver| {
            let store = resolver
                .resolve::<dyn Store>()
                .ok_or_else(|| Error::not_initialized("dyn Store"))?;
            Ok(Arc::new(format!("backed by {}", store.name())))
        });
    let provider = ServiceProvider::build(services);

    assert_eq!(provider.resolve::<String>().unwrap().as_str(), "backed by memory");
}

#[test]
fn test_failing_factory_resolves_to_none() {
    let mut services = ServiceCollection::new();
    services.add_singleton::<dyn Store, _>(|_| Err(Error::configuration("store offline")));
    let provider = ServiceProvider::build(services);

    assert!(provider.resolve::<dyn Store>().is_none());
}

#[test]
fn test_collection_introspection() {
    let mut services = ServiceCollection::new();
    services
        .add_instance::<dyn Store>(Arc::new(MemoryStore))
        .add_instance::<dyn Store>(Arc::new(DiskStore))
        .add_instance::<String>(Arc::new("x".to_string()));

    assert_eq!(services.len(), 3);
    assert_eq!(services.capabilities().len(), 2);
    assert!(services.contains::<dyn Store>());
    assert!(!services.contains::<Counter>());
}
