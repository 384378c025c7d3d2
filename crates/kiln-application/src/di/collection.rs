//! Service registration target

use super::{Instance, Resolver};
use kiln_domain::capability::CapabilityKey;
use kiln_domain::error::Result;
use std::fmt;
use std::sync::Arc;

/// How long a resolved instance lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceLifetime {
    /// One instance per provider
    Singleton,
    /// One instance per scope
    Scoped,
    /// A fresh instance per resolution
    Transient,
}

/// Factory producing a type-erased instance
pub type ServiceFactory = Arc<dyn Fn(&dyn Resolver) -> Result<Instance> + Send + Sync>;

/// One registration in a [`ServiceCollection`]
#[derive(Clone)]
pub struct ServiceDescriptor {
    capability: CapabilityKey,
    lifetime: ServiceLifetime,
    factory: ServiceFactory,
}

impl ServiceDescriptor {
    /// Create a descriptor from raw parts
    pub fn new(capability: CapabilityKey, lifetime: ServiceLifetime, factory: ServiceFactory) -> Self {
        Self {
            capability,
            lifetime,
            factory,
        }
    }

    /// Registered capability
    pub fn capability(&self) -> CapabilityKey {
        self.capability
    }

    /// Instance lifetime
    pub fn lifetime(&self) -> ServiceLifetime {
        self.lifetime
    }

    pub(crate) fn create(&self, resolver: &dyn Resolver) -> Result<Instance> {
        (self.factory)(resolver)
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("capability", &self.capability)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

/// Ordered list of service registrations
///
/// Several registrations for the same capability are kept; the latest one
/// wins for single resolution and all of them are returned by `resolve_all`.
#[derive(Debug, Clone, Default)]
pub struct ServiceCollection {
    descriptors: Vec<ServiceDescriptor>,
}

impl ServiceCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing instance as a singleton
    pub fn add_instance<T: ?Sized + Send + Sync + 'static>(&mut self, instance: Arc<T>) -> &mut Self {
        let instance = Instance::new(instance);
        let factory: ServiceFactory = Arc::new(move |_: &dyn Resolver| Ok(instance.clone()));
        self.add_descriptor(ServiceDescriptor::new(
            CapabilityKey::of::<T>(),
            ServiceLifetime::Singleton,
            factory,
        ))
    }

    /// Register a singleton factory
    pub fn add_singleton<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add_factory(ServiceLifetime::Singleton, factory)
    }

    /// Register a scoped factory
    pub fn add_scoped<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add_factory(ServiceLifetime::Scoped, factory)
    }

    /// Register a transient factory
    pub fn add_transient<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add_factory(ServiceLifetime::Transient, factory)
    }

    fn add_factory<T, F>(&mut self, lifetime: ServiceLifetime, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        let erased: ServiceFactory = Arc::new(move |resolver: &dyn Resolver| {
            factory(resolver).map(Instance::new)
        });
        self.add_descriptor(ServiceDescriptor::new(
            CapabilityKey::of::<T>(),
            lifetime,
            erased,
        ))
    }

    /// Append a descriptor
    pub fn add_descriptor(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Whether any registration exists for `T`
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        let key = CapabilityKey::of::<T>();
        self.descriptors.iter().any(|d| d.capability == key)
    }

    /// Registrations in order
    pub fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }

    /// Distinct registered capabilities in first-registration order
    pub fn capabilities(&self) -> Vec<CapabilityKey> {
        let mut keys: Vec<CapabilityKey> = Vec::new();
        for descriptor in &self.descriptors {
            if !keys.contains(&descriptor.capability) {
                keys.push(descriptor.capability);
            }
        }
        keys
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
