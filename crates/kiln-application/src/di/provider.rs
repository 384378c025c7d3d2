//! Built service provider and scopes

use super::collection::{ServiceCollection, ServiceDescriptor, ServiceLifetime};
use super::{Instance, Resolver};
use dashmap::DashMap;
use kiln_domain::capability::CapabilityKey;
use kiln_domain::error::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

type InstanceCache = DashMap<usize, Instance>;

/// Resolves services registered in a [`ServiceCollection`]
///
/// Singletons are cached for the provider's lifetime. Scoped services
/// resolved directly from the provider behave as root-scope singletons;
/// use [`create_scope`](Self::create_scope) for per-scope instances.
pub struct ServiceProvider {
    descriptors: Vec<ServiceDescriptor>,
    index: HashMap<CapabilityKey, Vec<usize>>,
    singletons: InstanceCache,
    root_scoped: InstanceCache,
}

impl ServiceProvider {
    /// Freeze a collection into a provider
    pub fn build(collection: ServiceCollection) -> Self {
        let descriptors = collection.descriptors().to_vec();
        let mut index: HashMap<CapabilityKey, Vec<usize>> = HashMap::new();
        for (position, descriptor) in descriptors.iter().enumerate() {
            index
                .entry(descriptor.capability())
                .or_default()
                .push(position);
        }
        Self {
            descriptors,
            index,
            singletons: DashMap::new(),
            root_scoped: DashMap::new(),
        }
    }

    /// Open a scope with its own scoped-instance cache
    pub fn create_scope(self: &Arc<Self>) -> ServiceScope {
        ServiceScope {
            provider: Arc::clone(self),
            scoped: DashMap::new(),
        }
    }

    /// Whether any registration exists for `key`
    pub fn contains_key(&self, key: CapabilityKey) -> bool {
        self.index.contains_key(&key)
    }

    /// Registrations the provider was built from
    pub fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }

    fn latest(&self, key: CapabilityKey) -> Option<usize> {
        self.index.get(&key).and_then(|positions| positions.last().copied())
    }

    fn all(&self, key: CapabilityKey) -> &[usize] {
        self.index.get(&key).map(Vec::as_slice).unwrap_or_default()
    }

    fn produce(
        &self,
        position: usize,
        resolver: &dyn Resolver,
        scoped: &InstanceCache,
    ) -> Option<Instance> {
        let descriptor = &self.descriptors[position];
        let created = match descriptor.lifetime() {
            ServiceLifetime::Singleton => {
                cached(&self.singletons, position, || descriptor.create(self))
            }
            ServiceLifetime::Scoped => cached(scoped, position, || descriptor.create(resolver)),
            ServiceLifetime::Transient => descriptor.create(resolver),
        };

        match created {
            Ok(instance) => Some(instance),
            Err(e) => {
                warn!(
                    capability = descriptor.capability().short_name(),
                    error = %e,
                    "Service factory failed"
                );
                None
            }
        }
    }
}

fn cached(
    cache: &InstanceCache,
    position: usize,
    create: impl FnOnce() -> Result<Instance>,
) -> Result<Instance> {
    if let Some(hit) = cache.get(&position) {
        return Ok(hit.value().clone());
    }
    // Created outside the map lock: factories may resolve other services.
    let created = create()?;
    Ok(cache.entry(position).or_insert(created).value().clone())
}

impl Resolver for ServiceProvider {
    fn resolve_key(&self, key: CapabilityKey) -> Option<Instance> {
        let position = self.latest(key)?;
        self.produce(position, self, &self.root_scoped)
    }

    fn resolve_all_keys(&self, key: CapabilityKey) -> Vec<Instance> {
        self.all(key)
            .iter()
            .filter_map(|&position| self.produce(position, self, &self.root_scoped))
            .collect()
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("registrations", &self.descriptors.len())
            .field("capabilities", &self.index.len())
            .finish_non_exhaustive()
    }
}

/// A resolution scope over a [`ServiceProvider`]
pub struct ServiceScope {
    provider: Arc<ServiceProvider>,
    scoped: InstanceCache,
}

impl ServiceScope {
    /// Provider this scope resolves from
    pub fn provider(&self) -> &Arc<ServiceProvider> {
        &self.provider
    }
}

impl Resolver for ServiceScope {
    fn resolve_key(&self, key: CapabilityKey) -> Option<Instance> {
        let position = self.provider.latest(key)?;
        self.provider.produce(position, self, &self.scoped)
    }

    fn resolve_all_keys(&self, key: CapabilityKey) -> Vec<Instance> {
        self.provider
            .all(key)
            .iter()
            .filter_map(|&position| self.provider.produce(position, self, &self.scoped))
            .collect()
    }
}

impl fmt::Debug for ServiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceScope")
            .field("scoped_instances", &self.scoped.len())
            .finish_non_exhaustive()
    }
}
