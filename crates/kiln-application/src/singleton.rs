//! Singleton Registry
//!
//! One live instance per capability type. Owned by the application context
//! and shared by `Arc`; the map is internally synchronized so concurrent
//! `set` calls during startup are serialized instead of racing.

use crate::di::Instance;
use dashmap::DashMap;
use kiln_domain::capability::CapabilityKey;
use kiln_domain::error::{Error, Result};
use std::sync::Arc;
use tracing::debug;

/// Keyed store of one instance per capability
#[derive(Debug, Default)]
pub struct SingletonRegistry {
    instances: DashMap<CapabilityKey, Instance>,
}

impl SingletonRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Instance registered for exactly `T`
    ///
    /// Fails with `NotInitialized` if nothing was ever set for `T`.
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        let key = CapabilityKey::of::<T>();
        self.instances
            .get(&key)
            .and_then(|entry| entry.value().downcast::<T>())
            .ok_or_else(|| Error::not_initialized(key.name()))
    }

    /// Set the instance for `T`, replacing any prior one
    ///
    /// An empty value fails with `InvalidArgument` and leaves the prior
    /// mapping untouched.
    pub fn set<T: ?Sized + Send + Sync + 'static>(
        &self,
        instance: impl Into<Option<Arc<T>>>,
    ) -> Result<()> {
        let key = CapabilityKey::of::<T>();
        let instance = instance.into().ok_or_else(|| {
            Error::invalid_argument(format!("cannot assign an empty singleton for {key}"))
        })?;

        let replaced = self
            .instances
            .insert(key, Instance::new(instance))
            .is_some();
        debug!(capability = key.short_name(), replaced, "Singleton set");
        Ok(())
    }

    /// Whether an instance is set for `T`
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.instances.contains_key(&CapabilityKey::of::<T>())
    }

    /// Capabilities with an instance, for introspection
    pub fn capabilities(&self) -> Vec<CapabilityKey> {
        self.instances.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of registered singletons
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no singleton is registered
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
