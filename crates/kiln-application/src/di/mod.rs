//! Service container
//!
//! The backing container the engine registers into and resolves from.
//!
//! ```text
//! StartupConfiguration ──► ServiceCollection ──► ServiceProvider ──► ServiceScope
//!     (order asc)          (registration)        (singletons)        (scoped)
//!                                                     │
//!                                       resolve_unregistered::<T>()
//!                                     (first satisfiable constructor)
//! ```
//!
//! Instances are stored type-erased as [`Instance`], which always holds an
//! `Arc<T>` together with the key of `T`.

mod collection;
mod constructor;
mod provider;

pub use collection::{ServiceCollection, ServiceDescriptor, ServiceFactory, ServiceLifetime};
pub use constructor::{Arguments, Constructible, Constructor, resolve_unregistered};
pub use provider::{ServiceProvider, ServiceScope};

use kiln_domain::capability::CapabilityKey;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased service instance holding an `Arc<T>`
///
/// Recovery checks the capability key instead of `Any::downcast_ref`, so an
/// instance created inside a module library can be resolved by the host and
/// the other way around.
#[derive(Clone)]
pub struct Instance {
    capability: CapabilityKey,
    value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    /// Erase `value` as an instance of capability `T`
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            capability: CapabilityKey::of::<T>(),
            value: Arc::new(value),
        }
    }

    /// Capability the instance was created for
    pub fn capability(&self) -> CapabilityKey {
        self.capability
    }

    /// Recover the `Arc<T>`, or `None` if the instance is not a `T`
    pub fn downcast<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        if self.capability != CapabilityKey::of::<T>() {
            return None;
        }
        let stored = Arc::as_ptr(&self.value).cast::<Arc<T>>();
        // SAFETY: `new::<C>` is the only constructor and stores an `Arc<C>`.
        // `C` and `T` have the same type name, and module libraries are built
        // from the same sources and toolchain as the host, so they share one
        // layout.
        let stored = unsafe { &*stored };
        Some(Arc::clone(stored))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Instance").field(&self.capability).finish()
    }
}

/// Resolution by capability key
pub trait Resolver: Send + Sync {
    /// Latest registration for `key`, or `None` if nothing usable is registered
    fn resolve_key(&self, key: CapabilityKey) -> Option<Instance>;

    /// Every registration for `key`, in registration order
    fn resolve_all_keys(&self, key: CapabilityKey) -> Vec<Instance>;
}

/// Typed resolution helpers for every [`Resolver`]
pub trait ResolverExt: Resolver {
    /// Resolve the capability `T`
    fn resolve<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.resolve_key(CapabilityKey::of::<T>())
            .and_then(|instance| instance.downcast::<T>())
    }

    /// Resolve every registration of `T`
    fn resolve_all<T: ?Sized + 'static>(&self) -> Vec<Arc<T>> {
        self.resolve_all_keys(CapabilityKey::of::<T>())
            .iter()
            .filter_map(Instance::downcast::<T>)
            .collect()
    }
}

impl<R: Resolver + ?Sized> ResolverExt for R {}
