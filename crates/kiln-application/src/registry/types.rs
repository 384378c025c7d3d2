//! Type registrations
//!
//! One [`TypeRegistration`] announces that a type implements one capability.
//! A type implementing several capabilities submits one registration per
//! capability.

use crate::ports::{StartupConfiguration, StartupTask};
use kiln_domain::capability::CapabilityKey;
use kiln_domain::error::Result;
use std::any::Any;
use std::fmt;

/// Type-erased component produced by an activator
///
/// Holds a `Box<T>` for the capability `T` it was activated as, together
/// with the key of `T`. Like [`Instance`](crate::di::Instance), recovery
/// compares keys so components activated inside a module library can be
/// taken back by the host.
pub struct ActivatedInstance {
    capability: CapabilityKey,
    value: Box<dyn Any + Send>,
}

impl ActivatedInstance {
    /// Erase `component` as capability `T`
    pub fn new<T: ?Sized + Send + 'static>(component: Box<T>) -> Self {
        Self {
            capability: CapabilityKey::of::<T>(),
            value: Box::new(component),
        }
    }

    /// Capability the component was activated as
    pub fn capability(&self) -> CapabilityKey {
        self.capability
    }

    /// Take the component back as `Box<T>`
    ///
    /// Returns `self` unchanged when it was activated as another capability.
    pub fn into_box<T: ?Sized + 'static>(self) -> std::result::Result<Box<T>, Self> {
        if self.capability != CapabilityKey::of::<T>() {
            return Err(self);
        }
        let stored = Box::into_raw(self.value).cast::<Box<T>>();
        // SAFETY: `new::<C>` is the only constructor and stores a `Box<C>`
        // allocated as `Box<Box<C>>`. `C` and `T` have the same type name and
        // share one layout (see `Instance::downcast`).
        let stored = unsafe { Box::from_raw(stored) };
        Ok(*stored)
    }
}

impl fmt::Debug for ActivatedInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActivatedInstance")
            .field(&self.capability)
            .finish()
    }
}

/// Default-constructor activation for a registered type
pub type Activator = fn() -> Result<ActivatedInstance>;

/// Whether a registered type can be activated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Concrete implementation
    Concrete,
    /// Abstract base; reported only when concrete filtering is off
    Abstract,
}

/// Registry entry announcing that a type implements a capability
#[derive(Debug, Clone, Copy)]
pub struct TypeRegistration {
    /// Short name of the owning module
    pub module: &'static str,
    /// Implementation type name
    pub name: &'static str,
    /// Capability the type implements
    pub capability: fn() -> CapabilityKey,
    /// Concrete or abstract
    pub kind: TypeKind,
    /// Default-constructor activation
    pub activate: Option<Activator>,
}

impl TypeRegistration {
    /// Whether this registration implements `capability`
    pub fn implements(&self, capability: CapabilityKey) -> bool {
        (self.capability)() == capability
    }
}

#[linkme::distributed_slice]
pub static KILN_TYPES: [TypeRegistration] = [..];

/// Activator for a `Default` startup configuration
pub fn startup_configuration_activator<T>() -> Result<ActivatedInstance>
where
    T: StartupConfiguration + Default + 'static,
{
    Ok(ActivatedInstance::new::<dyn StartupConfiguration>(Box::new(
        T::default(),
    )))
}

/// Activator for a `Default` startup task
pub fn startup_task_activator<T>() -> Result<ActivatedInstance>
where
    T: StartupTask + Default + 'static,
{
    Ok(ActivatedInstance::new::<dyn StartupTask>(Box::new(T::default())))
}
