//! Capability identity
//!
//! A capability is any `'static` type, usually a trait object such as
//! `dyn StartupTask`, that concrete implementations satisfy. The key is what
//! registries, containers and the singleton table are indexed by.
//!
//! Keys compare by fully qualified type name rather than `TypeId`. A module
//! library carries its own compiled copy of the kiln crates, and the `TypeId`
//! of `dyn StartupTask` differs between that copy and the host's even when
//! both come from the same toolchain and sources.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a capability type
///
/// Equality and hashing use the type name, so a key built inside a module
/// library matches the host's key for the same type.
#[derive(Clone, Copy)]
pub struct CapabilityKey {
    name: &'static str,
}

impl CapabilityKey {
    /// Key for the capability type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name (`dyn a::b::Foo` becomes `Foo`)
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for CapabilityKey {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for CapabilityKey {}

impl Hash for CapabilityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CapabilityKey").field(&self.name).finish()
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
