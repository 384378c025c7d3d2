//! Extension points and extension declarations
//!
//! An extension point is a capability explicitly opened to third-party
//! modules. Implementations declare the point they extend by its capability
//! key; one type may declare several points.

use super::types::Activator;
use kiln_domain::capability::CapabilityKey;

/// Marker declaring a capability as an extension point
#[derive(Debug, Clone, Copy)]
pub struct ExtensionPointEntry {
    /// Short name of the owning module
    pub module: &'static str,
    /// Human-readable point name
    pub name: &'static str,
    /// Capability being extended
    pub interface_type: fn() -> CapabilityKey,
}

/// Declaration that an implementation extends an extension point
#[derive(Debug, Clone, Copy)]
pub struct ExtensionDeclaration {
    /// Short name of the owning module
    pub module: &'static str,
    /// Implementation type name
    pub name: &'static str,
    /// Extension point being extended
    pub extends: fn() -> CapabilityKey,
    /// Activation as a `Box<Point>`
    pub activate: Option<Activator>,
}

#[linkme::distributed_slice]
pub static KILN_EXTENSION_POINTS: [ExtensionPointEntry] = [..];

#[linkme::distributed_slice]
pub static KILN_EXTENSIONS: [ExtensionDeclaration] = [..];
