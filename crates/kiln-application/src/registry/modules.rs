//! Linked module declarations
//!
//! Optional: a module that never submits a [`ModuleEntry`] still appears in
//! the catalog under the name its types carry, with the default version.

/// Declaration of a module linked into the host binary
#[derive(Debug, Clone, Copy)]
pub struct ModuleEntry {
    /// Short module name (e.g., "storage")
    pub name: &'static str,
    /// Module version
    pub version: &'static str,
    /// Human-readable description
    pub description: &'static str,
}

#[linkme::distributed_slice]
pub static KILN_MODULES: [ModuleEntry] = [..];
