//! Application Layer - Kiln
//!
//! Orchestration primitives that sit between the domain types and the host
//! infrastructure.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`ports`] | Startup configuration, startup task and module-resolve capabilities |
//! | [`registry`] | Link-time registration slices and the dynamic module ABI |
//! | [`module`] | Loaded modules and the process module catalog |
//! | [`discovery`] | Type Finder over the module catalog |
//! | [`extension`] | Extension point registry |
//! | [`singleton`] | Keyed store of one instance per capability |
//! | [`di`] | Service collection, provider, scopes and unregistered construction |
//!
//! ## Dependencies
//!
//! This crate depends only on `kiln-domain` and pure Rust libraries. Loading
//! library files from disk belongs to `kiln-infrastructure`.

pub mod di;
pub mod discovery;
pub mod extension;
pub mod module;
pub mod ports;
pub mod registry;
pub mod singleton;

pub use di::{
    Constructible, Constructor, Instance, Resolver, ResolverExt, ServiceCollection,
    ServiceLifetime, ServiceProvider, ServiceScope, resolve_unregistered,
};
pub use discovery::{DiscoveredType, TypeFinder};
pub use extension::{ExtensionPoint, ExtensionRegistry};
pub use module::{Module, ModuleCatalog, ModuleOrigin, ModuleState};
pub use ports::{ModuleResolveHandler, StartupConfiguration, StartupTask};
pub use singleton::SingletonRegistry;

// Used by `export_module!` so dynamic modules only depend on this crate
#[doc(hidden)]
pub use kiln_domain;
