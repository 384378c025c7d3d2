//! # Kiln
//!
//! A process bootstrap and plugin-orchestration engine.
//!
//! At process start Kiln discovers extension modules (linked into the binary
//! or loaded from library files), registers process-wide singletons, runs
//! ordered startup configurations that fill a service container, runs
//! ordered startup tasks against the built container, and resolves module
//! requests by short name when the normal loader misses.
//!
//! ## Example
//!
//! ```ignore
//! use kiln::{ConfigLoader, init_app};
//!
//! let context = init_app(ConfigLoader::new().load()?)?;
//! let provider = context.start()?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Capability and module identity, configuration source, errors
//! - `application` - Registries, discovery, extension points and the service container
//! - `infrastructure` - Configuration, logging, library loading and the engine

/// Domain layer - identities and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use kiln_domain::*;
}

/// Application layer - registries, discovery and the service container
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use kiln_application::*;
}

/// Infrastructure layer - configuration, logging, modules and the engine
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use kiln_infrastructure::*;
}

pub mod cli;

// Re-export commonly used types at the crate root
pub use domain::{CapabilityKey, ConfigurationSource, Error, ModuleIdentity, Result};

pub use application::{
    Constructible, Constructor, ExtensionRegistry, ResolverExt, ServiceCollection,
    ServiceProvider, SingletonRegistry, StartupConfiguration, StartupTask, TypeFinder,
};

pub use infrastructure::{AppConfig, AppContext, ConfigLoader, Engine, init_app, init_logging};
