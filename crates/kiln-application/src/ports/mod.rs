//! Ports
//!
//! Capabilities implemented by collaborators outside the engine.

pub mod module;
pub mod startup;

pub use module::ModuleResolveHandler;
pub use startup::{StartupConfiguration, StartupTask};
