//! Domain Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`ModuleIdentity`] | Short name plus optional version of a module |
//! | [`ConfigurationSource`] | Settings handed to startup configurations |

/// Configuration values passed through bootstrap
pub mod configuration;
/// Module naming
pub mod module;

pub use configuration::ConfigurationSource;
pub use module::ModuleIdentity;
