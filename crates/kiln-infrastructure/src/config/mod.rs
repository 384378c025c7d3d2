//! Configuration management
//!
//! Application settings are layered with `figment`: built-in defaults, then
//! a TOML file, then `KILN_`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, LoggingConfig, ModulesConfig};
