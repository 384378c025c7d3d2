//! Infrastructure Layer - Kiln
//!
//! Host-side concerns around the application layer.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based configuration loading |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`modules`] | Library loading, module loader and the resolution fallback |
//! | [`engine`] | Startup orchestrator |
//! | [`bootstrap`] | `AppContext` composition root |
//! | [`builtin`] | Core module with the engine's own startup components |
//! | [`error_ext`] | Context extension trait for foreign errors |

pub mod bootstrap;
pub mod builtin;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error_ext;
pub mod logging;
pub mod modules;

pub use bootstrap::{AppContext, init_app, init_app_with_catalog};
pub use config::{AppConfig, ConfigLoader, LoggingConfig, ModulesConfig};
pub use engine::Engine;
pub use error_ext::ErrorContext;
pub use logging::init_logging;
pub use modules::{LibraryLoader, ModuleLoader, ModuleResolutionFallback};
