//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Values shared with dynamic modules are defined in `kiln_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "kiln.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "kiln";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "KILN";

/// Separator between nested keys in environment variable names
///
/// `KILN_MODULES__LOAD_ON_START` sets `modules.load_on_start`.
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable holding a `tracing` filter directive
pub const LOG_FILTER_ENV: &str = "KILN_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// File name prefix for rolling log files
pub const DEFAULT_LOG_FILE_PREFIX: &str = "kiln";

// ============================================================================
// MODULE CONSTANTS
// ============================================================================

/// Name of the module carrying the engine's own startup components
pub const CORE_MODULE_NAME: &str = "kiln-core";

/// Order of the core startup configuration; runs before every other one
pub const CORE_CONFIGURATION_ORDER: i32 = i32::MIN;

/// Order of the module inventory task; runs after every other one
pub const MODULE_INVENTORY_ORDER: i32 = i32::MAX;
