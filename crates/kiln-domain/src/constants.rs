//! Domain layer constants
//!
//! Values that must agree between the host process and every module that
//! registers itself with it.

// ============================================================================
// MODULE ABI CONSTANTS
// ============================================================================

/// Core version stamped into every dynamic module declaration
pub const KILN_CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Symbol a dynamic module exports its declaration under
pub const MODULE_DECLARATION_SYMBOL: &[u8] = b"KILN_MODULE\0";

// ============================================================================
// MODULE IDENTITY CONSTANTS
// ============================================================================

/// Separator between short name and version in a full module identity
pub const MODULE_IDENTITY_SEPARATOR: char = '@';

/// Version assigned to linked modules that never declared one
pub const DEFAULT_MODULE_VERSION: &str = "0.0.0";

// ============================================================================
// ORDERING CONSTANTS
// ============================================================================

/// Order used by startup components that do not override `order()`
pub const DEFAULT_COMPONENT_ORDER: i32 = 0;
