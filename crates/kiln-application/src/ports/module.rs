//! Module resolution hook

use crate::module::Module;
use std::sync::Arc;

/// Handler consulted when the module loader cannot find a requested module
///
/// Implementations must not panic; a miss is reported as `None` so the next
/// handler in the chain gets its turn.
pub trait ModuleResolveHandler: Send + Sync {
    /// Return a loaded module matching `identity`, or `None`
    fn resolve(&self, identity: &str) -> Option<Arc<Module>>;
}
