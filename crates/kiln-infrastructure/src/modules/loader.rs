//! Module loader
//!
//! Resolves module identities against the catalog and, on a miss, asks each
//! registered resolve handler in turn.

use kiln_application::module::{Module, ModuleCatalog};
use kiln_application::ports::ModuleResolveHandler;
use kiln_domain::error::{Error, Result};
use kiln_domain::value_objects::ModuleIdentity;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Loads modules by identity
pub struct ModuleLoader {
    catalog: Arc<ModuleCatalog>,
    handlers: RwLock<Vec<Arc<dyn ModuleResolveHandler>>>,
}

impl ModuleLoader {
    /// Create a loader over `catalog` with no resolve handlers
    pub fn new(catalog: Arc<ModuleCatalog>) -> Self {
        Self {
            catalog,
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Catalog consulted before any handler
    pub fn catalog(&self) -> &Arc<ModuleCatalog> {
        &self.catalog
    }

    /// Append a handler consulted when the catalog misses
    pub fn add_resolve_handler(&self, handler: Arc<dyn ModuleResolveHandler>) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }

    /// Number of registered resolve handlers
    pub fn handler_count(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Load the module named by `identity` (`name` or `name@version`)
    pub fn load(&self, identity: &str) -> Result<Arc<Module>> {
        let requested = ModuleIdentity::parse(identity)?;
        if let Some(module) = self.catalog.find(&requested) {
            return Ok(module);
        }

        debug!(identity, "Module not in catalog, consulting resolve handlers");
        // Snapshot so a handler may register further handlers
        let handlers = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        handlers
            .iter()
            .find_map(|handler| handler.resolve(identity))
            .ok_or_else(|| Error::module_unresolved(identity))
    }
}

impl fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("modules", &self.catalog.len())
            .field("handlers", &self.handler_count())
            .finish()
    }
}
