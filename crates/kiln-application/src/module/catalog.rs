//! Process module catalog

use super::{Module, ModuleOrigin};
use crate::registry::{
    KILN_EXTENSION_POINTS, KILN_EXTENSIONS, KILN_MODULES, KILN_TYPES, ModuleRegistrar,
};
use kiln_domain::constants::DEFAULT_MODULE_VERSION;
use kiln_domain::value_objects::ModuleIdentity;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// The set of modules known to the process, in load order
///
/// Scans take the read lock and attaching takes the write lock, so a
/// discovery pass never observes a module half-attached.
#[derive(Debug, Default)]
pub struct ModuleCatalog {
    modules: RwLock<Vec<Arc<Module>>>,
}

impl ModuleCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding every module linked into the binary
    ///
    /// Declared modules come first in slice order, followed by modules only
    /// named by their registrations, in order of first appearance.
    pub fn linked() -> Self {
        let mut names: Vec<&'static str> = KILN_MODULES.iter().map(|m| m.name).collect();
        let referenced = KILN_TYPES
            .iter()
            .map(|t| t.module)
            .chain(KILN_EXTENSION_POINTS.iter().map(|p| p.module))
            .chain(KILN_EXTENSIONS.iter().map(|e| e.module));
        for name in referenced {
            if !names.contains(&name) {
                names.push(name);
            }
        }

        let catalog = Self::new();
        for name in names {
            let version = KILN_MODULES
                .iter()
                .find(|m| m.name == name)
                .map(|m| m.version)
                .unwrap_or(DEFAULT_MODULE_VERSION);

            let mut registrar = ModuleRegistrar::new(ModuleIdentity::new(name, version));
            for registration in KILN_TYPES.iter().filter(|t| t.module == name) {
                registrar.register_type(*registration);
            }
            for point in KILN_EXTENSION_POINTS.iter().filter(|p| p.module == name) {
                registrar.register_extension_point(*point);
            }
            for declaration in KILN_EXTENSIONS.iter().filter(|e| e.module == name) {
                registrar.register_extension(*declaration);
            }
            catalog.attach(Arc::new(registrar.into_module(ModuleOrigin::Linked)));
        }

        debug!(modules = catalog.len(), "Linked module catalog built");
        catalog
    }

    /// Attach a module to the catalog
    ///
    /// A module whose full identity is already present is not attached
    /// twice; the existing module is returned instead.
    pub fn attach(&self, module: Arc<Module>) -> Arc<Module> {
        let mut modules = self.modules.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = modules
            .iter()
            .find(|m| m.identity() == module.identity())
        {
            debug!(module = %module.identity(), "Module already attached");
            return Arc::clone(existing);
        }
        debug!(module = %module.identity(), origin = ?module.origin(), "Attaching module");
        modules.push(Arc::clone(&module));
        module
    }

    /// Snapshot of all modules in load order
    pub fn modules(&self) -> Vec<Arc<Module>> {
        self.modules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Find a module the way the normal loader does
    ///
    /// A versioned request matches only the exact identity; an unversioned
    /// request matches the first module with that short name.
    pub fn find(&self, requested: &ModuleIdentity) -> Option<Arc<Module>> {
        let modules = self.modules.read().unwrap_or_else(PoisonError::into_inner);
        let found = match requested.version() {
            Some(_) => modules.iter().find(|m| m.identity() == requested),
            None => modules.iter().find(|m| m.name() == requested.name()),
        };
        found.cloned()
    }

    /// Find a dynamic module loaded from `path`
    pub fn find_by_path(&self, path: &Path) -> Option<Arc<Module>> {
        self.modules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|m| m.path() == Some(path))
            .cloned()
    }

    /// Number of modules
    pub fn len(&self) -> usize {
        self.modules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
