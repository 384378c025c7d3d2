//! Module Resolution Fallback
//!
//! Installed as a resolve handler once bootstrap is complete. On the first
//! lookup it indexes every module in the catalog plus every module library
//! in the base directory by short name, ignoring case. Lookups then prefer an
//! exact `name@version` match and otherwise return the first variant recorded
//! for the short name, so a request for a version that is not present is
//! still served by whatever version is.

use super::library::LibraryLoader;
use kiln_application::module::{Module, ModuleState};
use kiln_application::ports::ModuleResolveHandler;
use kiln_domain::error::{Error, Result};
use kiln_domain::value_objects::ModuleIdentity;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Case-folded short name → (full identity, module), in recording order
#[derive(Debug, Default)]
struct ModuleNameIndex {
    entries: HashMap<String, Vec<(String, Arc<Module>)>>,
}

fn name_key(name: &str) -> String {
    name.to_lowercase()
}

impl ModuleNameIndex {
    fn record(&mut self, module: &Arc<Module>) {
        if let ModuleState::Faulted(reason) = module.state() {
            debug!(module = %module.identity(), reason = %reason, "Not indexing faulted module");
            return;
        }
        let full = module.identity().full();
        let variants = self.entries.entry(name_key(module.name())).or_default();
        if !variants.iter().any(|(recorded, _)| *recorded == full) {
            variants.push((full, Arc::clone(module)));
        }
    }

    fn lookup(&self, requested: &ModuleIdentity) -> Option<Arc<Module>> {
        let variants = self.entries.get(&name_key(requested.name()))?;
        let full = requested.full();
        variants
            .iter()
            .find(|(recorded, _)| *recorded == full)
            .or_else(|| variants.first())
            .map(|(_, module)| Arc::clone(module))
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// Name-based module resolution used when the normal loader misses
#[derive(Debug)]
pub struct ModuleResolutionFallback {
    libraries: Arc<LibraryLoader>,
    base_directory: PathBuf,
    index: Mutex<ModuleNameIndex>,
    builds: AtomicUsize,
}

impl ModuleResolutionFallback {
    /// Create a fallback indexing the catalog of `libraries` and `base_directory`
    pub fn new(libraries: Arc<LibraryLoader>, base_directory: impl Into<PathBuf>) -> Self {
        Self {
            libraries,
            base_directory: base_directory.into(),
            index: Mutex::new(ModuleNameIndex::default()),
            builds: AtomicUsize::new(0),
        }
    }

    /// Directory scanned for module libraries
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Resolve `identity`, or `None` if no module by that short name exists
    ///
    /// Never fails: unparsable identities and misses both yield `None`.
    pub fn resolve(&self, identity: &str) -> Option<Arc<Module>> {
        let requested = match ModuleIdentity::parse(identity) {
            Ok(requested) => requested,
            Err(e) => {
                debug!(identity, error = %e, "Ignoring unparsable module identity");
                return None;
            }
        };

        // Held across the build so concurrent first lookups index once
        let mut index = self.index.lock().unwrap_or_else(PoisonError::into_inner);
        if index.is_empty() {
            self.build_index(&mut index);
        }

        let found = index.lookup(&requested);
        debug!(identity, found = found.is_some(), "Fallback module lookup");
        found
    }

    /// Resolve `identity`, failing with `ModuleUnresolved` on a miss
    pub fn try_resolve(&self, identity: &str) -> Result<Arc<Module>> {
        self.resolve(identity)
            .ok_or_else(|| Error::module_unresolved(identity))
    }

    /// How many times the index has been built
    pub fn index_builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    fn build_index(&self, index: &mut ModuleNameIndex) {
        for module in self.libraries.catalog().modules() {
            index.record(&module);
        }
        for module in self.libraries.load_directory(&self.base_directory) {
            index.record(&module);
        }

        self.builds.fetch_add(1, Ordering::SeqCst);
        info!(
            modules = index.len(),
            directory = %self.base_directory.display(),
            "Module name index built"
        );
    }
}

impl ModuleResolveHandler for ModuleResolutionFallback {
    fn resolve(&self, identity: &str) -> Option<Arc<Module>> {
        ModuleResolutionFallback::resolve(self, identity)
    }
}
