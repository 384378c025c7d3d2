//! Dynamic library loading
//!
//! Opens a library file with `libloading`, reads the `KILN_MODULE`
//! declaration it exports and turns its registrations into a catalog module.
//! Accepted libraries stay loaded until the process exits.

use crate::error_ext::ErrorContext;
use kiln_application::module::{Module, ModuleCatalog, ModuleOrigin};
use kiln_application::registry::{ModuleDeclaration, ModuleRegistrar};
use kiln_domain::constants::{KILN_CORE_VERSION, MODULE_DECLARATION_SYMBOL};
use kiln_domain::error::{Error, Result};
use libloading::{Library, Symbol};
use std::env::consts::DLL_EXTENSION;
use std::ffi::OsStr;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Loads module libraries into a [`ModuleCatalog`]
#[derive(Debug, Clone)]
pub struct LibraryLoader {
    catalog: Arc<ModuleCatalog>,
    core_version_check: bool,
}

impl LibraryLoader {
    /// Create a loader attaching to `catalog`
    pub fn new(catalog: Arc<ModuleCatalog>) -> Self {
        Self {
            catalog,
            core_version_check: true,
        }
    }

    /// Enable or disable the core version check
    pub fn with_core_version_check(mut self, enabled: bool) -> Self {
        self.core_version_check = enabled;
        self
    }

    /// Catalog modules are attached to
    pub fn catalog(&self) -> &Arc<ModuleCatalog> {
        &self.catalog
    }

    /// Whether `path` has the platform's library extension
    pub fn is_module_library(path: &Path) -> bool {
        path.extension() == Some(OsStr::new(DLL_EXTENSION))
    }

    /// Load the module library at `path`
    ///
    /// A path that is already loaded returns the existing module. A library
    /// whose `register` function panics is attached as a faulted module; the
    /// panic is caught inside the library by `export_module!`.
    pub fn load(&self, path: &Path) -> Result<Arc<Module>> {
        if let Some(existing) = self.catalog.find_by_path(path) {
            debug!(path = %path.display(), "Module library already loaded");
            return Ok(existing);
        }

        let shown = path.display().to_string();

        // SAFETY: loading a library runs its initializers. Module libraries
        // are trusted code built against this core version.
        let library =
            unsafe { Library::new(path) }.module_context(&shown, "failed to open library")?;

        // SAFETY: `KILN_MODULE` is a `ModuleDeclaration` static emitted by
        // `export_module!`. Its strings and function pointers stay valid
        // because the library is never unloaded once accepted.
        let declaration: ModuleDeclaration = unsafe {
            let symbol: Symbol<*const ModuleDeclaration> = library
                .get(MODULE_DECLARATION_SYMBOL)
                .module_context(&shown, "missing KILN_MODULE export")?;
            **symbol
        };

        if self.core_version_check && declaration.core_version != KILN_CORE_VERSION {
            return Err(Error::module_load(
                &shown,
                format!(
                    "built against kiln {}, host is {}",
                    declaration.core_version, KILN_CORE_VERSION
                ),
            ));
        }

        let origin = ModuleOrigin::Dynamic {
            path: path.to_path_buf(),
        };
        // A loaded library is never unloaded. Its code backs registrations,
        // activated components and service factories that host-owned state
        // keeps with no drop ordering relative to the catalog.
        mem::forget(library);

        let mut registrar = ModuleRegistrar::new(declaration.identity());
        let module = match (declaration.register)(&mut registrar) {
            Ok(()) => registrar.into_module(origin),
            Err(reason) => {
                warn!(
                    path = %shown,
                    module = %declaration.identity(),
                    reason = %reason,
                    "Module registration panicked"
                );
                registrar.into_faulted(origin, reason)
            }
        };

        info!(module = %module.identity(), path = %shown, "Loaded module library");
        Ok(self.catalog.attach(Arc::new(module)))
    }

    /// Load every module library directly inside `directory`
    ///
    /// Files are visited in name order. Failures are logged and skipped.
    pub fn load_directory(&self, directory: &Path) -> Vec<Arc<Module>> {
        if !directory.is_dir() {
            debug!(directory = %directory.display(), "Module directory does not exist");
            return Vec::new();
        }

        let mut loaded = Vec::new();
        for path in library_files(directory) {
            match self.load(&path) {
                Ok(module) => loaded.push(module),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping module library"),
            }
        }
        loaded
    }
}

fn library_files(directory: &Path) -> Vec<PathBuf> {
    WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Failed to read module directory entry");
                None
            }
        })
        .filter(|entry| entry.path().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| LibraryLoader::is_module_library(path))
        .collect()
}
