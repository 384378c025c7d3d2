//! Loaded modules
//!
//! A [`Module`] is a unit of compiled code known to the process: either
//! linked into the host binary or loaded from a library file. The
//! [`ModuleCatalog`] is the process module set every discovery scan reads.

mod catalog;

pub use catalog::ModuleCatalog;

use crate::registry::{ExtensionDeclaration, ExtensionPointEntry, TypeRegistration};
use kiln_domain::value_objects::ModuleIdentity;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a module came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleOrigin {
    /// Linked into the host binary
    Linked,
    /// Loaded from a library file
    Dynamic {
        /// Library path
        path: PathBuf,
    },
    /// Created by the host at runtime
    Host,
}

/// Whether a module can be scanned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleState {
    /// Registrations are available
    Ready,
    /// Registration failed; discovery skips the module
    Faulted(String),
}

/// A module and everything it registered
pub struct Module {
    identity: ModuleIdentity,
    origin: ModuleOrigin,
    state: ModuleState,
    types: Vec<TypeRegistration>,
    extension_points: Vec<ExtensionPointEntry>,
    extensions: Vec<ExtensionDeclaration>,
}

impl Module {
    pub(crate) fn new(
        identity: ModuleIdentity,
        origin: ModuleOrigin,
        state: ModuleState,
        types: Vec<TypeRegistration>,
        extension_points: Vec<ExtensionPointEntry>,
        extensions: Vec<ExtensionDeclaration>,
    ) -> Self {
        Self {
            identity,
            origin,
            state,
            types,
            extension_points,
            extensions,
        }
    }

    /// Module identity
    pub fn identity(&self) -> &ModuleIdentity {
        &self.identity
    }

    /// Short module name
    pub fn name(&self) -> &str {
        self.identity.name()
    }

    /// Where the module came from
    pub fn origin(&self) -> &ModuleOrigin {
        &self.origin
    }

    /// Library path for dynamic modules
    pub fn path(&self) -> Option<&Path> {
        match &self.origin {
            ModuleOrigin::Dynamic { path } => Some(path),
            _ => None,
        }
    }

    /// Registration state
    pub fn state(&self) -> &ModuleState {
        &self.state
    }

    /// Whether registrations can be scanned
    pub fn is_ready(&self) -> bool {
        self.state == ModuleState::Ready
    }

    /// Type registrations in declaration order
    pub fn types(&self) -> &[TypeRegistration] {
        &self.types
    }

    /// Extension points owned by this module
    pub fn extension_points(&self) -> &[ExtensionPointEntry] {
        &self.extension_points
    }

    /// Extension declarations in declaration order
    pub fn extensions(&self) -> &[ExtensionDeclaration] {
        &self.extensions
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("identity", &self.identity.full())
            .field("origin", &self.origin)
            .field("state", &self.state)
            .field("types", &self.types.len())
            .field("extensions", &self.extensions.len())
            .finish_non_exhaustive()
    }
}
