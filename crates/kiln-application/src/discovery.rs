//! Type Finder
//!
//! Answers "which types implement this capability?" by scanning every module
//! in the catalog. Nothing is cached between queries: every call re-scans the
//! current module set, so modules attached later are picked up.

use crate::module::{Module, ModuleCatalog, ModuleState};
use crate::registry::{Activator, TypeKind};
use kiln_domain::capability::CapabilityKey;
use kiln_domain::error::{Error, Result};
use kiln_domain::value_objects::ModuleIdentity;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// A type found to implement a capability
#[derive(Clone)]
pub struct DiscoveredType {
    module: Arc<Module>,
    name: &'static str,
    capability: CapabilityKey,
    kind: TypeKind,
    activate: Option<Activator>,
}

impl DiscoveredType {
    pub(crate) fn new(
        module: Arc<Module>,
        name: &'static str,
        capability: CapabilityKey,
        kind: TypeKind,
        activate: Option<Activator>,
    ) -> Self {
        Self {
            module,
            name,
            capability,
            kind,
            activate,
        }
    }

    /// Implementation type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Owning module
    pub fn module(&self) -> &Arc<Module> {
        &self.module
    }

    /// Identity of the owning module
    pub fn module_identity(&self) -> &ModuleIdentity {
        self.module.identity()
    }

    /// Capability the type was discovered for
    pub fn capability(&self) -> CapabilityKey {
        self.capability
    }

    /// Concrete or abstract
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether the type is concrete
    pub fn is_concrete(&self) -> bool {
        self.kind == TypeKind::Concrete
    }

    /// Activate a fresh instance as `Box<T>`
    ///
    /// Fails with a configuration error naming the type when it has no
    /// activator, the activator fails, or it produces something other than a
    /// `Box<T>`.
    pub fn activate<T: ?Sized + 'static>(&self) -> Result<Box<T>> {
        let activator = self.activate.ok_or_else(|| {
            Error::configuration(format!(
                "{} in module {} cannot be activated",
                self.name,
                self.module.identity()
            ))
        })?;

        let instance = activator().map_err(|e| {
            Error::configuration_with_source(format!("failed to activate {}", self.name), e)
        })?;

        instance.into_box::<T>().map_err(|other| {
            Error::configuration(format!(
                "{} activated as {}, not {}",
                self.name,
                other.capability(),
                std::any::type_name::<T>()
            ))
        })
    }
}

impl fmt::Debug for DiscoveredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredType")
            .field("name", &self.name)
            .field("module", &self.module.identity().full())
            .field("capability", &self.capability)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Scans loaded modules for implementations of a capability
#[derive(Debug, Clone)]
pub struct TypeFinder {
    catalog: Arc<ModuleCatalog>,
}

impl TypeFinder {
    /// Create a finder over `catalog`
    pub fn new(catalog: Arc<ModuleCatalog>) -> Self {
        Self { catalog }
    }

    /// The catalog being scanned
    pub fn catalog(&self) -> &Arc<ModuleCatalog> {
        &self.catalog
    }

    /// Modules used for scanning, in load order
    pub fn modules(&self) -> Vec<Arc<Module>> {
        self.catalog.modules()
    }

    /// Modules that can be scanned; faulted modules are logged and skipped
    pub(crate) fn scannable_modules(&self) -> Vec<Arc<Module>> {
        self.modules()
            .into_iter()
            .filter(|module| match module.state() {
                ModuleState::Ready => true,
                ModuleState::Faulted(reason) => {
                    warn!(
                        module = %module.identity(),
                        reason = %reason,
                        "Skipping faulted module during discovery"
                    );
                    false
                }
            })
            .collect()
    }

    /// Every type implementing `capability`, in discovery order
    ///
    /// With `only_concrete` set, abstract registrations are excluded.
    pub fn find_implementations(
        &self,
        capability: CapabilityKey,
        only_concrete: bool,
    ) -> Vec<DiscoveredType> {
        let mut found = Vec::new();
        for module in self.scannable_modules() {
            for registration in module.types() {
                if !registration.implements(capability) {
                    continue;
                }
                if only_concrete && registration.kind != TypeKind::Concrete {
                    continue;
                }
                found.push(DiscoveredType::new(
                    Arc::clone(&module),
                    registration.name,
                    capability,
                    registration.kind,
                    registration.activate,
                ));
            }
        }

        debug!(
            capability = capability.short_name(),
            found = found.len(),
            "Discovered implementations"
        );
        found
    }

    /// Typed form of [`find_implementations`](Self::find_implementations)
    pub fn find<T: ?Sized + 'static>(&self, only_concrete: bool) -> Vec<DiscoveredType> {
        self.find_implementations(CapabilityKey::of::<T>(), only_concrete)
    }
}
