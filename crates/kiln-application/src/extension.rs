//! Extension Point Registry
//!
//! Lets independently compiled modules contribute implementations to points
//! they do not own. Points and declarations are collected from every
//! scannable module; hosts may add more at runtime with
//! [`register_point`](ExtensionRegistry::register_point) and
//! [`register`](ExtensionRegistry::register).

use crate::discovery::{DiscoveredType, TypeFinder};
use crate::module::{Module, ModuleOrigin};
use crate::registry::{ExtensionDeclaration, ExtensionPointEntry, ModuleRegistrar, TypeKind};
use kiln_domain::capability::CapabilityKey;
use kiln_domain::constants::KILN_CORE_VERSION;
use kiln_domain::error::{Error, Result};
use kiln_domain::value_objects::ModuleIdentity;
use std::sync::Arc;
use tracing::debug;

/// Name of the module runtime registrations are attributed to
const HOST_MODULE_NAME: &str = "host";

/// A declared extension point
#[derive(Debug, Clone)]
pub struct ExtensionPoint {
    /// Human-readable name
    pub name: &'static str,
    /// Capability being extended
    pub interface_type: CapabilityKey,
    /// Module declaring the point
    pub module: ModuleIdentity,
}

/// Maps extension points to the implementations that extend them
#[derive(Debug)]
pub struct ExtensionRegistry {
    host: Arc<Module>,
    points: Vec<ExtensionPoint>,
    extensions: Vec<DiscoveredType>,
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtensionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        let host = ModuleRegistrar::new(ModuleIdentity::new(HOST_MODULE_NAME, KILN_CORE_VERSION))
            .into_module(ModuleOrigin::Host);
        Self {
            host: Arc::new(host),
            points: Vec::new(),
            extensions: Vec::new(),
        }
    }

    /// Collect points and declarations from every module the finder scans
    pub fn discover(finder: &TypeFinder) -> Self {
        let mut registry = Self::new();
        for module in finder.scannable_modules() {
            for point in module.extension_points() {
                registry.add_point(point, module.identity().clone());
            }
            for declaration in module.extensions() {
                registry.add_declaration(&module, declaration);
            }
        }

        debug!(
            points = registry.points.len(),
            extensions = registry.extensions.len(),
            "Extension registry discovered"
        );
        registry
    }

    /// Declare an extension point at runtime
    pub fn register_point(&mut self, point: ExtensionPointEntry) -> &mut Self {
        let module = self.host.identity().clone();
        self.add_point(&point, module);
        self
    }

    /// Register an extension at runtime
    pub fn register(&mut self, declaration: ExtensionDeclaration) -> &mut Self {
        let host = Arc::clone(&self.host);
        self.add_declaration(&host, &declaration);
        self
    }

    fn add_point(&mut self, point: &ExtensionPointEntry, module: ModuleIdentity) {
        let interface_type = (point.interface_type)();
        if self.is_extension_point(interface_type) {
            debug!(point = point.name, "Extension point already declared");
            return;
        }
        self.points.push(ExtensionPoint {
            name: point.name,
            interface_type,
            module,
        });
    }

    fn add_declaration(&mut self, module: &Arc<Module>, declaration: &ExtensionDeclaration) {
        self.extensions.push(DiscoveredType::new(
            Arc::clone(module),
            declaration.name,
            (declaration.extends)(),
            TypeKind::Concrete,
            declaration.activate,
        ));
    }

    /// Declared extension points
    pub fn points(&self) -> &[ExtensionPoint] {
        &self.points
    }

    /// Whether `capability` is a declared extension point
    pub fn is_extension_point(&self, capability: CapabilityKey) -> bool {
        self.points.iter().any(|p| p.interface_type == capability)
    }

    /// Every implementation extending `point`, in discovery order
    ///
    /// Fails with a configuration error if `point` was never declared.
    pub fn find_extensions_of(&self, point: CapabilityKey) -> Result<Vec<DiscoveredType>> {
        if !self.is_extension_point(point) {
            return Err(Error::configuration(format!(
                "{point} is not a declared extension point"
            )));
        }
        Ok(self
            .extensions
            .iter()
            .filter(|e| e.capability() == point)
            .cloned()
            .collect())
    }

    /// Typed form of [`find_extensions_of`](Self::find_extensions_of)
    pub fn find_extensions<T: ?Sized + 'static>(&self) -> Result<Vec<DiscoveredType>> {
        self.find_extensions_of(CapabilityKey::of::<T>())
    }

    /// Activate every extension of `T` as `Box<T>`
    pub fn instantiate<T: ?Sized + 'static>(&self) -> Result<Vec<Box<T>>> {
        self.find_extensions::<T>()?
            .iter()
            .map(DiscoveredType::activate::<T>)
            .collect()
    }

    /// Check that every declaration targets a declared extension point
    pub fn validate(&self) -> Result<()> {
        match self
            .extensions
            .iter()
            .find(|e| !self.is_extension_point(e.capability()))
        {
            Some(orphan) => Err(Error::configuration(format!(
                "{} in module {} extends {}, which is not a declared extension point",
                orphan.name(),
                orphan.module_identity(),
                orphan.capability()
            ))),
            None => Ok(()),
        }
    }

    /// Number of extension declarations
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Whether no declarations are registered
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}
