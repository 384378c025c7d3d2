//! Tests for the extension point registry

use kiln_application::registry::{
    ActivatedInstance, ExtensionDeclaration, ExtensionPointEntry, ModuleRegistrar,
};
use kiln_application::{ExtensionRegistry, ModuleCatalog, ModuleOrigin, TypeFinder};
use kiln_domain::{CapabilityKey, ModuleIdentity, Result};
use std::sync::Arc;

trait Exporter: Send {
    fn format(&self) -> &'static str;
}

trait Importer: Send {}

trait Undeclared: Send {}

struct CsvExporter;

impl Exporter for CsvExporter {
    fn format(&self) -> &'static str {
        "csv"
    }
}

fn activate_csv() -> Result<ActivatedInstance> {
    Ok(ActivatedInstance::new::<dyn Exporter>(Box::new(CsvExporter)))
}

fn exporter_point() -> ExtensionPointEntry {
    ExtensionPointEntry {
        module: "core",
        name: "exporters",
        interface_type: CapabilityKey::of::<dyn Exporter>,
    }
}

fn importer_point() -> ExtensionPointEntry {
    ExtensionPointEntry {
        module: "core",
        name: "importers",
        interface_type: CapabilityKey::of::<dyn Importer>,
    }
}

fn declaration(name: &'static str, extends: fn() -> CapabilityKey) -> ExtensionDeclaration {
    ExtensionDeclaration {
        module: "plugins",
        name,
        extends,
        activate: Some(activate_csv),
    }
}

fn finder() -> TypeFinder {
    let catalog = Arc::new(ModuleCatalog::new());

    let mut core = ModuleRegistrar::new(ModuleIdentity::new("core", "1.0.0"));
    core.register_extension_point(exporter_point())
        .register_extension_point(importer_point());
    catalog.attach(Arc::new(core.into_module(ModuleOrigin::Host)));

    let mut plugins = ModuleRegistrar::new(ModuleIdentity::new("plugins", "0.3.0"));
    plugins
        .register_extension(declaration("CsvExporter", CapabilityKey::of::<dyn Exporter>))
        // One type extending two points
        .register_extension(declaration("CsvExporter", CapabilityKey::of::<dyn Importer>))
        .register_extension(declaration("JsonExporter", CapabilityKey::of::<dyn Exporter>));
    catalog.attach(Arc::new(plugins.into_module(ModuleOrigin::Host)));

    TypeFinder::new(catalog)
}

#[test]
fn test_find_extensions_of_point_in_discovery_order() {
    let registry = ExtensionRegistry::discover(&finder());

    let names: Vec<&str> = registry
        .find_extensions::<dyn Exporter>()
        .unwrap()
        .iter()
        .map(|e| e.name())
        .collect();
    assert_eq!(names, vec!["CsvExporter", "JsonExporter"]);
}

#[test]
fn test_type_may_extend_several_points() {
    let registry = ExtensionRegistry::discover(&finder());

    let importers = registry.find_extensions::<dyn Importer>().unwrap();
    assert_eq!(importers.len(), 1);
    assert_eq!(importers[0].name(), "CsvExporter");
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_find_extensions_is_idempotent() {
    let registry = ExtensionRegistry::discover(&finder());

    let first: Vec<&str> = registry
        .find_extensions::<dyn Exporter>()
        .unwrap()
        .iter()
        .map(|e| e.name())
        .collect();
    let second: Vec<&str> = registry
        .find_extensions::<dyn Exporter>()
        .unwrap()
        .iter()
        .map(|e| e.name())
        .collect();
    assert_eq!(first, second);
}

#[test]
fn test_rediscovery_over_unchanged_modules_is_stable() {
    let finder = finder();

    let first = ExtensionRegistry::discover(&finder).find_extensions::<dyn Exporter>().unwrap();
    let second = ExtensionRegistry::discover(&finder).find_extensions::<dyn Exporter>().unwrap();

    let names = |found: &[kiln_application::DiscoveredType]| {
        found.iter().map(|e| e.name()).collect::<Vec<_>>()
    };
    assert_eq!(names(&first), names(&second));
}

#[test]
fn test_unknown_point_query_is_configuration_error() {
    let registry = ExtensionRegistry::discover(&finder());

    let err = registry.find_extensions::<dyn Undeclared>().err().expect("undeclared point");
    assert!(err.is_configuration());
}

#[test]
fn test_validate_rejects_declaration_for_undeclared_point() {
    let mut registry = ExtensionRegistry::discover(&finder());
    assert!(registry.validate().is_ok());

    registry.register(declaration("Stray", CapabilityKey::of::<dyn Undeclared>));

    let err = registry.validate().err().expect("orphan declaration");
    assert!(err.is_configuration());
    assert!(err.to_string().contains("Stray"));
}

#[test]
fn test_runtime_registration_and_instantiation() {
    let mut registry = ExtensionRegistry::new();
    registry
        .register_point(exporter_point())
        .register(declaration("CsvExporter", CapabilityKey::of::<dyn Exporter>));

    let exporters = registry.instantiate::<dyn Exporter>().unwrap();
    assert_eq!(exporters.len(), 1);
    assert_eq!(exporters[0].format(), "csv");

    let found = registry.find_extensions::<dyn Exporter>().unwrap();
    assert_eq!(found[0].module_identity().name(), "host");
}
