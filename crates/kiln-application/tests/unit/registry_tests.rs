//! Tests for link-time registration

use kiln_application::registry::{
    ActivatedInstance, ExtensionDeclaration, ExtensionPointEntry, KILN_EXTENSION_POINTS,
    KILN_EXTENSIONS, KILN_MODULES, KILN_TYPES, ModuleEntry, TypeKind, TypeRegistration,
    startup_task_activator,
};
use kiln_application::{
    ExtensionRegistry, ModuleCatalog, ModuleOrigin, ServiceCollection, ServiceProvider,
    StartupTask, TypeFinder,
};
use kiln_domain::{CapabilityKey, ModuleIdentity, Result};
use std::sync::Arc;

#[derive(Default)]
struct LinkedTask;

impl StartupTask for LinkedTask {
    fn execute(&self, _services: &ServiceProvider) -> Result<()> {
        Ok(())
    }
}

trait Formatter: Send {
    fn format(&self, input: &str) -> String;
}

#[derive(Default)]
struct Uppercase;

impl Formatter for Uppercase {
    fn format(&self, input: &str) -> String {
        input.to_uppercase()
    }
}

fn activate_uppercase() -> Result<ActivatedInstance> {
    Ok(ActivatedInstance::new::<dyn Formatter>(Box::new(Uppercase)))
}

#[linkme::distributed_slice(KILN_MODULES)]
static LINKED_TEST_MODULE: ModuleEntry = ModuleEntry {
    name: "linked-test",
    version: "2.1.0",
    description: "Registrations made by the registry tests",
};

#[linkme::distributed_slice(KILN_TYPES)]
static LINKED_TASK: TypeRegistration = TypeRegistration {
    module: "linked-test",
    name: "LinkedTask",
    capability: CapabilityKey::of::<dyn StartupTask>,
    kind: TypeKind::Concrete,
    activate: Some(startup_task_activator::<LinkedTask>),
};

#[linkme::distributed_slice(KILN_EXTENSION_POINTS)]
static FORMATTER_POINT: ExtensionPointEntry = ExtensionPointEntry {
    module: "linked-test",
    name: "formatter",
    interface_type: CapabilityKey::of::<dyn Formatter>,
};

#[linkme::distributed_slice(KILN_EXTENSIONS)]
static UPPERCASE_EXTENSION: ExtensionDeclaration = ExtensionDeclaration {
    module: "linked-undeclared",
    name: "Uppercase",
    extends: CapabilityKey::of::<dyn Formatter>,
    activate: Some(activate_uppercase),
};

#[test]
fn test_linked_catalog_uses_declared_version() {
    let catalog = ModuleCatalog::linked();

    let module = catalog
        .find(&ModuleIdentity::unversioned("linked-test"))
        .expect("linked module present");
    assert_eq!(module.identity().full(), "linked-test@2.1.0");
    assert_eq!(module.origin(), &ModuleOrigin::Linked);
    assert_eq!(module.types().len(), 1);
    assert_eq!(module.extension_points().len(), 1);
}

#[test]
fn test_undeclared_module_gets_default_version() {
    let catalog = ModuleCatalog::linked();

    let module = catalog
        .find(&ModuleIdentity::unversioned("linked-undeclared"))
        .expect("module named by its registrations");
    assert_eq!(module.identity().full(), "linked-undeclared@0.0.0");
    assert_eq!(module.extensions().len(), 1);
}

#[test]
fn test_linked_types_are_discoverable_and_activatable() {
    let finder = TypeFinder::new(Arc::new(ModuleCatalog::linked()));

    let tasks = finder.find::<dyn StartupTask>(true);
    let linked = tasks
        .iter()
        .find(|t| t.name() == "LinkedTask")
        .expect("linked task discovered");
    let task = linked.activate::<dyn StartupTask>().unwrap();

    let provider = ServiceProvider::build(ServiceCollection::new());
    assert!(task.execute(&provider).is_ok());
}

#[test]
fn test_linked_extensions_cross_modules() {
    let finder = TypeFinder::new(Arc::new(ModuleCatalog::linked()));
    let registry = ExtensionRegistry::discover(&finder);

    assert!(registry.validate().is_ok());
    let formatters = registry.instantiate::<dyn Formatter>().unwrap();
    assert_eq!(formatters.len(), 1);
    assert_eq!(formatters[0].format("kiln"), "KILN");
}
