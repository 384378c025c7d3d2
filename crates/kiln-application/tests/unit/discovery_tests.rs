//! Tests for the Type Finder

use kiln_application::registry::{
    ActivatedInstance, ModuleRegistrar, TypeKind, TypeRegistration,
};
use kiln_application::{ModuleCatalog, ModuleOrigin, TypeFinder};
use kiln_domain::{CapabilityKey, ModuleIdentity, Result};
use std::sync::Arc;

trait Greeter: Send {
    fn greet(&self) -> String;
}

trait Unrelated {}

#[derive(Default)]
struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

fn activate_english() -> Result<ActivatedInstance> {
    Ok(ActivatedInstance::new::<dyn Greeter>(Box::new(English)))
}

fn activate_wrong_shape() -> Result<ActivatedInstance> {
    Ok(ActivatedInstance::new(Box::new(42_u32)))
}

fn greeter(name: &'static str, kind: TypeKind) -> TypeRegistration {
    TypeRegistration {
        module: "greetings",
        name,
        capability: CapabilityKey::of::<dyn Greeter>,
        kind,
        activate: Some(activate_english),
    }
}

fn module(name: &str, types: Vec<TypeRegistration>) -> Arc<kiln_application::Module> {
    let mut registrar = ModuleRegistrar::new(ModuleIdentity::new(name, "1.0.0"));
    for registration in types {
        registrar.register_type(registration);
    }
    Arc::new(registrar.into_module(ModuleOrigin::Host))
}

fn finder_with(modules: Vec<Arc<kiln_application::Module>>) -> TypeFinder {
    let catalog = Arc::new(ModuleCatalog::new());
    for m in modules {
        catalog.attach(m);
    }
    TypeFinder::new(catalog)
}

#[test]
fn test_finds_implementations_across_modules_in_order() {
    let finder = finder_with(vec![
        module("alpha", vec![greeter("AlphaGreeter", TypeKind::Concrete)]),
        module("beta", vec![
            greeter("BetaGreeter", TypeKind::Concrete),
            greeter("GammaGreeter", TypeKind::Concrete),
        ]),
    ]);

    let names: Vec<&str> = finder
        .find::<dyn Greeter>(true)
        .iter()
        .map(|t| t.name())
        .collect();
    assert_eq!(names, vec!["AlphaGreeter", "BetaGreeter", "GammaGreeter"]);
}

#[test]
fn test_only_concrete_excludes_abstract_types() {
    let finder = finder_with(vec![module("alpha", vec![
        greeter("BaseGreeter", TypeKind::Abstract),
        greeter("English", TypeKind::Concrete),
    ])]);

    assert_eq!(finder.find::<dyn Greeter>(true).len(), 1);
    assert_eq!(finder.find::<dyn Greeter>(false).len(), 2);
}

#[test]
fn test_unrelated_capability_finds_nothing() {
    let finder = finder_with(vec![module("alpha", vec![greeter(
        "English",
        TypeKind::Concrete,
    )])]);

    assert!(finder.find::<dyn Unrelated>(false).is_empty());
}

#[test]
fn test_faulted_module_is_skipped_but_listed() {
    let faulted = ModuleRegistrar::new(ModuleIdentity::new("broken", "0.1.0")).into_faulted(
        ModuleOrigin::Host,
        "registration panicked".to_string(),
    );
    let finder = finder_with(vec![
        Arc::new(faulted),
        module("alpha", vec![greeter("English", TypeKind::Concrete)]),
    ]);

    assert_eq!(finder.modules().len(), 2);
    assert_eq!(finder.find::<dyn Greeter>(true).len(), 1);
}

#[test]
fn test_discovery_sees_modules_attached_later() {
    let finder = finder_with(Vec::new());
    assert!(finder.find::<dyn Greeter>(true).is_empty());

    finder
        .catalog()
        .attach(module("late", vec![greeter("LateGreeter", TypeKind::Concrete)]));

    assert_eq!(finder.find::<dyn Greeter>(true).len(), 1);
}

#[test]
fn test_activate_produces_boxed_capability() {
    let finder = finder_with(vec![module("alpha", vec![greeter(
        "English",
        TypeKind::Concrete,
    )])]);

    let discovered = &finder.find::<dyn Greeter>(true)[0];
    let instance = discovered.activate::<dyn Greeter>().unwrap();
    assert_eq!(instance.greet(), "hello");
    assert_eq!(discovered.module_identity().full(), "alpha@1.0.0");
}

#[test]
fn test_activate_wrong_shape_is_configuration_error() {
    let mut registration = greeter("Liar", TypeKind::Concrete);
    registration.activate = Some(activate_wrong_shape);
    let finder = finder_with(vec![module("alpha", vec![registration])]);

    let err = finder.find::<dyn Greeter>(true)[0]
        .activate::<dyn Greeter>()
        .err()
        .expect("wrong shape");
    assert!(err.is_configuration());
    assert!(err.to_string().contains("Liar"));
}

#[test]
fn test_activate_without_activator_names_type() {
    let mut registration = greeter("Manual", TypeKind::Concrete);
    registration.activate = None;
    let finder = finder_with(vec![module("alpha", vec![registration])]);

    let err = finder.find::<dyn Greeter>(true)[0]
        .activate::<dyn Greeter>()
        .err()
        .expect("no activator");
    assert!(err.to_string().contains("Manual"));
}
