//! Shared fixtures: in-memory modules, module libraries and an engine over them

use kiln_application::registry::{Activator, ModuleRegistrar, TypeKind, TypeRegistration};
use kiln_application::{
    Module, ModuleCatalog, ModuleOrigin, SingletonRegistry, StartupConfiguration, StartupTask,
    TypeFinder,
};
use kiln_domain::{CapabilityKey, ModuleIdentity};
use kiln_infrastructure::{Engine, LibraryLoader, ModuleLoader, ModuleResolutionFallback};
use std::cell::RefCell;
use std::env::consts::{DLL_EXTENSION, DLL_PREFIX};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, OnceLock};

/// Workspace members under `fixtures/` built as module libraries
const FIXTURE_PACKAGES: [&str; 3] = [
    "kiln-fixture-greeter",
    "kiln-fixture-panicking",
    "kiln-fixture-mismatched",
];

static FIXTURE_LIBRARIES: OnceLock<Result<PathBuf, String>> = OnceLock::new();

thread_local! {
    static EXECUTED: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Record that a component ran on this test's thread
pub fn record(entry: impl Into<String>) {
    EXECUTED.with(|executed| executed.borrow_mut().push(entry.into()));
}

/// Components recorded on this test's thread, clearing the record
pub fn take_executed() -> Vec<String> {
    EXECUTED.with(|executed| executed.borrow_mut().drain(..).collect())
}

pub fn task(name: &'static str, activate: Activator) -> TypeRegistration {
    TypeRegistration {
        module: "fixtures",
        name,
        capability: CapabilityKey::of::<dyn StartupTask>,
        kind: TypeKind::Concrete,
        activate: Some(activate),
    }
}

pub fn configuration(name: &'static str, activate: Activator) -> TypeRegistration {
    TypeRegistration {
        module: "fixtures",
        name,
        capability: CapabilityKey::of::<dyn StartupConfiguration>,
        kind: TypeKind::Concrete,
        activate: Some(activate),
    }
}

pub fn module(identity: &str, types: Vec<TypeRegistration>) -> Arc<Module> {
    let mut registrar = ModuleRegistrar::new(ModuleIdentity::parse(identity).unwrap());
    for registration in types {
        registrar.register_type(registration);
    }
    Arc::new(registrar.into_module(ModuleOrigin::Host))
}

pub fn catalog_of(modules: Vec<Arc<Module>>) -> ModuleCatalog {
    let catalog = ModuleCatalog::new();
    for m in modules {
        catalog.attach(m);
    }
    catalog
}

pub fn catalog_with(modules: Vec<Arc<Module>>) -> Arc<ModuleCatalog> {
    Arc::new(catalog_of(modules))
}

pub fn fallback_over(
    catalog: &Arc<ModuleCatalog>,
    directory: &Path,
) -> Arc<ModuleResolutionFallback> {
    let libraries = Arc::new(LibraryLoader::new(Arc::clone(catalog)));
    Arc::new(ModuleResolutionFallback::new(libraries, directory))
}

pub fn engine_over(catalog: Arc<ModuleCatalog>, directory: &Path) -> Arc<Engine> {
    let fallback = fallback_over(&catalog, directory);
    Arc::new(Engine::new(
        TypeFinder::new(Arc::clone(&catalog)),
        Arc::new(SingletonRegistry::new()),
        Arc::new(ModuleLoader::new(catalog)),
        fallback,
    ))
}

pub fn engine_with(types: Vec<TypeRegistration>, directory: &Path) -> Arc<Engine> {
    engine_over(catalog_with(vec![module("fixtures@1.0.0", types)]), directory)
}

/// Copy the fixture library `library` (e.g. `kiln_fixture_greeter`) into
/// `directory`, returning the installed path
pub fn install_fixture(library: &str, directory: &Path) -> PathBuf {
    let built = match FIXTURE_LIBRARIES.get_or_init(build_fixture_libraries) {
        Ok(dir) => dir,
        Err(e) => panic!("{e}"),
    };
    let file = format!("{DLL_PREFIX}{library}.{DLL_EXTENSION}");
    let installed = directory.join(&file);
    std::fs::copy(built.join(&file), &installed).unwrap();
    installed
}

// Built once per test binary in its own target directory, so the outer
// cargo invocation's build lock is never contended.
fn build_fixture_libraries() -> Result<PathBuf, String> {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../Cargo.toml");
    let target_dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join("module-fixtures");
    let cargo = std::env::var_os("CARGO").unwrap_or_else(|| "cargo".into());

    let mut command = Command::new(cargo);
    command
        .arg("build")
        .arg("--manifest-path")
        .arg(&manifest)
        .arg("--target-dir")
        .arg(&target_dir);
    for package in FIXTURE_PACKAGES {
        command.args(["-p", package]);
    }
    let profile = if cfg!(debug_assertions) {
        "debug"
    } else {
        command.arg("--release");
        "release"
    };

    let output = command
        .output()
        .map_err(|e| format!("failed to run cargo for fixture modules: {e}"))?;
    if !output.status.success() {
        return Err(format!(
            "building fixture modules failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    Ok(target_dir.join(profile))
}
