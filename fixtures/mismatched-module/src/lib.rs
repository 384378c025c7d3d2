//! Module library declaring a core version the host does not have
//!
//! Written out by hand instead of through `export_module!`, which always
//! stamps the core version the library was compiled against.

use kiln_application::registry::{ModuleDeclaration, ModuleRegistrar, guard_register};

#[unsafe(no_mangle)]
pub static KILN_MODULE: ModuleDeclaration = ModuleDeclaration {
    core_version: "0.0.0-mismatched",
    name: "mismatched-module",
    version: "1.0.0",
    register: guarded,
};

fn guarded(registrar: &mut ModuleRegistrar) -> Result<(), String> {
    guard_register(registrar, register)
}

fn register(_registrar: &mut ModuleRegistrar) {}
