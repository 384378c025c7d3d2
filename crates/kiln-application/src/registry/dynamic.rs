//! Dynamic module ABI
//!
//! `linkme` slices only see code linked into the host binary. A library file
//! loaded at runtime instead exports a [`ModuleDeclaration`] under the
//! `KILN_MODULE` symbol (see [`export_module!`](crate::export_module)). The
//! host reads the declaration, checks the core version and calls `register`
//! with a [`ModuleRegistrar`].
//!
//! Libraries must be built with the same toolchain and the same `kiln`
//! version as the host: registrations cross the boundary as Rust types.
//! Each library still links its own copy of the kiln crates and of std, so
//! capabilities are matched by type name (see
//! [`CapabilityKey`](kiln_domain::capability::CapabilityKey)) and panics are
//! caught on the library side of the boundary.

use super::extensions::{ExtensionDeclaration, ExtensionPointEntry};
use super::types::TypeRegistration;
use crate::module::{Module, ModuleOrigin, ModuleState};
use kiln_domain::value_objects::ModuleIdentity;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Registration entry point of a module library
///
/// Returns the panic message if the module's registration panicked.
pub type RegisterFn = fn(&mut ModuleRegistrar) -> Result<(), String>;

/// Declaration exported by a dynamic module
#[derive(Debug, Clone, Copy)]
pub struct ModuleDeclaration {
    /// `kiln` core version the module was built against
    pub core_version: &'static str,
    /// Short module name
    pub name: &'static str,
    /// Module version
    pub version: &'static str,
    /// Registration entry point, wrapped by [`guard_register`]
    pub register: RegisterFn,
}

impl ModuleDeclaration {
    /// Identity declared by the module
    pub fn identity(&self) -> ModuleIdentity {
        ModuleIdentity::new(self.name, self.version)
    }
}

/// Collects the registrations of one module
///
/// Used by dynamic modules from their `register` function, and by hosts and
/// tests to assemble modules in memory.
#[derive(Debug)]
pub struct ModuleRegistrar {
    identity: ModuleIdentity,
    types: Vec<TypeRegistration>,
    extension_points: Vec<ExtensionPointEntry>,
    extensions: Vec<ExtensionDeclaration>,
}

impl ModuleRegistrar {
    /// Create a registrar for the module `identity`
    pub fn new(identity: ModuleIdentity) -> Self {
        Self {
            identity,
            types: Vec::new(),
            extension_points: Vec::new(),
            extensions: Vec::new(),
        }
    }

    /// Identity of the module being registered
    pub fn identity(&self) -> &ModuleIdentity {
        &self.identity
    }

    /// Register a type implementing a capability
    pub fn register_type(&mut self, registration: TypeRegistration) -> &mut Self {
        self.types.push(registration);
        self
    }

    /// Register an extension point owned by this module
    pub fn register_extension_point(&mut self, point: ExtensionPointEntry) -> &mut Self {
        self.extension_points.push(point);
        self
    }

    /// Register an extension declaration
    pub fn register_extension(&mut self, declaration: ExtensionDeclaration) -> &mut Self {
        self.extensions.push(declaration);
        self
    }

    /// Finish registration as a ready module
    pub fn into_module(self, origin: ModuleOrigin) -> Module {
        Module::new(
            self.identity,
            origin,
            ModuleState::Ready,
            self.types,
            self.extension_points,
            self.extensions,
        )
    }

    /// Finish registration as a faulted module
    ///
    /// Partial registrations are discarded; the module stays visible in the
    /// catalog but discovery skips it.
    pub fn into_faulted(self, origin: ModuleOrigin, reason: String) -> Module {
        Module::new(
            self.identity,
            origin,
            ModuleState::Faulted(reason),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
    }
}

/// Run a module's `register` function, catching a panic
///
/// Must run inside the library: a panic unwinding out of a library into the
/// host crosses two std runtimes and aborts the process. `export_module!`
/// wraps the module's function with this.
pub fn guard_register(
    registrar: &mut ModuleRegistrar,
    register: fn(&mut ModuleRegistrar),
) -> Result<(), String> {
    panic::catch_unwind(AssertUnwindSafe(|| register(registrar)))
        .map_err(|payload| panic_message(payload.as_ref()))
}

/// Message carried by a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "module registration panicked".to_string()
    }
}

/// Export a module declaration from a `cdylib`
///
/// ```ignore
/// fn register(registrar: &mut ModuleRegistrar) {
///     registrar.register_type(TypeRegistration { .. });
/// }
///
/// kiln_application::export_module!("storage", "1.2.0", register);
/// ```
#[macro_export]
macro_rules! export_module {
    ($name:expr, $version:expr, $register:path) => {
        #[unsafe(no_mangle)]
        pub static KILN_MODULE: $crate::registry::ModuleDeclaration =
            $crate::registry::ModuleDeclaration {
                core_version: $crate::kiln_domain::constants::KILN_CORE_VERSION,
                name: $name,
                version: $version,
                register: {
                    fn guarded(
                        registrar: &mut $crate::registry::ModuleRegistrar,
                    ) -> ::std::result::Result<(), ::std::string::String> {
                        $crate::registry::guard_register(registrar, $register)
                    }
                    guarded
                },
            };
    };
}
