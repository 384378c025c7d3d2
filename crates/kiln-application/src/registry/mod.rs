//! Module Registry System
//!
//! Link-time registration of modules, types, extension points and extension
//! declarations. Modules linked into the binary submit entries to `linkme`
//! distributed slices; library files loaded at runtime export a
//! [`ModuleDeclaration`] whose `register` function fills a
//! [`ModuleRegistrar`] with the same entry types.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Type Registration Flow                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  1. Module defines:   #[linkme::distributed_slice(KILN_TYPES)]  │
//! │                       static TASK: TypeRegistration = ...       │
//! │                              ↓                                  │
//! │  2. Catalog groups:   ModuleCatalog::linked()                   │
//! │                              ↓                                  │
//! │  3. Finder queries:   finder.find::<dyn StartupTask>(true)      │
//! │                              ↓                                  │
//! │  4. Engine activates: discovered.activate::<dyn StartupTask>()  │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use kiln_application::registry::{KILN_TYPES, TypeKind, TypeRegistration, startup_task_activator};
//!
//! #[linkme::distributed_slice(KILN_TYPES)]
//! static WARMUP_TASK: TypeRegistration = TypeRegistration {
//!     module: "storage",
//!     name: "WarmupTask",
//!     capability: CapabilityKey::of::<dyn StartupTask>,
//!     kind: TypeKind::Concrete,
//!     activate: Some(startup_task_activator::<WarmupTask>),
//! };
//! ```

pub mod dynamic;
pub mod extensions;
pub mod modules;
pub mod types;

pub use dynamic::{ModuleDeclaration, ModuleRegistrar, RegisterFn, guard_register, panic_message};
pub use extensions::{
    ExtensionDeclaration, ExtensionPointEntry, KILN_EXTENSION_POINTS, KILN_EXTENSIONS,
};
pub use modules::{KILN_MODULES, ModuleEntry};
pub use types::{
    ActivatedInstance, Activator, KILN_TYPES, TypeKind, TypeRegistration,
    startup_configuration_activator, startup_task_activator,
};
