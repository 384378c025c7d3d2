//! Module loading
//!
//! ```text
//! ModuleLoader::load("storage@1.2.0")
//!     │
//!     ├─► ModuleCatalog::find          (already loaded)
//!     │
//!     └─► ModuleResolveHandler chain   (on a miss)
//!             └─► ModuleResolutionFallback
//!                     └─► ModuleNameIndex ◄── LibraryLoader (base directory scan)
//! ```

pub mod fallback;
pub mod library;
pub mod loader;

pub use fallback::ModuleResolutionFallback;
pub use library::LibraryLoader;
pub use loader::ModuleLoader;
