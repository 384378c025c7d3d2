//! Application bootstrap
//!
//! Provides the composition root: every process-wide collaborator is created
//! here, owned by [`AppContext`] and shared by `Arc`.
//!
//! ```text
//! AppConfig → ModuleCatalog (linked + module libraries)
//!                  │
//!                  ├─► TypeFinder ─► Engine ─► ServiceProvider
//!                  ├─► ModuleLoader ◄── ModuleResolutionFallback (after start)
//!                  └─► SingletonRegistry
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let context = init_app(ConfigLoader::new().load()?)?;
//! let provider = context.start()?;
//! let clock = provider.resolve::<dyn Clock>();
//! ```

use crate::builtin;
use crate::config::AppConfig;
use crate::engine::Engine;
use crate::modules::{LibraryLoader, ModuleLoader, ModuleResolutionFallback};
use kiln_application::di::{ServiceCollection, ServiceProvider};
use kiln_application::discovery::TypeFinder;
use kiln_application::module::ModuleCatalog;
use kiln_application::ports::ModuleResolveHandler;
use kiln_application::singleton::SingletonRegistry;
use kiln_domain::error::Result;
use std::sync::Arc;
use tracing::info;

/// Application context owning the engine and its collaborators
#[derive(Debug)]
pub struct AppContext {
    /// Application configuration
    pub config: Arc<AppConfig>,

    catalog: Arc<ModuleCatalog>,
    singletons: Arc<SingletonRegistry>,
    loader: Arc<ModuleLoader>,
    fallback: Arc<ModuleResolutionFallback>,
    engine: Arc<Engine>,
}

impl AppContext {
    /// Run bootstrap and return the built service provider
    pub fn start(&self) -> Result<Arc<ServiceProvider>> {
        self.engine
            .start(ServiceCollection::new(), &self.config.configuration_source())
    }

    /// Process module catalog
    pub fn catalog(&self) -> Arc<ModuleCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Process singleton registry
    pub fn singletons(&self) -> Arc<SingletonRegistry> {
        Arc::clone(&self.singletons)
    }

    /// Module loader
    pub fn loader(&self) -> Arc<ModuleLoader> {
        Arc::clone(&self.loader)
    }

    /// Module resolution fallback
    pub fn fallback(&self) -> Arc<ModuleResolutionFallback> {
        Arc::clone(&self.fallback)
    }

    /// Startup engine
    pub fn engine(&self) -> Arc<Engine> {
        Arc::clone(&self.engine)
    }
}

/// Initialize the application context over the linked modules
pub fn init_app(config: AppConfig) -> Result<AppContext> {
    init_app_with_catalog(config, ModuleCatalog::linked())
}

/// Initialize the application context over `catalog`
///
/// With `modules.load_on_start` set, every module library in the base
/// directory is loaded before the engine is created so its startup
/// components take part in bootstrap.
pub fn init_app_with_catalog(config: AppConfig, catalog: ModuleCatalog) -> Result<AppContext> {
    let config = Arc::new(config);
    let catalog = Arc::new(catalog);
    let singletons = Arc::new(SingletonRegistry::new());

    let libraries = Arc::new(
        LibraryLoader::new(Arc::clone(&catalog))
            .with_core_version_check(config.modules.core_version_check),
    );
    let base_directory = config.modules.base_directory();
    if config.modules.load_on_start {
        let loaded = libraries.load_directory(&base_directory);
        info!(
            loaded = loaded.len(),
            directory = %base_directory.display(),
            "Module libraries loaded"
        );
    }

    let loader = Arc::new(ModuleLoader::new(Arc::clone(&catalog)));
    let fallback = Arc::new(ModuleResolutionFallback::new(libraries, base_directory));
    let handler: Arc<dyn ModuleResolveHandler> = fallback.clone();
    let engine = Arc::new(Engine::new(
        TypeFinder::new(Arc::clone(&catalog)),
        Arc::clone(&singletons),
        Arc::clone(&loader),
        handler,
    ));

    singletons.set::<AppConfig>(Arc::clone(&config))?;
    info!(
        core = builtin::core_module().version,
        modules = catalog.len(),
        "Application context initialized"
    );

    Ok(AppContext {
        config,
        catalog,
        singletons,
        loader,
        fallback,
        engine,
    })
}
