//! Startup Orchestrator
//!
//! Drives bootstrap in two strictly sequential passes:
//!
//! ```text
//! start()
//!   ├─ configuration pass   discover dyn StartupConfiguration
//!   │                       activate → stable sort by order → configure_services
//!   ├─ ServiceProvider::build
//!   ├─ task pass            discover dyn StartupTask
//!   │                       activate → stable sort by order → execute
//!   └─ install ModuleResolutionFallback on the module loader
//! ```
//!
//! Components are activated fresh on every pass and dropped when it ends.
//! The first failure aborts the pass and is returned as a configuration
//! error naming the component.

use crate::modules::ModuleLoader;
use kiln_application::di::{
    Constructible, ResolverExt, ServiceCollection, ServiceProvider, ServiceScope,
};
use kiln_application::discovery::TypeFinder;
use kiln_application::extension::ExtensionRegistry;
use kiln_application::module::Module;
use kiln_application::ports::{ModuleResolveHandler, StartupConfiguration, StartupTask};
use kiln_application::singleton::SingletonRegistry;
use kiln_domain::capability::CapabilityKey;
use kiln_domain::error::{Error, Result};
use kiln_domain::value_objects::ConfigurationSource;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// A startup component paired with the name it was registered under
type Activated<T> = (&'static str, Box<T>);

/// The bootstrap engine
pub struct Engine {
    finder: TypeFinder,
    singletons: Arc<SingletonRegistry>,
    loader: Arc<ModuleLoader>,
    fallback: Arc<dyn ModuleResolveHandler>,
    provider: OnceLock<Arc<ServiceProvider>>,
}

impl Engine {
    /// Create an engine that has not been started
    pub fn new(
        finder: TypeFinder,
        singletons: Arc<SingletonRegistry>,
        loader: Arc<ModuleLoader>,
        fallback: Arc<dyn ModuleResolveHandler>,
    ) -> Self {
        Self {
            finder,
            singletons,
            loader,
            fallback,
            provider: OnceLock::new(),
        }
    }

    /// Run the configuration pass into `services`
    ///
    /// The engine, the singleton registry, the type finder, the module loader
    /// and the discovered extension registry are registered first; the final
    /// registration is a snapshot of the collection itself.
    pub fn configure_services(
        self: &Arc<Self>,
        services: &mut ServiceCollection,
        config: &ConfigurationSource,
    ) -> Result<()> {
        let extensions = ExtensionRegistry::discover(&self.finder);
        extensions.validate()?;

        // The provider lives inside the engine, so it only holds a weak handle
        // back to it.
        let engine = Arc::downgrade(self);
        services
            .add_transient::<Engine, _>(move |_| {
                engine
                    .upgrade()
                    .ok_or_else(|| Error::not_initialized(std::any::type_name::<Engine>()))
            })
            .add_instance::<SingletonRegistry>(Arc::clone(&self.singletons))
            .add_instance::<TypeFinder>(Arc::new(self.finder.clone()))
            .add_instance::<ModuleLoader>(Arc::clone(&self.loader))
            .add_instance::<ExtensionRegistry>(Arc::new(extensions));

        let components = self.activate_ordered::<dyn StartupConfiguration>(|c| c.order())?;
        info!(count = components.len(), "Running startup configuration pass");

        for (name, component) in &components {
            debug!(component = *name, order = component.order(), "Configuring services");
            component.configure_services(services, config).map_err(|e| {
                Error::configuration_with_source(format!("startup configuration {name} failed"), e)
            })?;
        }

        let snapshot = services.clone();
        services.add_instance::<ServiceCollection>(Arc::new(snapshot));
        Ok(())
    }

    /// Run the task pass against the built provider
    ///
    /// Returns the number of tasks executed.
    pub fn run_startup_tasks(&self) -> Result<usize> {
        let provider = self.provider()?;
        let tasks = self.activate_ordered::<dyn StartupTask>(|t| t.order())?;
        info!(count = tasks.len(), "Running startup tasks");

        for (name, task) in &tasks {
            debug!(task = *name, order = task.order(), "Executing startup task");
            task.execute(&provider).map_err(|e| {
                Error::configuration_with_source(format!("startup task {name} failed"), e)
            })?;
        }
        Ok(tasks.len())
    }

    /// Bootstrap: configure, build the provider, run tasks, install the fallback
    pub fn start(
        self: &Arc<Self>,
        mut services: ServiceCollection,
        config: &ConfigurationSource,
    ) -> Result<Arc<ServiceProvider>> {
        if self.provider.get().is_some() {
            return Err(Error::invalid_argument("engine has already been started"));
        }

        self.configure_services(&mut services, config)?;

        let provider = Arc::new(ServiceProvider::build(services));
        self.provider
            .set(Arc::clone(&provider))
            .map_err(|_| Error::invalid_argument("engine has already been started"))?;
        self.singletons.set::<Engine>(Arc::clone(self))?;
        self.singletons.set::<ServiceProvider>(Arc::clone(&provider))?;

        let tasks = self.run_startup_tasks()?;

        self.loader.add_resolve_handler(Arc::clone(&self.fallback));
        info!(
            registrations = provider.descriptors().len(),
            tasks, "Engine started"
        );
        Ok(provider)
    }

    /// Whether `start` has built the service provider
    pub fn is_started(&self) -> bool {
        self.provider.get().is_some()
    }

    /// The built service provider
    pub fn provider(&self) -> Result<Arc<ServiceProvider>> {
        self.provider
            .get()
            .cloned()
            .ok_or_else(|| Error::not_initialized(CapabilityKey::of::<ServiceProvider>().name()))
    }

    /// Resolve `T` from the built provider
    pub fn resolve<T: ?Sized + 'static>(&self) -> Result<Arc<T>> {
        self.provider()?
            .resolve::<T>()
            .ok_or_else(|| Error::not_initialized(CapabilityKey::of::<T>().name()))
    }

    /// Resolve every registration of `T` from the built provider
    pub fn resolve_all<T: ?Sized + 'static>(&self) -> Result<Vec<Arc<T>>> {
        Ok(self.provider()?.resolve_all::<T>())
    }

    /// Construct `T` from the built provider without registering it
    pub fn resolve_unregistered<T: Constructible>(&self) -> Result<Arc<T>> {
        let provider = self.provider()?;
        kiln_application::di::resolve_unregistered::<T>(&*provider)
    }

    /// Open a resolution scope over the built provider
    pub fn create_scope(&self) -> Result<ServiceScope> {
        Ok(self.provider()?.create_scope())
    }

    /// Type finder used for discovery
    pub fn finder(&self) -> &TypeFinder {
        &self.finder
    }

    /// Modules known to the process
    pub fn modules(&self) -> Vec<Arc<Module>> {
        self.finder.modules()
    }

    /// Process singleton registry
    pub fn singletons(&self) -> &Arc<SingletonRegistry> {
        &self.singletons
    }

    /// Module loader the fallback is installed on
    pub fn loader(&self) -> &Arc<ModuleLoader> {
        &self.loader
    }

    fn activate_ordered<T: ?Sized + 'static>(
        &self,
        order: impl Fn(&T) -> i32,
    ) -> Result<Vec<Activated<T>>> {
        let mut components = Vec::new();
        for discovered in self.finder.find::<T>(true) {
            let component = discovered.activate::<T>()?;
            components.push((discovered.name(), component));
        }
        // Stable: equal orders keep discovery order
        components.sort_by_key(|(_, component)| order(&**component));
        Ok(components)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("modules", &self.finder.catalog().len())
            .field("started", &self.is_started())
            .finish_non_exhaustive()
    }
}
