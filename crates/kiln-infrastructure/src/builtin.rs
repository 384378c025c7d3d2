//! Core module
//!
//! Startup components every host gets by linking this crate: the settings
//! are registered as a [`ConfigurationSource`] before any other configuration
//! runs, and the module inventory is logged after every other task.

use crate::constants::{CORE_CONFIGURATION_ORDER, CORE_MODULE_NAME, MODULE_INVENTORY_ORDER};
use kiln_application::di::{ResolverExt, ServiceCollection, ServiceProvider};
use kiln_application::discovery::TypeFinder;
use kiln_application::module::ModuleState;
use kiln_application::ports::{StartupConfiguration, StartupTask};
use kiln_application::registry::{
    KILN_MODULES, KILN_TYPES, ModuleEntry, TypeKind, TypeRegistration,
    startup_configuration_activator, startup_task_activator,
};
use kiln_domain::capability::CapabilityKey;
use kiln_domain::constants::KILN_CORE_VERSION;
use kiln_domain::error::{Error, Result};
use kiln_domain::value_objects::ConfigurationSource;
use std::sync::Arc;
use tracing::{info, warn};

#[linkme::distributed_slice(KILN_MODULES)]
static CORE_MODULE: ModuleEntry = ModuleEntry {
    name: CORE_MODULE_NAME,
    version: KILN_CORE_VERSION,
    description: "Engine startup components",
};

#[linkme::distributed_slice(KILN_TYPES)]
static CORE_SERVICES: TypeRegistration = TypeRegistration {
    module: CORE_MODULE_NAME,
    name: "CoreServices",
    capability: CapabilityKey::of::<dyn StartupConfiguration>,
    kind: TypeKind::Concrete,
    activate: Some(startup_configuration_activator::<CoreServices>),
};

#[linkme::distributed_slice(KILN_TYPES)]
static MODULE_INVENTORY: TypeRegistration = TypeRegistration {
    module: CORE_MODULE_NAME,
    name: "ModuleInventoryTask",
    capability: CapabilityKey::of::<dyn StartupTask>,
    kind: TypeKind::Concrete,
    activate: Some(startup_task_activator::<ModuleInventoryTask>),
};

/// Declaration of the core module
pub fn core_module() -> &'static ModuleEntry {
    &CORE_MODULE
}

/// Registers the resolved settings
#[derive(Debug, Default)]
pub struct CoreServices;

impl StartupConfiguration for CoreServices {
    fn order(&self) -> i32 {
        CORE_CONFIGURATION_ORDER
    }

    fn configure_services(
        &self,
        services: &mut ServiceCollection,
        config: &ConfigurationSource,
    ) -> Result<()> {
        services.add_instance::<ConfigurationSource>(Arc::new(config.clone()));
        Ok(())
    }
}

/// Logs every module known once startup is otherwise complete
#[derive(Debug, Default)]
pub struct ModuleInventoryTask;

impl StartupTask for ModuleInventoryTask {
    fn order(&self) -> i32 {
        MODULE_INVENTORY_ORDER
    }

    fn execute(&self, services: &ServiceProvider) -> Result<()> {
        let finder = services
            .resolve::<TypeFinder>()
            .ok_or_else(|| Error::not_initialized(CapabilityKey::of::<TypeFinder>().name()))?;

        for module in finder.modules() {
            match module.state() {
                ModuleState::Ready => info!(
                    module = %module.identity(),
                    origin = ?module.origin(),
                    types = module.types().len(),
                    extensions = module.extensions().len(),
                    "Module available"
                ),
                ModuleState::Faulted(reason) => warn!(
                    module = %module.identity(),
                    reason = %reason,
                    "Module faulted"
                ),
            }
        }
        Ok(())
    }
}
