//! Greeter module library
//!
//! Loaded from disk by the `kiln-infrastructure` integration tests. Registers
//! a startup configuration that adds a greeting service and a startup task
//! that counts its runs in the host's `AtomicUsize` service.

use kiln_application::registry::{
    ModuleRegistrar, TypeKind, TypeRegistration, startup_configuration_activator,
    startup_task_activator,
};
use kiln_application::{
    ResolverExt, ServiceCollection, ServiceProvider, StartupConfiguration, StartupTask,
};
use kiln_domain::{CapabilityKey, ConfigurationSource, Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const MODULE_NAME: &str = "greeter-module";

#[derive(Default)]
struct GreeterConfiguration;

impl StartupConfiguration for GreeterConfiguration {
    fn order(&self) -> i32 {
        10
    }

    fn configure_services(
        &self,
        services: &mut ServiceCollection,
        _config: &ConfigurationSource,
    ) -> Result<()> {
        services.add_instance::<String>(Arc::new(format!("hello from {MODULE_NAME}")));
        Ok(())
    }
}

#[derive(Default)]
struct GreeterTask;

impl StartupTask for GreeterTask {
    fn execute(&self, services: &ServiceProvider) -> Result<()> {
        let runs = services
            .resolve::<AtomicUsize>()
            .ok_or_else(|| Error::not_initialized(std::any::type_name::<AtomicUsize>()))?;
        runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn register(registrar: &mut ModuleRegistrar) {
    registrar
        .register_type(TypeRegistration {
            module: MODULE_NAME,
            name: "GreeterConfiguration",
            capability: CapabilityKey::of::<dyn StartupConfiguration>,
            kind: TypeKind::Concrete,
            activate: Some(startup_configuration_activator::<GreeterConfiguration>),
        })
        .register_type(TypeRegistration {
            module: MODULE_NAME,
            name: "GreeterTask",
            capability: CapabilityKey::of::<dyn StartupTask>,
            kind: TypeKind::Concrete,
            activate: Some(startup_task_activator::<GreeterTask>),
        });
}

kiln_application::export_module!("greeter-module", "0.4.0", register);
