//! Module library whose registration panics halfway through

use kiln_application::registry::{
    ModuleRegistrar, TypeKind, TypeRegistration, startup_task_activator,
};
use kiln_application::{ServiceProvider, StartupTask};
use kiln_domain::{CapabilityKey, Result};

#[derive(Default)]
struct NeverRunTask;

impl StartupTask for NeverRunTask {
    fn execute(&self, _services: &ServiceProvider) -> Result<()> {
        Ok(())
    }
}

fn register(registrar: &mut ModuleRegistrar) {
    registrar.register_type(TypeRegistration {
        module: "panicking-module",
        name: "NeverRunTask",
        capability: CapabilityKey::of::<dyn StartupTask>,
        kind: TypeKind::Concrete,
        activate: Some(startup_task_activator::<NeverRunTask>),
    });
    panic!("panicking-module refuses to finish registering");
}

kiln_application::export_module!("panicking-module", "1.0.0", register);
