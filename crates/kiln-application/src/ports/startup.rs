//! Startup capabilities
//!
//! Implemented by modules that want to take part in bootstrap. Both are
//! discovered through the Type Finder, activated fresh for every run, sorted
//! ascending by [`order`](StartupTask::order) and dropped once they have run.

use crate::di::{ServiceCollection, ServiceProvider};
use kiln_domain::constants::DEFAULT_COMPONENT_ORDER;
use kiln_domain::error::Result;
use kiln_domain::value_objects::ConfigurationSource;

/// A unit that registers services during the configuration pass
pub trait StartupConfiguration: Send + Sync {
    /// Position in the configuration pass (ascending)
    fn order(&self) -> i32 {
        DEFAULT_COMPONENT_ORDER
    }

    /// Register services into the registration target
    fn configure_services(
        &self,
        services: &mut ServiceCollection,
        config: &ConfigurationSource,
    ) -> Result<()>;
}

/// A unit of one-time initialization run after services are registered
pub trait StartupTask: Send + Sync {
    /// Position in the startup-task pass (ascending)
    fn order(&self) -> i32 {
        DEFAULT_COMPONENT_ORDER
    }

    /// Run the task against the built service provider
    fn execute(&self, services: &ServiceProvider) -> Result<()>;
}
