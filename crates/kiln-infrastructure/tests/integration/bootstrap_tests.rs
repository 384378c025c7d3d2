//! Application Bootstrap Tests

use crate::support::{catalog_of, module, task};
use kiln_application::registry::startup_task_activator;
use kiln_application::{ResolverExt, ServiceProvider, StartupTask};
use kiln_domain::Result;
use kiln_infrastructure::{AppConfig, Engine, init_app_with_catalog};
use std::env::consts::DLL_EXTENSION;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

static WARMUPS: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
struct WarmupTask;

impl StartupTask for WarmupTask {
    fn execute(&self, services: &ServiceProvider) -> Result<()> {
        assert!(services.resolve::<Engine>().is_some());
        WARMUPS.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn config_for(dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.modules.directory = Some(dir.path().to_path_buf());
    config
}

#[test]
fn test_context_starts_engine_over_catalog() {
    let dir = TempDir::new().unwrap();
    let catalog = catalog_of(vec![module(
        "warmup@0.3.0",
        vec![task("WarmupTask", startup_task_activator::<WarmupTask>)],
    )]);

    let context = init_app_with_catalog(config_for(&dir), catalog).unwrap();
    assert!(context.singletons().get::<AppConfig>().is_ok());
    assert!(!context.engine().is_started());

    let provider = context.start().unwrap();

    assert_eq!(WARMUPS.load(Ordering::SeqCst), 1);
    assert!(provider.resolve::<Engine>().is_some());
    assert_eq!(context.loader().handler_count(), 1);
}

#[test]
fn test_load_on_start_tolerates_unloadable_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(format!("broken.{DLL_EXTENSION}")), b"junk").unwrap();

    let catalog = catalog_of(vec![module("alpha@1.0.0", Vec::new())]);
    let context = init_app_with_catalog(config_for(&dir), catalog).unwrap();

    assert_eq!(context.catalog().len(), 1);
    assert_eq!(context.fallback().index_builds(), 0);

    context.start().unwrap();
    let module = context.loader().load("alpha@5.0.0").unwrap();
    assert_eq!(module.identity().full(), "alpha@1.0.0");
    assert_eq!(context.fallback().index_builds(), 1);
}
