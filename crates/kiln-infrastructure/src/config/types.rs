//! Configuration types

use crate::constants::DEFAULT_LOG_LEVEL;
use kiln_domain::value_objects::ConfigurationSource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Module loading configuration
    pub modules: ModulesConfig,

    /// Free-form settings handed to startup configurations
    pub settings: Map<String, Value>,
}

impl AppConfig {
    /// Settings as the source handed to the configuration pass
    pub fn configuration_source(&self) -> ConfigurationSource {
        ConfigurationSource::from_map(self.settings.clone())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,

    /// Log to a daily-rolling file in addition to stdout
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

/// Module loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    /// Directory scanned for module libraries; defaults to the executable's directory
    pub directory: Option<PathBuf>,

    /// Load every module library in the directory before startup
    pub load_on_start: bool,

    /// Reject libraries built against a different core version
    pub core_version_check: bool,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            directory: None,
            load_on_start: true,
            core_version_check: true,
        }
    }
}

impl ModulesConfig {
    /// Directory module libraries are loaded from
    pub fn base_directory(&self) -> PathBuf {
        if let Some(directory) = &self.directory {
            return directory.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
