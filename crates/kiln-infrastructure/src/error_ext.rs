//! Error context for the infrastructure layer
//!
//! Converts errors from the crates this layer drives (`std::fs`, `figment`,
//! `toml`, `tracing-subscriber`, `libloading`) into kiln errors, prefixing a
//! short description of what was being attempted.

use kiln_domain::error::{Error, Result};
use std::fmt;

/// Extension trait turning foreign errors into kiln errors
///
/// ```ignore
/// use kiln_infrastructure::error_ext::ErrorContext;
///
/// std::fs::write(&path, contents).io_context("Failed to write config file")?;
///
/// let library = unsafe { Library::new(&path) }
///     .module_context(&shown, "failed to open library")?;
/// ```
pub trait ErrorContext<T> {
    /// Wrap the error as an infrastructure error
    fn context<C: fmt::Display>(self, context: C) -> Result<T>;

    /// Wrap the error as an I/O error
    fn io_context<C: fmt::Display>(self, context: C) -> Result<T>;

    /// Wrap the error as a configuration error
    fn config_context<C: fmt::Display>(self, context: C) -> Result<T>;

    /// Report the error as a failure to load the module library at `path`
    fn module_context<C: fmt::Display>(self, path: &str, context: C) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|err| Error::infrastructure_with_source(describe(&context, &err), err))
    }

    fn io_context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|err| Error::io_with_source(describe(&context, &err), err))
    }

    fn config_context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|err| Error::configuration_with_source(describe(&context, &err), err))
    }

    fn module_context<C: fmt::Display>(self, path: &str, context: C) -> Result<T> {
        // `ModuleLoad` carries no source: the library error is flattened into
        // the message so it survives a log line on its own.
        self.map_err(|err| Error::module_load(path, describe(&context, &err)))
    }
}

fn describe(context: &impl fmt::Display, err: &impl fmt::Display) -> String {
    format!("{context}: {err}")
}
