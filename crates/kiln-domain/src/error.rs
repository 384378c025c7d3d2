//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Kiln bootstrap engine
#[derive(Error, Debug)]
pub enum Error {
    /// A singleton was requested before any instance was set for it
    #[error("Not initialized: no instance registered for {capability}")]
    NotInitialized {
        /// Name of the capability type that was requested
        capability: String,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// No constructor of a type could have all of its parameters resolved
    #[error("Unsatisfiable dependency: cannot construct {type_name}: {message}")]
    UnsatisfiableDependency {
        /// Type that was being constructed
        type_name: String,
        /// What went wrong
        message: String,
        /// Failure of the last attempted constructor
        #[source]
        source: Option<Box<Error>>,
    },

    /// A startup configuration or startup task failed to activate or run
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The module resolution fallback found no match
    #[error("Module unresolved: {identity}")]
    ModuleUnresolved {
        /// Identity that was requested
        identity: String,
    },

    /// A library file could not be loaded as a module
    #[error("Failed to load module from {path}: {message}")]
    ModuleLoad {
        /// Library path
        path: String,
        /// Description of the failure
        message: String,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

// Registry and resolution error creation methods
impl Error {
    /// Create a not-initialized error for a capability
    pub fn not_initialized<S: Into<String>>(capability: S) -> Self {
        Self::NotInitialized {
            capability: capability.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an unsatisfiable dependency error without a cause
    pub fn unsatisfiable<T: Into<String>, S: Into<String>>(type_name: T, message: S) -> Self {
        Self::UnsatisfiableDependency {
            type_name: type_name.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an unsatisfiable dependency error carrying the last failure
    pub fn unsatisfiable_with_cause<T: Into<String>, S: Into<String>>(
        type_name: T,
        message: S,
        cause: Error,
    ) -> Self {
        Self::UnsatisfiableDependency {
            type_name: type_name.into(),
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Module error creation methods
impl Error {
    /// Create a module-unresolved error
    pub fn module_unresolved<S: Into<String>>(identity: S) -> Self {
        Self::ModuleUnresolved {
            identity: identity.into(),
        }
    }

    /// Create a module load error
    pub fn module_load<P: Into<String>, S: Into<String>>(path: P, message: S) -> Self {
        Self::ModuleLoad {
            path: path.into(),
            message: message.into(),
        }
    }
}

// I/O and infrastructure error creation methods
impl Error {
    /// Create an I/O error wrapping its cause
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an infrastructure error wrapping its cause
    pub fn infrastructure_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Classification helpers
impl Error {
    /// Whether this error means a singleton was missing
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Self::NotInitialized { .. })
    }

    /// Whether this error is a configuration failure
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Whether this error is an unsatisfiable dependency
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, Self::UnsatisfiableDependency { .. })
    }
}
