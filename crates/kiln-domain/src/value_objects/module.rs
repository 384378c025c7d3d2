//! Module identity
//!
//! A full identity has the form `name@version`; a bare `name` is also
//! accepted. The short name is what the fallback index is keyed by.

use crate::constants::MODULE_IDENTITY_SEPARATOR;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Identity of a loaded or requested module
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleIdentity {
    name: String,
    version: Option<String>,
}

impl ModuleIdentity {
    /// Create an identity from a short name and version
    pub fn new<N: Into<String>, V: Into<String>>(name: N, version: V) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }

    /// Create an identity with no version
    pub fn unversioned<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// Parse `name@version` or `name`
    pub fn parse(identity: &str) -> Result<Self> {
        let identity = identity.trim();
        let (name, version) = match identity.split_once(MODULE_IDENTITY_SEPARATOR) {
            Some((name, version)) => (name.trim(), Some(version.trim())),
            None => (identity, None),
        };

        if name.is_empty() {
            return Err(Error::invalid_argument(format!(
                "module identity '{identity}' has an empty name"
            )));
        }
        if version.is_some_and(str::is_empty) {
            return Err(Error::invalid_argument(format!(
                "module identity '{identity}' has an empty version"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            version: version.map(str::to_string),
        })
    }

    /// Short name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version, if declared
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Full identity string
    pub fn full(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}{}{}", self.name, MODULE_IDENTITY_SEPARATOR, version),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for ModuleIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
