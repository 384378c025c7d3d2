//! # Kiln Domain Layer
//!
//! Core types shared by every layer of the bootstrap engine.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`capability`] | Identity of capability types (`CapabilityKey`) |
//! | [`constants`] | Engine-wide constants (core version, export symbol) |
//! | [`error`] | Error taxonomy and `Result` alias |
//! | [`value_objects`] | Module identities and configuration sources |
//!
//! This crate has no knowledge of discovery, containers or dynamic loading.

pub mod capability;
pub mod constants;
pub mod error;
pub mod value_objects;

pub use capability::CapabilityKey;
pub use error::{Error, Result};
pub use value_objects::{ConfigurationSource, ModuleIdentity};
