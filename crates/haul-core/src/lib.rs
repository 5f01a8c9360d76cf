//! Core types for haul.
//!
//! This crate holds everything needed to publish a build artifact short of
//! talking to a real bucket: request validation, object key derivation,
//! upload progress tracking, the [`store::ObjectStore`] seam, the publish
//! pipeline itself, and `Haul.toml` loading.
//!
//! This crate is intentionally free of network I/O.

/// Name of the manifest file looked up from the working directory upwards.
pub const MANIFEST_FILE: &str = "Haul.toml";

/// Name of the secrets file read next to the manifest.
pub const ENV_FILE: &str = ".haul.env";

pub mod artifact;
pub mod config;
pub mod error;
pub mod grants;
pub mod path;
pub mod progress;
pub mod properties;
pub mod publish;
pub mod store;
