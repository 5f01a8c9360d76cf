//! S3 REST client implementing [`haul_core::store::ObjectStore`].
//!
//! Requests go straight over `reqwest` with AWS Signature Version 4; there is
//! no SDK underneath. Works against AWS and S3-compatible endpoints (MinIO,
//! R2, Ceph) via [`config::S3Config::endpoint`] and path-style addressing.

pub mod acl;
pub mod client;
pub mod config;
pub mod error;
pub mod sign;

pub use client::S3Client;
pub use config::S3Config;
