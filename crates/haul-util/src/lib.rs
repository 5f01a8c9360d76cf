//! Shared utilities for haul.
//!
//! This crate provides cross-cutting concerns used by the other haul crates:
//! the unified error type, filesystem helpers, and Cargo-style status lines.

pub mod errors;
pub mod fs;
pub mod progress;
