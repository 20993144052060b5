//! Kinetrack Common Utilities
//!
//! Shared infrastructure for all Kinetrack crates:
//! - Error types and result aliases
//! - Clock utilities for recording timesteps
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
