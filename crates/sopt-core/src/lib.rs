//! Shared primitives for the superoptimizer: error taxonomy and trial
//! configuration.

pub mod config;
pub mod error;

pub use config::TrialConfig;
pub use error::{Error, Result};
