//! Error types for architecture configuration and candidate construction.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A constant range pair with `low > high`. Surfaces while the
    /// architecture module is initialised, never mid-search.
    #[error("invalid constant range: low {low} > high {high}")]
    InvalidRange { low: u64, high: u64 },

    #[error("empty operand domain: {0}")]
    EmptyDomain(String),

    #[error("malformed candidate: {0}")]
    Candidate(String),
}
