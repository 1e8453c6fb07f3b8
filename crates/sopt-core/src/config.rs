//! Configuration for randomised equivalence testing.

use serde::{Deserialize, Serialize};

/// Parameters for the probabilistic equivalence oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Number of randomised initial states a candidate must agree with the
    /// reference on before it is treated as equivalent
    pub trials: usize,
    /// Seed for the oracle's random source; a fixed seed reproduces a run
    pub seed: u64,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            trials: 32,
            seed: 0,
        }
    }
}
