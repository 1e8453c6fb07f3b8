//! Probabilistic semantic-equivalence oracle.
//!
//! Two candidate sequences are run from the same randomised initial
//! state and their final states compared; agreement across every
//! configured trial is treated as verified equivalence. This is
//! evidence, not proof: a candidate that diverges only on inputs the
//! trials never drew will be accepted.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use sopt_core::TrialConfig;

use crate::instruction::Step;
use crate::machine::Machine;

pub struct Oracle {
    trials: usize,
    rng: ChaCha8Rng,
}

impl Oracle {
    /// The oracle owns its random source, seeded from the configuration
    /// so runs are reproducible.
    pub fn new(config: &TrialConfig) -> Self {
        Self {
            trials: config.trials,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// True if `candidate` matched `reference` on every trial.
    pub fn equivalent<M: Machine>(&mut self, reference: &[Step<M>], candidate: &[Step<M>]) -> bool {
        for trial in 0..self.trials {
            let mut expected = M::default();
            expected.randomize(&mut self.rng);
            let mut actual = expected.clone();

            for step in reference {
                step.execute(&mut expected);
            }
            for step in candidate {
                step.execute(&mut actual);
            }

            if expected != actual {
                trace!(trial, "candidate diverged from reference");
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avr::catalog::{And, Dec, Eor, Inc, Ldi};
    use crate::avr::AvrMachine;

    fn step(
        instruction: Box<dyn crate::Instruction<Machine = AvrMachine>>,
        operands: Vec<u64>,
    ) -> Step<AvrMachine> {
        Step::new(instruction, operands).unwrap()
    }

    #[test]
    fn test_clear_idioms_are_equivalent() {
        // eor r16, r16 zeroes the register, exactly like ldi r16, 0
        let reference = vec![step(Box::new(Ldi::new()), vec![16, 0])];
        let candidate = vec![step(Box::new(Eor::new()), vec![16, 16])];

        let mut oracle = Oracle::new(&TrialConfig::default());
        assert!(oracle.equivalent(&reference, &candidate));
    }

    #[test]
    fn test_self_and_is_a_no_op() {
        let candidate = vec![step(Box::new(And::new()), vec![3, 3])];

        let mut oracle = Oracle::new(&TrialConfig::default());
        assert!(oracle.equivalent(&[], &candidate));
    }

    #[test]
    fn test_divergent_sequences_are_rejected() {
        let reference = vec![step(Box::new(Inc::new()), vec![0])];
        let candidate = vec![step(Box::new(Dec::new()), vec![0])];

        let mut oracle = Oracle::new(&TrialConfig::default());
        assert!(!oracle.equivalent(&reference, &candidate));
    }

    #[test]
    fn test_empty_sequences_are_equivalent() {
        let mut oracle = Oracle::new(&TrialConfig {
            trials: 4,
            seed: 11,
        });
        assert!(oracle.equivalent::<AvrMachine>(&[], &[]));
    }
}
