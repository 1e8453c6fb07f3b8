//! AVR architecture description: 32 byte-wide general-purpose registers
//! and the register classes its instruction encodings restrict operands
//! to. Flags and memory are not modelled; candidate programs are
//! compared on register state alone.

pub mod catalog;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::instruction::InstructionFactory;
use crate::machine::{Machine, RegisterBank};
use crate::slot::{OperandSlot, RegisterClass};

pub const AVR_REGISTER_COUNT: usize = 32;

/// Register subsets an AVR instruction encoding may restrict an operand
/// to. Adding a class means extending [`RegisterClass::members`]; the
/// match is exhaustive, so forgetting to is a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvrRegisterClass {
    /// r0..r31.
    All,
    /// r16..r31, the half reachable by immediate-operand encodings.
    Upper,
    /// r0 only, the implicit low byte of `mul`.
    R0,
    /// r1 only, the implicit high byte of `mul`.
    R1,
    /// Even indices r0..r30, the low halves of register pairs.
    Even,
    /// r24/r26/r28/r30, the pair bases `adiw` can address.
    WidePair,
}

impl RegisterClass for AvrRegisterClass {
    fn members(&self) -> Vec<u64> {
        match self {
            AvrRegisterClass::All => (0..AVR_REGISTER_COUNT as u64).collect(),
            AvrRegisterClass::Upper => (16..32u64).collect(),
            AvrRegisterClass::R0 => vec![0],
            AvrRegisterClass::R1 => vec![1],
            AvrRegisterClass::Even => (0..32u64).step_by(2).collect(),
            AvrRegisterClass::WidePair => vec![24, 26, 28, 30],
        }
    }
}

pub type AvrSlot = OperandSlot<AvrRegisterClass>;

/// The modelled AVR processor state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvrMachine {
    bank: RegisterBank<u8, AVR_REGISTER_COUNT>,
}

impl AvrMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reg(&self, index: u64) -> u8 {
        self.bank.get(index as usize)
    }

    pub fn set_reg(&mut self, index: u64, value: u8) {
        self.bank.set(index as usize, value);
    }

    /// Zero-argument constructors for the full instruction catalog, in
    /// fixed order, stable for the lifetime of the process.
    pub fn instruction_factories() -> Vec<InstructionFactory<AvrMachine>> {
        catalog::factories()
    }
}

impl Machine for AvrMachine {
    type RegisterClass = AvrRegisterClass;

    fn randomize(&mut self, rng: &mut dyn RngCore) {
        self.bank.randomize(rng);
    }

    fn to_text(&self) -> String {
        self.bank.to_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::RegisterSlot;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_register_class_domains_match_encoding_table() {
        let all: Vec<u64> = (0..32).collect();
        let upper: Vec<u64> = (16..32).collect();
        let even: Vec<u64> = (0..32).step_by(2).collect();

        assert_eq!(AvrRegisterClass::All.members(), all);
        assert_eq!(AvrRegisterClass::Upper.members(), upper);
        assert_eq!(AvrRegisterClass::R0.members(), vec![0]);
        assert_eq!(AvrRegisterClass::R1.members(), vec![1]);
        assert_eq!(AvrRegisterClass::Even.members(), even);
        assert_eq!(AvrRegisterClass::WidePair.members(), vec![24, 26, 28, 30]);
    }

    #[test]
    fn test_register_class_domains_are_stable() {
        for class in [
            AvrRegisterClass::All,
            AvrRegisterClass::Upper,
            AvrRegisterClass::R0,
            AvrRegisterClass::R1,
            AvrRegisterClass::Even,
            AvrRegisterClass::WidePair,
        ] {
            let first = RegisterSlot::source(class);
            let second = RegisterSlot::source(class);
            assert_eq!(first.valid_arguments(), second.valid_arguments());

            let mut deduped = first.valid_arguments().to_vec();
            deduped.dedup();
            assert_eq!(deduped.len(), first.valid_arguments().len());
        }
    }

    #[test]
    fn test_wide_pair_slot_end_to_end() {
        let slot = RegisterSlot::read_write(AvrRegisterClass::WidePair);
        assert_eq!(slot.valid_arguments(), &[24, 26, 28, 30]);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let &value = slot.valid_arguments().choose(&mut rng).unwrap();
            assert_eq!(value % 2, 0);
            assert!(value >= 24);
        }
    }

    #[test]
    fn test_factories_are_non_empty_and_stable() {
        let first = AvrMachine::instruction_factories();
        let second = AvrMachine::instruction_factories();
        assert!(!first.is_empty());
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn test_machine_to_text_labels_every_register() {
        let mut machine = AvrMachine::new();
        machine.set_reg(31, 7);
        let text = machine.to_text();

        assert_eq!(text.matches(" = ").count(), AVR_REGISTER_COUNT);
        assert_eq!(text.lines().count(), AVR_REGISTER_COUNT / 4);
        for line in text.lines() {
            assert_eq!(line.matches(" = ").count(), 4);
        }
        assert!(text.contains("r31 = 7"));
    }

    #[test]
    fn test_machine_equality_is_the_oracle() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut a = AvrMachine::new();
        a.randomize(&mut rng);

        assert_eq!(a, a);

        let b = a;
        assert_eq!(a, b);
        assert_eq!(b, a);

        let mut c = a;
        c.set_reg(12, c.reg(12).wrapping_add(1));
        assert_ne!(a, c);
        assert_ne!(c, a);
    }
}
