//! Instruction and factory contracts binding a concrete instruction set
//! into the generic search framework.
//!
//! Each concrete instruction declares its ordered operand slots and
//! implements execution against its machine; the architecture module
//! exposes the full catalog as a list of zero-argument factories. A
//! [`Step`] pairs an instruction with a concrete operand assignment,
//! which is how the search engine builds well-typed candidates.

use std::fmt;

use rand::seq::SliceRandom;
use rand::RngCore;
use sopt_core::{Error, Result};

use crate::machine::Machine;
use crate::slot::OperandSlot;

/// One instruction of an architecture's catalog.
pub trait Instruction {
    type Machine: Machine;

    fn mnemonic(&self) -> &'static str;

    /// Ordered operand shape of the instruction.
    fn slots(&self) -> &[OperandSlot<<Self::Machine as Machine>::RegisterClass>];

    /// Applies the instruction to `machine` with one concrete value per
    /// slot, in slot order.
    ///
    /// Panics if `operands` does not match the declared shape; callers
    /// are expected to go through [`Step`].
    fn execute(&self, machine: &mut Self::Machine, operands: &[u64]);
}

/// Zero-argument constructor for one concrete instruction type. The
/// architecture's factory list is fixed for the lifetime of the process.
pub type InstructionFactory<M> = fn() -> Box<dyn Instruction<Machine = M>>;

/// An instruction bound to a concrete, in-domain operand assignment.
pub struct Step<M: Machine> {
    instruction: Box<dyn Instruction<Machine = M>>,
    operands: Vec<u64>,
}

impl<M: Machine> Step<M> {
    /// Binds `operands` to `instruction`, validating arity and domain
    /// membership.
    pub fn new(instruction: Box<dyn Instruction<Machine = M>>, operands: Vec<u64>) -> Result<Self> {
        let slots = instruction.slots();
        if operands.len() != slots.len() {
            return Err(Error::Candidate(format!(
                "{} expects {} operands, got {}",
                instruction.mnemonic(),
                slots.len(),
                operands.len()
            )));
        }
        for (slot, &value) in slots.iter().zip(&operands) {
            if slot.valid_arguments().binary_search(&value).is_err() {
                return Err(Error::Candidate(format!(
                    "operand {value} outside the domain of {}",
                    instruction.mnemonic()
                )));
            }
        }
        Ok(Self {
            instruction,
            operands,
        })
    }

    /// Draws a uniformly random legal value for every slot.
    pub fn sample(instruction: Box<dyn Instruction<Machine = M>>, rng: &mut dyn RngCore) -> Self {
        let operands = instruction
            .slots()
            .iter()
            .map(|slot| {
                *slot
                    .valid_arguments()
                    .choose(rng)
                    .expect("slot domains are never empty")
            })
            .collect();
        Self {
            instruction,
            operands,
        }
    }

    pub fn execute(&self, machine: &mut M) {
        self.instruction.execute(machine, &self.operands);
    }

    pub fn instruction(&self) -> &dyn Instruction<Machine = M> {
        self.instruction.as_ref()
    }

    pub fn operands(&self) -> &[u64] {
        &self.operands
    }
}

impl<M: Machine> fmt::Debug for Step<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("instruction", &self.instruction.mnemonic())
            .field("operands", &self.operands)
            .finish()
    }
}
