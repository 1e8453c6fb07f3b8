//! Architecture-description layer for the stochastic superoptimizer.
//!
//! The search engine stays generic over target architectures by going
//! through three contracts defined here:
//! - operand slots bound each instruction operand to its finite set of
//!   legal values,
//! - the machine abstraction carries register state, randomised
//!   initialisation and the state-equality check used as the semantic
//!   equivalence oracle,
//! - instruction factories enumerate an architecture's catalog as
//!   zero-argument constructors.
//!
//! The AVR instantiation lives in [`avr`].

pub mod avr;
pub mod equivalence;
pub mod instruction;
pub mod machine;
pub mod slot;

pub use equivalence::Oracle;
pub use instruction::{Instruction, InstructionFactory, Step};
pub use machine::{Machine, RegisterBank};
pub use slot::{ConstantSlot, OperandSlot, RegisterClass, RegisterSlot};
