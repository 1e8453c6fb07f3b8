//! Operand constraint model.
//!
//! Every operand of a candidate instruction is described by a slot: a
//! finite set of legal integer values plus read/write intent. Register
//! slots draw their domain from a named register class, constant slots
//! from a union of inclusive ranges. Domains are fixed at construction
//! and never empty.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use sopt_core::{Error, Result};

/// A named subset of the register index space.
///
/// Architectures implement this on a closed enum, so an unknown class is
/// unrepresentable; the class-to-members mapping is data, not behaviour.
pub trait RegisterClass: Copy + Eq + fmt::Debug {
    /// Register indices belonging to this class.
    fn members(&self) -> Vec<u64>;
}

/// Operand slot bound to a register class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSlot<C> {
    class: C,
    writes: bool,
    reads: bool,
    valid: Vec<u64>,
}

impl<C: RegisterClass> RegisterSlot<C> {
    /// Builds a slot whose domain is exactly the members of `class`.
    ///
    /// Panics if the class maps to an empty register set. An empty domain
    /// would corrupt candidate sampling without any visible symptom, so
    /// construction fails loudly instead.
    pub fn new(class: C, writes: bool, reads: bool) -> Self {
        let mut valid = class.members();
        valid.sort_unstable();
        valid.dedup();
        assert!(!valid.is_empty(), "register class {class:?} has no members");
        Self {
            class,
            writes,
            reads,
            valid,
        }
    }

    /// Read-only operand, the common case.
    pub fn source(class: C) -> Self {
        Self::new(class, false, true)
    }

    /// Write-only operand.
    pub fn dest(class: C) -> Self {
        Self::new(class, true, false)
    }

    /// Operand both read and written, e.g. the accumulating side of `add`.
    pub fn read_write(class: C) -> Self {
        Self::new(class, true, true)
    }

    pub fn class(&self) -> C {
        self.class
    }

    pub fn valid_arguments(&self) -> &[u64] {
        &self.valid
    }

    pub fn reads(&self) -> bool {
        self.reads
    }

    pub fn writes(&self) -> bool {
        self.writes
    }
}

/// Operand slot whose domain is a union of inclusive integer ranges.
///
/// Domains are enumerated eagerly; ranges are expected to be the small
/// immediate fields of an instruction encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantSlot {
    valid: Vec<u64>,
}

impl ConstantSlot {
    /// Builds a slot from inclusive `(low, high)` range pairs.
    ///
    /// Overlapping ranges contribute each value once. A pair with
    /// `low > high`, or an empty range list, is a configuration error.
    pub fn new(ranges: &[(u64, u64)]) -> Result<Self> {
        let mut valid = BTreeSet::new();
        for &(low, high) in ranges {
            if low > high {
                return Err(Error::InvalidRange { low, high });
            }
            valid.extend(low..=high);
        }
        if valid.is_empty() {
            return Err(Error::EmptyDomain(
                "constant slot built from no ranges".to_string(),
            ));
        }
        Ok(Self {
            valid: valid.into_iter().collect(),
        })
    }

    pub fn valid_arguments(&self) -> &[u64] {
        &self.valid
    }

    /// Constants are consumed by the instruction, never produced.
    pub fn reads(&self) -> bool {
        true
    }

    pub fn writes(&self) -> bool {
        false
    }
}

/// The two operand domains an instruction may declare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperandSlot<C> {
    Register(RegisterSlot<C>),
    Constant(ConstantSlot),
}

impl<C: RegisterClass> OperandSlot<C> {
    /// Every legal concrete value for this operand, ascending and
    /// duplicate-free.
    pub fn valid_arguments(&self) -> &[u64] {
        match self {
            OperandSlot::Register(slot) => slot.valid_arguments(),
            OperandSlot::Constant(slot) => slot.valid_arguments(),
        }
    }

    pub fn reads(&self) -> bool {
        match self {
            OperandSlot::Register(slot) => slot.reads(),
            OperandSlot::Constant(slot) => slot.reads(),
        }
    }

    pub fn writes(&self) -> bool {
        match self {
            OperandSlot::Register(slot) => slot.writes(),
            OperandSlot::Constant(slot) => slot.writes(),
        }
    }
}

impl<C: RegisterClass> From<RegisterSlot<C>> for OperandSlot<C> {
    fn from(slot: RegisterSlot<C>) -> Self {
        OperandSlot::Register(slot)
    }
}

impl<C> From<ConstantSlot> for OperandSlot<C> {
    fn from(slot: ConstantSlot) -> Self {
        OperandSlot::Constant(slot)
    }
}
