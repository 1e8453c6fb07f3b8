//! Generic target-machine abstraction.
//!
//! A machine is a plain value-like state container: the search engine
//! creates an independent instance per trial, randomises it, runs a
//! candidate against it and compares the result with a reference run.
//! Equality over two machines is the semantic-equivalence oracle.

use std::fmt::{self, Write as _};

use rand::distributions::{Distribution, Standard};
use rand::{Rng, RngCore};

use crate::slot::RegisterClass;

/// Target-machine contract consumed by the search engine.
///
/// `PartialEq` compares complete machine-visible state; architectures
/// that model more than the register bank extend their equality (and
/// randomisation) accordingly.
pub trait Machine: Clone + Default + PartialEq {
    type RegisterClass: RegisterClass;

    /// Overwrites every register with an independent uniform draw over
    /// the storage type's full range.
    fn randomize(&mut self, rng: &mut dyn RngCore);

    /// Deterministic human-readable dump of the machine state, for
    /// diagnostics only.
    fn to_text(&self) -> String;
}

/// Fixed-count bank of fixed-width registers, index-addressed from zero.
///
/// Construction cannot fail and shape mismatches are unrepresentable:
/// the register count is part of the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterBank<R, const N: usize> {
    regs: [R; N],
}

impl<R: Copy + Default, const N: usize> RegisterBank<R, N> {
    pub fn new() -> Self {
        Self {
            regs: [R::default(); N],
        }
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn get(&self, index: usize) -> R {
        self.regs[index]
    }

    pub fn set(&mut self, index: usize, value: R) {
        self.regs[index] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.regs.iter()
    }
}

impl<R: Copy + Default, const N: usize> Default for RegisterBank<R, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Copy + Default, const N: usize> RegisterBank<R, N>
where
    Standard: Distribution<R>,
{
    /// Assigns every register an independent uniformly random value.
    pub fn randomize<G: Rng + ?Sized>(&mut self, rng: &mut G) {
        for reg in &mut self.regs {
            *reg = rng.gen();
        }
    }
}

impl<R: Copy + Default + fmt::Display, const N: usize> RegisterBank<R, N> {
    /// Register values four per line, each labelled by index.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, reg) in self.regs.iter().enumerate() {
            let _ = write!(out, "\tr{i} = {reg}  ");
            if i % 4 == 3 {
                out.push('\n');
            }
        }
        out
    }
}
