//! Concrete AVR instruction catalog.
//!
//! Each instruction owns its operand slots and implements execution
//! against [`AvrMachine`]. Arithmetic is wrapping. Status flags are not
//! modelled, so flag-dependent instructions (`adc`, `sbc`, conditional
//! branches) are excluded from the catalog.

use tracing::debug;

use crate::instruction::{Instruction, InstructionFactory};
use crate::slot::{ConstantSlot, RegisterSlot};

use super::{AvrMachine, AvrRegisterClass, AvrSlot};

/// Every factory in the catalog, in fixed order.
pub(super) fn factories() -> Vec<InstructionFactory<AvrMachine>> {
    let factories: Vec<InstructionFactory<AvrMachine>> = vec![
        || Box::new(Mov::new()),
        || Box::new(Movw::new()),
        || Box::new(Add::new()),
        || Box::new(Sub::new()),
        || Box::new(And::new()),
        || Box::new(Or::new()),
        || Box::new(Eor::new()),
        || Box::new(Inc::new()),
        || Box::new(Dec::new()),
        || Box::new(Lsr::new()),
        || Box::new(Ldi::new()),
        || Box::new(Andi::new()),
        || Box::new(Adiw::new()),
        || Box::new(Mul::new()),
    ];
    debug!(count = factories.len(), "avr instruction catalog initialised");
    factories
}

fn imm8() -> AvrSlot {
    ConstantSlot::new(&[(0, 255)])
        .expect("immediate range is well formed")
        .into()
}

fn imm6() -> AvrSlot {
    ConstantSlot::new(&[(0, 63)])
        .expect("immediate range is well formed")
        .into()
}

/// `mov Rd, Rr` — copy Rr into Rd.
pub struct Mov {
    slots: [AvrSlot; 2],
}

impl Mov {
    pub fn new() -> Self {
        Self {
            slots: [
                RegisterSlot::dest(AvrRegisterClass::All).into(),
                RegisterSlot::source(AvrRegisterClass::All).into(),
            ],
        }
    }
}

impl Instruction for Mov {
    type Machine = AvrMachine;

    fn mnemonic(&self) -> &'static str {
        "mov"
    }

    fn slots(&self) -> &[AvrSlot] {
        &self.slots
    }

    fn execute(&self, machine: &mut AvrMachine, operands: &[u64]) {
        let &[d, r] = operands else {
            panic!("mov takes 2 operands")
        };
        machine.set_reg(d, machine.reg(r));
    }
}

/// `movw Rd, Rr` — copy the register pair Rr+1:Rr into Rd+1:Rd.
pub struct Movw {
    slots: [AvrSlot; 2],
}

impl Movw {
    pub fn new() -> Self {
        Self {
            slots: [
                RegisterSlot::dest(AvrRegisterClass::Even).into(),
                RegisterSlot::source(AvrRegisterClass::Even).into(),
            ],
        }
    }
}

impl Instruction for Movw {
    type Machine = AvrMachine;

    fn mnemonic(&self) -> &'static str {
        "movw"
    }

    fn slots(&self) -> &[AvrSlot] {
        &self.slots
    }

    fn execute(&self, machine: &mut AvrMachine, operands: &[u64]) {
        let &[d, r] = operands else {
            panic!("movw takes 2 operands")
        };
        machine.set_reg(d, machine.reg(r));
        machine.set_reg(d + 1, machine.reg(r + 1));
    }
}

/// `add Rd, Rr` — Rd ← Rd + Rr.
pub struct Add {
    slots: [AvrSlot; 2],
}

impl Add {
    pub fn new() -> Self {
        Self {
            slots: [
                RegisterSlot::read_write(AvrRegisterClass::All).into(),
                RegisterSlot::source(AvrRegisterClass::All).into(),
            ],
        }
    }
}

impl Instruction for Add {
    type Machine = AvrMachine;

    fn mnemonic(&self) -> &'static str {
        "add"
    }

    fn slots(&self) -> &[AvrSlot] {
        &self.slots
    }

    fn execute(&self, machine: &mut AvrMachine, operands: &[u64]) {
        let &[d, r] = operands else {
            panic!("add takes 2 operands")
        };
        machine.set_reg(d, machine.reg(d).wrapping_add(machine.reg(r)));
    }
}

/// `sub Rd, Rr` — Rd ← Rd - Rr.
pub struct Sub {
    slots: [AvrSlot; 2],
}

impl Sub {
    pub fn new() -> Self {
        Self {
            slots: [
                RegisterSlot::read_write(AvrRegisterClass::All).into(),
                RegisterSlot::source(AvrRegisterClass::All).into(),
            ],
        }
    }
}

impl Instruction for Sub {
    type Machine = AvrMachine;

    fn mnemonic(&self) -> &'static str {
        "sub"
    }

    fn slots(&self) -> &[AvrSlot] {
        &self.slots
    }

    fn execute(&self, machine: &mut AvrMachine, operands: &[u64]) {
        let &[d, r] = operands else {
            panic!("sub takes 2 operands")
        };
        machine.set_reg(d, machine.reg(d).wrapping_sub(machine.reg(r)));
    }
}

/// `and Rd, Rr` — Rd ← Rd & Rr.
pub struct And {
    slots: [AvrSlot; 2],
}

impl And {
    pub fn new() -> Self {
        Self {
            slots: [
                RegisterSlot::read_write(AvrRegisterClass::All).into(),
                RegisterSlot::source(AvrRegisterClass::All).into(),
            ],
        }
    }
}

impl Instruction for And {
    type Machine = AvrMachine;

    fn mnemonic(&self) -> &'static str {
        "and"
    }

    fn slots(&self) -> &[AvrSlot] {
        &self.slots
    }

    fn execute(&self, machine: &mut AvrMachine, operands: &[u64]) {
        let &[d, r] = operands else {
            panic!("and takes 2 operands")
        };
        machine.set_reg(d, machine.reg(d) & machine.reg(r));
    }
}

/// `or Rd, Rr` — Rd ← Rd | Rr.
pub struct Or {
    slots: [AvrSlot; 2],
}

impl Or {
    pub fn new() -> Self {
        Self {
            slots: [
                RegisterSlot::read_write(AvrRegisterClass::All).into(),
                RegisterSlot::source(AvrRegisterClass::All).into(),
            ],
        }
    }
}

impl Instruction for Or {
    type Machine = AvrMachine;

    fn mnemonic(&self) -> &'static str {
        "or"
    }

    fn slots(&self) -> &[AvrSlot] {
        &self.slots
    }

    fn execute(&self, machine: &mut AvrMachine, operands: &[u64]) {
        let &[d, r] = operands else {
            panic!("or takes 2 operands")
        };
        machine.set_reg(d, machine.reg(d) | machine.reg(r));
    }
}

/// `eor Rd, Rr` — Rd ← Rd ^ Rr. With Rd == Rr this is the idiomatic
/// register clear.
pub struct Eor {
    slots: [AvrSlot; 2],
}

impl Eor {
    pub fn new() -> Self {
        Self {
            slots: [
                RegisterSlot::read_write(AvrRegisterClass::All).into(),
                RegisterSlot::source(AvrRegisterClass::All).into(),
            ],
        }
    }
}

impl Instruction for Eor {
    type Machine = AvrMachine;

    fn mnemonic(&self) -> &'static str {
        "eor"
    }

    fn slots(&self) -> &[AvrSlot] {
        &self.slots
    }

    fn execute(&self, machine: &mut AvrMachine, operands: &[u64]) {
        let &[d, r] = operands else {
            panic!("eor takes 2 operands")
        };
        machine.set_reg(d, machine.reg(d) ^ machine.reg(r));
    }
}

/// `inc Rd` — Rd ← Rd + 1.
pub struct Inc {
    slots: [AvrSlot; 1],
}

impl Inc {
    pub fn new() -> Self {
        Self {
            slots: [RegisterSlot::read_write(AvrRegisterClass::All).into()],
        }
    }
}

impl Instruction for Inc {
    type Machine = AvrMachine;

    fn mnemonic(&self) -> &'static str {
        "inc"
    }

    fn slots(&self) -> &[AvrSlot] {
        &self.slots
    }

    fn execute(&self, machine: &mut AvrMachine, operands: &[u64]) {
        let &[d] = operands else {
            panic!("inc takes 1 operand")
        };
        machine.set_reg(d, machine.reg(d).wrapping_add(1));
    }
}

/// `dec Rd` — Rd ← Rd - 1.
pub struct Dec {
    slots: [AvrSlot; 1],
}

impl Dec {
    pub fn new() -> Self {
        Self {
            slots: [RegisterSlot::read_write(AvrRegisterClass::All).into()],
        }
    }
}

impl Instruction for Dec {
    type Machine = AvrMachine;

    fn mnemonic(&self) -> &'static str {
        "dec"
    }

    fn slots(&self) -> &[AvrSlot] {
        &self.slots
    }

    fn execute(&self, machine: &mut AvrMachine, operands: &[u64]) {
        let &[d] = operands else {
            panic!("dec takes 1 operand")
        };
        machine.set_reg(d, machine.reg(d).wrapping_sub(1));
    }
}

/// `lsr Rd` — logical shift right by one.
pub struct Lsr {
    slots: [AvrSlot; 1],
}

impl Lsr {
    pub fn new() -> Self {
        Self {
            slots: [RegisterSlot::read_write(AvrRegisterClass::All).into()],
        }
    }
}

impl Instruction for Lsr {
    type Machine = AvrMachine;

    fn mnemonic(&self) -> &'static str {
        "lsr"
    }

    fn slots(&self) -> &[AvrSlot] {
        &self.slots
    }

    fn execute(&self, machine: &mut AvrMachine, operands: &[u64]) {
        let &[d] = operands else {
            panic!("lsr takes 1 operand")
        };
        machine.set_reg(d, machine.reg(d) >> 1);
    }
}

/// `ldi Rd, K` — load an 8-bit immediate. The encoding only reaches the
/// upper register half.
pub struct Ldi {
    slots: [AvrSlot; 2],
}

impl Ldi {
    pub fn new() -> Self {
        Self {
            slots: [RegisterSlot::dest(AvrRegisterClass::Upper).into(), imm8()],
        }
    }
}

impl Instruction for Ldi {
    type Machine = AvrMachine;

    fn mnemonic(&self) -> &'static str {
        "ldi"
    }

    fn slots(&self) -> &[AvrSlot] {
        &self.slots
    }

    fn execute(&self, machine: &mut AvrMachine, operands: &[u64]) {
        let &[d, k] = operands else {
            panic!("ldi takes 2 operands")
        };
        machine.set_reg(d, k as u8);
    }
}

/// `andi Rd, K` — Rd ← Rd & K, upper register half only.
pub struct Andi {
    slots: [AvrSlot; 2],
}

impl Andi {
    pub fn new() -> Self {
        Self {
            slots: [
                RegisterSlot::read_write(AvrRegisterClass::Upper).into(),
                imm8(),
            ],
        }
    }
}

impl Instruction for Andi {
    type Machine = AvrMachine;

    fn mnemonic(&self) -> &'static str {
        "andi"
    }

    fn slots(&self) -> &[AvrSlot] {
        &self.slots
    }

    fn execute(&self, machine: &mut AvrMachine, operands: &[u64]) {
        let &[d, k] = operands else {
            panic!("andi takes 2 operands")
        };
        machine.set_reg(d, machine.reg(d) & k as u8);
    }
}

/// `adiw Rd, K` — add a 6-bit immediate to the 16-bit pair Rd+1:Rd.
pub struct Adiw {
    slots: [AvrSlot; 2],
}

impl Adiw {
    pub fn new() -> Self {
        Self {
            slots: [
                RegisterSlot::read_write(AvrRegisterClass::WidePair).into(),
                imm6(),
            ],
        }
    }
}

impl Instruction for Adiw {
    type Machine = AvrMachine;

    fn mnemonic(&self) -> &'static str {
        "adiw"
    }

    fn slots(&self) -> &[AvrSlot] {
        &self.slots
    }

    fn execute(&self, machine: &mut AvrMachine, operands: &[u64]) {
        let &[d, k] = operands else {
            panic!("adiw takes 2 operands")
        };
        let pair = u16::from_le_bytes([machine.reg(d), machine.reg(d + 1)]);
        let [low, high] = pair.wrapping_add(k as u16).to_le_bytes();
        machine.set_reg(d, low);
        machine.set_reg(d + 1, high);
    }
}

/// `mul Rd, Rr` — unsigned multiply; the 16-bit product lands in the
/// implicit r1:r0 pair, declared as write-only slots so the search
/// engine sees the clobber.
pub struct Mul {
    slots: [AvrSlot; 4],
}

impl Mul {
    pub fn new() -> Self {
        Self {
            slots: [
                RegisterSlot::source(AvrRegisterClass::All).into(),
                RegisterSlot::source(AvrRegisterClass::All).into(),
                RegisterSlot::dest(AvrRegisterClass::R0).into(),
                RegisterSlot::dest(AvrRegisterClass::R1).into(),
            ],
        }
    }
}

impl Instruction for Mul {
    type Machine = AvrMachine;

    fn mnemonic(&self) -> &'static str {
        "mul"
    }

    fn slots(&self) -> &[AvrSlot] {
        &self.slots
    }

    fn execute(&self, machine: &mut AvrMachine, operands: &[u64]) {
        let &[d, r, low, high] = operands else {
            panic!("mul takes 4 operands")
        };
        let product = u16::from(machine.reg(d)) * u16::from(machine.reg(r));
        machine.set_reg(low, product as u8);
        machine.set_reg(high, (product >> 8) as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_factory_declares_sane_slots() {
        for factory in factories() {
            let instruction = factory();
            assert!(!instruction.mnemonic().is_empty());
            assert!(!instruction.slots().is_empty());
            for slot in instruction.slots() {
                assert!(!slot.valid_arguments().is_empty());
            }
        }
    }

    #[test]
    fn test_mnemonics_are_unique() {
        let mnemonics: HashSet<&str> = factories().iter().map(|f| f().mnemonic()).collect();
        assert_eq!(mnemonics.len(), factories().len());
    }

    #[test]
    fn test_add_wraps() {
        let mut machine = AvrMachine::new();
        machine.set_reg(3, 200);
        machine.set_reg(4, 100);
        Add::new().execute(&mut machine, &[3, 4]);
        assert_eq!(machine.reg(3), 44);
        assert_eq!(machine.reg(4), 100);
    }

    #[test]
    fn test_mov_copies() {
        let mut machine = AvrMachine::new();
        machine.set_reg(7, 99);
        Mov::new().execute(&mut machine, &[2, 7]);
        assert_eq!(machine.reg(2), 99);
    }

    #[test]
    fn test_movw_copies_the_pair() {
        let mut machine = AvrMachine::new();
        machine.set_reg(30, 0x34);
        machine.set_reg(31, 0x12);
        Movw::new().execute(&mut machine, &[26, 30]);
        assert_eq!(machine.reg(26), 0x34);
        assert_eq!(machine.reg(27), 0x12);
    }

    #[test]
    fn test_eor_self_clears() {
        let mut machine = AvrMachine::new();
        machine.set_reg(16, 0xAB);
        Eor::new().execute(&mut machine, &[16, 16]);
        assert_eq!(machine.reg(16), 0);
    }

    #[test]
    fn test_ldi_loads_immediate() {
        let mut machine = AvrMachine::new();
        Ldi::new().execute(&mut machine, &[20, 0xF0]);
        assert_eq!(machine.reg(20), 0xF0);
    }

    #[test]
    fn test_adiw_carries_into_high_byte() {
        let mut machine = AvrMachine::new();
        machine.set_reg(24, 0xFF);
        machine.set_reg(25, 0x00);
        Adiw::new().execute(&mut machine, &[24, 1]);
        assert_eq!(machine.reg(24), 0x00);
        assert_eq!(machine.reg(25), 0x01);
    }

    #[test]
    fn test_mul_writes_product_to_r1_r0() {
        let mut machine = AvrMachine::new();
        machine.set_reg(5, 20);
        machine.set_reg(6, 30);
        Mul::new().execute(&mut machine, &[5, 6, 0, 1]);
        // 600 = 0x0258
        assert_eq!(machine.reg(0), 0x58);
        assert_eq!(machine.reg(1), 0x02);
    }

    #[test]
    fn test_shift_and_dec() {
        let mut machine = AvrMachine::new();
        machine.set_reg(9, 0x81);
        Lsr::new().execute(&mut machine, &[9]);
        assert_eq!(machine.reg(9), 0x40);

        machine.set_reg(10, 0);
        Dec::new().execute(&mut machine, &[10]);
        assert_eq!(machine.reg(10), 0xFF);
    }

    #[test]
    #[should_panic(expected = "takes 2 operands")]
    fn test_wrong_arity_fails_loudly() {
        let mut machine = AvrMachine::new();
        Add::new().execute(&mut machine, &[3]);
    }
}
