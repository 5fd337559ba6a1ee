/*!
state.rs - 6502 architectural state (registers, flags, cycle counter) and the
stack discipline.

`CpuState` is the single owner of every architecturally visible register. It is
`Copy` so the core can snapshot it at the start of an instruction and restore it
when the instruction fails.

6502 Status Register Bit Layout
===============================
Bit: 7 6 5 4 3 2 1 0
     N V 1 B D I Z C

Stack
=====
The stack lives in page $01 and is indexed by SP alone:
  Push: write at 0x0100 | SP, then SP = SP - 1 (wrapping)
  Pop:  SP = SP + 1 (wrapping), then read at 0x0100 | SP

`push16` pushes the LOW byte first and then the HIGH byte; `pop16` pops HIGH then
LOW. JSR/RTS and BRK/RTI pair through these two helpers, so the order must stay
symmetric.
*/

use crate::bus::Bus;
use crate::error::BusError;

pub const STACK_PAGE: u16 = 0x0100;

/// Status byte after reset: InterruptDisable | Unused.
pub const POWER_ON_STATUS: u8 = 0x24;
pub const POWER_ON_SP: u8 = 0xFD;
/// Bus cycles spent by the reset sequence itself.
pub const RESET_CYCLES: u64 = 7;

/// Processor status flags with their bit positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Flag {
    Carry = 0,
    Zero = 1,
    InterruptDisable = 2,
    Decimal = 3,
    Break = 4,
    Unused = 5,
    Overflow = 6,
    Negative = 7,
}

impl Flag {
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
    pub cycles: u64,
}

impl Default for CpuState {
    fn default() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: POWER_ON_SP,
            pc: 0x0000,
            status: POWER_ON_STATUS,
            cycles: RESET_CYCLES,
        }
    }
}

impl CpuState {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Power-on registers with PC at `pc`.
    pub fn reset_to(pc: u16) -> Self {
        Self {
            pc,
            ..Self::default()
        }
    }

    // ---------------------------------------------------------------------
    // Flags
    // ---------------------------------------------------------------------

    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        (self.status & flag.mask()) != 0
    }

    /// Set or clear one flag, leaving the other bits untouched.
    #[inline]
    pub fn set_flag(&mut self, flag: Flag, on: bool) {
        if on {
            self.status |= flag.mask();
        } else {
            self.status &= !flag.mask();
        }
    }

    #[inline]
    pub fn update_zn(&mut self, result: u8) {
        self.set_flag(Flag::Zero, result == 0);
        self.set_flag(Flag::Negative, (result & 0x80) != 0);
    }

    // ---------------------------------------------------------------------
    // Program counter
    // ---------------------------------------------------------------------

    #[inline]
    pub fn advance_pc(&mut self, delta: u16) {
        self.pc = self.pc.wrapping_add(delta);
    }

    // ---------------------------------------------------------------------
    // Stack
    // ---------------------------------------------------------------------

    #[inline]
    pub fn push(&mut self, bus: &mut Bus, value: u8) -> Result<(), BusError> {
        bus.write(STACK_PAGE | self.sp as u16, value, self.cycles)?;
        self.sp = self.sp.wrapping_sub(1);
        Ok(())
    }

    #[inline]
    pub fn pop(&mut self, bus: &mut Bus) -> Result<u8, BusError> {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_PAGE | self.sp as u16)
    }

    /// Push low byte, then high byte.
    pub fn push16(&mut self, bus: &mut Bus, value: u16) -> Result<(), BusError> {
        self.push(bus, value as u8)?;
        self.push(bus, (value >> 8) as u8)
    }

    /// Pop high byte, then low byte.
    pub fn pop16(&mut self, bus: &mut Bus) -> Result<u16, BusError> {
        let hi = self.pop(bus)? as u16;
        let lo = self.pop(bus)? as u16;
        Ok((hi << 8) | lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::bus_with_prg;

    #[test]
    fn default_power_up() {
        let s = CpuState::new();
        assert_eq!((s.a, s.x, s.y), (0, 0, 0));
        assert_eq!(s.sp, 0xFD);
        assert_eq!(s.status, 0x24);
        assert_eq!(s.cycles, 7);
        assert!(s.get_flag(Flag::InterruptDisable));
        assert!(s.get_flag(Flag::Unused));
        assert!(!s.get_flag(Flag::Break));
    }

    #[test]
    fn flag_masks_match_bit_positions() {
        assert_eq!(Flag::Carry.mask(), 0x01);
        assert_eq!(Flag::Zero.mask(), 0x02);
        assert_eq!(Flag::Break.mask(), 0x10);
        assert_eq!(Flag::Negative.mask(), 0x80);
    }

    #[test]
    fn set_flag_leaves_other_bits() {
        let mut s = CpuState::new();
        s.status = 0b1010_1010;
        s.set_flag(Flag::Carry, true);
        assert_eq!(s.status, 0b1010_1011);
        s.set_flag(Flag::Negative, false);
        assert_eq!(s.status, 0b0010_1011);
        s.set_flag(Flag::Decimal, true);
        assert!(s.get_flag(Flag::Decimal));
    }

    #[test]
    fn update_zn_behavior() {
        let mut s = CpuState::new();
        s.update_zn(0x00);
        assert!(s.get_flag(Flag::Zero));
        assert!(!s.get_flag(Flag::Negative));
        s.update_zn(0x80);
        assert!(!s.get_flag(Flag::Zero));
        assert!(s.get_flag(Flag::Negative));
    }

    #[test]
    fn push_pop_round_trip_and_wrap() {
        let mut bus = bus_with_prg(&[0xEA]);
        let mut s = CpuState::new();
        s.sp = 0x00;
        s.push(&mut bus, 0xAB).unwrap();
        assert_eq!(s.sp, 0xFF);
        assert_eq!(bus.read(0x0100), Ok(0xAB));
        assert_eq!(s.pop(&mut bus), Ok(0xAB));
        assert_eq!(s.sp, 0x00);
    }

    #[test]
    fn push16_stores_low_byte_at_higher_address() {
        let mut bus = bus_with_prg(&[0xEA]);
        let mut s = CpuState::new();
        s.push16(&mut bus, 0x1234).unwrap();
        assert_eq!(s.sp, 0xFB);
        assert_eq!(bus.read(0x01FD), Ok(0x34));
        assert_eq!(bus.read(0x01FC), Ok(0x12));
    }

    #[test]
    fn push16_pop16_identity_for_all_values() {
        let mut bus = bus_with_prg(&[0xEA]);
        let mut s = CpuState::new();
        for sp in [0xFD, 0x01, 0x00] {
            s.sp = sp;
            for v in (0..=u16::MAX).step_by(97).chain([0xFFFF, 0x00FF, 0xFF00]) {
                s.push16(&mut bus, v).unwrap();
                assert_eq!(s.pop16(&mut bus), Ok(v));
                assert_eq!(s.sp, sp);
            }
        }
    }
}
