/*!
addressing.rs - 6502 addressing modes and operand resolution

Overview
========
`resolve` consumes the 0-2 operand bytes that follow an opcode, computes the
effective address for the mode and, for every mode except Implied and
Immediate, reads the operand byte at that address through the Bus.

Caller Assumptions
==================
- PC points just past the opcode byte when `resolve` is invoked.
- Callers advance PC exclusively via these helpers.

Wrap Rules
==========
- Zero-page indexed modes wrap modulo 256 inside page zero.
- (zp,X) and (zp),Y read their 16-bit pointer from page zero; the high byte is
  fetched from `(ptr + 1) & 0xFF`.
- JMP (abs) reproduces the hardware page-wrap quirk: a pointer at $xxFF takes its
  high byte from $xx00.
- Absolute indexed modes wrap at 16 bits.
*/

use crate::bus::Bus;
use crate::cpu::state::CpuState;
use crate::error::BusError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    IndirectX,
    IndirectY,
    AbsoluteIndirect,
    Relative,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    pub const fn operand_len(self) -> u16 {
        match self {
            AddressingMode::Implied => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY
            | AddressingMode::Relative => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::AbsoluteIndirect => 2,
        }
    }
}

/// Result of resolving one instruction's operand.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedOperand {
    /// Effective address; `None` for Implied and Immediate.
    pub address: Option<u16>,
    /// Immediate byte, or the byte read at `address`.
    pub value: u8,
    /// Raw inline operand (0, 1 or 2 bytes, little-endian).
    pub operand: u16,
    /// Indexing moved the effective address onto another page.
    pub page_crossed: bool,
}

/// Fetch next byte from the instruction stream, incrementing PC.
pub(crate) fn fetch_byte(cpu: &mut CpuState, bus: &mut Bus) -> Result<u8, BusError> {
    let v = bus.read(cpu.pc)?;
    cpu.advance_pc(1);
    Ok(v)
}

/// Fetch next little-endian word (low, then high), incrementing PC twice.
pub(crate) fn fetch_word(cpu: &mut CpuState, bus: &mut Bus) -> Result<u16, BusError> {
    let lo = fetch_byte(cpu, bus)? as u16;
    let hi = fetch_byte(cpu, bus)? as u16;
    Ok((hi << 8) | lo)
}

/// Consume the operand bytes for `mode` and resolve the effective address and value.
pub(crate) fn resolve(
    cpu: &mut CpuState,
    bus: &mut Bus,
    mode: AddressingMode,
) -> Result<ResolvedOperand, BusError> {
    let (operand, address, page_crossed) = match mode {
        AddressingMode::Implied => (0, None, false),
        AddressingMode::Immediate => {
            let v = fetch_byte(cpu, bus)?;
            return Ok(ResolvedOperand {
                address: None,
                value: v,
                operand: v as u16,
                page_crossed: false,
            });
        }
        AddressingMode::ZeroPage => {
            let zp = fetch_byte(cpu, bus)?;
            (zp as u16, Some(zp as u16), false)
        }
        AddressingMode::ZeroPageX => {
            let zp = fetch_byte(cpu, bus)?;
            (zp as u16, Some(zp.wrapping_add(cpu.x) as u16), false)
        }
        AddressingMode::ZeroPageY => {
            let zp = fetch_byte(cpu, bus)?;
            (zp as u16, Some(zp.wrapping_add(cpu.y) as u16), false)
        }
        AddressingMode::Absolute | AddressingMode::AbsoluteX | AddressingMode::AbsoluteY => {
            let base = fetch_word(cpu, bus)?;
            let index = match mode {
                AddressingMode::AbsoluteX => cpu.x,
                AddressingMode::AbsoluteY => cpu.y,
                _ => 0,
            };
            let addr = base.wrapping_add(index as u16);
            (base, Some(addr), crosses_page(base, addr))
        }
        AddressingMode::IndirectX => {
            let zp = fetch_byte(cpu, bus)?;
            let ptr = zp.wrapping_add(cpu.x);
            (zp as u16, Some(read_word_zp(bus, ptr)?), false)
        }
        AddressingMode::IndirectY => {
            let zp = fetch_byte(cpu, bus)?;
            let base = read_word_zp(bus, zp)?;
            let addr = base.wrapping_add(cpu.y as u16);
            (zp as u16, Some(addr), crosses_page(base, addr))
        }
        AddressingMode::AbsoluteIndirect => {
            let ptr = fetch_word(cpu, bus)?;
            (ptr, Some(read_word_indirect_bug(bus, ptr)?), false)
        }
        AddressingMode::Relative => {
            let offset = fetch_byte(cpu, bus)?;
            let target = cpu.pc.wrapping_add(offset as i8 as u16);
            (offset as u16, Some(target), false)
        }
    };

    let value = match address {
        Some(addr) => bus.read(addr)?,
        None => 0,
    };
    Ok(ResolvedOperand {
        address,
        value,
        operand,
        page_crossed,
    })
}

#[inline]
pub(crate) fn crosses_page(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

// -------------------------
// Low-level word helpers
// -------------------------

/// Read a 16-bit little endian pointer from zero page with wraparound
/// on the high byte.
#[inline]
pub(crate) fn read_word_zp(bus: &mut Bus, base: u8) -> Result<u16, BusError> {
    let lo = bus.read(base as u16)? as u16;
    let hi = bus.read(base.wrapping_add(1) as u16)? as u16;
    Ok((hi << 8) | lo)
}

/// JMP (indirect) hardware bug: when the low byte of the pointer is 0xFF, the
/// high byte is read from the start of the same page.
#[inline]
pub(crate) fn read_word_indirect_bug(bus: &mut Bus, addr: u16) -> Result<u16, BusError> {
    let lo = bus.read(addr)? as u16;
    let hi_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
    let hi = bus.read(hi_addr)? as u16;
    Ok((hi << 8) | lo)
}
