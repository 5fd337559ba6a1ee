/*!
execute.rs - 6502 instruction semantics.

`execute` is the single dispatch point: one exhaustive `match` over `Mnemonic`.
Operands arrive already resolved (see `addressing::resolve`); handlers only
mutate registers, flags, the stack and memory.

Return Contract
===============
`execute` returns the extra cycles the instruction cost beyond its base count:
+1 for a taken branch, +1 more when the branch lands on another page, and any
stall reported by a bus write (OAM DMA). Indexed-read page-cross penalties are
added by the core.
*/

use log::debug;

use crate::bus::Bus;
use crate::cpu::addressing::{ResolvedOperand, crosses_page};
use crate::cpu::state::{CpuState, Flag};
use crate::cpu::table::Mnemonic;
use crate::error::BusError;

pub const IRQ_VECTOR: u16 = 0xFFFE;

pub(crate) fn execute(
    cpu: &mut CpuState,
    bus: &mut Bus,
    mnemonic: Mnemonic,
    op: &ResolvedOperand,
) -> Result<u32, BusError> {
    let extra = match mnemonic {
        Mnemonic::Adc => {
            adc(cpu, op.value);
            0
        }
        Mnemonic::Lda => {
            lda(cpu, op.value);
            0
        }
        Mnemonic::Ldx => {
            ldx(cpu, op.value);
            0
        }
        Mnemonic::Sta => store(cpu, bus, effective_address(op), cpu.a)?,
        Mnemonic::Stx => store(cpu, bus, effective_address(op), cpu.x)?,
        Mnemonic::Jmp => {
            let target = effective_address(op);
            debug!("JMP ${:04X}", target);
            cpu.pc = target;
            0
        }
        Mnemonic::Jsr => {
            jsr(cpu, bus, effective_address(op))?;
            0
        }
        Mnemonic::Rts => {
            rts(cpu, bus)?;
            0
        }
        Mnemonic::Brk => {
            brk(cpu, bus)?;
            0
        }
        Mnemonic::Rti => {
            rti(cpu, bus)?;
            0
        }
        Mnemonic::Bit => {
            bit(cpu, op.value);
            0
        }
        Mnemonic::Sec => {
            cpu.set_flag(Flag::Carry, true);
            0
        }
        Mnemonic::Clc => {
            cpu.set_flag(Flag::Carry, false);
            0
        }
        m @ (Mnemonic::Bcs
        | Mnemonic::Bcc
        | Mnemonic::Beq
        | Mnemonic::Bne
        | Mnemonic::Bvs
        | Mnemonic::Bvc
        | Mnemonic::Bpl) => {
            let take = branch_taken(cpu, m);
            branch_cond(cpu, op, take)
        }
        Mnemonic::Nop => 0,
    };
    Ok(extra)
}

/// Every mode routed to an addressing handler carries an effective address.
#[inline]
fn effective_address(op: &ResolvedOperand) -> u16 {
    debug_assert!(op.address.is_some());
    op.address.unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Loads / stores
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn lda(cpu: &mut CpuState, v: u8) {
    cpu.a = v;
    cpu.update_zn(v);
}

#[inline]
pub(crate) fn ldx(cpu: &mut CpuState, v: u8) {
    cpu.x = v;
    cpu.update_zn(v);
}

#[inline]
fn store(cpu: &CpuState, bus: &mut Bus, addr: u16, v: u8) -> Result<u32, BusError> {
    bus.write(addr, v, cpu.cycles)
}

// ---------------------------------------------------------------------------
// Arithmetic / logical
// ---------------------------------------------------------------------------

pub(crate) fn adc(cpu: &mut CpuState, v: u8) {
    let a = cpu.a;
    let carry_in = cpu.get_flag(Flag::Carry) as u16;
    let sum16 = a as u16 + v as u16 + carry_in;
    let result = sum16 as u8;

    cpu.set_flag(Flag::Carry, sum16 > 0xFF);
    // Only positive + positive -> negative sets V.
    cpu.set_flag(Flag::Overflow, (!a & !v & result & 0x80) != 0);

    cpu.a = result;
    cpu.update_zn(result);
}

pub(crate) fn bit(cpu: &mut CpuState, v: u8) {
    cpu.set_flag(Flag::Zero, (cpu.a & v) == 0);
    cpu.set_flag(Flag::Overflow, (v & 0x40) != 0);
    cpu.set_flag(Flag::Negative, (v & 0x80) != 0);
}

// ---------------------------------------------------------------------------
// Control flow
// ---------------------------------------------------------------------------

/// PC already points past the operand; that is the address pushed.
fn jsr(cpu: &mut CpuState, bus: &mut Bus, target: u16) -> Result<(), BusError> {
    let ret = cpu.pc;
    cpu.push16(bus, ret)?;
    debug!("JSR ${:04X} (return ${:04X})", target, ret);
    cpu.pc = target;
    Ok(())
}

fn rts(cpu: &mut CpuState, bus: &mut Bus) -> Result<(), BusError> {
    cpu.pc = cpu.pop16(bus)?;
    debug!("RTS -> ${:04X}", cpu.pc);
    Ok(())
}

fn brk(cpu: &mut CpuState, bus: &mut Bus) -> Result<(), BusError> {
    let pc = cpu.pc;
    cpu.push16(bus, pc)?;
    let status = cpu.status | Flag::Break.mask() | Flag::Unused.mask();
    cpu.push(bus, status)?;
    cpu.pc = bus.read_word(IRQ_VECTOR)?;
    cpu.set_flag(Flag::InterruptDisable, true);
    debug!("BRK at ${:04X} -> ${:04X}", pc.wrapping_sub(1), cpu.pc);
    Ok(())
}

fn rti(cpu: &mut CpuState, bus: &mut Bus) -> Result<(), BusError> {
    let status = cpu.pop(bus)?;
    cpu.status = status & !Flag::Break.mask();
    cpu.pc = cpu.pop16(bus)?;
    debug!("RTI -> ${:04X}", cpu.pc);
    Ok(())
}

/// Condition tested by each conditional branch.
fn branch_taken(cpu: &CpuState, m: Mnemonic) -> bool {
    match m {
        Mnemonic::Bcs => cpu.get_flag(Flag::Carry),
        Mnemonic::Bcc => !cpu.get_flag(Flag::Carry),
        Mnemonic::Beq => cpu.get_flag(Flag::Zero),
        Mnemonic::Bne => !cpu.get_flag(Flag::Zero),
        Mnemonic::Bvs => cpu.get_flag(Flag::Overflow),
        Mnemonic::Bvc => !cpu.get_flag(Flag::Overflow),
        Mnemonic::Bpl => !cpu.get_flag(Flag::Negative),
        _ => false,
    }
}

/// Take the branch if `take`. Returns 0, 1 (taken) or 2 (taken, new page).
pub(crate) fn branch_cond(cpu: &mut CpuState, op: &ResolvedOperand, take: bool) -> u32 {
    if !take {
        return 0;
    }
    let target = effective_address(op);
    let extra = if crosses_page(cpu.pc, target) { 2 } else { 1 };
    cpu.pc = target;
    extra
}
