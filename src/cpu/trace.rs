/*!
trace.rs - nestest-compatible per-instruction trace lines.

One line per executed instruction, rendered from the register snapshot taken
before the instruction ran and the operand resolved for it:

```text
C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7
```

Lines are handed to a `TraceSink`. The core formats a line only when a sink is
present, so an untraced run never pays for the string building.
*/

use std::fmt;

use log::trace;

use crate::cpu::addressing::{AddressingMode, ResolvedOperand};
use crate::cpu::state::CpuState;
use crate::cpu::table::InstructionDescriptor;

/// `log` target used by `LogTraceSink`.
pub const TRACE_TARGET: &str = "nrom6502::trace";

/// PPU dots per scanline and scanlines per frame (NTSC).
const DOTS_PER_SCANLINE: u64 = 341;
const SCANLINES_PER_FRAME: u64 = 262;

/// Receives one formatted line per executed instruction.
pub trait TraceSink {
    fn record(&mut self, line: &str);
}

/// Forwards every line to the `log` facade at `trace` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTraceSink;

impl TraceSink for LogTraceSink {
    fn record(&mut self, line: &str) {
        trace!(target: TRACE_TARGET, "{}", line);
    }
}

/// Collects lines in memory; used for golden-log comparisons.
impl TraceSink for Vec<String> {
    fn record(&mut self, line: &str) {
        self.push(line.to_owned());
    }
}

/// Everything needed to render one trace line.
#[derive(Debug, Clone, Copy)]
pub struct TraceLine {
    /// Registers before the instruction (PC at the opcode byte).
    pub regs: CpuState,
    pub desc: InstructionDescriptor,
    pub operand: ResolvedOperand,
}

impl TraceLine {
    pub fn new(regs: CpuState, desc: InstructionDescriptor, operand: ResolvedOperand) -> Self {
        Self {
            regs,
            desc,
            operand,
        }
    }

    pub fn format(&self) -> String {
        self.to_string()
    }

    /// Opcode followed by its 0-2 operand bytes.
    fn raw_bytes(&self) -> String {
        let [lo, hi] = self.operand.operand.to_le_bytes();
        match self.desc.mode.operand_len() {
            0 => format!("{:02X}", self.desc.opcode),
            1 => format!("{:02X} {:02X}", self.desc.opcode, lo),
            _ => format!("{:02X} {:02X} {:02X}", self.desc.opcode, lo, hi),
        }
    }

    fn disassembly(&self) -> String {
        let m = self.desc.mnemonic;
        let op = &self.operand;
        let raw = op.operand;
        let ea = op.address.unwrap_or_default();
        let v = op.value;
        match self.desc.mode {
            AddressingMode::Implied => m.to_string(),
            AddressingMode::Immediate => format!("{m} #${v:02X}"),
            AddressingMode::ZeroPage => format!("{m} ${raw:02X} = {v:02X}"),
            AddressingMode::ZeroPageX => format!("{m} ${raw:02X},X @ {ea:02X} = {v:02X}"),
            AddressingMode::ZeroPageY => format!("{m} ${raw:02X},Y @ {ea:02X} = {v:02X}"),
            AddressingMode::Absolute if m.is_jump() => format!("{m} ${raw:04X}"),
            AddressingMode::Absolute => format!("{m} ${raw:04X} = {v:02X}"),
            AddressingMode::AbsoluteX => format!("{m} ${raw:04X},X @ {ea:04X} = {v:02X}"),
            AddressingMode::AbsoluteY => format!("{m} ${raw:04X},Y @ {ea:04X} = {v:02X}"),
            AddressingMode::IndirectX => {
                let ptr = (raw as u8).wrapping_add(self.regs.x);
                format!("{m} (${raw:02X},X) @ {ptr:02X} = {ea:04X} = {v:02X}")
            }
            AddressingMode::IndirectY => {
                let base = ea.wrapping_sub(self.regs.y as u16);
                format!("{m} (${raw:02X}),Y = {base:04X} @ {ea:04X} = {v:02X}")
            }
            AddressingMode::AbsoluteIndirect => format!("{m} (${raw:04X}) = {ea:04X}"),
            AddressingMode::Relative => format!("{m} ${ea:04X}"),
        }
    }
}

/// (scanline, dot) the PPU would be at after `cycles` CPU cycles.
pub fn ppu_position(cycles: u64) -> (u64, u64) {
    let dots = cycles * 3;
    (
        (dots / DOTS_PER_SCANLINE) % SCANLINES_PER_FRAME,
        dots % DOTS_PER_SCANLINE,
    )
}

impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.regs;
        let (scanline, dot) = ppu_position(r.cycles);
        write!(
            f,
            "{:04X}  {:<8}  {:<32}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PPU:{:>3},{:>3} CYC:{}",
            r.pc,
            self.raw_bytes(),
            self.disassembly(),
            r.a,
            r.x,
            r.y,
            r.status,
            r.sp,
            scanline,
            dot,
            r.cycles
        )
    }
}
