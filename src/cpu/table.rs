/*!
table.rs - Opcode table.

`InstructionTable` maps each opcode byte to an `InstructionDescriptor`
(mnemonic, addressing mode, base cycles). It is built once per reset from the
`OPCODES` registration list and never mutated. Empty slots mean the opcode is
not implemented; the core reports them as `UnimplementedOpcode`.

Base cycles exclude the dynamic penalties (taken branch, branch page cross,
indexed-read page cross) and the OAM DMA stall; the core adds those after the
handler runs.
*/

use std::fmt;

use crate::cpu::addressing::AddressingMode::{self, *};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mnemonic {
    Adc,
    Lda,
    Ldx,
    Sta,
    Stx,
    Jmp,
    Jsr,
    Rts,
    Brk,
    Rti,
    Bit,
    Sec,
    Clc,
    Bcs,
    Bcc,
    Beq,
    Bne,
    Bvs,
    Bvc,
    Bpl,
    Nop,
}

impl Mnemonic {
    pub const fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Adc => "ADC",
            Mnemonic::Lda => "LDA",
            Mnemonic::Ldx => "LDX",
            Mnemonic::Sta => "STA",
            Mnemonic::Stx => "STX",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Jsr => "JSR",
            Mnemonic::Rts => "RTS",
            Mnemonic::Brk => "BRK",
            Mnemonic::Rti => "RTI",
            Mnemonic::Bit => "BIT",
            Mnemonic::Sec => "SEC",
            Mnemonic::Clc => "CLC",
            Mnemonic::Bcs => "BCS",
            Mnemonic::Bcc => "BCC",
            Mnemonic::Beq => "BEQ",
            Mnemonic::Bne => "BNE",
            Mnemonic::Bvs => "BVS",
            Mnemonic::Bvc => "BVC",
            Mnemonic::Bpl => "BPL",
            Mnemonic::Nop => "NOP",
        }
    }

    /// Reads that pay +1 cycle when indexing crosses a page.
    pub const fn has_page_cross_penalty(self) -> bool {
        matches!(self, Mnemonic::Adc | Mnemonic::Lda | Mnemonic::Ldx)
    }

    /// Instructions whose absolute operand is a jump target rather than data.
    pub const fn is_jump(self) -> bool {
        matches!(self, Mnemonic::Jmp | Mnemonic::Jsr)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InstructionDescriptor {
    pub opcode: u8,
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    pub cycles: u8,
}

/// Every supported (opcode, mnemonic, mode, base cycles) entry.
#[rustfmt::skip]
const OPCODES: &[(u8, Mnemonic, AddressingMode, u8)] = &[
    // ADC
    (0x69, Mnemonic::Adc, Immediate, 2),
    (0x65, Mnemonic::Adc, ZeroPage, 3),
    (0x75, Mnemonic::Adc, ZeroPageX, 4),
    (0x6D, Mnemonic::Adc, Absolute, 4),
    (0x7D, Mnemonic::Adc, AbsoluteX, 4),
    (0x79, Mnemonic::Adc, AbsoluteY, 4),
    (0x61, Mnemonic::Adc, IndirectX, 6),
    (0x71, Mnemonic::Adc, IndirectY, 5),
    // LDA
    (0xA9, Mnemonic::Lda, Immediate, 2),
    (0xA5, Mnemonic::Lda, ZeroPage, 3),
    (0xB5, Mnemonic::Lda, ZeroPageX, 4),
    (0xAD, Mnemonic::Lda, Absolute, 4),
    (0xBD, Mnemonic::Lda, AbsoluteX, 4),
    (0xB9, Mnemonic::Lda, AbsoluteY, 4),
    (0xA1, Mnemonic::Lda, IndirectX, 6),
    (0xB1, Mnemonic::Lda, IndirectY, 5),
    // LDX
    (0xA2, Mnemonic::Ldx, Immediate, 2),
    (0xA6, Mnemonic::Ldx, ZeroPage, 3),
    (0xB6, Mnemonic::Ldx, ZeroPageY, 4),
    (0xAE, Mnemonic::Ldx, Absolute, 4),
    (0xBE, Mnemonic::Ldx, AbsoluteY, 4),
    // STA
    (0x85, Mnemonic::Sta, ZeroPage, 3),
    (0x95, Mnemonic::Sta, ZeroPageX, 4),
    (0x8D, Mnemonic::Sta, Absolute, 4),
    (0x9D, Mnemonic::Sta, AbsoluteX, 5),
    (0x99, Mnemonic::Sta, AbsoluteY, 5),
    (0x81, Mnemonic::Sta, IndirectX, 6),
    (0x91, Mnemonic::Sta, IndirectY, 6),
    // STX
    (0x86, Mnemonic::Stx, ZeroPage, 3),
    (0x96, Mnemonic::Stx, ZeroPageY, 4),
    (0x8E, Mnemonic::Stx, Absolute, 4),
    // Control flow
    (0x4C, Mnemonic::Jmp, Absolute, 3),
    (0x6C, Mnemonic::Jmp, AbsoluteIndirect, 5),
    (0x20, Mnemonic::Jsr, Absolute, 6),
    (0x60, Mnemonic::Rts, Implied, 6),
    (0x00, Mnemonic::Brk, Implied, 7),
    (0x40, Mnemonic::Rti, Implied, 6),
    // BIT
    (0x24, Mnemonic::Bit, ZeroPage, 3),
    (0x2C, Mnemonic::Bit, Absolute, 4),
    // Flags
    (0x38, Mnemonic::Sec, Implied, 2),
    (0x18, Mnemonic::Clc, Implied, 2),
    // Branches
    (0xB0, Mnemonic::Bcs, Relative, 2),
    (0x90, Mnemonic::Bcc, Relative, 2),
    (0xF0, Mnemonic::Beq, Relative, 2),
    (0xD0, Mnemonic::Bne, Relative, 2),
    (0x70, Mnemonic::Bvs, Relative, 2),
    (0x50, Mnemonic::Bvc, Relative, 2),
    (0x10, Mnemonic::Bpl, Relative, 2),
    // NOP
    (0xEA, Mnemonic::Nop, Implied, 2),
];

#[derive(Clone, Debug)]
pub struct InstructionTable {
    entries: [Option<InstructionDescriptor>; 256],
}

impl Default for InstructionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionTable {
    pub fn new() -> Self {
        let mut entries = [None; 256];
        for &(opcode, mnemonic, mode, cycles) in OPCODES {
            debug_assert!(entries[opcode as usize].is_none(), "duplicate opcode {opcode:02X}");
            entries[opcode as usize] = Some(InstructionDescriptor {
                opcode,
                mnemonic,
                mode,
                cycles,
            });
        }
        Self { entries }
    }

    #[inline]
    pub fn get(&self, opcode: u8) -> Option<&InstructionDescriptor> {
        self.entries[opcode as usize].as_ref()
    }

    /// Number of implemented opcodes.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
