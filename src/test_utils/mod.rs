//! Shared test utilities for building minimal iNES (v1) ROM images.
//!
//! These helpers de-duplicate iNES construction logic across tests in the
//! CPU, Bus, and Cartridge modules.
//!
//! Notes on iNES header fields used here:
//! - bytes[0..4] = b"NES\x1A"
//! - byte 4 = PRG ROM size in 16 KiB units
//! - byte 5 = CHR ROM size in 8 KiB units
//! - byte 6 = Flags 6 (mirroring, battery, trainer, mapper low nibble)
//! - byte 7 = Flags 7 (NES 2.0 indicator, mapper high nibble)
//! - byte 8 = PRG RAM size in 8 KiB units (0 => 8 KiB)
//! - bytes 9..15 = padding
//!
//! Vectors:
//! - For 16 KiB PRG (NROM-128): vectors are at PRG offset 0x3FFA..=0x3FFF
//! - For 32 KiB PRG (NROM-256): vectors are at PRG offset 0x7FFA..=0x7FFF

#![allow(dead_code)]

use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::config::CpuConfig;
use crate::cpu::core::Cpu;

/// Build a minimal iNES (v1) image. PRG is filled with 0xAA, CHR with 0xCC.
pub fn build_ines(prg_16k: usize, chr_8k: usize, flags6: u8, flags7: u8, prg_ram_8k: u8) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(16 + prg_16k * 16 * 1024 + chr_8k * 8 * 1024);

    bytes.extend_from_slice(b"NES\x1A");
    bytes.push(prg_16k as u8);
    bytes.push(chr_8k as u8);
    bytes.push(flags6);
    bytes.push(flags7);
    bytes.push(prg_ram_8k);
    bytes.extend_from_slice(&[0u8; 7]);

    bytes.extend(std::iter::repeat_n(0xAA, prg_16k * 16 * 1024));
    bytes.extend(std::iter::repeat_n(0xCC, chr_8k * 8 * 1024));

    bytes
}

/// Build a 16 KiB NROM image with `prg` placed at $8000 (mirrored at $C000).
///
/// `vectors` is (reset, nmi, irq); defaults to $8000 for all three.
pub fn build_nrom_with_prg(
    prg: &[u8],
    chr_8k: usize,
    prg_ram_8k: u8,
    vectors: Option<(u16, u16, u16)>,
) -> Vec<u8> {
    assert!(
        prg.len() <= 16 * 1024,
        "Program must fit within a 16 KiB PRG bank"
    );

    let mut rom = build_ines(1, chr_8k, 0, 0, prg_ram_8k);
    let prg_start = 16;
    let prg_end = prg_start + 16 * 1024;
    rom[prg_start..(prg_start + prg.len())].copy_from_slice(prg);

    let (reset, nmi, irq) = vectors.unwrap_or((0x8000, 0x8000, 0x8000));
    set_vectors_in_prg(&mut rom[prg_start..prg_end], reset, nmi, irq);

    rom
}

/// Convenience wrapper when only the RESET vector matters.
pub fn build_nrom_with_prg_reset_only(
    prg: &[u8],
    chr_8k: usize,
    prg_ram_8k: u8,
    reset: Option<u16>,
) -> Vec<u8> {
    let vectors = reset.map(|r| (r, 0x8000, 0x8000));
    build_nrom_with_prg(prg, chr_8k, prg_ram_8k, vectors)
}

/// Write CPU vectors (NMI, RESET, IRQ/BRK) into a 16 KiB or 32 KiB PRG slice.
pub fn set_vectors_in_prg(prg: &mut [u8], reset: u16, nmi: u16, irq: u16) {
    let base = match prg.len() {
        16384 => 0x3FFA,
        32768 => 0x7FFA,
        other => panic!(
            "Unsupported PRG length for vector placement: {} bytes (expected 16 KiB or 32 KiB)",
            other
        ),
    };
    write_le_u16(prg, base, nmi);
    write_le_u16(prg, base + 2, reset);
    write_le_u16(prg, base + 4, irq);
}

#[inline]
fn write_le_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset] = (value & 0x00FF) as u8;
    buf[offset + 1] = (value >> 8) as u8;
}

/// Bus over a 16 KiB NROM image running `prg` from $8000.
pub fn bus_with_prg(prg: &[u8]) -> Bus {
    let rom = build_nrom_with_prg(prg, 1, 1, None);
    Bus::from_cartridge(Cartridge::from_ines_bytes(&rom).expect("parse"))
}

/// CPU reset onto a 16 KiB NROM image running `prg` from $8000.
pub fn cpu_with_prg(prg: &[u8]) -> Cpu {
    let rom = build_nrom_with_prg(prg, 1, 1, None);
    Cpu::power_on(&rom, &CpuConfig::default()).expect("power on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_ines() {
        let rom = build_ines(2, 1, 0x01, 0x00, 1);
        assert_eq!(&rom[0..4], b"NES\x1A");
        assert_eq!(rom[4], 2);
        assert_eq!(rom[5], 1);
        assert_eq!(rom[6], 0x01);
        assert_eq!(rom[8], 1);
        assert_eq!(rom.len(), 16 + 2 * 16 * 1024 + 8 * 1024);
    }

    #[test]
    fn writes_vectors_for_16k_prg() {
        let mut prg = vec![0u8; 16 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(prg[0x3FFA], 0x56);
        assert_eq!(prg[0x3FFB], 0x84);
        assert_eq!(prg[0x3FFC], 0x23);
        assert_eq!(prg[0x3FFD], 0x81);
        assert_eq!(prg[0x3FFE], 0xBC);
        assert_eq!(prg[0x3FFF], 0x8A);
    }

    #[test]
    fn writes_vectors_for_32k_prg() {
        let mut prg = vec![0u8; 32 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(prg[0x7FFC], 0x23);
        assert_eq!(prg[0x7FFD], 0x81);
    }

    #[test]
    fn builds_nrom_with_prg_and_vectors() {
        let rom = build_nrom_with_prg(&[0xA9, 0x01, 0x00], 1, 1, None);
        let prg_start = 16;
        assert_eq!(rom[prg_start], 0xA9);
        assert_eq!(rom[prg_start + 0x3FFC], 0x00);
        assert_eq!(rom[prg_start + 0x3FFD], 0x80);
    }
}
