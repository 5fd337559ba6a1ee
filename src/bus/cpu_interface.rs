/*!
CPU interface dispatcher

Purpose
- Centralize CPU-visible memory mapping and delegate to devices.
- Use PpuRegisters for the 0x2000-0x3FFF register window.

Address map:
- $0000-$07FF: 2KB internal RAM
- $0800-$1FFF: Mirrors of $0000-$07FF (mask & 0x07FF)
- $2000-$2007: PPU registers
- $2008-$3FFF: Mirrors of $2000-$2007
- $4014: OAM DMA on write
- $4000-$4020: inert APU/IO backing store
- $4021-$5FFF: unmapped (InvalidBusAddress)
- $6000-$7FFF: Cartridge PRG RAM
- $8000-$FFFF: Cartridge PRG ROM (writes rejected by NROM)
*/

use crate::bus::Bus;
use crate::bus::dma;
use crate::bus::ppu_registers::PpuRegisters;
use crate::error::{Access, BusError};

pub const OAM_DMA: u16 = 0x4014;

/// CPU-visible read from the unified address space.
pub fn cpu_read(bus: &mut Bus, addr: u16) -> Result<u8, BusError> {
    match addr {
        0x0000..=0x1FFF => Ok(bus.ram.read(addr)),
        0x2000..=0x3FFF => PpuRegisters::read(bus, addr),
        0x4000..=0x4020 => Ok(bus.apu.read(addr)),
        0x4021..=0x5FFF => Err(BusError::InvalidBusAddress {
            addr,
            access: Access::Read,
        }),
        0x6000..=0xFFFF => bus.mapper.read(addr),
    }
}

/// CPU-visible write. Returns extra CPU cycles (non-zero only for OAM DMA).
pub fn cpu_write(bus: &mut Bus, addr: u16, value: u8, current_cycle: u64) -> Result<u32, BusError> {
    match addr {
        0x0000..=0x1FFF => {
            bus.ram.write(addr, value);
            Ok(0)
        }
        0x2000..=0x3FFF => PpuRegisters::write(bus, addr, value).map(|()| 0),
        OAM_DMA => dma::oam_dma(bus, value, current_cycle),
        0x4000..=0x4020 => {
            bus.apu.write(addr, value);
            Ok(0)
        }
        0x4021..=0x5FFF => Err(BusError::InvalidBusAddress {
            addr,
            access: Access::Write,
        }),
        0x6000..=0xFFFF => bus.mapper.write(addr, value, current_cycle),
    }
}

/// Little-endian word read used by CPU vectors and absolute operands.
pub fn cpu_read_word(bus: &mut Bus, addr: u16) -> Result<u16, BusError> {
    let lo = cpu_read(bus, addr)? as u16;
    let hi = cpu_read(bus, addr.wrapping_add(1))? as u16;
    Ok((hi << 8) | lo)
}
