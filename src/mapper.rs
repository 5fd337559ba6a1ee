/*!
Mapper subsystem: trait definition and the NROM (mapper 0) implementation.

The Bus forwards CPU $6000..=$7FFF and $8000..=$FFFF to the mapper. Every
other range is decoded by the Bus itself and never reaches this trait.
*/

use crate::error::{Access, BusError};

/// Cartridge-side address decoding for the CPU.
///
/// Semantics:
/// - Methods take full CPU addresses (unmasked).
/// - `write` returns the number of extra CPU cycles the access costs.
///   `current_cycle` is the CPU cycle counter at the start of the instruction.
/// - Accesses outside the mapper's decoded ranges fail with `InvalidBusAddress`.
pub trait Mapper {
    /// Mapper numeric identifier (e.g., 0 for NROM).
    fn mapper_id(&self) -> u16;

    fn read(&mut self, addr: u16) -> Result<u8, BusError>;

    fn write(&mut self, addr: u16, value: u8, current_cycle: u64) -> Result<u32, BusError>;
}

/// NROM (mapper 0).
///
/// - PRG ROM: 16 KiB (NROM-128) mirrored into $C000..=$FFFF, or 32 KiB (NROM-256) direct.
/// - PRG RAM at $6000..=$7FFF, wrapped to its allocated size.
/// - PRG ROM is read-only; writes there are rejected.
#[derive(Clone, Debug)]
pub struct Nrom {
    prg_rom: Vec<u8>,
    prg_ram: Vec<u8>,
}

impl Nrom {
    pub fn new(prg_rom: Vec<u8>, prg_ram_size: usize) -> Self {
        Self {
            prg_rom,
            prg_ram: vec![0; prg_ram_size],
        }
    }

    #[inline]
    fn prg_rom_read(&self, addr: u16) -> u8 {
        if self.prg_rom.is_empty() {
            return 0xFF;
        }
        let rel = (addr - 0x8000) as usize;
        let len = self.prg_rom.len();
        if len == 16 * 1024 {
            self.prg_rom[rel & 0x3FFF]
        } else {
            self.prg_rom[rel % len]
        }
    }

    #[inline]
    fn prg_ram_index(&self, addr: u16) -> Option<usize> {
        if self.prg_ram.is_empty() {
            return None;
        }
        Some((addr - 0x6000) as usize % self.prg_ram.len())
    }

    pub fn is_nrom_128(&self) -> bool {
        self.prg_rom.len() == 16 * 1024
    }
}

impl Mapper for Nrom {
    #[inline]
    fn mapper_id(&self) -> u16 {
        0
    }

    fn read(&mut self, addr: u16) -> Result<u8, BusError> {
        match addr {
            0x6000..=0x7FFF => Ok(self.prg_ram_index(addr).map_or(0, |i| self.prg_ram[i])),
            0x8000..=0xFFFF => Ok(self.prg_rom_read(addr)),
            _ => Err(BusError::InvalidBusAddress {
                addr,
                access: Access::Read,
            }),
        }
    }

    fn write(&mut self, addr: u16, value: u8, _current_cycle: u64) -> Result<u32, BusError> {
        let slot = match addr {
            0x6000..=0x7FFF => self.prg_ram_index(addr),
            _ => None,
        };
        match slot {
            Some(i) => {
                self.prg_ram[i] = value;
                Ok(0)
            }
            None => Err(BusError::InvalidBusAddress {
                addr,
                access: Access::Write,
            }),
        }
    }
}
