#![doc = r#"
Bus module: the CPU address space.

Overview
- `Bus` owns the 2 KiB CPU RAM, the inert APU/IO backing store, the PPU register
  facade and the cartridge mapper. It is rebuilt together with them on every reset.
- Every 16-bit address resolves to exactly one routing rule; see `cpu_interface`.

Modules and responsibilities
- cpu_interface: CPU-visible address decoder (read/write/read_word); delegates to devices.
- ram: 2 KiB internal RAM with $0800 mirroring.
- ppu_registers: CPU-visible PPU register window (0x2000-0x3FFF, mirrored every 8 bytes).
- apu_registers: inert backing store for $4000-$4020.
- dma: OAM DMA ($4014) transfer and its 513/514-cycle stall cost.

Reads take `&mut self`: PPU register reads have side effects (PPUSTATUS clears
vblank and the write toggle). Writes report extra CPU cycles (non-zero only for
OAM DMA) so the CPU can add them to its own counter.
"#]

pub mod apu_registers;
pub mod cpu_interface;
pub mod dma;
pub mod ppu_registers;
pub mod ram;

#[cfg(test)]
mod tests;

use crate::cartridge::Cartridge;
use crate::error::BusError;
use crate::mapper::Mapper;
use crate::ppu::Ppu;

pub use apu_registers::ApuRegisters;
pub use ram::{CPU_RAM_SIZE, Ram};

pub struct Bus {
    ram: Ram,
    apu: ApuRegisters,
    ppu: Ppu,
    mapper: Box<dyn Mapper>,
}

impl Bus {
    /// Build a bus over an already constructed mapper and PPU facade.
    pub fn new(mapper: Box<dyn Mapper>, ppu: Ppu) -> Self {
        Self {
            ram: Ram::new(),
            apu: ApuRegisters::new(),
            ppu,
            mapper,
        }
    }

    /// Build a bus from a loaded cartridge: PRG goes to the mapper, CHR to the PPU.
    pub fn from_cartridge(cartridge: Cartridge) -> Self {
        let (mapper, chr) = cartridge.into_parts();
        Self::new(mapper, Ppu::new(chr))
    }

    /// CPU-visible read.
    #[inline]
    pub fn read(&mut self, addr: u16) -> Result<u8, BusError> {
        cpu_interface::cpu_read(self, addr)
    }

    /// CPU-visible write. Returns the extra CPU cycles the access costs.
    ///
    /// `current_cycle` is the CPU cycle counter at the start of the instruction
    /// issuing the write; only the OAM DMA register looks at it.
    #[inline]
    pub fn write(&mut self, addr: u16, value: u8, current_cycle: u64) -> Result<u32, BusError> {
        cpu_interface::cpu_write(self, addr, value, current_cycle)
    }

    /// Little-endian word read (`addr`, then `addr + 1` with 16-bit wrap).
    #[inline]
    pub fn read_word(&mut self, addr: u16) -> Result<u16, BusError> {
        cpu_interface::cpu_read_word(self, addr)
    }

    // -------------- Device access --------------

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn ppu_mut(&mut self) -> &mut Ppu {
        &mut self.ppu
    }

    pub fn apu(&self) -> &ApuRegisters {
        &self.apu
    }

    pub fn mapper(&self) -> &dyn Mapper {
        self.mapper.as_ref()
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("mapper_id", &self.mapper.mapper_id())
            .field("ppu_status", &self.ppu.status())
            .finish_non_exhaustive()
    }
}
