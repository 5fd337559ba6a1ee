#![doc = r#"
PPU registers handler

Purpose
- Entry point for CPU-visible PPU register access (0x2000-0x3FFF).
- Folds the window onto the eight register slots and hands the slot to the `Ppu` facade.

Notes
- Mirroring: addresses 0x2008..=0x3FFF mirror 0x2000..=0x2007.
"#]

use crate::bus::Bus;
use crate::error::BusError;

/// Handler for CPU-visible PPU register reads/writes.
pub struct PpuRegisters;

impl PpuRegisters {
    pub fn read(bus: &mut Bus, addr: u16) -> Result<u8, BusError> {
        bus.ppu.read_register(register_slot(addr))
    }

    pub fn write(bus: &mut Bus, addr: u16, value: u8) -> Result<(), BusError> {
        bus.ppu.write_register(register_slot(addr), value)
    }
}

/// Register slot (0..=7) for an address in the PPU window.
#[inline]
pub fn register_slot(addr: u16) -> u16 {
    mirror_ppu_reg(addr) - 0x2000
}

#[inline]
fn mirror_ppu_reg(addr: u16) -> u16 {
    0x2000 + (addr % 8)
}

#[cfg(test)]
mod tests {
    use super::register_slot;

    #[test]
    fn slots_repeat_every_eight_bytes() {
        assert_eq!(register_slot(0x2000), 0);
        assert_eq!(register_slot(0x2007), 7);
        assert_eq!(register_slot(0x2008), 0);
        assert_eq!(register_slot(0x3FFA), 2);
    }
}
