/*!
PPU register facade: the CPU-visible side of the picture processor.

Scope:
- Implements the eight CPU-visible register slots ($2000..$2007, passed in as
  offsets 0..=7 by the Bus):
  * 0 PPUCTRL: write-only; stores control flags (incl. VRAM increment step)
  * 1 PPUMASK: write-only; stores mask flags
  * 2 PPUSTATUS: read returns status; clears vblank and the write toggle
  * 3 OAMADDR: write-only; OAM pointer for OAMDATA
  * 4 OAMDATA: read/write OAM at OAMADDR (writes increment OAMADDR)
  * 5 PPUSCROLL: two writes form x/y scroll
  * 6 PPUADDR: two writes set the VRAM address (high byte first)
  * 7 PPUDATA: write stores at the VRAM address, then steps it by 1 or 32
- Reads of write-only slots and of PPUDATA return the open-bus latch, which
  every write refreshes.
- Owns the CHR image copied out of the cartridge, a flat nametable/palette
  space and the 256-byte OAM filled by `$4014` DMA.

Notes:
- No rendering or timing lives here. `set_vblank` exists so external timing
  (or tests) can drive the status bit.
- Pattern-table writes through PPUDATA only land when the cartridge has no CHR
  ROM (8 KiB of CHR RAM is allocated in that case).
*/

use crate::error::BusError;

pub const PPUCTRL: u16 = 0;
pub const PPUMASK: u16 = 1;
pub const PPUSTATUS: u16 = 2;
pub const OAMADDR: u16 = 3;
pub const OAMDATA: u16 = 4;
pub const PPUSCROLL: u16 = 5;
pub const PPUADDR: u16 = 6;
pub const PPUDATA: u16 = 7;

pub const OAM_SIZE: usize = 256;

const VBLANK: u8 = 0x80;
const CHR_RAM_SIZE: usize = 0x2000;
const NAMETABLE_SPACE: usize = 0x2000;

#[derive(Clone, Debug)]
pub struct Ppu {
    // Registers (CPU visible)
    ctrl: u8,
    mask: u8,
    status: u8,
    oam_addr: u8,

    // Internal latches and toggles
    latch: u8,
    write_toggle: bool,
    scroll_x: u8,
    scroll_y: u8,
    vram_addr: u16,

    // Memories
    chr: Vec<u8>,
    chr_is_ram: bool,
    vram: Vec<u8>,
    oam: [u8; OAM_SIZE],
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Ppu {
    /// Build the facade over the cartridge's CHR image. An empty image gets CHR RAM.
    pub fn new(chr: Vec<u8>) -> Self {
        let chr_is_ram = chr.is_empty();
        let chr = if chr_is_ram { vec![0; CHR_RAM_SIZE] } else { chr };
        Self {
            ctrl: 0,
            mask: 0,
            status: 0,
            oam_addr: 0,
            latch: 0,
            write_toggle: false,
            scroll_x: 0,
            scroll_y: 0,
            vram_addr: 0,
            chr,
            chr_is_ram,
            vram: vec![0; NAMETABLE_SPACE],
            oam: [0; OAM_SIZE],
        }
    }

    /// Read register slot `reg` (0..=7).
    pub fn read_register(&mut self, reg: u16) -> Result<u8, BusError> {
        match reg {
            PPUSTATUS => {
                let v = self.status;
                self.status &= !VBLANK;
                self.write_toggle = false;
                Ok(v)
            }
            OAMDATA => Ok(self.oam[self.oam_addr as usize]),
            PPUCTRL | PPUMASK | OAMADDR | PPUSCROLL | PPUADDR | PPUDATA => Ok(self.latch),
            _ => Err(BusError::InvalidRegisterAccess { register: reg }),
        }
    }

    /// Write register slot `reg` (0..=7).
    pub fn write_register(&mut self, reg: u16, value: u8) -> Result<(), BusError> {
        match reg {
            PPUCTRL => self.ctrl = value,
            PPUMASK => self.mask = value,
            PPUSTATUS => {}
            OAMADDR => self.oam_addr = value,
            OAMDATA => {
                self.oam[self.oam_addr as usize] = value;
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            PPUSCROLL => {
                if self.write_toggle {
                    self.scroll_y = value;
                } else {
                    self.scroll_x = value;
                }
                self.write_toggle = !self.write_toggle;
            }
            PPUADDR => {
                if self.write_toggle {
                    self.vram_addr = (self.vram_addr & 0xFF00) | value as u16;
                } else {
                    self.vram_addr = ((value as u16 & 0x3F) << 8) | (self.vram_addr & 0x00FF);
                }
                self.write_toggle = !self.write_toggle;
            }
            PPUDATA => {
                self.store_vram(self.vram_addr, value);
                self.vram_addr = self.vram_addr.wrapping_add(self.vram_increment()) & 0x3FFF;
            }
            _ => return Err(BusError::InvalidRegisterAccess { register: reg }),
        }
        self.latch = value;
        Ok(())
    }

    /// Bulk-load OAM starting at OAMADDR (the `$4014` DMA target).
    pub fn oam_dma(&mut self, page: &[u8; OAM_SIZE]) {
        for &b in page.iter() {
            self.oam[self.oam_addr as usize] = b;
            self.oam_addr = self.oam_addr.wrapping_add(1);
        }
    }

    fn store_vram(&mut self, addr: u16, value: u8) {
        let addr = (addr & 0x3FFF) as usize;
        if addr < 0x2000 {
            if self.chr_is_ram {
                self.chr[addr] = value;
            }
        } else {
            self.vram[addr & (NAMETABLE_SPACE - 1)] = value;
        }
    }

    #[inline]
    fn vram_increment(&self) -> u16 {
        if (self.ctrl & 0x04) != 0 { 32 } else { 1 }
    }

    pub fn set_vblank(&mut self, on: bool) {
        if on {
            self.status |= VBLANK;
        } else {
            self.status &= !VBLANK;
        }
    }

    // -------------- Accessors --------------

    pub fn ctrl(&self) -> u8 {
        self.ctrl
    }

    pub fn mask(&self) -> u8 {
        self.mask
    }

    pub fn status(&self) -> u8 {
        self.status
    }

    pub fn oam_addr(&self) -> u8 {
        self.oam_addr
    }

    pub fn oam(&self) -> &[u8; OAM_SIZE] {
        &self.oam
    }

    pub fn scroll(&self) -> (u8, u8) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn vram_addr(&self) -> u16 {
        self.vram_addr
    }

    pub fn latch(&self) -> u8 {
        self.latch
    }

    pub fn chr(&self) -> &[u8] {
        &self.chr
    }

    /// Peek nametable/palette space ($2000..=$3FFF, mirrored).
    pub fn vram(&self, addr: u16) -> u8 {
        self.vram[addr as usize & (NAMETABLE_SPACE - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_only_slots_read_latch() {
        let mut ppu = Ppu::default();
        ppu.write_register(PPUCTRL, 0x90).unwrap();
        assert_eq!(ppu.ctrl(), 0x90);
        assert_eq!(ppu.read_register(PPUCTRL), Ok(0x90));
        assert_eq!(ppu.read_register(PPUDATA), Ok(0x90));
        ppu.write_register(PPUSTATUS, 0x17).unwrap();
        assert_eq!(ppu.latch(), 0x17);
        assert_eq!(ppu.read_register(PPUMASK), Ok(0x17));
    }

    #[test]
    fn status_read_clears_vblank_and_toggle() {
        let mut ppu = Ppu::default();
        ppu.set_vblank(true);
        ppu.write_register(PPUADDR, 0x21).unwrap();
        assert_eq!(ppu.read_register(PPUSTATUS), Ok(0x80));
        assert_eq!(ppu.status() & 0x80, 0);

        // Toggle was reset, so this is a high-byte write again.
        ppu.write_register(PPUADDR, 0x23).unwrap();
        ppu.write_register(PPUADDR, 0xC0).unwrap();
        assert_eq!(ppu.vram_addr(), 0x23C0);
    }

    #[test]
    fn oamdata_increments_oamaddr() {
        let mut ppu = Ppu::default();
        ppu.write_register(OAMADDR, 0x10).unwrap();
        ppu.write_register(OAMDATA, 0xAB).unwrap();
        assert_eq!(ppu.oam_addr(), 0x11);
        ppu.write_register(OAMADDR, 0x10).unwrap();
        assert_eq!(ppu.read_register(OAMDATA), Ok(0xAB));
    }

    #[test]
    fn ppudata_increment_1_or_32() {
        let mut ppu = Ppu::default();
        ppu.write_register(PPUADDR, 0x20).unwrap();
        ppu.write_register(PPUADDR, 0x00).unwrap();
        ppu.write_register(PPUDATA, 0x01).unwrap();
        assert_eq!(ppu.vram_addr(), 0x2001);
        assert_eq!(ppu.vram(0x2000), 0x01);

        ppu.write_register(PPUCTRL, 0x04).unwrap();
        ppu.write_register(PPUDATA, 0x02).unwrap();
        assert_eq!(ppu.vram_addr(), 0x2021);
        assert_eq!(ppu.vram(0x2001), 0x02);
    }

    #[test]
    fn scroll_pairs() {
        let mut ppu = Ppu::default();
        ppu.write_register(PPUSCROLL, 0x12).unwrap();
        ppu.write_register(PPUSCROLL, 0x34).unwrap();
        assert_eq!(ppu.scroll(), (0x12, 0x34));
    }

    #[test]
    fn chr_rom_is_read_only_chr_ram_is_not() {
        let mut rom = Ppu::new(vec![0xCC; 0x2000]);
        rom.write_register(PPUADDR, 0x00).unwrap();
        rom.write_register(PPUADDR, 0x05).unwrap();
        rom.write_register(PPUDATA, 0x11).unwrap();
        assert_eq!(rom.chr()[5], 0xCC);

        let mut ram = Ppu::new(Vec::new());
        assert_eq!(ram.chr().len(), 0x2000);
        ram.write_register(PPUADDR, 0x00).unwrap();
        ram.write_register(PPUADDR, 0x05).unwrap();
        ram.write_register(PPUDATA, 0x11).unwrap();
        assert_eq!(ram.chr()[5], 0x11);
    }

    #[test]
    fn dma_starts_at_oamaddr_and_wraps() {
        let mut ppu = Ppu::default();
        ppu.write_register(OAMADDR, 0xFE).unwrap();
        let mut page = [0u8; OAM_SIZE];
        for (i, b) in page.iter_mut().enumerate() {
            *b = i as u8;
        }
        ppu.oam_dma(&page);
        assert_eq!(ppu.oam()[0xFE], 0x00);
        assert_eq!(ppu.oam()[0x00], 0x02);
        assert_eq!(ppu.oam_addr(), 0xFE);
    }

    #[test]
    fn slot_out_of_range() {
        let mut ppu = Ppu::default();
        assert_eq!(
            ppu.read_register(8),
            Err(BusError::InvalidRegisterAccess { register: 8 })
        );
        assert!(ppu.write_register(9, 0).is_err());
    }
}
