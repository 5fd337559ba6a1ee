/*!
APU/IO register window, modeled as an inert backing store.

Addressing overview (CPU):
- 0x4000-0x4020: bytes are stored and read back unchanged, indexed by `addr % 0x4000`
- 0x4014: OAM DMA on write (handled by `dma`, never stored here); reads return the stored byte

No audio, controller or frame-counter behavior is modeled.
*/

/// Number of bytes backing $4000..=$4020.
pub const IO_WINDOW_LEN: usize = 0x21;

#[derive(Clone, Debug)]
pub struct ApuRegisters {
    regs: [u8; IO_WINDOW_LEN],
}

impl Default for ApuRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl ApuRegisters {
    pub fn new() -> Self {
        Self {
            regs: [0; IO_WINDOW_LEN],
        }
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.regs[Self::index(addr)]
    }

    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        self.regs[Self::index(addr)] = value;
    }

    #[inline]
    fn index(addr: u16) -> usize {
        (addr % 0x4000) as usize
    }
}
