/*!
OAM DMA ($4014).

Behavioral model
- A CPU write of value `N` to $4014 copies the 256 bytes at `$NN00..=$NNFF` into PPU OAM,
  starting at OAMADDR.
- Source bytes are fetched through the normal CPU read path, so any device side effects
  apply exactly as they would for the CPU.
- The transfer completes synchronously. The CPU is stalled for 513 cycles, plus one
  alignment cycle when the write lands on an odd CPU cycle; the stall is returned to
  the caller as extra cycles rather than ticked here.
*/

use log::debug;

use crate::bus::Bus;
use crate::error::BusError;
use crate::ppu::OAM_SIZE;

/// Stall cycles for a DMA started on an even CPU cycle.
pub const DMA_BASE_CYCLES: u32 = 513;

/// CPU stall for a DMA triggered at `cpu_cycle`: 513 if even, 514 if odd.
#[inline]
pub fn stall_cycles(cpu_cycle: u64) -> u32 {
    DMA_BASE_CYCLES + (cpu_cycle & 1) as u32
}

/// Copy page `src_page` into OAM and return the CPU stall.
pub fn oam_dma(bus: &mut Bus, src_page: u8, cpu_cycle: u64) -> Result<u32, BusError> {
    let base = (src_page as u16) << 8;
    let mut buf = [0u8; OAM_SIZE];
    for (i, slot) in buf.iter_mut().enumerate() {
        *slot = bus.read(base | i as u16)?;
    }
    bus.ppu.oam_dma(&buf);

    let stall = stall_cycles(cpu_cycle);
    debug!("OAM DMA from ${base:04X}, stall {stall} cycles");
    Ok(stall)
}
