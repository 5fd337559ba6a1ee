#![doc = r#"
nrom6502 library crate.

A 6502 CPU core for NES NROM cartridges, complete enough to reproduce the
opening of the nestest conformance log.

Modules:
- bus: CPU address space (RAM, PPU register window, APU/IO backing store, OAM DMA, cartridge)
- cartridge: iNES loader and cartridge metadata; constructs the NROM mapper
- config: run-time options (start address, tracing) and the default step count
- cpu: 6502 CPU core (facade + state + addressing + table + execute + trace)
- error: loader, bus and CPU error types
- mapper: Mapper trait and NROM (mapper 0) implementation
- ppu: PPU register facade (register latches, OAM, CHR)

In tests, shared iNES builders are available under `crate::test_utils`.
"#]

pub mod bus;
pub mod cartridge;
pub mod config;
pub mod cpu;
pub mod error;
pub mod mapper;
pub mod ppu;

// Re-export commonly used types at the crate root for convenience.
pub use bus::Bus;
pub use cartridge::Cartridge;
pub use config::{CpuConfig, DEFAULT_STEPS};
pub use cpu::{Cpu, CpuState, Flag, LogTraceSink, TraceSink};
pub use error::{BusError, CartridgeError, CpuError};

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
