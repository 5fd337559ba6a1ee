/*!
Error types shared by the loader, the bus and the CPU core.

Every failure is terminal for the current run. Loader errors surface before
any CPU state exists; bus and decode errors surface from `Cpu::step` with the
registers rolled back to the start of the failing instruction.
*/

use thiserror::Error;

/// Failures while parsing an iNES image.
#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("ROM image is empty")]
    EmptyFile,

    #[error("invalid iNES header: {0}")]
    InvalidHeader(&'static str),

    #[error("unsupported cartridge feature: {0}")]
    UnsupportedFeature(String),

    #[error("ROM image truncated: header declares {expected} bytes, file has {actual}")]
    TruncatedFile { expected: usize, actual: usize },

    #[error("failed to read ROM file")]
    Io(#[from] std::io::Error),
}

/// Direction of a rejected bus access.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Access::Read => f.write_str("read"),
            Access::Write => f.write_str("write"),
        }
    }
}

/// Failures routing a CPU access through the address space.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BusError {
    #[error("invalid bus {access} at ${addr:04X}")]
    InvalidBusAddress { addr: u16, access: Access },

    #[error("invalid PPU register slot {register}")]
    InvalidRegisterAccess { register: u16 },
}

/// Anything that can stop the CPU.
#[derive(Debug, Error)]
pub enum CpuError {
    #[error(transparent)]
    Cartridge(#[from] CartridgeError),

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error("unimplemented opcode ${opcode:02X} at ${pc:04X}")]
    UnimplementedOpcode { opcode: u8, pc: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_addresses() {
        let e = BusError::InvalidBusAddress {
            addr: 0x5000,
            access: Access::Read,
        };
        assert_eq!(e.to_string(), "invalid bus read at $5000");

        let e = CpuError::UnimplementedOpcode {
            opcode: 0x02,
            pc: 0xC000,
        };
        assert_eq!(e.to_string(), "unimplemented opcode $02 at $C000");
    }

    #[test]
    fn bus_error_converts_into_cpu_error() {
        let e: CpuError = BusError::InvalidRegisterAccess { register: 9 }.into();
        assert!(matches!(
            e,
            CpuError::Bus(BusError::InvalidRegisterAccess { register: 9 })
        ));
    }
}
