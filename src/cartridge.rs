/*!
Cartridge loader for iNES images.

Features:
- Parse the 16-byte iNES header from bytes or a file path
- Copy PRG ROM into an owned buffer handed to the mapper, and CHR ROM into an owned
  buffer handed to the PPU register facade
- Report mirroring, battery, mapper id and container format as metadata

Notes:
- NES 2.0 headers are detected and parsed exactly like iNES 1.0.
- Only NROM is instantiated. A non-zero mapper id is logged and loaded as NROM.
- Images declaring a trainer are rejected.
- PRG RAM allocation policy:
  - If header byte 8 (PRG-RAM size in 8 KiB units) is 0, allocate 8 KiB by convention.
  - Otherwise allocate size_in_units * 8 KiB.
*/

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::error::CartridgeError;
use crate::mapper::{Mapper, Nrom};

pub const HEADER_LEN: usize = 16;
pub const PRG_BANK_LEN: usize = 16 * 1024;
pub const CHR_BANK_LEN: usize = 8 * 1024;
pub const PRG_RAM_BANK_LEN: usize = 8 * 1024;

const MAGIC: &[u8; 4] = b"NES\x1A";
const TRAINER_FLAG: u8 = 0b0010_0000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InesVersion {
    Ines1,
    Ines2, // parsed as Ines1
}

pub struct Cartridge {
    mapper: Box<dyn Mapper>,
    chr_rom: Vec<u8>,

    mapper_id: u16,
    mirroring: Mirroring,
    battery: bool,
    format: InesVersion,

    prg_rom_len: usize,
    prg_ram_len: usize,
}

impl std::fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartridge")
            .field("mapper_id", &self.mapper_id)
            .field("mirroring", &self.mirroring)
            .field("battery", &self.battery)
            .field("format", &self.format)
            .field("prg_rom_len", &self.prg_rom_len)
            .field("chr_rom_len", &self.chr_rom.len())
            .field("prg_ram_len", &self.prg_ram_len)
            .finish()
    }
}

impl Cartridge {
    // -------------- Construction --------------

    /// Parse raw iNES bytes and construct the NROM mapper over the PRG image.
    pub fn from_ines_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.is_empty() {
            return Err(CartridgeError::EmptyFile);
        }
        if data.len() < 8 {
            return Err(CartridgeError::InvalidHeader("file shorter than 8 bytes"));
        }
        if &data[0..4] != MAGIC {
            return Err(CartridgeError::InvalidHeader("missing NES<1A> signature"));
        }

        let flags7 = data[7];
        let format = if (flags7 & 0x0C) == 0x08 {
            InesVersion::Ines2
        } else {
            InesVersion::Ines1
        };
        match format {
            InesVersion::Ines2 => info!("Found {} byte NES 2.0 file", data.len()),
            InesVersion::Ines1 => info!("Found {} byte iNES 1.0 file", data.len()),
        }

        if data.len() < HEADER_LEN {
            return Err(CartridgeError::InvalidHeader("incomplete header"));
        }

        let prg_rom_len = data[4] as usize * PRG_BANK_LEN;
        let chr_rom_len = data[5] as usize * CHR_BANK_LEN;
        let expected = HEADER_LEN + prg_rom_len + chr_rom_len;
        if data.len() < expected {
            return Err(CartridgeError::TruncatedFile {
                expected,
                actual: data.len(),
            });
        }

        let flags6 = data[6];
        if flags6 & TRAINER_FLAG != 0 {
            return Err(CartridgeError::UnsupportedFeature(
                "512-byte trainer".to_string(),
            ));
        }

        // Mapper ID: high nibble from flags7 and low nibble from flags6
        let mapper_id = ((flags7 & 0xF0) | (flags6 >> 4)) as u16;

        let mirroring = if (flags6 & 0b0000_1000) != 0 {
            Mirroring::FourScreen
        } else if (flags6 & 0b0000_0001) != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };
        let battery = (flags6 & 0b0000_0010) != 0;

        let prg_ram_len = match data[8] {
            0 => PRG_RAM_BANK_LEN,
            units => units as usize * PRG_RAM_BANK_LEN,
        };

        info!(
            "Mapper ID {} PRG_ROM sz {} CHR_ROM sz {} PRG_RAM sz {}",
            mapper_id, prg_rom_len, chr_rom_len, prg_ram_len
        );
        if mapper_id != 0 {
            warn!("mapper {mapper_id} is not implemented; loading as NROM");
        }

        let prg_start = HEADER_LEN;
        let chr_start = prg_start + prg_rom_len;
        let prg_rom = data[prg_start..chr_start].to_vec();
        let chr_rom = data[chr_start..chr_start + chr_rom_len].to_vec();

        Ok(Self {
            mapper: Box::new(Nrom::new(prg_rom, prg_ram_len)),
            chr_rom,
            mapper_id,
            mirroring,
            battery,
            format,
            prg_rom_len,
            prg_ram_len,
        })
    }

    /// Load a cartridge from an iNES file (.nes).
    pub fn from_ines_file<P: AsRef<Path>>(path: P) -> Result<Self, CartridgeError> {
        let bytes = fs::read(path)?;
        Self::from_ines_bytes(&bytes)
    }

    /// Split into the mapper (owning PRG) and the CHR image (for the PPU facade).
    pub fn into_parts(self) -> (Box<dyn Mapper>, Vec<u8>) {
        (self.mapper, self.chr_rom)
    }

    // -------------- Accessors --------------

    pub fn mapper_id(&self) -> u16 {
        self.mapper_id
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn battery_backed(&self) -> bool {
        self.battery
    }

    pub fn format(&self) -> InesVersion {
        self.format
    }

    pub fn prg_rom_len(&self) -> usize {
        self.prg_rom_len
    }

    pub fn chr_rom(&self) -> &[u8] {
        &self.chr_rom
    }

    pub fn prg_ram_len(&self) -> usize {
        self.prg_ram_len
    }
}
