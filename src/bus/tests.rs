use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::error::{Access, BusError};
use crate::test_utils::{build_ines, build_nrom_with_prg};

fn bus_with(rom: &[u8]) -> Bus {
    Bus::from_cartridge(Cartridge::from_ines_bytes(rom).expect("parse"))
}

fn nrom_bus() -> Bus {
    bus_with(&build_nrom_with_prg(&[0xEA], 1, 1, None))
}

#[test]
fn ram_mirroring() {
    let mut bus = nrom_bus();

    bus.write(0x0001, 0xAA, 0).unwrap();
    assert_eq!(bus.read(0x0001), Ok(0xAA));
    assert_eq!(bus.read(0x0801), Ok(0xAA));
    assert_eq!(bus.read(0x1801), Ok(0xAA));

    bus.write(0x1801, 0x55, 0).unwrap();
    assert_eq!(bus.read(0x0001), Ok(0x55));
    assert_eq!(bus.ram().read(0x0001), 0x55);
}

#[test]
fn ppu_reg_mirror() {
    let mut bus = nrom_bus();
    // PPUCTRL via mirror $2008
    bus.write(0x2008, 0x80, 0).unwrap();
    assert_eq!(bus.ppu().ctrl(), 0x80);
    // Write-only slot reads back the open-bus latch
    assert_eq!(bus.read(0x3FF8), Ok(0x80));
}

#[test]
fn ppustatus_read_clears_vblank() {
    let mut bus = nrom_bus();
    bus.ppu_mut().set_vblank(true);
    assert_eq!(bus.read(0x2002), Ok(0x80));
    assert_eq!(bus.read(0x200A), Ok(0x00));
}

#[test]
fn io_window_is_backing_store() {
    let mut bus = nrom_bus();
    bus.write(0x4015, 0x0F, 0).unwrap();
    bus.write(0x4020, 0x44, 0).unwrap();
    assert_eq!(bus.read(0x4015), Ok(0x0F));
    assert_eq!(bus.read(0x4020), Ok(0x44));
    assert_eq!(bus.apu().read(0x4015), 0x0F);
}

#[test]
fn expansion_area_rejected() {
    let mut bus = nrom_bus();
    assert_eq!(
        bus.read(0x4021),
        Err(BusError::InvalidBusAddress {
            addr: 0x4021,
            access: Access::Read
        })
    );
    assert_eq!(
        bus.write(0x5FFF, 0, 0),
        Err(BusError::InvalidBusAddress {
            addr: 0x5FFF,
            access: Access::Write
        })
    );
}

#[test]
fn prg_ram_basic() {
    let mut bus = bus_with(&build_ines(1, 1, 0, 0, 1));
    assert_eq!(bus.write(0x6000, 0x42, 0), Ok(0));
    assert_eq!(bus.read(0x6000), Ok(0x42));
    assert_eq!(bus.read(0x7FFF), Ok(0x00));
}

#[test]
fn prg_rom_write_rejected() {
    let mut bus = nrom_bus();
    assert!(matches!(
        bus.write(0x8000, 0x01, 0),
        Err(BusError::InvalidBusAddress { addr: 0x8000, .. })
    ));
}

#[test]
fn nrom_128_mirrors_upper_bank() {
    let mut bus = nrom_bus();
    assert_eq!(bus.read(0x8000), Ok(0xEA));
    assert_eq!(bus.read(0xC000), Ok(0xEA));
    // Reset vector defaults to $8000
    assert_eq!(bus.read_word(0xFFFC), Ok(0x8000));
}

#[test]
fn read_word_little_endian_and_wraps() {
    let mut bus = nrom_bus();
    bus.write(0x0010, 0x34, 0).unwrap();
    bus.write(0x0011, 0x12, 0).unwrap();
    assert_eq!(bus.read_word(0x0010), Ok(0x1234));

    // $FFFF supplies the low byte, the high byte comes from $0000.
    bus.write(0x0000, 0x55, 0).unwrap();
    assert_eq!(bus.read(0xFFFF), Ok(0x80));
    assert_eq!(bus.read_word(0xFFFF), Ok(0x5580));
}

#[test]
fn oam_dma_copies_256_bytes() {
    let mut bus = nrom_bus();
    for i in 0..256u16 {
        bus.write(0x0200 + i, (i & 0xFF) as u8, 0).unwrap();
    }
    bus.write(0x2003, 0xFE, 0).unwrap();

    assert_eq!(bus.write(0x4014, 0x02, 10), Ok(513));

    // OAM should now contain 0x00 at 0xFE, 0x01 at 0xFF, 0x02 at 0x00, ...
    let oam = bus.ppu().oam();
    assert_eq!(oam[0xFE], 0x00);
    assert_eq!(oam[0xFF], 0x01);
    assert_eq!(oam[0x00], 0x02);
    assert_eq!(oam[0x01], 0x03);
}

#[test]
fn oam_dma_odd_cycle_costs_514() {
    let mut bus = nrom_bus();
    assert_eq!(bus.write(0x4014, 0x03, 11), Ok(514));
}

#[test]
fn oam_dma_from_prg_rom() {
    let mut bus = nrom_bus();
    bus.write(0x4014, 0x80, 0).unwrap();
    assert_eq!(bus.ppu().oam()[0], 0xEA);
}

#[test]
fn oam_dma_from_unmapped_page_fails() {
    let mut bus = nrom_bus();
    assert!(bus.write(0x4014, 0x50, 0).is_err());
}
