//! nrom6502 CLI - run an NROM cartridge for a fixed number of instructions.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error, info};

use nrom6502::cpu::trace::TRACE_TARGET;
use nrom6502::{Cartridge, Cpu, CpuConfig, CpuError, DEFAULT_STEPS};

/// 6502 CPU core for NES NROM cartridges
#[derive(Parser, Debug)]
#[command(name = "nrom6502")]
#[command(about = "Run an iNES NROM cartridge on a 6502 CPU core", long_about = None)]
struct RunArgs {
    /// Path to the iNES ROM file
    rom: PathBuf,

    /// Number of instructions to execute
    #[arg(default_value_t = DEFAULT_STEPS)]
    steps: u64,

    /// Start here instead of at the reset vector (hex, e.g. C000 for nestest)
    #[arg(long, value_parser = parse_hex_u16)]
    start_pc: Option<u16>,

    /// Log one nestest-format line per instruction
    #[arg(long)]
    trace: bool,
}

fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let digits = s
        .trim_start_matches("0x")
        .trim_start_matches("0X")
        .trim_start_matches('$');
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid hex address `{s}`: {e}"))
}

fn init_logging(trace: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if trace {
        builder.filter_module(TRACE_TARGET, log::LevelFilter::Trace);
    }
    builder.init();
}

fn load(args: &RunArgs) -> Result<Cpu, CpuError> {
    let cartridge = Cartridge::from_ines_file(&args.rom)?;
    info!(
        "{}: mapper {}, PRG {} bytes, CHR {} bytes",
        args.rom.display(),
        cartridge.mapper_id(),
        cartridge.prg_rom_len(),
        cartridge.chr_rom().len()
    );

    let mut config = CpuConfig::new().with_trace(args.trace);
    if let Some(pc) = args.start_pc {
        config = config.with_start_pc(pc);
    }

    Cpu::with_bus(nrom6502::Bus::from_cartridge(cartridge), config)
}

fn registers(cpu: &Cpu) -> String {
    format!(
        "A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PC:{:04X} CYC:{}",
        cpu.a(),
        cpu.x(),
        cpu.y(),
        cpu.status(),
        cpu.sp(),
        cpu.pc(),
        cpu.cycles()
    )
}

/// Hex rows of 16 bytes, each prefixed with the address of its first byte.
fn hex_rows(base: u16, bytes: &[u8]) -> Vec<String> {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(i, row)| {
            let cells: Vec<String> = row.iter().map(|b| format!("{b:02X}")).collect();
            format!("${:04X}: {}", base as usize + i * 16, cells.join(" "))
        })
        .collect()
}

/// Zero page, stack page and registers at the point a step failed.
fn dump_machine(cpu: &Cpu) {
    let ram = cpu.bus().ram().as_slice();
    debug!("registers: {}", registers(cpu));
    debug!("zero page:");
    for row in hex_rows(0x0000, &ram[0x000..0x100]) {
        debug!("  {row}");
    }
    debug!("stack page (SP=${:02X}):", cpu.sp());
    for row in hex_rows(0x0100, &ram[0x100..0x200]) {
        debug!("  {row}");
    }
}

fn fail(e: &CpuError) -> ExitCode {
    error!("{e}");
    eprintln!("ERROR: {e}");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let args = RunArgs::parse();
    init_logging(args.trace);

    let mut cpu = match load(&args) {
        Ok(cpu) => cpu,
        Err(e) => return fail(&e),
    };

    info!("running {} instructions from ${:04X}", args.steps, cpu.pc());
    if let Err(e) = cpu.run(args.steps) {
        dump_machine(&cpu);
        return fail(&e);
    }

    info!("done: {}", registers(&cpu));
    ExitCode::SUCCESS
}
