/*!
core::Cpu - the 6502 CPU façade.

`Cpu` owns everything one run needs: the architectural state (`CpuState`), the
`Bus` (and through it RAM, the mapper and the PPU facade), the instruction
table, the run configuration and an optional trace sink.

Lifecycle
=========
- `power_on(rom, config)` parses the cartridge, builds the Bus and the table,
  and loads PC from the reset vector (or `config.start_pc`).
- `reset(rom)` does the same over the existing CPU, keeping its configuration
  and any installed trace sink.
- `step()` executes exactly one instruction.

Step
====
1. Snapshot `CpuState`.
2. Fetch the opcode at PC, advance PC, look it up.
3. Resolve the operand.
4. Emit a trace line (registers are still pre-instruction here).
5. Run the handler, then add base cycles and dynamic penalties.

If any of this fails the registers are restored from the snapshot. Memory
writes already performed by the failing instruction are not undone.
*/

use log::debug;

use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::config::CpuConfig;
use crate::cpu::addressing::{fetch_byte, resolve};
use crate::cpu::execute::execute;
use crate::cpu::state::{CpuState, Flag};
use crate::cpu::table::InstructionTable;
use crate::cpu::trace::{LogTraceSink, TraceLine, TraceSink};
use crate::error::CpuError;

pub const RESET_VECTOR: u16 = 0xFFFC;

pub struct Cpu {
    state: CpuState,
    bus: Bus,
    table: InstructionTable,
    config: CpuConfig,
    trace: Option<Box<dyn TraceSink>>,
}

impl Cpu {
    /// Parse `rom`, build the machine and reset it.
    pub fn power_on(rom: &[u8], config: &CpuConfig) -> Result<Self, CpuError> {
        let cartridge = Cartridge::from_ines_bytes(rom)?;
        Self::with_bus(Bus::from_cartridge(cartridge), config.clone())
    }

    /// Reset over an already assembled bus.
    pub fn with_bus(mut bus: Bus, config: CpuConfig) -> Result<Self, CpuError> {
        let pc = match config.start_pc {
            Some(pc) => pc,
            None => bus.read_word(RESET_VECTOR)?,
        };
        debug!(
            "reset: PC=${:04X} ({})",
            pc,
            if config.start_pc.is_some() { "override" } else { "vector" }
        );

        let trace: Option<Box<dyn TraceSink>> = if config.trace {
            Some(Box::new(LogTraceSink))
        } else {
            None
        };

        Ok(Self {
            state: CpuState::reset_to(pc),
            bus,
            table: InstructionTable::new(),
            config,
            trace,
        })
    }

    /// Reload `rom` and reset. On failure the current machine is left untouched.
    pub fn reset(&mut self, rom: &[u8]) -> Result<(), CpuError> {
        let fresh = Self::power_on(rom, &self.config)?;
        let sink = self.trace.take();
        *self = fresh;
        if sink.is_some() {
            self.trace = sink;
        }
        Ok(())
    }

    /// Execute one instruction, tracing through the installed sink if any.
    pub fn step(&mut self) -> Result<(), CpuError> {
        let mut sink = self.trace.take();
        let result = match sink.as_mut() {
            Some(s) => self.step_inner(Some(&mut **s)),
            None => self.step_inner(None),
        };
        self.trace = sink;
        result
    }

    /// Execute one instruction, tracing into `sink`.
    pub fn step_traced(&mut self, sink: &mut dyn TraceSink) -> Result<(), CpuError> {
        self.step_inner(Some(sink))
    }

    /// Execute up to `steps` instructions, stopping at the first error.
    pub fn run(&mut self, steps: u64) -> Result<(), CpuError> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    fn step_inner(&mut self, sink: Option<&mut dyn TraceSink>) -> Result<(), CpuError> {
        let snapshot = self.state;
        let result = self.try_step(snapshot, sink);
        if result.is_err() {
            self.state = snapshot;
        }
        result
    }

    fn try_step(
        &mut self,
        start: CpuState,
        sink: Option<&mut dyn TraceSink>,
    ) -> Result<(), CpuError> {
        let opcode = fetch_byte(&mut self.state, &mut self.bus)?;
        let desc = *self
            .table
            .get(opcode)
            .ok_or(CpuError::UnimplementedOpcode {
                opcode,
                pc: start.pc,
            })?;

        let operand = resolve(&mut self.state, &mut self.bus, desc.mode)?;

        if let Some(sink) = sink {
            sink.record(&TraceLine::new(start, desc, operand).format());
        }

        let mut extra = execute(&mut self.state, &mut self.bus, desc.mnemonic, &operand)?;
        if operand.page_crossed && desc.mnemonic.has_page_cross_penalty() {
            extra += 1;
        }
        self.state.cycles += u64::from(desc.cycles) + u64::from(extra);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Flags
    // ---------------------------------------------------------------------

    pub fn get_flag(&self, flag: Flag) -> bool {
        self.state.get_flag(flag)
    }

    pub fn set_flag(&mut self, flag: Flag, on: bool) {
        self.state.set_flag(flag, on);
    }

    // ---------------------------------------------------------------------
    // Register accessors
    // ---------------------------------------------------------------------
    pub fn a(&self) -> u8 {
        self.state.a
    }
    pub fn x(&self) -> u8 {
        self.state.x
    }
    pub fn y(&self) -> u8 {
        self.state.y
    }
    pub fn sp(&self) -> u8 {
        self.state.sp
    }
    pub fn pc(&self) -> u16 {
        self.state.pc
    }
    pub fn status(&self) -> u8 {
        self.state.status
    }
    pub fn cycles(&self) -> u64 {
        self.state.cycles
    }

    /// Immutable view of the registers (for inspection / testing).
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    /// Install a sink receiving one line per `step`.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.trace = Some(sink);
    }

    pub fn clear_trace_sink(&mut self) {
        self.trace = None;
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("state", &self.state)
            .field("bus", &self.bus)
            .field("config", &self.config)
            .field("tracing", &self.trace.is_some())
            .finish()
    }
}

// -------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------
