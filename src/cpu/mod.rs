/*!
cpu - the 6502 CPU core.

```text
    state.rs      - Registers, flags, cycle counter and the stack helpers.
    addressing.rs - Addressing modes and operand resolution.
    table.rs      - Opcode table (mnemonic, mode, base cycles per opcode).
    execute.rs    - Instruction semantics; one exhaustive match over `Mnemonic`.
    trace.rs      - nestest-format trace lines and the sinks that receive them.
    core/         - `Cpu` façade: reset, step, run.
```

Usage:
```no_run
use nrom6502::{Cpu, CpuConfig};

let rom = std::fs::read("nestest.nes").unwrap();
let mut cpu = Cpu::power_on(&rom, &CpuConfig::new().with_start_pc(0xC000)).unwrap();
cpu.step().unwrap();
```
*/

pub mod addressing;
pub mod core;
pub mod execute;
pub mod state;
pub mod table;
pub mod trace;

pub use crate::cpu::addressing::{AddressingMode, ResolvedOperand};
pub use crate::cpu::core::Cpu;
pub use crate::cpu::state::{CpuState, Flag};
pub use crate::cpu::table::{InstructionDescriptor, InstructionTable, Mnemonic};
pub use crate::cpu::trace::{LogTraceSink, TraceLine, TraceSink};
