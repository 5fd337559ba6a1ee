//! Run-time configuration for the CPU core and the command-line driver.

/// Number of instructions the driver executes when no count is given.
///
/// This is the length of the automated portion of the nestest conformance log.
pub const DEFAULT_STEPS: u64 = 8991;

/// Options applied at reset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CpuConfig {
    /// Start executing here instead of at the address stored in the reset vector.
    pub start_pc: Option<u16>,
    /// Emit one trace line per instruction through the `log` facade.
    pub trace: bool,
}

impl CpuConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_pc(mut self, pc: u16) -> Self {
        self.start_pc = Some(pc);
        self
    }

    pub fn with_trace(mut self, on: bool) -> Self {
        self.trace = on;
        self
    }
}
