//! Public host-facing API for embedding the machine.

use std::io;

use crate::execute::{run_until_halt, step_one, Flags};
use crate::state::{RegisterFile, GENERAL_REGISTER_COUNT, STACK_POINTER_RESET};
use crate::{Fault, Memory, RunState};

/// Construction-time configuration for a machine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Value loaded into the stack pointer (`R7`) on construction and reset.
    pub stack_pointer_reset: u8,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            stack_pointer_reset: STACK_POINTER_RESET,
        }
    }
}

/// One independently owned machine: memory, registers, flags and PC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    pub(crate) config: MachineConfig,
    pub(crate) memory: Memory,
    pub(crate) registers: RegisterFile,
    pub(crate) flags: Flags,
    pub(crate) pc: u16,
    pub(crate) run_state: RunState,
}

impl Default for Machine {
    fn default() -> Self {
        Self::with_config(MachineConfig::default())
    }
}

impl Machine {
    /// Creates a machine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a machine with zeroed memory and the configured stack pointer.
    #[must_use]
    pub fn with_config(config: MachineConfig) -> Self {
        Self {
            config,
            memory: Memory::default(),
            registers: RegisterFile::with_stack_pointer(config.stack_pointer_reset),
            flags: Flags::default(),
            pc: 0,
            run_state: RunState::Running,
        }
    }

    /// Writes one image byte at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] when `address` is outside memory.
    pub fn load_byte(&mut self, address: u16, byte: u8) -> Result<(), Fault> {
        self.memory.write(address, byte)
    }

    /// Writes `image` into memory starting at address 0.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] for the first byte that does not
    /// fit; bytes before it are already written.
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), Fault> {
        for (offset, byte) in image.iter().enumerate() {
            let address = u16::try_from(offset).unwrap_or(u16::MAX);
            self.load_byte(address, *byte)?;
        }
        Ok(())
    }

    /// Executes one instruction.
    pub fn step(&mut self, output: &mut dyn OutputPort) -> StepOutcome {
        step_one(self, output, &mut NoTrace)
    }

    /// Executes one instruction, reporting trace events to `trace`.
    pub fn step_traced(
        &mut self,
        output: &mut dyn OutputPort,
        trace: &mut dyn TraceSink,
    ) -> StepOutcome {
        step_one(self, output, trace)
    }

    /// Runs until `HLT` retires.
    ///
    /// # Errors
    ///
    /// Returns the first fault raised; the machine stays latched on it.
    pub fn run(&mut self, output: &mut dyn OutputPort) -> Result<RunOutcome, Fault> {
        run_until_halt(self, output, &mut NoTrace)
    }

    /// Runs until `HLT` retires, reporting trace events to `trace`.
    ///
    /// # Errors
    ///
    /// Returns the first fault raised; the machine stays latched on it.
    pub fn run_traced(
        &mut self,
        output: &mut dyn OutputPort,
        trace: &mut dyn TraceSink,
    ) -> Result<RunOutcome, Fault> {
        run_until_halt(self, output, trace)
    }

    /// Restores registers, flags, PC and run state. Memory is preserved.
    pub fn reset(&mut self) {
        self.registers = RegisterFile::with_stack_pointer(self.config.stack_pointer_reset);
        self.flags = Flags::default();
        self.pc = 0;
        self.run_state = RunState::Running;
    }

    /// Configuration this machine was built with.
    #[must_use]
    pub const fn config(&self) -> MachineConfig {
        self.config
    }

    /// Memory image.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Register file.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Mutable register file, for hosts seeding state before a run.
    pub const fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.registers
    }

    /// Condition flags.
    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// Program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Moves the program counter.
    pub const fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    /// Current execution state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }
}

/// Output collaborator written by `PRN`.
pub trait OutputPort {
    /// Emits `value` in decimal followed by a line terminator.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the host cannot accept output.
    fn print_value(&mut self, value: u8) -> io::Result<()>;
}

impl<W: io::Write + ?Sized> OutputPort for W {
    fn print_value(&mut self, value: u8) -> io::Result<()> {
        writeln!(self, "{value}")
    }
}

/// Output status from one instruction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction retired and the machine is still running.
    Retired,
    /// Machine is halted, either by this step's `HLT` or earlier.
    Halted,
    /// Fault raised by this step or latched by an earlier one.
    Fault {
        /// Fault that terminated execution.
        cause: Fault,
    },
}

/// Outcome of a run that reached `HLT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Instructions executed by this call, `HLT` included.
    pub steps: u64,
}

/// Trace events emitted at instruction boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// Emitted before an instruction executes.
    InstructionStart {
        /// Program counter used for the fetch.
        pc: u16,
        /// Bytes at `pc`, `pc + 1` and `pc + 2`; zero past the end of memory.
        bytes: [u8; 3],
        /// Register values before execution.
        registers: [u8; GENERAL_REGISTER_COUNT],
    },
    /// `HLT` retired.
    Halted {
        /// Address of the `HLT` instruction.
        pc: u16,
    },
    /// Fault raised during fetch or execute.
    FaultRaised {
        /// Fault that terminated execution.
        cause: Fault,
        /// Program counter of the faulting instruction.
        pc: u16,
    },
}

/// Sink trait for trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

/// Trace sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn on_event(&mut self, _event: TraceEvent) {}
}
