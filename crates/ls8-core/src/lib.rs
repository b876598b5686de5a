//! Core fetch-decode-execute engine for the LS-8 byte machine.

/// Flat 256-byte memory model.
pub mod memory;
pub use memory::{Memory, MEMORY_BYTES};

/// Public host-facing API and integration types.
pub mod api;
pub use api::{
    Machine, MachineConfig, NoTrace, OutputPort, RunOutcome, StepOutcome, TraceEvent, TraceSink,
};

/// Register file and run-state model.
pub mod state;
pub use state::{
    Register, RegisterFile, RunState, GENERAL_REGISTER_COUNT, STACK_POINTER, STACK_POINTER_RESET,
};

/// Opcode values and instruction metadata.
pub mod encoding;
pub use encoding::{Opcode, OPCODE_TABLE};

/// Fault taxonomy for fatal execution errors.
pub mod fault;
pub use fault::{Fault, FaultClass};

/// Instruction execution pipeline, ALU and flags.
pub mod execute;
pub use execute::{
    handler_for, run_until_halt, step_one, AluOp, Flags, Handler, DISPATCH_TABLE, FLAG_EQUAL,
    FLAG_GREATER, FLAG_LESS,
};

/// Listing-style disassembly.
pub mod disasm;
pub use disasm::{disassemble_one, disassemble_program, DisassemblyRow};

#[cfg(test)]
use proptest as _;
