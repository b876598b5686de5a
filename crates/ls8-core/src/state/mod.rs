//! Machine state model primitives.

/// Register file types and storage model.
pub mod registers;

pub use registers::{
    Register, RegisterFile, GENERAL_REGISTER_COUNT, STACK_POINTER, STACK_POINTER_RESET,
};
use crate::Fault;

/// Execution state machine for host-observable control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// Ready to fetch the next instruction.
    #[default]
    Running,
    /// `HLT` retired; terminal until reset.
    Halted,
    /// A fatal fault is latched; terminal until reset.
    Faulted(Fault),
}

impl RunState {
    /// Returns the latched fault, if this state is faulted.
    #[must_use]
    pub const fn latched_fault(self) -> Option<Fault> {
        match self {
            Self::Faulted(cause) => Some(cause),
            Self::Running | Self::Halted => None,
        }
    }

    /// Returns `true` when no further instruction can execute.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}
