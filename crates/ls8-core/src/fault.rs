use thiserror::Error;

/// Fault classes matching the machine's error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultClass {
    /// Memory or register access outside the valid range.
    Address,
    /// Fetched byte is not part of the instruction set.
    Decode,
    /// Arithmetic failure inside the ALU.
    Math,
    /// ALU invoked with an operation kind it does not implement.
    UnsupportedOperation,
    /// Host output collaborator rejected a `PRN` write.
    Output,
}

/// Fatal execution faults. Every fault terminates the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Fault {
    /// Memory access outside `0x00..=0xFF`.
    #[error("memory address {address:#06x} is outside the 256-byte address space")]
    AddressOutOfRange {
        /// Offending address.
        address: u16,
    },
    /// Register operand outside `R0..=R7`.
    #[error("register index {index} is outside R0..R7")]
    RegisterOutOfRange {
        /// Offending register index byte.
        index: u8,
    },
    /// Fetched opcode is not part of the instruction set.
    #[error("unknown opcode {opcode:#04x} at pc {pc:#04x}")]
    UnknownOpcode {
        /// Fetched byte.
        opcode: u8,
        /// Address the byte was fetched from.
        pc: u16,
    },
    /// `DIV` with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,
    /// ALU operation code without an implementation.
    #[error("unsupported ALU operation {code:#04x}")]
    UnsupportedAluOperation {
        /// Raw ALU operation code.
        code: u8,
    },
    /// Output collaborator failed while printing a value.
    #[error("output write failed")]
    OutputFailed,
}

impl Fault {
    /// Returns the diagnostics class for this fault.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::AddressOutOfRange { .. } | Self::RegisterOutOfRange { .. } => {
                FaultClass::Address
            }
            Self::UnknownOpcode { .. } => FaultClass::Decode,
            Self::DivisionByZero => FaultClass::Math,
            Self::UnsupportedAluOperation { .. } => FaultClass::UnsupportedOperation,
            Self::OutputFailed => FaultClass::Output,
        }
    }
}
