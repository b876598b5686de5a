use crate::Fault;

/// Number of general-purpose registers (`R0..R7`).
pub const GENERAL_REGISTER_COUNT: usize = 8;
/// Register reserved as the stack pointer.
pub const STACK_POINTER: Register = Register::R7;
/// Stack pointer value after construction and reset.
pub const STACK_POINTER_RESET: u8 = 0xF4;

/// General-purpose register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
}

impl Register {
    /// Ordered list of all registers.
    pub const ALL: [Self; GENERAL_REGISTER_COUNT] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
    ];

    /// Returns the array index for this register (`0..=7`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decodes a register operand byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::RegisterOutOfRange`] for bytes above 7.
    pub const fn from_operand(index: u8) -> Result<Self, Fault> {
        match index {
            0 => Ok(Self::R0),
            1 => Ok(Self::R1),
            2 => Ok(Self::R2),
            3 => Ok(Self::R3),
            4 => Ok(Self::R4),
            5 => Ok(Self::R5),
            6 => Ok(Self::R6),
            7 => Ok(Self::R7),
            _ => Err(Fault::RegisterOutOfRange { index }),
        }
    }
}

/// Eight byte-wide registers. Stored values are already reduced modulo 256.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterFile {
    gpr: [u8; GENERAL_REGISTER_COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::with_stack_pointer(STACK_POINTER_RESET)
    }
}

impl RegisterFile {
    /// Zeroed register file with `R7` preset to `sp`.
    #[must_use]
    pub const fn with_stack_pointer(sp: u8) -> Self {
        let mut gpr = [0; GENERAL_REGISTER_COUNT];
        gpr[STACK_POINTER.index()] = sp;
        Self { gpr }
    }

    /// Reads a register.
    #[must_use]
    pub const fn get(&self, reg: Register) -> u8 {
        self.gpr[reg.index()]
    }

    /// Writes a register.
    pub const fn set(&mut self, reg: Register, value: u8) {
        self.gpr[reg.index()] = value;
    }

    /// Reads the stack pointer.
    #[must_use]
    pub const fn sp(&self) -> u8 {
        self.get(STACK_POINTER)
    }

    /// Writes the stack pointer.
    pub const fn set_sp(&mut self, value: u8) {
        self.set(STACK_POINTER, value);
    }

    /// All register values in `R0..R7` order.
    #[must_use]
    pub const fn snapshot(&self) -> [u8; GENERAL_REGISTER_COUNT] {
        self.gpr
    }
}
