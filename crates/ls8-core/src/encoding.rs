/// Instruction-set opcodes, valued by their machine-code byte.
///
/// Opcode bytes follow the `AABCDDDD` layout: `AA` is the operand count, `B`
/// marks ALU operations and `C` marks instructions that set the PC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Opcode {
    Hlt = 0x01,
    Ret = 0x11,
    Push = 0x45,
    Pop = 0x46,
    Prn = 0x47,
    Call = 0x50,
    Jmp = 0x54,
    Jeq = 0x55,
    Jne = 0x56,
    Ldi = 0x82,
    Mul = 0xA2,
    Cmp = 0xA7,
}

/// Every supported opcode. Any byte not listed here is unknown.
pub const OPCODE_TABLE: [Opcode; 12] = [
    Opcode::Hlt,
    Opcode::Ret,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Prn,
    Opcode::Call,
    Opcode::Jmp,
    Opcode::Jeq,
    Opcode::Jne,
    Opcode::Ldi,
    Opcode::Mul,
    Opcode::Cmp,
];

const ALU_BIT: u8 = 0b0010_0000;
const SETS_PC_BIT: u8 = 0b0001_0000;

impl Opcode {
    /// Decodes a fetched byte.
    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Self::Hlt),
            0x11 => Some(Self::Ret),
            0x45 => Some(Self::Push),
            0x46 => Some(Self::Pop),
            0x47 => Some(Self::Prn),
            0x50 => Some(Self::Call),
            0x54 => Some(Self::Jmp),
            0x55 => Some(Self::Jeq),
            0x56 => Some(Self::Jne),
            0x82 => Some(Self::Ldi),
            0xA2 => Some(Self::Mul),
            0xA7 => Some(Self::Cmp),
            _ => None,
        }
    }

    /// Raw machine-code byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Number of operand bytes following the opcode.
    #[must_use]
    pub const fn operand_count(self) -> u8 {
        self.as_u8() >> 6
    }

    /// Total instruction length in bytes, opcode included.
    #[must_use]
    pub const fn instruction_len(self) -> u8 {
        self.operand_count() + 1
    }

    /// Whether the instruction is executed by the ALU.
    #[must_use]
    pub const fn is_alu(self) -> bool {
        self.as_u8() & ALU_BIT != 0
    }

    /// Whether the instruction may redirect the PC itself.
    #[must_use]
    pub const fn sets_pc(self) -> bool {
        self.as_u8() & SETS_PC_BIT != 0
    }

    /// Assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Hlt => "HLT",
            Self::Ret => "RET",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::Prn => "PRN",
            Self::Call => "CALL",
            Self::Jmp => "JMP",
            Self::Jeq => "JEQ",
            Self::Jne => "JNE",
            Self::Ldi => "LDI",
            Self::Mul => "MUL",
            Self::Cmp => "CMP",
        }
    }
}
