//! Arithmetic-logic unit over two register operands.

use crate::execute::flags::Flags;
use crate::state::{Register, RegisterFile};
use crate::Fault;

/// ALU operation kinds, valued by their opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AluOp {
    /// `regA := regA + regB`, wrapping.
    Add = 0xA0,
    /// `regA := regA - regB`, wrapping.
    Sub = 0xA1,
    /// `regA := regA * regB`, wrapping.
    Mul = 0xA2,
    /// `regA := regA / regB`, truncating.
    Div = 0xA3,
    /// Compare and set flags without writing either register.
    Cmp = 0xA7,
}

impl AluOp {
    /// Decodes an ALU opcode byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::UnsupportedAluOperation`] for any code outside
    /// `ADD`, `SUB`, `MUL`, `DIV` and `CMP`.
    pub const fn from_opcode(code: u8) -> Result<Self, Fault> {
        match code {
            0xA0 => Ok(Self::Add),
            0xA1 => Ok(Self::Sub),
            0xA2 => Ok(Self::Mul),
            0xA3 => Ok(Self::Div),
            0xA7 => Ok(Self::Cmp),
            _ => Err(Fault::UnsupportedAluOperation { code }),
        }
    }
}

/// Applies `op` to registers `a` and `b`.
///
/// Arithmetic results land in `a`; `CMP` only rewrites `flags`.
///
/// # Errors
///
/// Returns [`Fault::DivisionByZero`] when `DIV` sees a zero divisor. The
/// register file is left untouched in that case.
pub fn apply(
    op: AluOp,
    a: Register,
    b: Register,
    registers: &mut RegisterFile,
    flags: &mut Flags,
) -> Result<(), Fault> {
    let lhs = registers.get(a);
    let rhs = registers.get(b);

    let result = match op {
        AluOp::Add => lhs.wrapping_add(rhs),
        AluOp::Sub => lhs.wrapping_sub(rhs),
        AluOp::Mul => lhs.wrapping_mul(rhs),
        AluOp::Div => lhs.checked_div(rhs).ok_or(Fault::DivisionByZero)?,
        AluOp::Cmp => {
            flags.set_comparison(lhs.cmp(&rhs));
            return Ok(());
        }
    };

    registers.set(a, result);
    Ok(())
}
