//! Instruction disassembly.
//!
//! Rows are rendered in the `LDI R0,8` style used by program listings.
//! Bytes outside the instruction set render as `.byte 0xNN` and consume one
//! byte, so a listing never stalls on data.

use crate::encoding::Opcode;

/// A single disassembled instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassemblyRow {
    /// Starting address of this instruction.
    pub address: u16,
    /// Raw bytes making up the instruction.
    pub bytes: Vec<u8>,
    /// Mnemonic, or `.byte` for unknown opcodes.
    pub mnemonic: &'static str,
    /// Formatted operands (e.g. `R0,8`).
    pub operands: String,
}

impl DisassemblyRow {
    /// Formats the row as `MNEMONIC operands`.
    #[must_use]
    pub fn text(&self) -> String {
        if self.operands.is_empty() {
            self.mnemonic.to_string()
        } else {
            format!("{} {}", self.mnemonic, self.operands)
        }
    }
}

/// Disassembles the instruction starting at `address`.
///
/// Returns `None` when `address` is outside `memory`. A truncated instruction
/// at the end of `memory` is rendered as raw data.
#[must_use]
pub fn disassemble_one(address: u16, memory: &[u8]) -> Option<DisassemblyRow> {
    let start = usize::from(address);
    let byte = *memory.get(start)?;

    let Some(opcode) = Opcode::from_u8(byte) else {
        return Some(data_row(address, byte));
    };

    let len = usize::from(opcode.instruction_len());
    let Some(bytes) = memory.get(start..start + len) else {
        return Some(data_row(address, byte));
    };

    // The first operand is always a register; a second one is a register for
    // ALU instructions and an immediate otherwise.
    let operands = match opcode.operand_count() {
        0 => String::new(),
        1 => register_name(bytes[1]),
        _ if opcode.is_alu() => {
            format!("{},{}", register_name(bytes[1]), register_name(bytes[2]))
        }
        _ => format!("{},{}", register_name(bytes[1]), bytes[2]),
    };

    Some(DisassemblyRow {
        address,
        bytes: bytes.to_vec(),
        mnemonic: opcode.mnemonic(),
        operands,
    })
}

/// Disassembles `image` front to back.
#[must_use]
pub fn disassemble_program(image: &[u8]) -> Vec<DisassemblyRow> {
    let mut rows = Vec::new();
    let mut address = 0_usize;

    while let Ok(addr) = u16::try_from(address) {
        let Some(row) = disassemble_one(addr, image) else {
            break;
        };
        address += row.bytes.len();
        rows.push(row);
    }

    rows
}

fn data_row(address: u16, byte: u8) -> DisassemblyRow {
    DisassemblyRow {
        address,
        bytes: vec![byte],
        mnemonic: ".byte",
        operands: format!("{byte:#04X}"),
    }
}

fn register_name(index: u8) -> String {
    format!("R{index}")
}

#[cfg(test)]
mod tests {
    use super::{disassemble_one, disassemble_program};

    const MULT: [u8; 12] = [0x82, 0, 8, 0x82, 1, 9, 0xA2, 0, 1, 0x47, 0, 0x01];

    #[test]
    fn renders_each_instruction_shape() {
        let texts: Vec<String> = disassemble_program(&MULT)
            .iter()
            .map(super::DisassemblyRow::text)
            .collect();

        assert_eq!(
            texts,
            vec!["LDI R0,8", "LDI R1,9", "MUL R0,R1", "PRN R0", "HLT"]
        );
    }

    #[test]
    fn rows_carry_addresses_and_raw_bytes() {
        let rows = disassemble_program(&MULT);

        assert_eq!(rows[2].address, 6);
        assert_eq!(rows[2].bytes, vec![0xA2, 0, 1]);
        assert_eq!(rows[4].address, 11);
    }

    #[test]
    fn unknown_bytes_render_as_data() {
        let row = disassemble_one(0, &[0xFF]).expect("row inside memory");

        assert_eq!(row.text(), ".byte 0xFF");
        assert_eq!(row.bytes, vec![0xFF]);
    }

    #[test]
    fn truncated_instruction_renders_as_data() {
        let row = disassemble_one(0, &[0x82, 0x00]).expect("row inside memory");
        assert_eq!(row.text(), ".byte 0x82");
    }

    #[test]
    fn address_past_end_yields_nothing() {
        assert!(disassemble_one(3, &[0x01]).is_none());
    }

    #[test]
    fn control_flow_operands_are_registers() {
        let rows = disassemble_program(&[0x50, 0x02, 0x11, 0x55, 0x03, 0x56, 0x04]);
        let texts: Vec<String> = rows.iter().map(super::DisassemblyRow::text).collect();

        assert_eq!(texts, vec!["CALL R2", "RET", "JEQ R3", "JNE R4"]);
    }

    #[test]
    fn operand_shape_follows_opcode_metadata() {
        let rows = disassemble_program(&[0xA7, 0x01, 0x02, 0x45, 0x03, 0x46, 0x04, 0x82, 0x05, 0xFF]);
        let texts: Vec<String> = rows.iter().map(super::DisassemblyRow::text).collect();

        assert_eq!(texts, vec!["CMP R1,R2", "PUSH R3", "POP R4", "LDI R5,255"]);
    }
}
