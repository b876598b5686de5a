//! Fetch-decode-execute pipeline.
//!
//! `HLT`, `CALL` and `RET` are resolved inline by the step loop. Every other
//! instruction goes through [`DISPATCH_TABLE`]. The step loop advances the PC
//! by the instruction length unless the opcode carries the sets-PC bit, in
//! which case the handler owns the PC. Operands are validated before any state
//! is written, so a faulting instruction leaves the machine as it found it.

pub mod alu;
mod flags;

pub use alu::AluOp;
pub use flags::{Flags, FLAG_EQUAL, FLAG_GREATER, FLAG_LESS};

use crate::encoding::Opcode;
use crate::state::Register;
use crate::{
    Fault, Machine, OutputPort, RunOutcome, RunState, StepOutcome, TraceEvent, TraceSink,
};

/// Uniform handler signature for table-dispatched instructions.
pub type Handler = fn(&mut Machine, &mut dyn OutputPort) -> Result<(), Fault>;

/// Immutable opcode-to-handler table.
pub static DISPATCH_TABLE: &[(Opcode, Handler)] = &[
    (Opcode::Ldi, execute_ldi as Handler),
    (Opcode::Prn, execute_prn as Handler),
    (Opcode::Mul, execute_alu as Handler),
    (Opcode::Push, execute_push as Handler),
    (Opcode::Pop, execute_pop as Handler),
    (Opcode::Cmp, execute_alu as Handler),
    (Opcode::Jmp, execute_jmp as Handler),
    (Opcode::Jeq, execute_jeq as Handler),
    (Opcode::Jne, execute_jne as Handler),
];

/// Returns the table handler for a raw opcode byte.
#[must_use]
pub fn handler_for(opcode: u8) -> Option<Handler> {
    DISPATCH_TABLE
        .iter()
        .find(|(entry, _)| entry.as_u8() == opcode)
        .map(|(_, handler)| *handler)
}

enum Flow {
    Continue,
    Halt,
}

/// Executes one instruction and updates the run state.
///
/// Halted and faulted machines report their terminal state without fetching.
pub fn step_one(
    machine: &mut Machine,
    output: &mut dyn OutputPort,
    trace: &mut dyn TraceSink,
) -> StepOutcome {
    match machine.run_state {
        RunState::Faulted(cause) => return StepOutcome::Fault { cause },
        RunState::Halted => return StepOutcome::Halted,
        RunState::Running => {}
    }

    let pc = machine.pc;
    trace.on_event(TraceEvent::InstructionStart {
        pc,
        bytes: [
            machine.memory.peek(pc).unwrap_or(0),
            machine.memory.peek(pc.wrapping_add(1)).unwrap_or(0),
            machine.memory.peek(pc.wrapping_add(2)).unwrap_or(0),
        ],
        registers: machine.registers.snapshot(),
    });

    match execute_one(machine, output) {
        Ok(Flow::Continue) => StepOutcome::Retired,
        Ok(Flow::Halt) => {
            machine.run_state = RunState::Halted;
            trace.on_event(TraceEvent::Halted { pc });
            StepOutcome::Halted
        }
        Err(cause) => {
            machine.run_state = RunState::Faulted(cause);
            trace.on_event(TraceEvent::FaultRaised { cause, pc });
            StepOutcome::Fault { cause }
        }
    }
}

/// Steps until the machine halts or faults.
///
/// # Errors
///
/// Returns the fault that stopped execution, including one latched before
/// this call.
pub fn run_until_halt(
    machine: &mut Machine,
    output: &mut dyn OutputPort,
    trace: &mut dyn TraceSink,
) -> Result<RunOutcome, Fault> {
    let mut steps = 0_u64;
    loop {
        if let Some(cause) = machine.run_state.latched_fault() {
            return Err(cause);
        }
        if machine.run_state == RunState::Halted {
            return Ok(RunOutcome { steps });
        }

        match step_one(machine, output, trace) {
            StepOutcome::Retired | StepOutcome::Halted => steps += 1,
            StepOutcome::Fault { cause } => return Err(cause),
        }
    }
}

fn execute_one(machine: &mut Machine, output: &mut dyn OutputPort) -> Result<Flow, Fault> {
    let pc = machine.pc;
    let byte = machine.memory.read(pc)?;

    let unknown = Fault::UnknownOpcode { opcode: byte, pc };
    let opcode = Opcode::from_u8(byte).ok_or(unknown)?;

    match opcode {
        Opcode::Hlt => return Ok(Flow::Halt),
        Opcode::Call => execute_call(machine)?,
        Opcode::Ret => execute_ret(machine)?,
        _ => {
            let handler = handler_for(byte).ok_or(unknown)?;
            handler(machine, output)?;
            if !opcode.sets_pc() {
                advance(machine, opcode);
            }
        }
    }

    Ok(Flow::Continue)
}

fn operand(machine: &Machine, offset: u16) -> Result<u8, Fault> {
    machine.memory.read(machine.pc.wrapping_add(offset))
}

fn register_operand(machine: &Machine, offset: u16) -> Result<Register, Fault> {
    Register::from_operand(operand(machine, offset)?)
}

fn advance(machine: &mut Machine, opcode: Opcode) {
    machine.pc = machine
        .pc
        .wrapping_add(u16::from(opcode.instruction_len()));
}

fn push_byte(machine: &mut Machine, value: u8) -> Result<(), Fault> {
    let sp = machine.registers.sp().wrapping_sub(1);
    machine.memory.write(u16::from(sp), value)?;
    machine.registers.set_sp(sp);
    Ok(())
}

fn pop_byte(machine: &mut Machine) -> Result<u8, Fault> {
    let sp = machine.registers.sp();
    let value = machine.memory.read(u16::from(sp))?;
    machine.registers.set_sp(sp.wrapping_add(1));
    Ok(value)
}

fn execute_call(machine: &mut Machine) -> Result<(), Fault> {
    let reg = register_operand(machine, 1)?;
    let return_address = machine.pc.wrapping_add(2);
    let return_byte = u8::try_from(return_address).map_err(|_| Fault::AddressOutOfRange {
        address: return_address,
    })?;

    // Target is read after the push so `CALL R7` sees the decremented SP.
    push_byte(machine, return_byte)?;
    machine.pc = u16::from(machine.registers.get(reg));
    Ok(())
}

fn execute_ret(machine: &mut Machine) -> Result<(), Fault> {
    machine.pc = u16::from(pop_byte(machine)?);
    Ok(())
}

fn execute_ldi(machine: &mut Machine, _output: &mut dyn OutputPort) -> Result<(), Fault> {
    let reg = register_operand(machine, 1)?;
    let value = operand(machine, 2)?;
    machine.registers.set(reg, value);
    Ok(())
}

fn execute_prn(machine: &mut Machine, output: &mut dyn OutputPort) -> Result<(), Fault> {
    let value = machine.registers.get(register_operand(machine, 1)?);
    output
        .print_value(value)
        .map_err(|_| Fault::OutputFailed)
}

fn execute_alu(machine: &mut Machine, _output: &mut dyn OutputPort) -> Result<(), Fault> {
    let op = AluOp::from_opcode(operand(machine, 0)?)?;
    let a = register_operand(machine, 1)?;
    let b = register_operand(machine, 2)?;
    alu::apply(op, a, b, &mut machine.registers, &mut machine.flags)
}

fn execute_push(machine: &mut Machine, _output: &mut dyn OutputPort) -> Result<(), Fault> {
    let reg = register_operand(machine, 1)?;
    let sp = machine.registers.sp().wrapping_sub(1);
    machine.registers.set_sp(sp);
    // Read after the decrement: `PUSH R7` stores the new SP.
    let value = machine.registers.get(reg);
    machine.memory.write(u16::from(sp), value)
}

fn execute_pop(machine: &mut Machine, _output: &mut dyn OutputPort) -> Result<(), Fault> {
    let reg = register_operand(machine, 1)?;
    let value = machine.memory.read(u16::from(machine.registers.sp()))?;
    machine.registers.set(reg, value);
    // Increment whatever R7 holds now: `POP R7` ends at the popped value + 1.
    machine.registers.set_sp(machine.registers.sp().wrapping_add(1));
    Ok(())
}

fn execute_jmp(machine: &mut Machine, _output: &mut dyn OutputPort) -> Result<(), Fault> {
    machine.pc = u16::from(machine.registers.get(register_operand(machine, 1)?));
    Ok(())
}

fn execute_jeq(machine: &mut Machine, _output: &mut dyn OutputPort) -> Result<(), Fault> {
    let taken = machine.flags.equal();
    jump_if(machine, taken, Opcode::Jeq)
}

fn execute_jne(machine: &mut Machine, _output: &mut dyn OutputPort) -> Result<(), Fault> {
    let taken = !machine.flags.equal();
    jump_if(machine, taken, Opcode::Jne)
}

fn jump_if(machine: &mut Machine, taken: bool, opcode: Opcode) -> Result<(), Fault> {
    let target = machine.registers.get(register_operand(machine, 1)?);
    if taken {
        machine.pc = u16::from(target);
    } else {
        advance(machine, opcode);
    }
    Ok(())
}
