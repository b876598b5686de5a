#![no_main]

use libfuzzer_sys::fuzz_target;
use ls8_core::{disassemble_program, Machine, StepOutcome, MEMORY_BYTES};

const STEP_CAP: usize = 4096;

fuzz_target!(|data: &[u8]| {
    let image = &data[..data.len().min(MEMORY_BYTES)];
    let _ = disassemble_program(image);

    let mut machine = Machine::new();
    if machine.load_program(image).is_err() {
        return;
    }

    let mut sink = std::io::sink();
    for _ in 0..STEP_CAP {
        match machine.step(&mut sink) {
            StepOutcome::Retired => {}
            StepOutcome::Halted | StepOutcome::Fault { .. } => break,
        }
    }
});
