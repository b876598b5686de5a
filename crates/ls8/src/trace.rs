//! Text rendering of execution trace events.

use std::io::{self, Write};

use ls8_core::{disassemble_one, TraceEvent, TraceSink};

/// Trace sink that writes one line per event to `W`.
///
/// Instruction lines have the shape
/// `TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 F4 | LDI R0,8`.
/// The first write error is kept and later events are dropped.
#[derive(Debug)]
pub struct TextTrace<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> TextTrace<W> {
    /// Creates a sink writing to `writer`.
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// Flushes the writer and returns it, or the first write error.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while writing or flushing.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> TraceSink for TextTrace<W> {
    fn on_event(&mut self, event: TraceEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = writeln!(self.writer, "{}", format_event(&event)) {
            self.error = Some(error);
        }
    }
}

/// Renders a single trace event as text.
#[must_use]
pub fn format_event(event: &TraceEvent) -> String {
    match *event {
        TraceEvent::InstructionStart {
            pc,
            bytes,
            registers,
        } => {
            let regs: Vec<String> = registers.iter().map(|r| format!("{r:02X}")).collect();
            let text = disassemble_one(0, &bytes).map_or_else(String::new, |row| row.text());
            format!(
                "TRACE: {pc:02X} | {:02X} {:02X} {:02X} | {} | {text}",
                bytes[0],
                bytes[1],
                bytes[2],
                regs.join(" ")
            )
        }
        TraceEvent::Halted { pc } => format!("TRACE: {pc:02X} | halted"),
        TraceEvent::FaultRaised { cause, pc } => format!("TRACE: {pc:02X} | fault: {cause}"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use ls8_core::{Fault, Machine, TraceEvent, TraceSink};

    use super::{format_event, TextTrace};

    #[test]
    fn instruction_line_matches_trace_layout() {
        let event = TraceEvent::InstructionStart {
            pc: 0,
            bytes: [0x82, 0x00, 0x08],
            registers: [0, 0, 0, 0, 0, 0, 0, 0xF4],
        };

        assert_eq!(
            format_event(&event),
            "TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 F4 | LDI R0,8"
        );
    }

    #[test]
    fn terminal_events_are_rendered() {
        assert_eq!(
            format_event(&TraceEvent::Halted { pc: 0x0B }),
            "TRACE: 0B | halted"
        );
        assert_eq!(
            format_event(&TraceEvent::FaultRaised {
                cause: Fault::UnknownOpcode {
                    opcode: 0xFF,
                    pc: 3
                },
                pc: 3,
            }),
            "TRACE: 03 | fault: unknown opcode 0xff at pc 0x03"
        );
    }

    #[test]
    fn traced_run_writes_one_line_per_instruction_plus_halt() {
        let mut machine = Machine::new();
        machine
            .load_program(&[0x82, 0, 8, 0x47, 0, 0x01])
            .unwrap();
        let mut out = Vec::new();
        let mut trace = TextTrace::new(Vec::new());

        machine.run_traced(&mut out, &mut trace).unwrap();

        let text = String::from_utf8(trace.finish().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("TRACE: 03 | 47 00 01 | 08 00"));
        assert!(lines[1].ends_with("| PRN R0"));
        assert_eq!(lines[3], "TRACE: 05 | halted");
        assert_eq!(out, b"8\n");
    }

    #[derive(Debug)]
    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn first_write_error_is_kept() {
        let mut trace = TextTrace::new(BrokenWriter);
        trace.on_event(TraceEvent::Halted { pc: 0 });
        trace.on_event(TraceEvent::Halted { pc: 1 });

        let error = trace.finish().unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
    }
}
