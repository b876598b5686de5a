//! CLI entry point for the LS-8 runner.

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ls8::{load_image, LoadError, TextTrace};
use ls8_core::{disassemble_program, Machine};
#[cfg(test)]
use tempfile as _;
use thiserror as _;

const USAGE_TEXT: &str = "\
Usage: ls8 <command> [options]

Commands:
  run <program> [--trace]  Load a program image and execute it
  disasm <program>         Print a listing of a program image
  <program>                Shorthand for `run <program>`

Options:
  -t, --trace  Write one trace line per instruction to stderr (run only)
  -h, --help   Show this help message

Exit codes:
  0 halted, 1 usage error, 2 program could not be loaded, 3 runtime fault

Examples:
  ls8 run mult.ls8
  ls8 run mult.ls8 --trace
  ls8 disasm mult.ls8
";

const EXIT_USAGE: i32 = 1;
const EXIT_LOAD: i32 = 2;
const EXIT_FAULT: i32 = 3;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run(RunArgs),
    Disasm(DisasmArgs),
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    program: PathBuf,
    trace: bool,
}

#[derive(Debug, PartialEq, Eq)]
struct DisasmArgs {
    program: PathBuf,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "run" => parse_run_args(args)
            .map(Command::Run)
            .map(ParseResult::Command),
        "disasm" => parse_disasm_args(args)
            .map(Command::Disasm)
            .map(ParseResult::Command),
        other if other.starts_with('-') => Err(format!("unknown option: {other}")),
        _ => parse_run_args(std::iter::once(first).chain(args))
            .map(Command::Run)
            .map(ParseResult::Command),
    }
}

fn parse_run_args(args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let mut program: Option<PathBuf> = None;
    let mut trace = false;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--trace" || arg == "-t" {
            trace = true;
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if program.is_some() {
            return Err("multiple program paths provided".to_string());
        }
        program = Some(PathBuf::from(arg));
    }

    let program = program.ok_or_else(|| "missing program path".to_string())?;
    Ok(RunArgs { program, trace })
}

fn parse_disasm_args(args: impl Iterator<Item = OsString>) -> Result<DisasmArgs, String> {
    let mut program: Option<PathBuf> = None;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if program.is_some() {
            return Err("multiple program paths provided".to_string());
        }
        program = Some(PathBuf::from(arg));
    }

    let program = program.ok_or_else(|| "missing program path".to_string())?;
    Ok(DisasmArgs { program })
}

fn load_or_report(program: &Path) -> Result<Vec<u8>, i32> {
    load_image(program).map_err(|e| {
        report_load_error(&e);
        EXIT_LOAD
    })
}

fn report_load_error(e: &LoadError) {
    eprintln!("error: {e}");
}

fn run_program(args: &RunArgs) -> Result<(), i32> {
    let image = load_or_report(&args.program)?;

    let mut machine = Machine::new();
    if let Err(fault) = machine.load_program(&image) {
        eprintln!("error: {fault}");
        return Err(EXIT_LOAD);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = if args.trace {
        let mut trace = TextTrace::new(io::stderr().lock());
        let result = machine.run_traced(&mut out, &mut trace);
        if let Err(e) = trace.finish() {
            eprintln!("warning: trace output failed: {e}");
        }
        result
    } else {
        machine.run(&mut out)
    };

    if let Err(e) = out.flush() {
        eprintln!("error: failed to flush output: {e}");
        return Err(EXIT_FAULT);
    }

    match result {
        Ok(_) => Ok(()),
        Err(fault) => {
            eprintln!("error: {fault}");
            Err(EXIT_FAULT)
        }
    }
}

fn run_disasm(args: &DisasmArgs) -> Result<(), i32> {
    let image = load_or_report(&args.program)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_listing(&mut out, &image)
        .and_then(|()| out.flush())
        .map_err(|e| {
            eprintln!("error: failed to write listing: {e}");
            EXIT_FAULT
        })
}

fn write_listing(out: &mut impl Write, image: &[u8]) -> io::Result<()> {
    for row in disassemble_program(image) {
        let hex_bytes: String = row
            .bytes
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");

        writeln!(out, "{:02X}: {:<9} {}", row.address, hex_bytes, row.text())?;
    }

    Ok(())
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(Command::Run(args))) => match run_program(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Ok(ParseResult::Command(Command::Disasm(args))) => match run_disasm(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
            }
            EXIT_USAGE
        }
    };

    std::process::exit(exit_code);
}
