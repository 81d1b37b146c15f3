//! Synacor CLI — load a program image and run it on the console.
//!
//! Exit codes:
//! - 0: Program halted (`halt`, or `ret` on an empty stack)
//! - 1: Usage or image load error
//! - 2: Runtime error

mod commands;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use synacor_vm::DEFAULT_STACK_CAPACITY;
use tracing::Level;

/// Run a Synacor program image, wiring `out` to stdout and `in` to stdin.
#[derive(Parser, Debug)]
#[command(name = "synacor", version)]
pub struct Cli {
    /// Program image: little-endian 16-bit words.
    #[arg(default_value = "challenge.bin")]
    pub image: PathBuf,

    /// Maximum stack depth in words.
    #[arg(long, default_value_t = DEFAULT_STACK_CAPACITY)]
    pub stack_capacity: usize,

    /// Log every fetch cycle (pc, opcode, registers) to stderr.
    #[arg(long)]
    pub trace: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_tracing(cli.trace);

    if let Err(code) = commands::run(&cli) {
        process::exit(code);
    }
}

fn init_tracing(trace: bool) {
    let level = if trace { Level::TRACE } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}
