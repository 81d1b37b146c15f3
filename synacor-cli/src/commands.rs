//! CLI command implementations.

use std::io::{self, BufWriter};

use synacor_vm::{load_image, Machine, MachineConfig};
use tracing::info;

use crate::Cli;

/// Load the image named on the command line and run it on stdin/stdout.
pub fn run(cli: &Cli) -> Result<(), i32> {
    let image = load_image(&cli.image).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    let config = MachineConfig::default().with_stack_capacity(cli.stack_capacity);
    let mut machine = Machine::with_config(&image, config);

    let mut input = io::stdin().lock();
    let mut output = BufWriter::new(io::stdout().lock());

    match machine.run(&mut input, &mut output) {
        Ok(reason) => {
            info!(?reason, steps = machine.steps(), "program finished");
            Ok(())
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            eprintln!("{}", describe(&machine));
            Err(2)
        }
    }
}

/// One-line dump of the machine state for fault diagnostics.
fn describe(machine: &Machine) -> String {
    let pc = machine.pc();
    let words: Vec<String> = (pc..pc + 4)
        .filter_map(|address| machine.memory().read(address))
        .map(|word| word.to_string())
        .collect();

    format!(
        "  pc={pc} memory=[{}] registers={:?} stack depth={}",
        words.join(" "),
        machine.registers().as_array(),
        machine.stack().len()
    )
}
