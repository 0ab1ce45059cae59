mod bindings;
mod cli;
mod run;
mod script;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Transitions) => run::list_transitions(),
        None => run::run(cli.run),
    }
}
