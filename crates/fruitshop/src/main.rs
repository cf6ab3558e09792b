mod cli;
mod run;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Command::Render(args) => run::render(args),
        Command::Effects(args) => run::list_effects(args),
        Command::CheckConfig(args) => run::check_config(args),
    }
}
