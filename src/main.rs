mod cli;
mod commands;
mod logging;
mod watch;

use std::error::Error;

use clap::Parser;

use crate::cli::{Cli, Command};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;
    let env = commands::Env::load(&cli.config)?;
    match cli.command {
        Command::Check { level } => commands::check(&env, &level).map(|_| ()),
        Command::Mesh { level, mode } => {
            commands::mesh(&env, &level, mode.map(Into::into)).map(|_| ())
        }
        Command::Play { level, ticks } => commands::play(&env, &level, ticks),
        Command::Watch { level } => watch::run(&env, &level),
    }
}
