//! Command dispatch and handler modules.

mod env;
mod publish;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Publish(args) => publish::exec(args),
        Command::Env { reveal } => env::exec(reveal),
    }
}
