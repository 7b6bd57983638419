//! Completions command - shell completion scripts

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::EdgeResult;
use clap::CommandFactory;
use clap_complete::generate;
use std::io;

/// Execute the completions command
pub fn execute(args: CompletionsArgs) -> EdgeResult<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "koun-edge", &mut io::stdout());
    Ok(())
}
