//! shopledger completions - Generate shell completion scripts.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;

/// Arguments for `shopledger completions`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Shell to generate a completion script for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for the requested shell.
pub fn run<W: Write>(args: &Args, writer: &mut W) -> Result<ExitCode> {
    let mut command = super::Cli::command();
    clap_complete::generate(args.shell, &mut command, "shopledger", writer);
    Ok(ExitCode::SUCCESS)
}
