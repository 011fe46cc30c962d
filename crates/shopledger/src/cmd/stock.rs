//! shopledger stock - Current stock and prices for every product.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;

use crate::report;

use super::{CmdContext, OutputFormat};

/// Arguments for `shopledger stock`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Print the stock view of the whole ledger.
pub fn run<W: Write>(ctx: &CmdContext, args: &Args, writer: &mut W) -> Result<ExitCode> {
    let store = ctx.store().load()?;
    let lines = report::stock_lines(&store);

    match args.format {
        OutputFormat::Text => report::render_stock(&lines, writer)?,
        OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(&lines)?)?,
    }
    Ok(ExitCode::SUCCESS)
}
