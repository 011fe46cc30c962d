//! shopledger kardex - Movement ledger of a single product.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use shopledger_core::build_ledger;

use crate::report;

use super::{fail, resolve_product, CmdContext, OutputFormat};

/// Arguments for `shopledger kardex`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Product id or name
    pub product: String,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Rebuild and print the product's kardex.
pub fn run<W: Write>(ctx: &CmdContext, args: &Args, writer: &mut W) -> Result<ExitCode> {
    let store = ctx.store().load()?;

    let product = match resolve_product(&store, &args.product) {
        Ok(product) => product,
        Err(message) => return fail(writer, message),
    };
    let rows = build_ledger(&store, product.id);

    match args.format {
        OutputFormat::Text => report::render_kardex(&product, &rows, writer)?,
        OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(&rows)?)?,
    }
    Ok(ExitCode::SUCCESS)
}
