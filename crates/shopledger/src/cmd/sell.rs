//! shopledger sell - Record a sale costed against open lots.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;

use crate::report;

use super::{fail, resolve_product, CmdContext};

/// Arguments for `shopledger sell`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Product id or name
    pub product: String,

    /// Units sold
    #[arg(long)]
    pub qty: i64,
}

/// Record the sale, save the ledger, and print the receipt.
pub fn run<W: Write>(ctx: &CmdContext, args: &Args, writer: &mut W) -> Result<ExitCode> {
    let store_file = ctx.store();
    let mut store = store_file.load()?;

    let product = match resolve_product(&store, &args.product) {
        Ok(product) => product,
        Err(message) => return fail(writer, message),
    };
    let receipt = match shopledger_booking::record_sale(&mut store, product.id, args.qty, Utc::now())
    {
        Ok(receipt) => receipt,
        Err(e) => return fail(writer, e),
    };
    store_file.save(&store)?;

    report::render_receipt(&product.name, &receipt, writer)?;
    Ok(ExitCode::SUCCESS)
}
