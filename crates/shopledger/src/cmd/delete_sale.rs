//! shopledger delete-sale - Undo the most recent sale of a product.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use shopledger_booking::{commit_delete_sale, prepare_delete_sale};

use crate::report::format_money;

use super::{confirm, fail, CmdContext};

/// Arguments for `shopledger delete-sale`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Sale id to delete
    pub sale_id: u64,
}

/// Delete the sale after confirmation and save the ledger.
pub fn run<W: Write>(ctx: &CmdContext, args: &Args, writer: &mut W) -> Result<ExitCode> {
    let store_file = ctx.store();
    let mut store = store_file.load()?;

    let deletion = match prepare_delete_sale(&store, args.sale_id) {
        Ok(deletion) => deletion,
        Err(e) => return fail(writer, e),
    };
    writeln!(
        writer,
        "sale {} of product {}: {} units, cost {}",
        deletion.sale_id,
        deletion.product_id,
        deletion.quantity,
        format_money(deletion.cost_total),
    )?;

    if !confirm("delete this sale and return its units to stock?", ctx.assume_yes)? {
        writeln!(writer, "aborted")?;
        return Ok(ExitCode::from(1));
    }
    if let Err(e) = commit_delete_sale(&mut store, &deletion) {
        return fail(writer, e);
    }
    store_file.save(&store)?;

    writeln!(writer, "deleted sale {}", args.sale_id)?;
    Ok(ExitCode::SUCCESS)
}
