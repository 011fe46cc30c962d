//! shopledger delete-product - Remove a product and its movements.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use shopledger_booking::{commit_delete_product, prepare_delete_product};

use super::{confirm, fail, resolve_product, CmdContext};

/// Arguments for `shopledger delete-product`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Product id or name
    pub product: String,

    /// Delete even when purchases or sales reference the product
    #[arg(long)]
    pub force: bool,
}

/// Delete the product after confirmation and save the ledger.
pub fn run<W: Write>(ctx: &CmdContext, args: &Args, writer: &mut W) -> Result<ExitCode> {
    let store_file = ctx.store();
    let mut store = store_file.load()?;

    let product = match resolve_product(&store, &args.product) {
        Ok(product) => product,
        Err(message) => return fail(writer, message),
    };
    let deletion = match prepare_delete_product(&store, product.id) {
        Ok(deletion) => deletion,
        Err(e) => return fail(writer, e),
    };

    if deletion.has_history() && !args.force {
        return fail(
            writer,
            format!(
                "product \"{}\" has {} purchases and {} sales; pass --force to delete them too",
                deletion.name, deletion.purchase_count, deletion.sale_count,
            ),
        );
    }
    writeln!(
        writer,
        "product \"{}\": {} purchases, {} sales, {} units in stock",
        deletion.name, deletion.purchase_count, deletion.sale_count, deletion.stock,
    )?;

    if !confirm("delete this product and all of its movements?", ctx.assume_yes)? {
        writeln!(writer, "aborted")?;
        return Ok(ExitCode::from(1));
    }
    if let Err(e) = commit_delete_product(&mut store, &deletion) {
        return fail(writer, e);
    }
    store_file.save(&store)?;

    writeln!(writer, "deleted product {}: {}", deletion.product_id, deletion.name)?;
    Ok(ExitCode::SUCCESS)
}
