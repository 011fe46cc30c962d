//! shopledger add-product - Register a new product.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use rust_decimal::Decimal;
use shopledger_booking::NewProduct;

use super::{fail, CmdContext};

/// Arguments for `shopledger add-product`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Product name, unique ignoring case
    pub name: String,

    /// Sell price per unit
    #[arg(long, value_name = "PRICE")]
    pub price: Decimal,
}

/// Register the product and save the ledger.
pub fn run<W: Write>(ctx: &CmdContext, args: &Args, writer: &mut W) -> Result<ExitCode> {
    let store_file = ctx.store();
    let mut store = store_file.load()?;

    let request = NewProduct {
        name: args.name.clone(),
        sell_price: args.price,
    };
    let product_id = match shopledger_booking::add_product(&mut store, &request) {
        Ok(id) => id,
        Err(e) => return fail(writer, e),
    };
    store_file.save(&store)?;

    writeln!(writer, "added product {product_id}: {}", args.name.trim())?;
    Ok(ExitCode::SUCCESS)
}
