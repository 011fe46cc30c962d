//! shopledger purchase - Record a purchase lot.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use shopledger_booking::PurchaseInput;

use crate::report::format_money;

use super::{fail, resolve_product, CmdContext};

/// Arguments for `shopledger purchase`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Product id or name
    pub product: String,

    /// Units purchased
    #[arg(long)]
    pub qty: i64,

    /// Cost per unit paid to the supplier
    #[arg(long, value_name = "PRICE")]
    pub cost: Decimal,

    /// Expiry date of the lot (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub expiry: Option<NaiveDate>,
}

/// Record the lot and save the ledger.
pub fn run<W: Write>(ctx: &CmdContext, args: &Args, writer: &mut W) -> Result<ExitCode> {
    let store_file = ctx.store();
    let mut store = store_file.load()?;

    let product = match resolve_product(&store, &args.product) {
        Ok(product) => product,
        Err(message) => return fail(writer, message),
    };
    let input = PurchaseInput {
        product_id: product.id,
        quantity: args.qty,
        unit_cost: args.cost,
        expiry_date: args.expiry,
    };
    let lot_id = match shopledger_booking::record_purchase(&mut store, &input, Utc::now()) {
        Ok(id) => id,
        Err(e) => return fail(writer, e),
    };
    store_file.save(&store)?;

    writeln!(
        writer,
        "recorded lot {lot_id}: {} x {} @ {} each",
        args.qty,
        product.name,
        format_money(args.cost),
    )?;
    if let Some(expiry) = args.expiry {
        writeln!(writer, "expires {expiry}")?;
    }
    Ok(ExitCode::SUCCESS)
}
