//! shopledger suggest-price - Price that reaches a target margin.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use rust_decimal::Decimal;

use crate::report::format_money;

use super::fail;

/// Arguments for `shopledger suggest-price`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Unit cost of the product
    #[arg(long, value_name = "PRICE")]
    pub cost: Decimal,

    /// Target margin as a percentage of revenue
    #[arg(long, value_name = "PCT")]
    pub margin: Decimal,
}

/// Print the suggested sell price.
pub fn run<W: Write>(args: &Args, writer: &mut W) -> Result<ExitCode> {
    match shopledger_booking::suggest_price(args.cost, args.margin) {
        Ok(price) => {
            writeln!(writer, "suggested price: {}", format_money(price))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => fail(writer, e),
    }
}
