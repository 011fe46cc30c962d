//! Rendering for receipts, stock and kardex views, and audit findings.
//!
//! Every function writes to a generic writer so command tests can
//! capture output. Money renders with two decimal places, margin
//! percentages with one.

use std::io::Write;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use shopledger_booking::SaleReceipt;
use shopledger_core::{available_stock, KardexMovement, KardexRow, LedgerStore, Product};
use shopledger_validate::{Severity, ValidationError};

/// Format a money amount rounded to two decimal places.
///
/// `Decimal`'s precision formatting truncates, so round first.
#[must_use]
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Format a margin percentage rounded to one decimal place.
#[must_use]
pub fn format_margin(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1}%")
}

/// One product's line in the stock view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLine {
    /// Product id.
    pub id: u64,
    /// Product name.
    pub name: String,
    /// Sell price, when one is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_price: Option<Decimal>,
    /// Units on hand across the product's lots.
    pub stock: i64,
}

/// Build the stock view, one line per product in ledger order.
#[must_use]
pub fn stock_lines(store: &LedgerStore) -> Vec<StockLine> {
    store
        .products
        .iter()
        .map(|product| StockLine {
            id: product.id,
            name: product.name.clone(),
            sell_price: product.sell_price,
            stock: available_stock(store, product.id),
        })
        .collect()
}

/// Write the stock view as an aligned table.
pub fn render_stock<W: Write>(lines: &[StockLine], writer: &mut W) -> std::io::Result<()> {
    writeln!(
        writer,
        "{:<5}  {:<24}  {:>6}  {:>10}",
        "Id", "Product", "Stock", "Price"
    )?;
    writeln!(writer, "{}", "=".repeat(51))?;
    for line in lines {
        let price = line
            .sell_price
            .map_or_else(|| "(not set)".to_string(), format_money);
        writeln!(
            writer,
            "{:<5}  {:<24}  {:>6}  {:>10}",
            line.id, line.name, line.stock, price
        )?;
    }
    Ok(())
}

/// Write a sale receipt with its per-lot breakdown.
pub fn render_receipt<W: Write>(
    product_name: &str,
    receipt: &SaleReceipt,
    writer: &mut W,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "Sale {}: {} x {}",
        receipt.sale_id, receipt.quantity, product_name
    )?;
    writeln!(writer, "{}", "=".repeat(40))?;
    for entry in &receipt.allocation {
        writeln!(
            writer,
            "  lot {}: {} @ {} = {}",
            entry.lot_id,
            entry.quantity_taken,
            format_money(entry.cost_applied),
            format_money(entry.cost_total()),
        )?;
    }
    writeln!(writer)?;
    writeln!(writer, "Revenue: {:>10}", format_money(receipt.revenue))?;
    writeln!(writer, "Cost:    {:>10}", format_money(receipt.cost))?;
    writeln!(writer, "Profit:  {:>10}", format_money(receipt.profit))?;
    writeln!(writer, "Margin:  {:>10}", format_margin(receipt.margin_pct))?;
    Ok(())
}

/// Write a product's kardex as an aligned table, one row per movement.
pub fn render_kardex<W: Write>(
    product: &Product,
    rows: &[KardexRow],
    writer: &mut W,
) -> std::io::Result<()> {
    writeln!(writer, "Kardex for {} (id {})", product.name, product.id)?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:<10}  {:<8}  {:>5}  {:>8}  {:>9}  {:<10}  {:>5}  {:<9}  {:>9}  {:>5}  {:>9}  {:>8}",
        "Date",
        "Type",
        "In",
        "Cost",
        "Total",
        "Expiry",
        "Out",
        "Method",
        "Total",
        "Bal",
        "Total",
        "Avg",
    )?;
    writeln!(writer, "{}", "=".repeat(117))?;
    for row in rows {
        let date = row.date.date_naive().to_string();
        let balance_total = format_money(row.balance_cost_total);
        let average = format_money(row.average_cost);
        match &row.movement {
            KardexMovement::Purchase {
                quantity,
                unit_cost,
                cost_total,
                expiry_date,
            } => {
                let expiry = expiry_date.map_or_else(|| "N/A".to_string(), |d| d.to_string());
                writeln!(
                    writer,
                    "{:<10}  {:<8}  {:>5}  {:>8}  {:>9}  {:<10}  {:>5}  {:<9}  {:>9}  {:>5}  {:>9}  {:>8}",
                    date,
                    "purchase",
                    quantity,
                    format_money(*unit_cost),
                    format_money(*cost_total),
                    expiry,
                    "-",
                    "-",
                    "-",
                    row.balance_quantity,
                    balance_total,
                    average,
                )?;
            }
            KardexMovement::Sale {
                quantity,
                cost_total,
            } => {
                writeln!(
                    writer,
                    "{:<10}  {:<8}  {:>5}  {:>8}  {:>9}  {:<10}  {:>5}  {:<9}  {:>9}  {:>5}  {:>9}  {:>8}",
                    date,
                    "sale",
                    "-",
                    "-",
                    "-",
                    "-",
                    quantity,
                    "FEFO/FIFO",
                    format_money(*cost_total),
                    row.balance_quantity,
                    balance_total,
                    average,
                )?;
            }
        }
    }
    Ok(())
}

/// Write audit findings to the given writer.
pub fn report_findings<W: Write>(
    findings: &[ValidationError],
    writer: &mut W,
) -> std::io::Result<()> {
    for finding in findings {
        let label = match finding.severity() {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        writeln!(writer, "{label}[{}]: {}", finding.code, finding.message)?;
        if let Some(ctx) = &finding.context {
            writeln!(writer, "  context: {ctx}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write the audit verdict line: a green tick when the ledger is clean,
/// the error and warning tallies otherwise. Warnings alone still count
/// as consistent.
pub fn print_summary<W: Write>(
    errors: usize,
    warnings: usize,
    writer: &mut W,
) -> std::io::Result<()> {
    fn tally(n: usize, noun: &str) -> String {
        if n == 1 {
            format!("1 {noun}")
        } else {
            format!("{n} {noun}s")
        }
    }

    match (errors, warnings) {
        (0, 0) => writeln!(writer, "\x1b[32m\u{2713}\x1b[0m ledger is consistent"),
        (0, w) => writeln!(
            writer,
            "\x1b[33m\u{26A0}\x1b[0m ledger is consistent, {}",
            tally(w, "warning")
        ),
        (e, 0) => writeln!(writer, "\x1b[31m\u{2717}\x1b[0m {}", tally(e, "error")),
        (e, w) => writeln!(
            writer,
            "\x1b[31m\u{2717}\x1b[0m {}, {}",
            tally(e, "error"),
            tally(w, "warning")
        ),
    }
}
