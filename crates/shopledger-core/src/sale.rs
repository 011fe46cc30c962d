//! Sale records and their per-lot cost breakdown.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One lot's contribution to a sale.
///
/// `cost_applied` is copied from the lot's unit cost when the sale is
/// recorded; it is a snapshot and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleAllocationEntry {
    /// The purchase lot the units were taken from.
    pub lot_id: u64,
    /// Units taken from that lot; always positive.
    pub quantity_taken: i64,
    /// Unit cost charged for those units.
    pub cost_applied: Decimal,
}

impl SaleAllocationEntry {
    /// Cost contributed by this entry.
    #[must_use]
    pub fn cost_total(&self) -> Decimal {
        self.cost_applied * Decimal::from(self.quantity_taken)
    }
}

/// A recorded sale with its allocation breakdown.
///
/// The allocation sequence is kept in the exact order the allocator
/// produced it; the kardex relies on that order being stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Unique sale id.
    pub id: u64,
    /// The product sold.
    pub product_id: u64,
    /// Units sold; always positive.
    pub quantity: i64,
    /// When the sale happened.
    pub date: DateTime<Utc>,
    /// Per-lot breakdown covering exactly `quantity` units.
    pub allocation: Vec<SaleAllocationEntry>,
}

impl Sale {
    /// Cost of goods sold for this sale.
    #[must_use]
    pub fn cost_total(&self) -> Decimal {
        self.allocation.iter().map(SaleAllocationEntry::cost_total).sum()
    }

    /// Units accounted for by the breakdown.
    #[must_use]
    pub fn allocated_quantity(&self) -> i64 {
        self.allocation.iter().map(|entry| entry.quantity_taken).sum()
    }
}
