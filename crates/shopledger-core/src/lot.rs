//! Purchase lots and their consumption order.
//!
//! Every purchase creates one lot: a quantity of a product acquired at a
//! unit cost, optionally with an expiry date. Lots are append-only and are
//! consumed by sales in FEFO order (earliest expiry first), falling back to
//! FIFO (earliest purchase first) for lots without an expiry.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One purchase: a quantity of a product acquired at a unit cost.
///
/// Lots are never mutated after creation; the remaining quantity of a lot
/// is always derived from the sale history, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLot {
    /// Unique lot id.
    pub id: u64,
    /// The product this lot belongs to.
    pub product_id: u64,
    /// Units acquired; always positive.
    pub quantity: i64,
    /// Cost per unit at acquisition.
    pub unit_cost: Decimal,
    /// Expiry date, if the stock is perishable.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    /// When the lot was acquired.
    pub purchase_date: DateTime<Utc>,
}

impl PurchaseLot {
    /// Create a lot without an expiry date.
    #[must_use]
    pub const fn new(
        id: u64,
        product_id: u64,
        quantity: i64,
        unit_cost: Decimal,
        purchase_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            product_id,
            quantity,
            unit_cost,
            expiry_date: None,
            purchase_date,
        }
    }

    /// Set the expiry date.
    #[must_use]
    pub const fn with_expiry(mut self, date: NaiveDate) -> Self {
        self.expiry_date = Some(date);
        self
    }

    /// Total acquisition cost of the lot.
    #[must_use]
    pub fn cost_total(&self) -> Decimal {
        self.unit_cost * Decimal::from(self.quantity)
    }

    /// Sort key for consumption order.
    ///
    /// Dated lots precede undated ones and sort by expiry; undated lots
    /// sort by purchase time. Purchase time and id break any remaining
    /// tie, so the order is total: two distinct lots never compare equal.
    #[must_use]
    pub fn consume_key(&self) -> (bool, NaiveDate, DateTime<Utc>, u64) {
        (
            self.expiry_date.is_none(),
            self.expiry_date.unwrap_or(NaiveDate::MAX),
            self.purchase_date,
            self.id,
        )
    }
}

/// Compare two lots by consumption order (FEFO, then FIFO).
#[must_use]
pub fn consume_order(a: &PurchaseLot, b: &PurchaseLot) -> Ordering {
    a.consume_key().cmp(&b.consume_key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn dated_lots_come_before_undated() {
        let dated = PurchaseLot::new(1, 1, 5, dec!(2), at(2)).with_expiry(date(2024, 12, 31));
        let undated = PurchaseLot::new(2, 1, 5, dec!(2), at(1));
        assert_eq!(consume_order(&dated, &undated), Ordering::Less);
        assert_eq!(consume_order(&undated, &dated), Ordering::Greater);
    }

    #[test]
    fn dated_lots_order_by_expiry() {
        let march = PurchaseLot::new(1, 1, 5, dec!(2), at(1)).with_expiry(date(2024, 3, 1));
        let january = PurchaseLot::new(2, 1, 5, dec!(2), at(2)).with_expiry(date(2024, 1, 1));
        assert_eq!(consume_order(&january, &march), Ordering::Less);
    }

    #[test]
    fn undated_lots_order_by_purchase_time() {
        let later = PurchaseLot::new(1, 1, 5, dec!(2), at(9));
        let earlier = PurchaseLot::new(2, 1, 5, dec!(2), at(3));
        assert_eq!(consume_order(&earlier, &later), Ordering::Less);
    }

    #[test]
    fn equal_expiry_falls_back_to_purchase_time_then_id() {
        let expiry = date(2024, 6, 1);
        let a = PurchaseLot::new(1, 1, 5, dec!(2), at(5)).with_expiry(expiry);
        let b = PurchaseLot::new(2, 1, 5, dec!(2), at(5)).with_expiry(expiry);
        let c = PurchaseLot::new(3, 1, 5, dec!(2), at(4)).with_expiry(expiry);
        assert_eq!(consume_order(&c, &a), Ordering::Less);
        assert_eq!(consume_order(&a, &b), Ordering::Less);
    }

    #[test]
    fn ordering_is_total_over_mixed_lots() {
        let mut lots = vec![
            PurchaseLot::new(1, 1, 1, dec!(1), at(1)).with_expiry(date(2024, 3, 1)),
            PurchaseLot::new(2, 1, 1, dec!(1), at(1)),
            PurchaseLot::new(3, 1, 1, dec!(1), at(1)).with_expiry(date(2024, 1, 1)),
        ];
        lots.sort_by(|a, b| consume_order(a, b));
        let ids: Vec<u64> = lots.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn cost_total_multiplies_quantity_by_unit_cost() {
        let lot = PurchaseLot::new(1, 1, 5, dec!(3), at(1));
        assert_eq!(lot.cost_total(), dec!(15));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let lot = PurchaseLot::new(4, 2, 10, dec!(1.25), at(1)).with_expiry(date(2024, 2, 1));
        let json = serde_json::to_value(&lot).unwrap();
        assert_eq!(json["productId"], 2);
        assert_eq!(json["unitCost"], "1.25");
        assert_eq!(json["expiryDate"], "2024-02-01");
        assert!(json["purchaseDate"].is_string());
    }

    #[test]
    fn deserializes_without_expiry_field() {
        let lot: PurchaseLot = serde_json::from_str(
            r#"{"id": 1, "productId": 1, "quantity": 3, "unitCost": 2,
                "purchaseDate": "2024-01-05T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(lot.expiry_date, None);
        assert_eq!(lot.unit_cost, dec!(2));
    }
}
