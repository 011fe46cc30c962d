//! Kardex reconstruction: the chronological movement ledger of a product.
//!
//! The kardex is never stored. It is rebuilt on demand by merging the
//! product's purchases and sales into one time-ordered sequence and
//! replaying it with running balances, so it always reflects exactly what
//! the store contains. Rebuilding twice over unchanged data yields
//! identical rows.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::lot::PurchaseLot;
use crate::sale::Sale;
use crate::store::LedgerStore;

/// The movement recorded in one kardex row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum KardexMovement {
    /// Stock in: a purchase lot arriving.
    Purchase {
        /// Units received.
        quantity: i64,
        /// Cost per unit.
        unit_cost: Decimal,
        /// `quantity * unit_cost`.
        cost_total: Decimal,
        /// Expiry date of the lot, if any.
        expiry_date: Option<NaiveDate>,
    },
    /// Stock out: a sale leaving at its allocated cost.
    Sale {
        /// Units sold.
        quantity: i64,
        /// Cost of goods sold, summed over the sale's allocation.
        cost_total: Decimal,
    },
}

impl KardexMovement {
    /// Whether this movement is a sale.
    #[must_use]
    pub const fn is_sale(&self) -> bool {
        matches!(self, Self::Sale { .. })
    }
}

/// One row of the reconstructed ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KardexRow {
    /// Id of the underlying purchase or sale record.
    pub movement_id: u64,
    /// When the movement happened.
    pub date: DateTime<Utc>,
    /// What moved.
    #[serde(flatten)]
    pub movement: KardexMovement,
    /// Units on hand after the movement.
    pub balance_quantity: i64,
    /// Total cost of the units on hand after the movement.
    pub balance_cost_total: Decimal,
    /// `balance_cost_total / balance_quantity` while the balance is
    /// positive, zero otherwise.
    pub average_cost: Decimal,
}

/// Rebuild the movement ledger for a product.
///
/// Rows are ordered by timestamp ascending. Equal timestamps order
/// purchases before sales, then lower ids first, so the reconstruction is
/// deterministic for any store contents.
#[must_use]
pub fn build_ledger(store: &LedgerStore, product_id: u64) -> Vec<KardexRow> {
    enum Mov<'a> {
        Purchase(&'a PurchaseLot),
        Sale(&'a Sale),
    }

    impl Mov<'_> {
        fn sort_key(&self) -> (DateTime<Utc>, u8, u64) {
            match self {
                Mov::Purchase(lot) => (lot.purchase_date, 0, lot.id),
                Mov::Sale(sale) => (sale.date, 1, sale.id),
            }
        }
    }

    let mut movements: Vec<Mov> = store
        .purchases_for(product_id)
        .map(Mov::Purchase)
        .chain(store.sales_for(product_id).map(Mov::Sale))
        .collect();
    movements.sort_by_key(Mov::sort_key);

    let mut balance_quantity = 0_i64;
    let mut balance_cost_total = Decimal::ZERO;
    let mut rows = Vec::with_capacity(movements.len());

    for movement in movements {
        let (movement_id, date, entry) = match movement {
            Mov::Purchase(lot) => {
                let cost_total = lot.cost_total();
                balance_quantity += lot.quantity;
                balance_cost_total += cost_total;
                (
                    lot.id,
                    lot.purchase_date,
                    KardexMovement::Purchase {
                        quantity: lot.quantity,
                        unit_cost: lot.unit_cost,
                        cost_total,
                        expiry_date: lot.expiry_date,
                    },
                )
            }
            Mov::Sale(sale) => {
                let cost_total = sale.cost_total();
                balance_quantity -= sale.quantity;
                balance_cost_total -= cost_total;
                (
                    sale.id,
                    sale.date,
                    KardexMovement::Sale {
                        quantity: sale.quantity,
                        cost_total,
                    },
                )
            }
        };

        let average_cost = if balance_quantity > 0 {
            balance_cost_total / Decimal::from(balance_quantity)
        } else {
            Decimal::ZERO
        };

        rows.push(KardexRow {
            movement_id,
            date,
            movement: entry,
            balance_quantity,
            balance_cost_total,
            average_cost,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sale::SaleAllocationEntry;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn average_cost_is_weighted_over_purchases() {
        let mut store = LedgerStore::new();
        store.purchases.push(PurchaseLot::new(1, 1, 5, dec!(2), at(1)));
        store.purchases.push(PurchaseLot::new(2, 1, 5, dec!(3), at(2)));

        let rows = build_ledger(&store, 1);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].balance_quantity, 5);
        assert_eq!(rows[0].balance_cost_total, dec!(10));
        assert_eq!(rows[0].average_cost, dec!(2));
        assert_eq!(rows[1].balance_quantity, 10);
        assert_eq!(rows[1].balance_cost_total, dec!(25));
        assert_eq!(rows[1].average_cost, dec!(2.5));
    }

    #[test]
    fn sales_reduce_both_balances_by_allocated_cost() {
        let mut store = LedgerStore::new();
        store.purchases.push(PurchaseLot::new(1, 1, 5, dec!(2), at(1)).with_expiry(date(2024, 6, 1)));
        store.purchases.push(PurchaseLot::new(2, 1, 5, dec!(3), at(2)).with_expiry(date(2024, 1, 1)));
        store.sales.push(Sale {
            id: 1,
            product_id: 1,
            quantity: 7,
            date: at(3),
            allocation: vec![
                SaleAllocationEntry {
                    lot_id: 2,
                    quantity_taken: 5,
                    cost_applied: dec!(3),
                },
                SaleAllocationEntry {
                    lot_id: 1,
                    quantity_taken: 2,
                    cost_applied: dec!(2),
                },
            ],
        });

        let rows = build_ledger(&store, 1);
        let last = rows.last().unwrap();
        assert_eq!(
            last.movement,
            KardexMovement::Sale {
                quantity: 7,
                cost_total: dec!(19),
            }
        );
        assert_eq!(last.balance_quantity, 3);
        assert_eq!(last.balance_cost_total, dec!(6));
        assert_eq!(last.average_cost, dec!(2));
    }

    #[test]
    fn average_cost_is_zero_when_nothing_on_hand() {
        let mut store = LedgerStore::new();
        store.purchases.push(PurchaseLot::new(1, 1, 2, dec!(4), at(1)));
        store.sales.push(Sale {
            id: 1,
            product_id: 1,
            quantity: 2,
            date: at(2),
            allocation: vec![SaleAllocationEntry {
                lot_id: 1,
                quantity_taken: 2,
                cost_applied: dec!(4),
            }],
        });

        let rows = build_ledger(&store, 1);
        assert_eq!(rows[1].balance_quantity, 0);
        assert_eq!(rows[1].average_cost, dec!(0));
    }

    #[test]
    fn equal_timestamps_order_purchases_before_sales() {
        let when = at(5);
        let mut store = LedgerStore::new();
        store.purchases.push(PurchaseLot::new(7, 1, 3, dec!(1), when));
        store.sales.push(Sale {
            id: 2,
            product_id: 1,
            quantity: 1,
            date: when,
            allocation: vec![SaleAllocationEntry {
                lot_id: 7,
                quantity_taken: 1,
                cost_applied: dec!(1),
            }],
        });

        let rows = build_ledger(&store, 1);
        assert!(!rows[0].movement.is_sale());
        assert!(rows[1].movement.is_sale());
        assert_eq!(rows[1].balance_quantity, 2);
    }

    #[test]
    fn rows_only_cover_the_requested_product() {
        let mut store = LedgerStore::new();
        store.purchases.push(PurchaseLot::new(1, 1, 5, dec!(2), at(1)));
        store.purchases.push(PurchaseLot::new(2, 2, 9, dec!(9), at(1)));

        let rows = build_ledger(&store, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].movement_id, 1);
    }

    #[test]
    fn rows_serialize_with_inline_movement_fields() {
        let mut store = LedgerStore::new();
        store
            .purchases
            .push(PurchaseLot::new(1, 1, 5, dec!(2), at(1)).with_expiry(date(2024, 6, 1)));

        let rows = build_ledger(&store, 1);
        let json = serde_json::to_value(&rows).unwrap();
        assert_eq!(json[0]["type"], "purchase");
        assert_eq!(json[0]["unitCost"], "2");
        assert_eq!(json[0]["expiryDate"], "2024-06-01");
        assert_eq!(json[0]["balanceQuantity"], 5);
        assert_eq!(json[0]["averageCost"], "2");
    }
}
