//! Ledger invariant tests.
//!
//! Every sequence of purchases and sales must keep the store consistent:
//! stock is conserved, every sale's breakdown covers exactly its quantity,
//! no lot is ever oversubscribed, and lot consumption order is a total
//! order independent of insertion order. These tests exercise the
//! allocator and the kardex reconstruction together, the way the booking
//! layer drives them.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shopledger_core::{
    allocate, available_stock, build_ledger, consumed_by_lot, AllocationError, LedgerStore,
    Product, PurchaseLot, Sale,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

/// Record a purchase the way the booking layer does.
fn record_purchase(
    store: &mut LedgerStore,
    product_id: u64,
    quantity: i64,
    unit_cost: Decimal,
    expiry: Option<NaiveDate>,
    when: DateTime<Utc>,
) -> u64 {
    let id = store.take_purchase_id();
    let mut lot = PurchaseLot::new(id, product_id, quantity, unit_cost, when);
    if let Some(expiry) = expiry {
        lot = lot.with_expiry(expiry);
    }
    store.purchases.push(lot);
    id
}

/// Allocate and append a sale the way the booking layer does.
fn record_sale(
    store: &mut LedgerStore,
    product_id: u64,
    quantity: i64,
    when: DateTime<Utc>,
) -> Result<u64, AllocationError> {
    let allocation = allocate(store, product_id, quantity)?;
    let id = store.take_sale_id();
    store.sales.push(Sale {
        id,
        product_id,
        quantity,
        date: when,
        allocation,
    });
    Ok(id)
}

fn product_store() -> (LedgerStore, u64) {
    let mut store = LedgerStore::new();
    let id = store.take_product_id();
    store
        .products
        .push(Product::new(id, "Coffee 250g".to_string()).with_sell_price(dec!(10)));
    (store, id)
}

/// Total units taken from each lot, which must never exceed the lot size.
fn assert_no_lot_oversubscribed(store: &LedgerStore, product_id: u64) {
    let consumed = consumed_by_lot(store, product_id);
    for lot in store.purchases_for(product_id) {
        let taken = consumed.get(&lot.id).copied().unwrap_or(0);
        assert!(
            taken <= lot.quantity,
            "lot {} oversubscribed: {taken} taken of {}",
            lot.id,
            lot.quantity
        );
    }
}

// ============================================================================
// Stock conservation
// ============================================================================

#[test]
fn stock_is_conserved_across_interleaved_operations() {
    let (mut store, product) = product_store();

    record_purchase(&mut store, product, 10, dec!(2), None, at(1, 9));
    assert_eq!(available_stock(&store, product), 10);

    record_sale(&mut store, product, 4, at(2, 9)).unwrap();
    assert_eq!(available_stock(&store, product), 6);

    record_purchase(&mut store, product, 5, dec!(3), None, at(3, 9));
    assert_eq!(available_stock(&store, product), 11);

    record_sale(&mut store, product, 11, at(4, 9)).unwrap();
    assert_eq!(available_stock(&store, product), 0);
}

#[test]
fn failed_sale_leaves_the_store_unchanged() {
    let (mut store, product) = product_store();
    record_purchase(&mut store, product, 5, dec!(2), Some(date(2024, 6, 1)), at(1, 9));
    record_purchase(&mut store, product, 5, dec!(3), Some(date(2024, 1, 1)), at(2, 9));

    let before = store.clone();
    let err = record_sale(&mut store, product, 11, at(3, 9)).unwrap_err();

    assert_eq!(
        err,
        AllocationError::InsufficientStock {
            product_id: product,
            requested: 11,
            available: 10,
        }
    );
    assert_eq!(store, before);
}

// ============================================================================
// Allocation completeness and lot bounds
// ============================================================================

#[test]
fn every_sale_breakdown_covers_its_quantity() {
    let (mut store, product) = product_store();
    record_purchase(&mut store, product, 5, dec!(2), Some(date(2024, 6, 1)), at(1, 9));
    record_purchase(&mut store, product, 5, dec!(3), Some(date(2024, 1, 1)), at(2, 9));
    record_purchase(&mut store, product, 3, dec!(4), None, at(3, 9));

    for (day, quantity) in [(4, 6), (5, 4), (6, 3)] {
        record_sale(&mut store, product, quantity, at(day, 9)).unwrap();
    }

    for sale in store.sales_for(product) {
        assert_eq!(sale.allocated_quantity(), sale.quantity, "sale {}", sale.id);
    }
    assert_no_lot_oversubscribed(&store, product);
    assert_eq!(available_stock(&store, product), 0);
}

// ============================================================================
// Deterministic consumption order
// ============================================================================

#[test]
fn expiry_then_purchase_order_drives_allocation() {
    let (mut store, product) = product_store();
    let march = record_purchase(&mut store, product, 1, dec!(1), Some(date(2024, 3, 1)), at(1, 9));
    let undated = record_purchase(&mut store, product, 1, dec!(1), None, at(1, 10));
    let january = record_purchase(&mut store, product, 1, dec!(1), Some(date(2024, 1, 1)), at(2, 9));

    let entries = allocate(&store, product, 3).unwrap();
    let order: Vec<u64> = entries.iter().map(|e| e.lot_id).collect();
    assert_eq!(order, vec![january, march, undated]);
}

#[test]
fn allocation_ignores_lot_insertion_order() {
    let when = at(1, 9);
    let lots = [
        PurchaseLot::new(1, 1, 4, dec!(2), when).with_expiry(date(2024, 3, 1)),
        PurchaseLot::new(2, 1, 4, dec!(3), at(2, 9)),
        PurchaseLot::new(3, 1, 4, dec!(4), when).with_expiry(date(2024, 1, 1)),
    ];

    let mut forward = LedgerStore::new();
    forward.purchases.extend(lots.iter().cloned());
    let mut reversed = LedgerStore::new();
    reversed.purchases.extend(lots.iter().rev().cloned());

    assert_eq!(
        allocate(&forward, 1, 9).unwrap(),
        allocate(&reversed, 1, 9).unwrap()
    );
}

// ============================================================================
// Kardex reconstruction
// ============================================================================

#[test]
fn reconstruction_is_idempotent() {
    let (mut store, product) = product_store();
    record_purchase(&mut store, product, 5, dec!(2), Some(date(2024, 6, 1)), at(1, 9));
    record_purchase(&mut store, product, 5, dec!(3), Some(date(2024, 1, 1)), at(2, 9));
    record_sale(&mut store, product, 7, at(3, 9)).unwrap();

    assert_eq!(build_ledger(&store, product), build_ledger(&store, product));
}

#[test]
fn kardex_balances_track_the_full_scenario() {
    let (mut store, product) = product_store();
    record_purchase(&mut store, product, 5, dec!(2), Some(date(2024, 6, 1)), at(1, 9));
    record_purchase(&mut store, product, 5, dec!(3), Some(date(2024, 1, 1)), at(2, 9));
    record_sale(&mut store, product, 7, at(3, 9)).unwrap();

    let rows = build_ledger(&store, product);
    assert_eq!(rows.len(), 3);

    // After both purchases: 10 on hand worth 25, average 2.50.
    assert_eq!(rows[1].balance_quantity, 10);
    assert_eq!(rows[1].balance_cost_total, dec!(25));
    assert_eq!(rows[1].average_cost, dec!(2.5));

    // The sale takes 5 @ 3 from the January lot and 2 @ 2 from the June
    // lot: cost 19, leaving 3 units worth 6.
    assert_eq!(rows[2].balance_quantity, 3);
    assert_eq!(rows[2].balance_cost_total, dec!(6));
    assert_eq!(rows[2].average_cost, dec!(2));
}

// ============================================================================
// Property-based tests
// ============================================================================

/// One randomly generated purchase.
#[derive(Debug, Clone)]
struct PurchasePlan {
    quantity: i64,
    unit_cost: u32,
    expiry_day: Option<u32>,
}

fn purchase_strategy() -> impl Strategy<Value = PurchasePlan> {
    (1i64..20, 1u32..50, proptest::option::of(1u32..28)).prop_map(
        |(quantity, unit_cost, expiry_day)| PurchasePlan {
            quantity,
            unit_cost,
            expiry_day,
        },
    )
}

fn build_store(purchases: &[PurchasePlan]) -> (LedgerStore, u64) {
    let (mut store, product) = product_store();
    for (i, plan) in purchases.iter().enumerate() {
        record_purchase(
            &mut store,
            product,
            plan.quantity,
            Decimal::from(plan.unit_cost),
            plan.expiry_day.map(|d| date(2024, 2, d)),
            at(1 + (i as u32 % 20), 9),
        );
    }
    (store, product)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Stock is conserved and never negative after any sequence of
    /// successful sales.
    #[test]
    fn prop_stock_conservation(
        purchases in proptest::collection::vec(purchase_strategy(), 1..6),
        sales in proptest::collection::vec(1i64..15, 0..6),
    ) {
        let (mut store, product) = build_store(&purchases);
        let purchased: i64 = purchases.iter().map(|p| p.quantity).sum();
        let mut sold = 0i64;

        for (i, &quantity) in sales.iter().enumerate() {
            if record_sale(&mut store, product, quantity, at(25, 1 + i as u32)).is_ok() {
                sold += quantity;
            }
        }

        prop_assert_eq!(available_stock(&store, product), purchased - sold);
        prop_assert!(available_stock(&store, product) >= 0);
    }

    /// Every recorded sale's breakdown sums to its quantity, and no lot is
    /// ever oversubscribed.
    #[test]
    fn prop_allocation_completeness(
        purchases in proptest::collection::vec(purchase_strategy(), 1..6),
        sales in proptest::collection::vec(1i64..15, 1..6),
    ) {
        let (mut store, product) = build_store(&purchases);

        for (i, &quantity) in sales.iter().enumerate() {
            let _ = record_sale(&mut store, product, quantity, at(25, 1 + i as u32));
        }

        for sale in store.sales_for(product) {
            prop_assert_eq!(sale.allocated_quantity(), sale.quantity);
        }

        let consumed = consumed_by_lot(&store, product);
        for lot in store.purchases_for(product) {
            prop_assert!(consumed.get(&lot.id).copied().unwrap_or(0) <= lot.quantity);
        }
    }

    /// Allocation does not depend on the order lots happen to sit in the
    /// store.
    #[test]
    fn prop_allocation_order_is_deterministic(
        purchases in proptest::collection::vec(purchase_strategy(), 1..6),
        quantity in 1i64..30,
    ) {
        let (forward, product) = build_store(&purchases);
        let mut reversed = forward.clone();
        reversed.purchases.reverse();

        prop_assert_eq!(
            allocate(&forward, product, quantity),
            allocate(&reversed, product, quantity)
        );
    }

    /// Rebuilding the kardex never changes its output, and the final
    /// balance matches available stock.
    #[test]
    fn prop_reconstruction_is_stable(
        purchases in proptest::collection::vec(purchase_strategy(), 1..6),
        sales in proptest::collection::vec(1i64..15, 0..6),
    ) {
        let (mut store, product) = build_store(&purchases);
        for (i, &quantity) in sales.iter().enumerate() {
            let _ = record_sale(&mut store, product, quantity, at(25, 1 + i as u32));
        }

        let rows = build_ledger(&store, product);
        prop_assert_eq!(&rows, &build_ledger(&store, product));

        let final_balance = rows.last().map_or(0, |row| row.balance_quantity);
        prop_assert_eq!(final_balance, available_stock(&store, product));
    }
}
