//! Core types and algorithms for shopledger
//!
//! This crate holds the in-memory ledger of a small shop and the pure
//! functions that operate on it:
//!
//! - [`LedgerStore`] - products, purchase lots, and sales plus id counters
//! - [`Product`], [`PurchaseLot`], [`Sale`], [`SaleAllocationEntry`] - the records
//! - [`available_stock`] - purchased minus sold for one product
//! - [`allocate`] - FEFO/FIFO cost allocation of a sale across lots
//! - [`build_ledger`] - kardex reconstruction with running balances
//!
//! Everything here is side-effect free; persistence and user interaction
//! live in the surrounding crates.
//!
//! # Example
//!
//! ```
//! use shopledger_core::{allocate, LedgerStore, NaiveDate, Product, PurchaseLot};
//! use chrono::{TimeZone, Utc};
//! use rust_decimal_macros::dec;
//!
//! let mut store = LedgerStore::new();
//! let product_id = store.take_product_id();
//! store.products.push(Product::new(product_id, "Coffee 250g".to_string()).with_sell_price(dec!(10)));
//!
//! // Lot A: 5 units at 2, expiring in June. Lot B: 5 units at 3, expiring in January.
//! let lot_a = store.take_purchase_id();
//! store.purchases.push(
//!     PurchaseLot::new(lot_a, product_id, 5, dec!(2), Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
//!         .with_expiry(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
//! );
//! let lot_b = store.take_purchase_id();
//! store.purchases.push(
//!     PurchaseLot::new(lot_b, product_id, 5, dec!(3), Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap())
//!         .with_expiry(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
//! );
//!
//! // Selling 7 units drains the January lot first.
//! let entries = allocate(&store, product_id, 7).unwrap();
//! assert_eq!(entries[0].lot_id, lot_b);
//! assert_eq!(entries[0].quantity_taken, 5);
//! assert_eq!(entries[1].lot_id, lot_a);
//! assert_eq!(entries[1].quantity_taken, 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod allocate;
pub mod kardex;
pub mod lot;
pub mod product;
pub mod sale;
pub mod stock;
pub mod store;

pub use allocate::{allocate, AllocationError};
pub use kardex::{build_ledger, KardexMovement, KardexRow};
pub use lot::{consume_order, PurchaseLot};
pub use product::Product;
pub use sale::{Sale, SaleAllocationEntry};
pub use stock::{available_stock, consumed_by_lot};
pub use store::{LedgerStore, NextIds};

// Re-export the externally visible foundation types.
pub use chrono::{DateTime, NaiveDate, Utc};
pub use rust_decimal::Decimal;
