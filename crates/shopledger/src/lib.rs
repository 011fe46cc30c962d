//! Shopledger CLI.
//!
//! A single `shopledger` binary that keeps a small shop's inventory in a
//! JSON ledger file and reconstructs costs from it:
//!
//! - `shopledger add-product` / `purchase` / `sell`: record movements
//! - `shopledger stock` / `kardex`: inventory and valuation reports
//! - `shopledger check`: audit the ledger for consistency errors
//! - `shopledger export` / `import`: backup and restore
//!
//! # Example Usage
//!
//! ```bash
//! shopledger add-product "Coffee 250g" --price 10
//! shopledger purchase coffee --qty 5 --cost 2 --expiry 2026-06-01
//! shopledger sell coffee --qty 3
//! shopledger kardex coffee
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod report;
