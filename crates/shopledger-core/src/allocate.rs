//! Greedy FEFO/FIFO allocation of a sale across purchase lots.
//!
//! Given a product and a requested quantity, the allocator decides which
//! lots the units come from and at what unit cost:
//!
//! 1. Sort the product's lots by [`consume_order`](crate::lot::consume_order).
//! 2. Derive each lot's remaining stock by replaying every recorded sale's
//!    allocation entries (the full history, not a cached counter).
//! 3. Walk the sorted lots, taking `min(remaining requested, remaining in
//!    lot)` from each until the request is covered.
//!
//! The result is pure: nothing is written to the store. The caller appends
//! the resulting [`Sale`](crate::sale::Sale) if it wants the allocation to
//! take effect.

use std::fmt;

use crate::lot::PurchaseLot;
use crate::sale::SaleAllocationEntry;
use crate::stock::consumed_by_lot;
use crate::store::LedgerStore;

/// Failure to cover a requested quantity from a product's lots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// The product's lots cannot cover the requested quantity.
    InsufficientStock {
        /// The product being sold.
        product_id: u64,
        /// Units requested.
        requested: i64,
        /// Units actually available across all lots.
        available: i64,
    },
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientStock {
                product_id,
                requested,
                available,
            } => write!(
                f,
                "insufficient stock for product {product_id}: requested {requested}, available {available}"
            ),
        }
    }
}

impl std::error::Error for AllocationError {}

/// Decide which lots a sale of `quantity` units consumes.
///
/// Returns the per-lot breakdown in consumption order; the entries sum to
/// exactly `quantity`. Fails with [`AllocationError::InsufficientStock`]
/// when the lots cannot cover the request. The check is made here even
/// when the caller already verified available stock, so a direct call can
/// never oversell.
pub fn allocate(
    store: &LedgerStore,
    product_id: u64,
    quantity: i64,
) -> Result<Vec<SaleAllocationEntry>, AllocationError> {
    let mut lots: Vec<&PurchaseLot> = store.purchases_for(product_id).collect();
    lots.sort_by_key(|lot| lot.consume_key());

    let consumed = consumed_by_lot(store, product_id);

    let mut remaining = quantity;
    let mut allocation = Vec::new();
    for lot in lots {
        if remaining <= 0 {
            break;
        }
        let in_lot = lot.quantity - consumed.get(&lot.id).copied().unwrap_or(0);
        if in_lot <= 0 {
            continue;
        }
        let take = remaining.min(in_lot);
        allocation.push(SaleAllocationEntry {
            lot_id: lot.id,
            quantity_taken: take,
            cost_applied: lot.unit_cost,
        });
        remaining -= take;
    }

    if remaining > 0 {
        return Err(AllocationError::InsufficientStock {
            product_id,
            requested: quantity,
            available: quantity - remaining,
        });
    }
    Ok(allocation)
}
