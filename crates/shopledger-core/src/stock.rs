//! Stock arithmetic over the purchase and sale history.

use std::collections::HashMap;

use crate::store::LedgerStore;

/// Units currently available for a product.
///
/// Purchased minus sold over the whole history. Per-lot remainders are
/// not tracked here; [`crate::allocate`] re-derives them from the sale
/// history on every call, so the two views cannot disagree.
#[must_use]
pub fn available_stock(store: &LedgerStore, product_id: u64) -> i64 {
    let purchased: i64 = store.purchases_for(product_id).map(|lot| lot.quantity).sum();
    let sold: i64 = store.sales_for(product_id).map(|sale| sale.quantity).sum();
    purchased - sold
}

/// Units already taken from each lot of a product.
///
/// Sums `quantity_taken` over every recorded sale's allocation entries,
/// across the product's full sale history. Lots nothing was taken from
/// are absent from the map.
#[must_use]
pub fn consumed_by_lot(store: &LedgerStore, product_id: u64) -> HashMap<u64, i64> {
    let mut consumed = HashMap::new();
    for sale in store.sales_for(product_id) {
        for entry in &sale.allocation {
            *consumed.entry(entry.lot_id).or_insert(0) += entry.quantity_taken;
        }
    }
    consumed
}
