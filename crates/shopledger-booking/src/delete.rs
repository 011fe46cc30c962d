//! Two-phase deletions.
//!
//! Destructive operations are split in two: `prepare_*` validates the
//! request against the current store and returns a token describing what a
//! commit will remove; `commit_*` consumes the token and applies the
//! removal. The prompt between the two phases belongs to the caller. A
//! commit re-validates against the store, so a stale token can never
//! delete the wrong thing.

use rust_decimal::Decimal;
use shopledger_core::{available_stock, build_ledger, LedgerStore};

use crate::BookingError;

/// Proof that deleting one sale was prepared.
///
/// Only the product's most recent movement can be deleted; anything
/// earlier is already baked into later allocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDeletion {
    /// The sale to remove.
    pub sale_id: u64,
    /// The product it belongs to.
    pub product_id: u64,
    /// Units the sale moved.
    pub quantity: i64,
    /// Cost of goods sold recorded on the sale.
    pub cost_total: Decimal,
}

/// Proof that deleting one product was prepared.
///
/// Committing cascades: every purchase and sale of the product goes with
/// it. The counts let the caller describe the blast radius before asking
/// for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDeletion {
    /// The product to remove.
    pub product_id: u64,
    /// Its display name.
    pub name: String,
    /// Purchase lots a commit will remove.
    pub purchase_count: usize,
    /// Sales a commit will remove.
    pub sale_count: usize,
    /// Units currently on hand.
    pub stock: i64,
}

impl ProductDeletion {
    /// Whether the product has any recorded movements.
    #[must_use]
    pub const fn has_history(&self) -> bool {
        self.purchase_count > 0 || self.sale_count > 0
    }
}

fn latest_movement_is_sale(store: &LedgerStore, product_id: u64, sale_id: u64) -> bool {
    build_ledger(store, product_id)
        .last()
        .is_some_and(|row| row.movement.is_sale() && row.movement_id == sale_id)
}

/// Prepare deleting a sale.
///
/// Fails unless the sale exists and is the most recent movement of its
/// product in kardex order.
pub fn prepare_delete_sale(
    store: &LedgerStore,
    sale_id: u64,
) -> Result<SaleDeletion, BookingError> {
    let sale = store.sale(sale_id).ok_or_else(|| BookingError::Validation {
        message: format!("unknown sale id {sale_id}"),
    })?;

    if !latest_movement_is_sale(store, sale.product_id, sale_id) {
        return Err(BookingError::Validation {
            message: format!(
                "sale {sale_id} is not the most recent movement of product {}; only the latest movement can be deleted",
                sale.product_id
            ),
        });
    }

    Ok(SaleDeletion {
        sale_id,
        product_id: sale.product_id,
        quantity: sale.quantity,
        cost_total: sale.cost_total(),
    })
}

/// Commit a prepared sale deletion.
///
/// Re-validates the token before removing anything; a token prepared
/// against different store contents is rejected.
pub fn commit_delete_sale(
    store: &mut LedgerStore,
    token: &SaleDeletion,
) -> Result<(), BookingError> {
    if !latest_movement_is_sale(store, token.product_id, token.sale_id) {
        return Err(BookingError::Validation {
            message: format!(
                "ledger changed since deleting sale {} was prepared",
                token.sale_id
            ),
        });
    }
    store.sales.retain(|sale| sale.id != token.sale_id);
    Ok(())
}

/// Prepare deleting a product.
///
/// Always succeeds for an existing product; the token reports how many
/// purchases and sales a commit will cascade over so the caller can gate
/// on history.
pub fn prepare_delete_product(
    store: &LedgerStore,
    product_id: u64,
) -> Result<ProductDeletion, BookingError> {
    let product = store.product(product_id).ok_or_else(|| BookingError::Validation {
        message: format!("unknown product id {product_id}"),
    })?;

    Ok(ProductDeletion {
        product_id,
        name: product.name.clone(),
        purchase_count: store.purchases_for(product_id).count(),
        sale_count: store.sales_for(product_id).count(),
        stock: available_stock(store, product_id),
    })
}

/// Commit a prepared product deletion, cascading over its purchases and
/// sales.
pub fn commit_delete_product(
    store: &mut LedgerStore,
    token: &ProductDeletion,
) -> Result<(), BookingError> {
    if store.product(token.product_id).is_none() {
        return Err(BookingError::Validation {
            message: format!(
                "ledger changed since deleting product {} was prepared",
                token.product_id
            ),
        });
    }
    store.products.retain(|product| product.id != token.product_id);
    store.purchases.retain(|lot| lot.product_id != token.product_id);
    store.sales.retain(|sale| sale.product_id != token.product_id);
    Ok(())
}
