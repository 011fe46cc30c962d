//! Recording operations for the shop ledger.
//!
//! This crate layers the mutating operations on top of the pure core:
//!
//! - Product registration (trimmed unique names, non-negative prices)
//! - Purchase registration (new lots)
//! - Sale recording: the price check, the stock check, the FEFO/FIFO
//!   allocation, and the appended sale with its profit receipt
//! - Price suggestion from a target margin
//! - Two-phase deletions (prepare a token, commit it) in [`delete`]
//!
//! Every function here transforms an in-memory [`LedgerStore`] and returns
//! before anything touches disk; persistence happens at the caller's
//! boundary, once, after the transformation succeeded. On error the store
//! is left exactly as it was.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod delete;

pub use delete::{
    commit_delete_product, commit_delete_sale, prepare_delete_product, prepare_delete_sale,
    ProductDeletion, SaleDeletion,
};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shopledger_core::{
    allocate, available_stock, AllocationError, LedgerStore, Product, PurchaseLot, Sale,
    SaleAllocationEntry,
};
use thiserror::Error;

/// Errors from recording operations.
///
/// All validation happens before any mutation, so a returned error always
/// means the store is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// Input failed validation.
    #[error("invalid input: {message}")]
    Validation {
        /// What was wrong with the input.
        message: String,
    },

    /// A product with the same name already exists, ignoring case.
    #[error("product \"{name}\" already exists")]
    DuplicateProduct {
        /// The conflicting name as submitted.
        name: String,
    },

    /// The product has no sell price, so a sale cannot be priced.
    #[error("product \"{name}\" has no sell price")]
    MissingPrice {
        /// Name of the product.
        name: String,
    },

    /// Not enough stock across the product's lots.
    #[error(transparent)]
    InsufficientStock(#[from] AllocationError),
}

impl BookingError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Input for registering a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    /// Display name; surrounding whitespace is trimmed.
    pub name: String,
    /// Sell price per unit.
    pub sell_price: Decimal,
}

/// Register a product and return its id.
///
/// The name is trimmed and must be non-empty and unique among existing
/// products ignoring case; the price must not be negative.
pub fn add_product(store: &mut LedgerStore, input: &NewProduct) -> Result<u64, BookingError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(BookingError::validation("product name must not be empty"));
    }
    if input.sell_price < Decimal::ZERO {
        return Err(BookingError::validation("sell price must not be negative"));
    }
    if store.product_by_name(name).is_some() {
        return Err(BookingError::DuplicateProduct {
            name: name.to_string(),
        });
    }

    let id = store.take_product_id();
    store
        .products
        .push(Product::new(id, name.to_string()).with_sell_price(input.sell_price));
    Ok(id)
}

/// Input for registering a purchase lot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseInput {
    /// The product being restocked.
    pub product_id: u64,
    /// Units acquired; must be positive.
    pub quantity: i64,
    /// Cost per unit; must not be negative.
    pub unit_cost: Decimal,
    /// Expiry date for perishable stock.
    pub expiry_date: Option<NaiveDate>,
}

/// Record a purchase lot and return its id.
///
/// `when` is the purchase timestamp, injected by the caller so the
/// operation stays deterministic.
pub fn record_purchase(
    store: &mut LedgerStore,
    input: &PurchaseInput,
    when: DateTime<Utc>,
) -> Result<u64, BookingError> {
    if store.product(input.product_id).is_none() {
        return Err(BookingError::validation(format!(
            "unknown product id {}",
            input.product_id
        )));
    }
    if input.quantity <= 0 {
        return Err(BookingError::validation("quantity must be positive"));
    }
    if input.unit_cost < Decimal::ZERO {
        return Err(BookingError::validation("unit cost must not be negative"));
    }

    let id = store.take_purchase_id();
    let mut lot = PurchaseLot::new(id, input.product_id, input.quantity, input.unit_cost, when);
    if let Some(expiry) = input.expiry_date {
        lot = lot.with_expiry(expiry);
    }
    store.purchases.push(lot);
    Ok(id)
}

/// What a recorded sale earned.
///
/// `margin_pct` is profit over revenue as a percentage, zero when the
/// revenue is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    /// Id of the appended sale.
    pub sale_id: u64,
    /// The product sold.
    pub product_id: u64,
    /// Units sold.
    pub quantity: i64,
    /// `quantity * sell price`.
    pub revenue: Decimal,
    /// Cost of goods sold, from the allocation.
    pub cost: Decimal,
    /// `revenue - cost`.
    pub profit: Decimal,
    /// Profit as a percentage of revenue.
    pub margin_pct: Decimal,
    /// The per-lot breakdown as recorded on the sale.
    pub allocation: Vec<SaleAllocationEntry>,
}

/// Record a sale and return its receipt.
///
/// Rejects a product without a sell price, then checks available stock,
/// then allocates across lots. The stock check and the allocator's own
/// shortage check are both made; either failing leaves the store intact.
pub fn record_sale(
    store: &mut LedgerStore,
    product_id: u64,
    quantity: i64,
    when: DateTime<Utc>,
) -> Result<SaleReceipt, BookingError> {
    let product = store.product(product_id).ok_or_else(|| {
        BookingError::validation(format!("unknown product id {product_id}"))
    })?;
    let Some(sell_price) = product.sell_price else {
        return Err(BookingError::MissingPrice {
            name: product.name.clone(),
        });
    };
    if quantity <= 0 {
        return Err(BookingError::validation("quantity must be positive"));
    }

    let available = available_stock(store, product_id);
    if available < quantity {
        return Err(BookingError::InsufficientStock(
            AllocationError::InsufficientStock {
                product_id,
                requested: quantity,
                available,
            },
        ));
    }

    let allocation = allocate(store, product_id, quantity)?;
    let cost: Decimal = allocation.iter().map(SaleAllocationEntry::cost_total).sum();

    let sale_id = store.take_sale_id();
    store.sales.push(Sale {
        id: sale_id,
        product_id,
        quantity,
        date: when,
        allocation: allocation.clone(),
    });

    let revenue = sell_price * Decimal::from(quantity);
    let profit = revenue - cost;
    let margin_pct = if revenue > Decimal::ZERO {
        profit / revenue * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    Ok(SaleReceipt {
        sale_id,
        product_id,
        quantity,
        revenue,
        cost,
        profit,
        margin_pct,
        allocation,
    })
}

/// Suggest a sell price that yields `margin_pct` percent margin on
/// `unit_cost`.
///
/// The margin is taken over the sell price, so the formula is
/// `unit_cost / (1 - margin_pct / 100)`.
pub fn suggest_price(unit_cost: Decimal, margin_pct: Decimal) -> Result<Decimal, BookingError> {
    if unit_cost <= Decimal::ZERO {
        return Err(BookingError::validation("unit cost must be positive"));
    }
    if margin_pct < Decimal::ZERO {
        return Err(BookingError::validation("margin must not be negative"));
    }
    if margin_pct >= Decimal::ONE_HUNDRED {
        return Err(BookingError::validation("margin must be below 100"));
    }
    Ok(unit_cost / (Decimal::ONE - margin_pct / Decimal::ONE_HUNDRED))
}
