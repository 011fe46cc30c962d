//! Ledger audit rules.
//!
//! This crate checks a whole [`LedgerStore`] for internal consistency:
//!
//! - Referential integrity (purchases, sales, and allocations point at
//!   records that exist and belong together)
//! - Value sanity (positive quantities, non-negative costs and prices)
//! - Allocation bookkeeping (per-sale sums, per-lot consumption, running
//!   stock never negative)
//! - Catalog rules (unique names, prices present)
//! - Id counter consistency
//!
//! A healthy store produced only through the booking operations never
//! trips any of these; the audit exists for stores restored from backups
//! or edited by hand.
//!
//! # Error Codes
//!
//! | Code | Description |
//! |------|-------------|
//! | E1001 | Purchase lot references unknown product |
//! | E1002 | Sale references unknown product |
//! | E1003 | Allocation entry references unknown lot |
//! | E1004 | Allocation entry takes from another product's lot |
//! | E2001 | Purchase quantity not positive |
//! | E2002 | Sale quantity not positive |
//! | E2003 | Allocation quantity not positive |
//! | E2004 | Purchase unit cost negative |
//! | E2005 | Allocation cost negative |
//! | E2006 | Sell price negative |
//! | E3001 | Sale quantity and allocation sum disagree |
//! | E3002 | Lot consumed beyond its quantity |
//! | E3003 | Running stock goes negative |
//! | E4001 | Duplicate product name (ignoring case) |
//! | E4002 | Product has no sell price (warning) |
//! | E5001 | Id counter not above existing ids |
//! | E5002 | Duplicate record id |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use thiserror::Error;

use shopledger_core::kardex::build_ledger;
use shopledger_core::store::LedgerStore;

/// Audit error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // === Reference Errors (E1xxx) ===
    /// E1001: Purchase lot references a product that does not exist.
    PurchaseUnknownProduct,
    /// E1002: Sale references a product that does not exist.
    SaleUnknownProduct,
    /// E1003: Allocation entry references a lot that does not exist.
    AllocationUnknownLot,
    /// E1004: Allocation entry takes from a lot of another product.
    AllocationForeignLot,

    // === Value Errors (E2xxx) ===
    /// E2001: Purchase quantity is zero or negative.
    NonPositivePurchaseQuantity,
    /// E2002: Sale quantity is zero or negative.
    NonPositiveSaleQuantity,
    /// E2003: Allocation quantity is zero or negative.
    NonPositiveAllocationQuantity,
    /// E2004: Purchase unit cost is negative.
    NegativeUnitCost,
    /// E2005: Allocation cost is negative.
    NegativeAllocationCost,
    /// E2006: Sell price is negative.
    NegativeSellPrice,

    // === Bookkeeping Errors (E3xxx) ===
    /// E3001: Sale quantity differs from the sum of its allocation.
    AllocationSumMismatch,
    /// E3002: Sales take more units from a lot than it holds.
    LotOversubscribed,
    /// E3003: Running stock goes negative at some movement.
    NegativeRunningStock,

    // === Catalog Errors (E4xxx) ===
    /// E4001: Two products share a name ignoring case.
    DuplicateProductName,
    /// E4002: Product has no sell price (warning).
    MissingSellPrice,

    // === Counter Errors (E5xxx) ===
    /// E5001: An id counter is not strictly above every existing id.
    StaleIdCounter,
    /// E5002: Two records in one collection share an id.
    DuplicateId,
}

impl ErrorCode {
    /// Get the error code string (e.g., "E1001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            // Reference errors
            Self::PurchaseUnknownProduct => "E1001",
            Self::SaleUnknownProduct => "E1002",
            Self::AllocationUnknownLot => "E1003",
            Self::AllocationForeignLot => "E1004",
            // Value errors
            Self::NonPositivePurchaseQuantity => "E2001",
            Self::NonPositiveSaleQuantity => "E2002",
            Self::NonPositiveAllocationQuantity => "E2003",
            Self::NegativeUnitCost => "E2004",
            Self::NegativeAllocationCost => "E2005",
            Self::NegativeSellPrice => "E2006",
            // Bookkeeping errors
            Self::AllocationSumMismatch => "E3001",
            Self::LotOversubscribed => "E3002",
            Self::NegativeRunningStock => "E3003",
            // Catalog errors
            Self::DuplicateProductName => "E4001",
            Self::MissingSellPrice => "E4002",
            // Counter errors
            Self::StaleIdCounter => "E5001",
            Self::DuplicateId => "E5002",
        }
    }

    /// Check if this is a warning (not an error).
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::MissingSellPrice)
    }

    /// Get the severity level.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        if self.is_warning() {
            Severity::Warning
        } else {
            Severity::Error
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Severity level for audit findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The store is inconsistent.
    Error,
    /// Suspicious but workable.
    Warning,
}

/// One audit finding.
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct ValidationError {
    /// Error code.
    pub code: ErrorCode,
    /// Finding message.
    pub message: String,
    /// Additional context.
    pub context: Option<String>,
}

impl ValidationError {
    /// Create a new finding.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Add context to this finding.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Severity of this finding's code.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.code.severity()
    }
}

/// Audit a whole store.
///
/// Returns every finding, errors and warnings alike, in a stable order
/// (products, purchases, sales, lot consumption, running stock, counters).
#[must_use]
pub fn validate(store: &LedgerStore) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check_products(store, &mut errors);
    check_purchases(store, &mut errors);
    check_sales(store, &mut errors);
    check_lot_consumption(store, &mut errors);
    check_running_stock(store, &mut errors);
    check_id_counters(store, &mut errors);
    errors
}

/// Whether any finding in `findings` is an error (not a warning).
#[must_use]
pub fn has_errors(findings: &[ValidationError]) -> bool {
    findings.iter().any(|f| f.severity() == Severity::Error)
}

fn check_products(store: &LedgerStore, errors: &mut Vec<ValidationError>) {
    let mut seen: HashMap<String, u64> = HashMap::new();
    for product in &store.products {
        match seen.entry(product.name.to_lowercase()) {
            Entry::Occupied(first) => {
                errors.push(ValidationError::new(
                    ErrorCode::DuplicateProductName,
                    format!(
                        "Product name \"{}\" is shared by products {} and {}",
                        product.name,
                        first.get(),
                        product.id
                    ),
                ));
            }
            Entry::Vacant(slot) => {
                slot.insert(product.id);
            }
        }

        match product.sell_price {
            None => errors.push(ValidationError::new(
                ErrorCode::MissingSellPrice,
                format!(
                    "Product {} (\"{}\") has no sell price; sales against it will fail",
                    product.id, product.name
                ),
            )),
            Some(price) if price < Decimal::ZERO => errors.push(ValidationError::new(
                ErrorCode::NegativeSellPrice,
                format!("Product {} has negative sell price {}", product.id, price),
            )),
            Some(_) => {}
        }
    }
}

fn check_purchases(store: &LedgerStore, errors: &mut Vec<ValidationError>) {
    for lot in &store.purchases {
        if store.product(lot.product_id).is_none() {
            errors.push(ValidationError::new(
                ErrorCode::PurchaseUnknownProduct,
                format!(
                    "Purchase lot {} references unknown product {}",
                    lot.id, lot.product_id
                ),
            ));
        }
        if lot.quantity <= 0 {
            errors.push(ValidationError::new(
                ErrorCode::NonPositivePurchaseQuantity,
                format!(
                    "Purchase lot {} has non-positive quantity {}",
                    lot.id, lot.quantity
                ),
            ));
        }
        if lot.unit_cost < Decimal::ZERO {
            errors.push(ValidationError::new(
                ErrorCode::NegativeUnitCost,
                format!(
                    "Purchase lot {} has negative unit cost {}",
                    lot.id, lot.unit_cost
                ),
            ));
        }
    }
}

fn check_sales(store: &LedgerStore, errors: &mut Vec<ValidationError>) {
    for sale in &store.sales {
        if store.product(sale.product_id).is_none() {
            errors.push(ValidationError::new(
                ErrorCode::SaleUnknownProduct,
                format!(
                    "Sale {} references unknown product {}",
                    sale.id, sale.product_id
                ),
            ));
        }
        if sale.quantity <= 0 {
            errors.push(ValidationError::new(
                ErrorCode::NonPositiveSaleQuantity,
                format!("Sale {} has non-positive quantity {}", sale.id, sale.quantity),
            ));
        }

        for entry in &sale.allocation {
            if entry.quantity_taken <= 0 {
                errors.push(ValidationError::new(
                    ErrorCode::NonPositiveAllocationQuantity,
                    format!(
                        "Sale {} takes non-positive quantity {} from lot {}",
                        sale.id, entry.quantity_taken, entry.lot_id
                    ),
                ));
            }
            if entry.cost_applied < Decimal::ZERO {
                errors.push(ValidationError::new(
                    ErrorCode::NegativeAllocationCost,
                    format!(
                        "Sale {} applies negative cost {} from lot {}",
                        sale.id, entry.cost_applied, entry.lot_id
                    ),
                ));
            }
            match store.lot(entry.lot_id) {
                None => errors.push(ValidationError::new(
                    ErrorCode::AllocationUnknownLot,
                    format!(
                        "Sale {} allocation references unknown lot {}",
                        sale.id, entry.lot_id
                    ),
                )),
                Some(lot) if lot.product_id != sale.product_id => {
                    errors.push(ValidationError::new(
                        ErrorCode::AllocationForeignLot,
                        format!(
                            "Sale {} of product {} takes from lot {} of product {}",
                            sale.id, sale.product_id, lot.id, lot.product_id
                        ),
                    ));
                }
                Some(_) => {}
            }
        }

        let allocated = sale.allocated_quantity();
        if allocated != sale.quantity {
            errors.push(ValidationError::new(
                ErrorCode::AllocationSumMismatch,
                format!(
                    "Sale {} has quantity {} but its allocation covers {}",
                    sale.id, sale.quantity, allocated
                ),
            ));
        }
    }
}

fn check_lot_consumption(store: &LedgerStore, errors: &mut Vec<ValidationError>) {
    let mut taken: HashMap<u64, i64> = HashMap::new();
    for sale in &store.sales {
        for entry in &sale.allocation {
            *taken.entry(entry.lot_id).or_default() += entry.quantity_taken;
        }
    }

    for lot in &store.purchases {
        let consumed = taken.get(&lot.id).copied().unwrap_or(0);
        if consumed > lot.quantity {
            errors.push(ValidationError::new(
                ErrorCode::LotOversubscribed,
                format!(
                    "Lot {} holds {} units but sales take {}",
                    lot.id, lot.quantity, consumed
                ),
            ));
        }
    }
}

fn check_running_stock(store: &LedgerStore, errors: &mut Vec<ValidationError>) {
    for product in &store.products {
        // At most one finding per product.
        if let Some(row) = build_ledger(store, product.id)
            .iter()
            .find(|row| row.balance_quantity < 0)
        {
            errors.push(
                ValidationError::new(
                    ErrorCode::NegativeRunningStock,
                    format!(
                        "Stock of product {} goes negative ({}) on {}",
                        product.id,
                        row.balance_quantity,
                        row.date.date_naive()
                    ),
                )
                .with_context(format!("movement id {}", row.movement_id)),
            );
        }
    }
}

fn check_id_counters(store: &LedgerStore, errors: &mut Vec<ValidationError>) {
    check_collection_ids(
        "product",
        store.products.iter().map(|p| p.id),
        store.next_id.product,
        errors,
    );
    check_collection_ids(
        "purchase",
        store.purchases.iter().map(|l| l.id),
        store.next_id.purchase,
        errors,
    );
    check_collection_ids(
        "sale",
        store.sales.iter().map(|s| s.id),
        store.next_id.sale,
        errors,
    );
}

fn check_collection_ids(
    kind: &str,
    ids: impl Iterator<Item = u64>,
    next: u64,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    let mut max = 0_u64;
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ErrorCode::DuplicateId,
                format!("Duplicate {kind} id {id}"),
            ));
        }
        max = max.max(id);
    }
    if max > 0 && next <= max {
        errors.push(ValidationError::new(
            ErrorCode::StaleIdCounter,
            format!("nextId.{kind} is {next} but {kind} id {max} exists"),
        ));
    }
}
