//! The ledger store: every product, purchase lot, and sale, plus the id
//! counters that new records draw from.
//!
//! The store is a passive value. All domain logic lives in pure functions
//! that read it (`stock`, `allocate`, `kardex`) or in the booking layer
//! that appends to it; the store itself only offers lookups and counters.

use serde::{Deserialize, Serialize};

use crate::lot::PurchaseLot;
use crate::product::Product;
use crate::sale::Sale;

/// Monotonic id counters, one per record type.
///
/// Counters start at 1 and only ever move forward; ids are never reused,
/// even after deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextIds {
    /// Next product id to assign.
    pub product: u64,
    /// Next purchase lot id to assign.
    pub purchase: u64,
    /// Next sale id to assign.
    pub sale: u64,
}

impl Default for NextIds {
    fn default() -> Self {
        Self {
            product: 1,
            purchase: 1,
            sale: 1,
        }
    }
}

/// The whole ledger held as one in-memory value.
///
/// Persistence reads and writes the store wholesale; nothing else touches
/// the disk. The serialized form uses camelCase field names and doubles as
/// the backup file format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStore {
    /// Registered products.
    pub products: Vec<Product>,
    /// All purchase lots, append-only.
    pub purchases: Vec<PurchaseLot>,
    /// All sales, append-only.
    pub sales: Vec<Sale>,
    /// Id counters for the three collections.
    pub next_id: NextIds,
}

impl LedgerStore {
    /// Create an empty store with counters at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Look up a product by name, ignoring case.
    #[must_use]
    pub fn product_by_name(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name_matches(name))
    }

    /// Look up a purchase lot by id.
    #[must_use]
    pub fn lot(&self, id: u64) -> Option<&PurchaseLot> {
        self.purchases.iter().find(|l| l.id == id)
    }

    /// Look up a sale by id.
    #[must_use]
    pub fn sale(&self, id: u64) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    /// All purchase lots of one product, in insertion order.
    pub fn purchases_for(&self, product_id: u64) -> impl Iterator<Item = &PurchaseLot> {
        self.purchases.iter().filter(move |l| l.product_id == product_id)
    }

    /// All sales of one product, in insertion order.
    pub fn sales_for(&self, product_id: u64) -> impl Iterator<Item = &Sale> {
        self.sales.iter().filter(move |s| s.product_id == product_id)
    }

    /// Claim the next product id.
    pub fn take_product_id(&mut self) -> u64 {
        let id = self.next_id.product;
        self.next_id.product += 1;
        id
    }

    /// Claim the next purchase lot id.
    pub fn take_purchase_id(&mut self) -> u64 {
        let id = self.next_id.purchase;
        self.next_id.purchase += 1;
        id
    }

    /// Claim the next sale id.
    pub fn take_sale_id(&mut self) -> u64 {
        let id = self.next_id.sale;
        self.next_id.sale += 1;
        id
    }
}
