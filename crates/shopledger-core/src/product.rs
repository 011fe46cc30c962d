//! Product records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product sold by the shop.
///
/// Product names are unique ignoring case. The sell price may be absent
/// (for example after restoring an old backup); such a product can still
/// receive purchases, but recording a sale against it fails until a price
/// exists.
///
/// # Examples
///
/// ```
/// use shopledger_core::Product;
/// use rust_decimal_macros::dec;
///
/// let product = Product::new(1, "Coffee 250g".to_string()).with_sell_price(dec!(10));
/// assert_eq!(product.sell_price, Some(dec!(10)));
/// assert!(product.name_matches("coffee 250G"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product id.
    pub id: u64,
    /// Display name, unique among products ignoring case.
    pub name: String,
    /// Sell price per unit, if one has been defined.
    #[serde(default)]
    pub sell_price: Option<Decimal>,
}

impl Product {
    /// Create a product without a sell price.
    #[must_use]
    pub const fn new(id: u64, name: String) -> Self {
        Self {
            id,
            name,
            sell_price: None,
        }
    }

    /// Set the sell price.
    #[must_use]
    pub const fn with_sell_price(mut self, price: Decimal) -> Self {
        self.sell_price = Some(price);
        self
    }

    /// Whether `name` refers to this product, ignoring case.
    #[must_use]
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn name_matching_ignores_case() {
        let product = Product::new(1, "Olive Oil 1L".to_string());
        assert!(product.name_matches("olive oil 1l"));
        assert!(product.name_matches("OLIVE OIL 1L"));
        assert!(!product.name_matches("olive oil 2l"));
    }

    #[test]
    fn sell_price_defaults_to_none() {
        let product = Product::new(7, "Rice".to_string());
        assert_eq!(product.sell_price, None);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let product = Product::new(3, "Tea".to_string()).with_sell_price(dec!(4.50));
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "Tea");
        assert_eq!(json["sellPrice"], "4.50");
    }

    #[test]
    fn deserializes_without_sell_price_field() {
        let product: Product = serde_json::from_str(r#"{"id": 2, "name": "Salt"}"#).unwrap();
        assert_eq!(product.sell_price, None);
    }
}
