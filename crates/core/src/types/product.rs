//! Catalog records as served by the remote product service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product record from the remote catalog.
///
/// Fetched from `GET /products/{id}` when a product enters the cart for the
/// first time. The attributes beyond `id` are carried through for display;
/// the cart logic itself only keys on `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub image: String,
}

/// Available stock for a product, as reported by `GET /stock/{id}`.
///
/// Read-only and never cached: every mutating cart operation that needs it
/// reads it fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: ProductId,
    pub amount: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_record_deserializes_from_service_payload() {
        let record: StockRecord =
            serde_json::from_str(r#"{"id": 1, "amount": 3}"#).expect("deserialize stock");
        assert_eq!(record.id, ProductId::new(1));
        assert_eq!(record.amount, 3);
    }

    #[test]
    fn test_product_deserializes_numeric_price() {
        let product: Product = serde_json::from_str(
            r#"{"id": 2, "title": "Sneaker", "price": 179.9, "image": "https://cdn.example.com/2.png"}"#,
        )
        .expect("deserialize product");
        assert_eq!(product.id, ProductId::new(2));
        assert_eq!(product.price, "179.9".parse::<Decimal>().expect("decimal"));
    }
}
