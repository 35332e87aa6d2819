//! The cart value types: an ordered sequence of line items, unique by
//! product ID.
//!
//! `Cart` is a plain value. All validation against stock and all persistence
//! happen in the store crate; the methods here only maintain the structural
//! invariants (ordering, uniqueness, no zero amounts via the store's checks).

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// One product plus its quantity in the cart.
///
/// Serializes with the product fields flattened, so a line item persists as
/// `{"id": .., "title": .., "price": .., "image": .., "amount": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl LineItem {
    /// The ID of the product this line refers to.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }
}

/// The full ordered set of line items for the current session.
///
/// Invariants: at most one line item per `ProductId`; insertion order
/// reflects the order products were first added. Serializes transparently as
/// a JSON array of line items, which is also the persisted snapshot shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the cart holds a line item for `product_id`.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items
            .iter()
            .any(|item| item.product_id() == product_id)
    }

    /// Current amount for `product_id`, if present.
    #[must_use]
    pub fn amount_of(&self, product_id: ProductId) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.product_id() == product_id)
            .map(|item| item.amount)
    }

    /// Sum of all line item amounts.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.amount).sum()
    }

    /// Insert a line item, keeping the cart unique by product ID.
    ///
    /// A line item for a product already in the cart replaces the existing
    /// one in place (same position); otherwise the item is appended.
    pub fn insert(&mut self, item: LineItem) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.product_id() == item.product_id())
        {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Replace the amount of an existing line item.
    ///
    /// Returns `false` (and changes nothing) when `product_id` is not in the
    /// cart.
    pub fn set_amount(&mut self, product_id: ProductId, amount: u32) -> bool {
        match self
            .items
            .iter_mut()
            .find(|item| item.product_id() == product_id)
        {
            Some(item) => {
                item.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Remove the line item for `product_id`, preserving the order of the
    /// rest.
    ///
    /// Returns `false` when `product_id` is not in the cart.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        match self
            .items
            .iter()
            .position(|item| item.product_id() == product_id)
        {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(id: i32, title: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Decimal::new(1990, 2),
            image: format!("https://cdn.example.com/{id}.png"),
        }
    }

    fn line(id: i32, amount: u32) -> LineItem {
        LineItem {
            product: product(id, "Sneaker"),
            amount,
        }
    }

    #[test]
    fn test_insert_appends_in_order() {
        let mut cart = Cart::new();
        cart.insert(line(3, 1));
        cart.insert(line(1, 1));
        cart.insert(line(2, 1));

        let ids: Vec<i32> = cart.items().iter().map(|i| i.product_id().as_i32()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_insert_replaces_existing_in_place() {
        let mut cart = Cart::new();
        cart.insert(line(1, 1));
        cart.insert(line(2, 1));
        cart.insert(line(1, 5));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.amount_of(ProductId::new(1)), Some(5));
        let ids: Vec<i32> = cart.items().iter().map(|i| i.product_id().as_i32()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_set_amount_only_touches_target() {
        let mut cart = Cart::new();
        cart.insert(line(1, 2));
        cart.insert(line(2, 4));

        assert!(cart.set_amount(ProductId::new(1), 7));
        assert_eq!(cart.amount_of(ProductId::new(1)), Some(7));
        assert_eq!(cart.amount_of(ProductId::new(2)), Some(4));
    }

    #[test]
    fn test_set_amount_missing_product_is_noop() {
        let mut cart = Cart::new();
        cart.insert(line(1, 2));

        let before = cart.clone();
        assert!(!cart.set_amount(ProductId::new(9), 3));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_preserves_order_of_rest() {
        let mut cart = Cart::new();
        cart.insert(line(1, 1));
        cart.insert(line(2, 1));
        cart.insert(line(3, 1));

        assert!(cart.remove(ProductId::new(2)));
        let ids: Vec<i32> = cart.items().iter().map(|i| i.product_id().as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_remove_missing_product_returns_false() {
        let mut cart = Cart::new();
        cart.insert(line(1, 1));

        assert!(!cart.remove(ProductId::new(2)));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_total_quantity() {
        let mut cart = Cart::new();
        assert_eq!(cart.total_quantity(), 0);
        cart.insert(line(1, 2));
        cart.insert(line(2, 3));
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_serde_round_trip_preserves_ids_amounts_order() {
        let mut cart = Cart::new();
        cart.insert(line(5, 2));
        cart.insert(line(1, 1));

        let json = serde_json::to_string(&cart).expect("serialize cart");
        let reloaded: Cart = serde_json::from_str(&json).expect("deserialize cart");
        assert_eq!(reloaded, cart);
    }

    #[test]
    fn test_snapshot_shape_is_bare_array_with_flattened_product() {
        let mut cart = Cart::new();
        cart.insert(line(1, 2));

        let value: serde_json::Value =
            serde_json::to_value(&cart).expect("cart to JSON value");
        let first = value
            .as_array()
            .and_then(|items| items.first())
            .expect("one line item");
        assert_eq!(first["id"], 1);
        assert_eq!(first["amount"], 2);
        assert!(first["title"].is_string());
        assert!(first.get("product").is_none());
    }

    #[test]
    fn test_empty_cart_serializes_as_empty_array() {
        let json = serde_json::to_string(&Cart::new()).expect("serialize empty cart");
        assert_eq!(json, "[]");
    }
}
