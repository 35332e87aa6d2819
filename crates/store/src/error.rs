//! Error taxonomy for cart operations.
//!
//! None of these errors cross the store's public boundary: each operation
//! catches its own failures, emits a [`crate::notify::Notice`], and logs.
//! The taxonomy exists so the boundary can tell an expected business
//! rejection (stock exceeded) from a genuine failure.

use thiserror::Error;

use basket_core::ProductId;

use crate::catalog::CatalogError;
use crate::snapshot::SnapshotError;

/// Errors raised while applying a cart mutation.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested amount exceeds the catalog's available stock.
    #[error(
        "requested amount {requested} for product {product_id} exceeds available stock {available}"
    )]
    StockExceeded {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotFound(ProductId),

    /// The target amount is zero or negative.
    #[error("invalid target amount: {0}")]
    InvalidAmount(i64),

    /// Catalog lookup failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Snapshot persistence failed.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Cart serialization failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
