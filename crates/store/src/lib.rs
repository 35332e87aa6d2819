//! Basket Store - the shopping cart state container.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the in-memory cart, validates quantity changes
//!   against the remote catalog's stock, and mirrors every successful
//!   mutation wholesale to a [`SnapshotStore`].
//! - The catalog is the source of truth for products and stock - stock is
//!   read fresh on every mutating operation, product records are cached
//!   in-memory via `moka` (5 minute TTL).
//! - Failures never escape the public operations: the user-visible outcome
//!   goes through the [`Notifier`] seam, diagnostics go through `tracing`.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use basket_core::ProductId;
//! use basket_store::{BasketConfig, CartStore, ChannelNotifier};
//!
//! let config = BasketConfig::from_env()?;
//! let (notifier, mut notices) = ChannelNotifier::new();
//! let store = CartStore::from_config(&config, Arc::new(notifier))?;
//!
//! store.add_product(ProductId::new(1)).await;
//! let cart = store.cart();
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod snapshot;
mod store;

pub use catalog::{CatalogClient, CatalogError};
pub use config::{BasketConfig, CatalogConfig, ConfigError};
pub use error::CartError;
pub use notify::{ChannelNotifier, Notice, Notifier};
pub use snapshot::{CART_KEY, FileStore, MemoryStore, SnapshotError, SnapshotStore};
pub use store::{CartStore, StoreInitError, UpdateProductAmount};
