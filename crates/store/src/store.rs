//! The cart store: in-memory cart state with stock-validated mutations and
//! whole-snapshot persistence.
//!
//! # Behavior
//!
//! Every mutating operation runs the same shape: validate (fetching stock
//! fresh from the catalog where needed), build the next cart value, persist
//! the full snapshot, then publish it. A rejected or failed operation
//! changes nothing - there is no observable partial state.
//!
//! Mutations are serialized through a single writer guard, so two rapid
//! calls cannot lose each other's effect; the second observes the first's
//! published cart. Reads never wait on writers.

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::instrument;

use basket_core::{Cart, LineItem, ProductId};

use crate::catalog::{CatalogClient, CatalogError};
use crate::config::BasketConfig;
use crate::error::CartError;
use crate::notify::{Notice, Notifier};
use crate::snapshot::{CART_KEY, FileStore, SnapshotError, SnapshotStore};

/// Target absolute quantity for one line item (not a delta).
#[derive(Debug, Clone, Copy)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    /// Signed so that invalid (zero or negative) targets can be expressed
    /// and rejected rather than made unrepresentable upstream.
    pub amount: i64,
}

/// Errors that can occur wiring up a [`CartStore`].
#[derive(Debug, Error)]
pub enum StoreInitError {
    /// Catalog client could not be built.
    #[error("catalog client error: {0}")]
    Catalog(#[from] CatalogError),

    /// Snapshot store could not be opened.
    #[error("snapshot store error: {0}")]
    Snapshot(#[from] SnapshotError),
}

// =============================================================================
// CartStore
// =============================================================================

/// The shopping cart state container.
///
/// Cheaply cloneable via `Arc`; clones share the same cart, catalog client,
/// snapshot store, and notifier.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    catalog: CatalogClient,
    snapshots: Arc<dyn SnapshotStore>,
    notifier: Arc<dyn Notifier>,
    /// Published snapshot; consumers read it without blocking on writers.
    cart: RwLock<Cart>,
    /// Held across each whole mutating operation, fetches included.
    write_guard: tokio::sync::Mutex<()>,
}

impl CartStore {
    /// Create a store from its collaborators, loading the persisted cart.
    ///
    /// A missing, unreadable, or unparseable snapshot falls back to an
    /// empty cart with a warning; construction itself never fails on the
    /// snapshot.
    #[must_use]
    pub fn new(
        catalog: CatalogClient,
        snapshots: Arc<dyn SnapshotStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let cart = load_initial_cart(snapshots.as_ref());

        Self {
            inner: Arc::new(CartStoreInner {
                catalog,
                snapshots,
                notifier,
                cart: RwLock::new(cart),
                write_guard: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Create a store from configuration: catalog client plus a file-backed
    /// snapshot store under `config.snapshot_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built or the
    /// snapshot directory cannot be created.
    pub fn from_config(
        config: &BasketConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, StoreInitError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let snapshots: Arc<dyn SnapshotStore> =
            Arc::new(FileStore::new(config.snapshot_dir.clone())?);
        Ok(Self::new(catalog, snapshots, notifier))
    }

    /// The current cart, as an owned snapshot.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner
            .cart
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // =========================================================================
    // Mutating Operations
    // =========================================================================

    /// Add one unit of `product_id` to the cart.
    ///
    /// Increments the existing line item or appends a new one (fetching the
    /// product record on first add), after checking the proposed amount
    /// against fresh stock. Failures surface as notices, never as errors.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) {
        let _guard = self.inner.write_guard.lock().await;

        match self.try_add(product_id).await {
            Ok(()) => {}
            Err(CartError::StockExceeded { .. }) => {
                // Expected business condition, not a system error
                tracing::debug!(%product_id, "add rejected: insufficient stock");
                self.inner.notifier.notify(Notice::OutOfStock);
            }
            Err(e) => {
                tracing::error!(%product_id, error = %e, "failed to add product");
                self.inner.notifier.notify(Notice::AddFailed);
            }
        }
    }

    /// Remove the line item for `product_id`.
    ///
    /// Removing a product that is not in the cart is a failure: it emits a
    /// notice and leaves state and storage untouched.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) {
        let _guard = self.inner.write_guard.lock().await;

        if let Err(e) = self.try_remove(product_id) {
            tracing::error!(%product_id, error = %e, "failed to remove product");
            self.inner.notifier.notify(Notice::RemoveFailed);
        }
    }

    /// Set the absolute quantity of a line item.
    ///
    /// A zero or negative target fails the whole operation before anything
    /// else runs. A target above fresh stock is rejected without mutation
    /// when the product is in the cart; a product that never entered the
    /// cart leaves the pass an identity.
    #[instrument(skip(self))]
    pub async fn update_product_amount(&self, update: UpdateProductAmount) {
        let _guard = self.inner.write_guard.lock().await;

        let product_id = update.product_id;
        match self.try_update(update).await {
            Ok(()) => {}
            Err(CartError::StockExceeded { .. }) => {
                tracing::debug!(%product_id, "update rejected: insufficient stock");
                self.inner.notifier.notify(Notice::OutOfStock);
            }
            Err(e) => {
                tracing::error!(%product_id, error = %e, "failed to update product amount");
                self.inner.notifier.notify(Notice::UpdateFailed);
            }
        }
    }

    // =========================================================================
    // Fallible Bodies
    // =========================================================================

    async fn try_add(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut cart = self.cart();
        let current = cart.amount_of(product_id).unwrap_or(0);

        let stock = self.inner.catalog.get_stock(product_id).await?;
        let proposed = current + 1;

        if proposed > stock.amount {
            return Err(CartError::StockExceeded {
                product_id,
                requested: proposed,
                available: stock.amount,
            });
        }

        if !cart.set_amount(product_id, proposed) {
            let product = self.inner.catalog.get_product(product_id).await?;
            cart.insert(LineItem { product, amount: 1 });
        }

        self.commit(cart)
    }

    fn try_remove(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut cart = self.cart();

        if !cart.remove(product_id) {
            return Err(CartError::NotFound(product_id));
        }

        self.commit(cart)
    }

    async fn try_update(&self, update: UpdateProductAmount) -> Result<(), CartError> {
        let UpdateProductAmount { product_id, amount } = update;

        // One invalid target invalidates the whole pass, cart contents aside
        let target =
            u32::try_from(amount).map_err(|_| CartError::InvalidAmount(amount))?;
        if target == 0 {
            return Err(CartError::InvalidAmount(amount));
        }

        let stock = self.inner.catalog.get_stock(product_id).await?;

        let mut cart = self.cart();
        // Stock only constrains a product actually in the cart; a product
        // that never entered it leaves the pass an identity
        if cart.set_amount(product_id, target) && target > stock.amount {
            return Err(CartError::StockExceeded {
                product_id,
                requested: target,
                available: stock.amount,
            });
        }

        self.commit(cart)
    }

    /// Persist the full snapshot, then publish it as the current cart.
    fn commit(&self, cart: Cart) -> Result<(), CartError> {
        let raw = serde_json::to_string(&cart)?;
        self.inner.snapshots.put(CART_KEY, &raw)?;

        *self
            .inner
            .cart
            .write()
            .unwrap_or_else(PoisonError::into_inner) = cart;

        Ok(())
    }
}

/// Read and parse the persisted cart, falling back to empty.
fn load_initial_cart(snapshots: &dyn SnapshotStore) -> Cart {
    match snapshots.get(CART_KEY) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(cart) => cart,
            Err(e) => {
                tracing::warn!(error = %e, "persisted cart snapshot is corrupt, starting empty");
                Cart::new()
            }
        },
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read persisted cart snapshot, starting empty");
            Cart::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::time::Duration;

    use rust_decimal::Decimal;

    use basket_core::Product;

    use crate::config::CatalogConfig;
    use crate::snapshot::MemoryStore;

    /// Collects notices for assertions.
    #[derive(Debug, Default)]
    struct RecordingNotifier {
        notices: Mutex<Vec<Notice>>,
    }

    impl RecordingNotifier {
        fn taken(&self) -> Vec<Notice> {
            self.notices.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }
    }

    fn offline_catalog() -> CatalogClient {
        // Never contacted by the operations under test
        CatalogClient::new(&CatalogConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            access_token: None,
            timeout: Duration::from_secs(1),
        })
        .expect("catalog client")
    }

    fn line(id: i32, amount: u32) -> LineItem {
        LineItem {
            product: Product {
                id: ProductId::new(id),
                title: format!("Product {id}"),
                price: Decimal::new(9990, 2),
                image: format!("https://cdn.example.com/{id}.png"),
            },
            amount,
        }
    }

    fn store_with(
        snapshots: Arc<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
    ) -> CartStore {
        CartStore::new(offline_catalog(), snapshots, notifier)
    }

    #[test]
    fn test_starts_empty_without_snapshot() {
        let store = store_with(
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingNotifier::default()),
        );
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_empty() {
        let snapshots = Arc::new(MemoryStore::new());
        snapshots.put(CART_KEY, "{definitely not json").expect("put");

        let store = store_with(snapshots, Arc::new(RecordingNotifier::default()));
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_loads_persisted_snapshot() {
        let mut cart = Cart::new();
        cart.insert(line(1, 2));
        cart.insert(line(4, 1));
        let raw = serde_json::to_string(&cart).expect("serialize");

        let snapshots = Arc::new(MemoryStore::new());
        snapshots.put(CART_KEY, &raw).expect("put");

        let store = store_with(snapshots, Arc::new(RecordingNotifier::default()));
        assert_eq!(store.cart(), cart);
    }

    #[tokio::test]
    async fn test_remove_present_item_persists_rest() {
        let mut cart = Cart::new();
        cart.insert(line(1, 1));
        cart.insert(line(2, 3));
        cart.insert(line(3, 1));
        let snapshots = Arc::new(MemoryStore::new());
        snapshots
            .put(CART_KEY, &serde_json::to_string(&cart).expect("serialize"))
            .expect("put");

        let notifier = Arc::new(RecordingNotifier::default());
        let store = store_with(Arc::clone(&snapshots), Arc::clone(&notifier));

        store.remove_product(ProductId::new(2)).await;

        let ids: Vec<i32> = store
            .cart()
            .items()
            .iter()
            .map(|i| i.product_id().as_i32())
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(notifier.taken().is_empty());

        let persisted = snapshots.get(CART_KEY).expect("get").expect("written");
        let reloaded: Cart = serde_json::from_str(&persisted).expect("parse");
        assert_eq!(reloaded, store.cart());
    }

    #[tokio::test]
    async fn test_remove_absent_item_notifies_and_writes_nothing() {
        let snapshots = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let store = store_with(Arc::clone(&snapshots), Arc::clone(&notifier));

        store.remove_product(ProductId::new(42)).await;

        assert!(store.cart().is_empty());
        assert_eq!(notifier.taken(), vec![Notice::RemoveFailed]);
        assert_eq!(snapshots.get(CART_KEY).expect("get"), None);
    }

    #[tokio::test]
    async fn test_remove_last_item_persists_empty_sequence() {
        let mut cart = Cart::new();
        cart.insert(line(3, 1));
        let snapshots = Arc::new(MemoryStore::new());
        snapshots
            .put(CART_KEY, &serde_json::to_string(&cart).expect("serialize"))
            .expect("put");

        let store = store_with(
            Arc::clone(&snapshots),
            Arc::new(RecordingNotifier::default()),
        );

        store.remove_product(ProductId::new(3)).await;

        assert!(store.cart().is_empty());
        assert_eq!(
            snapshots.get(CART_KEY).expect("get"),
            Some("[]".to_string())
        );
    }
}
