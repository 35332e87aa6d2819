//! Integration tests for Basket.
//!
//! Each test wires a real [`CartStore`] to an in-process catalog stub (an
//! `axum` server bound to `127.0.0.1:0`), an in-memory snapshot store, and a
//! channel notifier, then drives the store through its public operations.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p basket-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;

use basket_core::{Product, ProductId};
use basket_store::{
    CART_KEY, CartStore, CatalogClient, CatalogConfig, ChannelNotifier, MemoryStore, Notice,
    SnapshotStore,
};

// =============================================================================
// Catalog Stub
// =============================================================================

/// One catalog entry served by the stub.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub product: Product,
    pub stock: u32,
}

#[derive(Debug, Default)]
struct StubState {
    entries: Mutex<HashMap<i32, CatalogEntry>>,
}

/// In-process catalog service stub serving `/stock/{id}` and
/// `/products/{id}`.
#[derive(Debug, Clone)]
pub struct CatalogStub {
    state: Arc<StubState>,
    pub base_url: String,
}

impl CatalogStub {
    /// Bind the stub to an ephemeral local port and start serving.
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let router = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product_handler))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind catalog stub");
        let addr = listener.local_addr().expect("catalog stub local addr");

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve catalog stub");
        });

        Self {
            state,
            base_url: format!("http://{addr}"),
        }
    }

    /// Register a product with its available stock.
    pub fn put(&self, product: Product, stock: u32) {
        let mut entries = self
            .state
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(product.id.as_i32(), CatalogEntry { product, stock });
    }

    /// Change the available stock of a registered product.
    pub fn set_stock(&self, product_id: ProductId, stock: u32) {
        let mut entries = self
            .state
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get_mut(&product_id.as_i32()) {
            entry.stock = stock;
        }
    }
}

async fn stock(State(state): State<Arc<StubState>>, Path(id): Path<i32>) -> Response {
    let entries = state.entries.lock().unwrap_or_else(PoisonError::into_inner);
    match entries.get(&id) {
        Some(entry) => Json(json!({ "id": id, "amount": entry.stock })).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn product_handler(State(state): State<Arc<StubState>>, Path(id): Path<i32>) -> Response {
    let entries = state.entries.lock().unwrap_or_else(PoisonError::into_inner);
    match entries.get(&id) {
        Some(entry) => Json(entry.product.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// =============================================================================
// Test Context
// =============================================================================

/// A store wired to the stub, with handles to everything a test asserts on.
pub struct TestContext {
    pub catalog: CatalogStub,
    pub snapshots: Arc<MemoryStore>,
    pub store: CartStore,
    pub notices: UnboundedReceiver<Notice>,
}

impl TestContext {
    /// Fresh stub, fresh snapshots, fresh store.
    pub async fn new() -> Self {
        let catalog = CatalogStub::start().await;
        let snapshots = Arc::new(MemoryStore::new());
        Self::with_snapshots(catalog, snapshots)
    }

    /// Build a store over an existing stub and snapshot store.
    ///
    /// Used to simulate a restart: the new store reloads whatever the
    /// previous one persisted.
    pub fn with_snapshots(catalog: CatalogStub, snapshots: Arc<MemoryStore>) -> Self {
        let client = CatalogClient::new(&CatalogConfig {
            base_url: catalog.base_url.clone(),
            access_token: None,
            timeout: Duration::from_secs(5),
        })
        .expect("catalog client");

        let (notifier, notices) = ChannelNotifier::new();
        let store = CartStore::new(
            client,
            Arc::clone(&snapshots) as Arc<dyn SnapshotStore>,
            Arc::new(notifier),
        );

        Self {
            catalog,
            snapshots,
            store,
            notices,
        }
    }

    /// The raw persisted snapshot, if any mutation has committed.
    pub fn persisted(&self) -> Option<String> {
        self.snapshots.get(CART_KEY).expect("read snapshot")
    }

    /// Pop the next pending notice, if one was emitted.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.try_recv().ok()
    }
}

/// A catalog product for fixtures.
#[must_use]
pub fn product(id: i32, title: &str, price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price: price.parse::<Decimal>().expect("decimal price"),
        image: format!("https://cdn.example.com/{id}.png"),
    }
}
