//! Integration tests for snapshot persistence across store restarts.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use basket_core::{Cart, ProductId};
use basket_integration_tests::{TestContext, product};
use basket_store::{CartStore, CatalogClient, CatalogConfig, ChannelNotifier, FileStore};

fn temp_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("basket-it-{label}-{}", std::process::id()))
}

#[tokio::test]
async fn test_reload_reproduces_cart_after_restart() {
    let mut ctx = TestContext::new().await;
    ctx.catalog.put(product(5, "Hoodie", "59.00"), 10);
    ctx.catalog.put(product(1, "Tee", "29.90"), 10);

    ctx.store.add_product(ProductId::new(5)).await;
    ctx.store.add_product(ProductId::new(5)).await;
    ctx.store.add_product(ProductId::new(1)).await;
    let before = ctx.store.cart();
    assert_eq!(ctx.take_notice(), None);

    // A new store over the same snapshots sees the same cart
    let reopened = TestContext::with_snapshots(ctx.catalog.clone(), Arc::clone(&ctx.snapshots));
    assert_eq!(reopened.store.cart(), before);
}

#[tokio::test]
async fn test_file_backed_cart_survives_restart() {
    let dir = temp_dir("file-restart");
    let _ = std::fs::remove_dir_all(&dir);

    let ctx = TestContext::new().await;
    ctx.catalog.put(product(1, "Tee", "29.90"), 10);
    ctx.catalog.put(product(2, "Hoodie", "59.00"), 10);

    let client = CatalogClient::new(&CatalogConfig {
        base_url: ctx.catalog.base_url.clone(),
        access_token: None,
        timeout: Duration::from_secs(5),
    })
    .expect("catalog client");

    let (notifier, _notices) = ChannelNotifier::new();
    let store = CartStore::new(
        client.clone(),
        Arc::new(FileStore::new(dir.clone()).expect("file store")),
        Arc::new(notifier),
    );

    store.add_product(ProductId::new(1)).await;
    store.add_product(ProductId::new(2)).await;
    store.add_product(ProductId::new(1)).await;
    let before = store.cart();
    drop(store);

    let (notifier, _notices) = ChannelNotifier::new();
    let reopened = CartStore::new(
        client,
        Arc::new(FileStore::new(dir.clone()).expect("reopen file store")),
        Arc::new(notifier),
    );

    let cart: Cart = reopened.cart();
    assert_eq!(cart, before);
    assert_eq!(cart.amount_of(ProductId::new(1)), Some(2));
    assert_eq!(cart.amount_of(ProductId::new(2)), Some(1));

    std::fs::remove_dir_all(dir).expect("cleanup");
}
