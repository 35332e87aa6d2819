//! Cart commands.
//!
//! Each command runs one store operation and then prints the resulting
//! cart. User-visible notices from the store surface through
//! [`TermNotifier`] at warn level; the cart listing goes out at info level,
//! matching how the rest of the tooling reports to the terminal.

use rust_decimal::Decimal;

use basket_core::{Cart, ProductId};
use basket_store::{CartStore, Notice, Notifier, UpdateProductAmount};

/// Surfaces store notices on the terminal.
pub struct TermNotifier;

impl Notifier for TermNotifier {
    fn notify(&self, notice: Notice) {
        tracing::warn!("{notice}");
    }
}

/// Print the current cart.
pub fn show(store: &CartStore) {
    print_cart(&store.cart());
}

/// Add one unit of a product, then print the cart.
pub async fn add(store: &CartStore, product_id: ProductId) {
    store.add_product(product_id).await;
    print_cart(&store.cart());
}

/// Remove a product, then print the cart.
pub async fn remove(store: &CartStore, product_id: ProductId) {
    store.remove_product(product_id).await;
    print_cart(&store.cart());
}

/// Set a product's quantity, then print the cart.
pub async fn update(store: &CartStore, product_id: ProductId, amount: i64) {
    store
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await;
    print_cart(&store.cart());
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    let mut subtotal = Decimal::ZERO;
    for item in cart.items() {
        let line_total = item.product.price * Decimal::from(item.amount);
        subtotal += line_total;
        tracing::info!(
            "  [{}] {} x{} = {}",
            item.product_id(),
            item.product.title,
            item.amount,
            line_total
        );
    }
    tracing::info!(
        "{} items, subtotal {}",
        cart.total_quantity(),
        subtotal
    );
}
