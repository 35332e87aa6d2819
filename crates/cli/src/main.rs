//! Basket CLI - drive a cart against a live catalog service.
//!
//! # Usage
//!
//! ```bash
//! # Print the current cart
//! basket show
//!
//! # Add one unit of product 1
//! basket add 1
//!
//! # Set product 1's quantity to 3
//! basket update 1 3
//!
//! # Remove product 1
//! basket remove 1
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_BASE_URL` - Root URL of the product/stock service
//! - `BASKET_SNAPSHOT_DIR` - Where the cart snapshot lives (default: ./data)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};

use basket_core::ProductId;
use basket_store::{BasketConfig, CartStore};

mod commands;

#[derive(Parser)]
#[command(name = "basket")]
#[command(version, about = "Basket cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current cart
    Show,
    /// Add one unit of a product to the cart
    Add {
        /// Product ID in the catalog
        product_id: i32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID in the catalog
        product_id: i32,
    },
    /// Set the absolute quantity of a product already in the cart
    Update {
        /// Product ID in the catalog
        product_id: i32,
        /// Target quantity (must be at least 1)
        amount: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = BasketConfig::from_env()?;
    let store = CartStore::from_config(&config, Arc::new(commands::cart::TermNotifier))?;

    match cli.command {
        Commands::Show => commands::cart::show(&store),
        Commands::Add { product_id } => {
            commands::cart::add(&store, ProductId::new(product_id)).await;
        }
        Commands::Remove { product_id } => {
            commands::cart::remove(&store, ProductId::new(product_id)).await;
        }
        Commands::Update { product_id, amount } => {
            commands::cart::update(&store, ProductId::new(product_id), amount).await;
        }
    }

    Ok(())
}
