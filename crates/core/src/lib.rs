//! Basket Core - Shared types library.
//!
//! This crate provides common types used across all Basket components:
//! - `store` - The cart state container and its collaborators
//! - `cli` - Command-line tools for driving a cart from a terminal
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, catalog records, and the cart value types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
