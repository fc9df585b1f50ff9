//! Sia Creations Core - Shared domain types.
//!
//! This crate provides the types used across the storefront components:
//! - `storefront` - Cart, wishlist, variant selection and checkout engine
//! - `cli` - Command-line host that drives the storefront
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and traits - no I/O,
//! no HTTP clients, no storage. This keeps it lightweight and allows it to be
//! used from any host.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, selections and cart entries
//! - [`availability`] - Which colors and sizes of a product can be chosen

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod availability;
pub mod types;

pub use types::*;
