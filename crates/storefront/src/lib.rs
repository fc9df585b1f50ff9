//! Sia Creations storefront library.
//!
//! The cart, wishlist and variant selection engine behind the storefront,
//! packaged as a library so any host (the CLI, tests, a future web shell)
//! can drive it.
//!
//! # Layout
//!
//! - [`shop`] - The [`Storefront`] facade every shopper action goes through
//! - [`store`] - Cart and wishlist collections with persistence and display sync
//! - [`selection`] - The variant selection modal
//! - [`catalog`] - The loaded catalog: listings, sorting, paging
//! - [`checkout`] - Customer details and order assembly
//! - [`api`] - REST API client
//! - [`display`] - Rendering of the count badges, sidebars and modal
//! - [`persistence`] - Durable and session key/value storage

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod display;
pub mod error;
pub mod filters;
pub mod persistence;
pub mod selection;
pub mod shop;
pub mod store;

pub use api::ApiClient;
pub use catalog::{Catalog, CatalogSnapshot, SortOrder};
pub use checkout::{CheckoutSource, CustomerDetails, PaymentMode};
pub use config::StorefrontConfig;
pub use display::{DisplaySink, RenderedSurfaces, Surface};
pub use error::{AppError, Result};
pub use persistence::{FileStorage, MemoryStorage, Storage};
pub use shop::{ActionOutcome, Storefront};
