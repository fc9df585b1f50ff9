//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod contact;
pub mod id;
pub mod price;
pub mod product;
pub mod selection;

pub use contact::{ContactError, Phone};
pub use id::*;
pub use price::Price;
pub use product::{Product, ProductLookup, VariantKey};
pub use selection::{ItemSnapshot, LineItem, VariantSelection, WishlistEntry};
