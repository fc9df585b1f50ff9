//! Variant selections and the entries stored in the cart and wishlist.
//!
//! Both collections are persisted as JSON arrays whose entries look like
//! `{productId, color?, size?, quantity?, name, price, image?}`; the
//! selection and snapshot structs are flattened into that shape.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// A product plus the chosen color and size.
///
/// Equality is structural: an absent choice never equals a concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSelection {
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl VariantSelection {
    #[must_use]
    pub fn new(
        product_id: impl Into<ProductId>,
        color: Option<String>,
        size: Option<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            color,
            size,
        }
    }

    /// Selection of a product without any variant choice.
    #[must_use]
    pub fn plain(product_id: impl Into<ProductId>) -> Self {
        Self::new(product_id, None, None)
    }

    /// Human-readable variant label, e.g. `"Red / M"`; `None` without choices.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        match (&self.color, &self.size) {
            (Some(c), Some(s)) => Some(format!("{c} / {s}")),
            (Some(v), None) | (None, Some(v)) => Some(v.clone()),
            (None, None) => None,
        }
    }
}

/// Display fields captured from the product at add-time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&Product> for ItemSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            image: product.primary_image().map(str::to_owned),
        }
    }
}

/// One cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub selection: VariantSelection,
    pub quantity: u32,
    #[serde(flatten)]
    pub snapshot: ItemSnapshot,
}

impl LineItem {
    #[must_use]
    pub const fn new(selection: VariantSelection, snapshot: ItemSnapshot, quantity: u32) -> Self {
        Self {
            selection,
            quantity,
            snapshot,
        }
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.snapshot.price.times(self.quantity)
    }
}

/// One saved-for-later product, optionally with a variant choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    #[serde(flatten)]
    pub selection: VariantSelection,
    #[serde(flatten)]
    pub snapshot: ItemSnapshot,
}

impl WishlistEntry {
    #[must_use]
    pub const fn new(selection: VariantSelection, snapshot: ItemSnapshot) -> Self {
        Self {
            selection,
            snapshot,
        }
    }

    #[must_use]
    pub fn product_id(&self) -> &ProductId {
        &self.selection.product_id
    }

    /// The cart row this entry becomes when moved to the cart.
    #[must_use]
    pub fn into_line_item(self) -> LineItem {
        LineItem::new(self.selection, self.snapshot, 1)
    }
}
