//! Catalog product and variant key types.

use std::collections::BTreeSet;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Separator between color and size in a combined variant key.
const KEY_SEPARATOR: char = '|';

/// Stock-out key for a single variant.
///
/// A product with both axes disables combinations as `"color|size"`.
/// A product with a single axis disables bare values (`"Red"` or `"M"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantKey(String);

impl VariantKey {
    /// Key for a color/size combination.
    #[must_use]
    pub fn pair(color: &str, size: &str) -> Self {
        Self(format!("{color}{KEY_SEPARATOR}{size}"))
    }

    /// Key for a single-axis value (a bare color or a bare size).
    #[must_use]
    pub fn single(value: &str) -> Self {
        Self(value.to_owned())
    }

    /// Build the key a product uses for the given choices.
    ///
    /// Returns `None` when the choices don't name a variant of a product with
    /// that shape (e.g. a pair key for a product with no sizes).
    #[must_use]
    pub fn for_choice(color: Option<&str>, size: Option<&str>) -> Option<Self> {
        match (color, size) {
            (Some(c), Some(s)) => Some(Self::pair(c, s)),
            (Some(v), None) | (None, Some(v)) => Some(Self::single(v)),
            (None, None) => None,
        }
    }

    /// Split a pair key into `(color, size)`; `None` for single-axis keys.
    #[must_use]
    pub fn split_pair(&self) -> Option<(&str, &str)> {
        self.0.split_once(KEY_SEPARATOR)
    }

    /// The raw key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VariantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariantKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

/// A catalog product.
///
/// Read-only from the storefront's point of view; supplied by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// List price shown struck through next to the selling price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mrp: Option<Price>,
    /// Image references in display order.
    #[serde(default)]
    pub images: Vec<String>,
    /// Declared colors in display order; empty when the product has no color axis.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Declared sizes in display order; empty when the product has no size axis.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Out-of-stock variant keys.
    #[serde(default)]
    pub disabled_variants: BTreeSet<VariantKey>,
    /// Whole product is out of stock.
    #[serde(default)]
    pub out_of_stock: bool,
    /// Category display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_new_arrival: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Create a product with only the fields the cart cares about.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            mrp: None,
            images: Vec::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
            disabled_variants: BTreeSet::new(),
            out_of_stock: false,
            category: None,
            description: String::new(),
            tags: Vec::new(),
            is_new_arrival: false,
            created_at: None,
        }
    }

    /// Set the declared colors.
    #[must_use]
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the declared sizes.
    #[must_use]
    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the out-of-stock variant keys.
    #[must_use]
    pub fn with_disabled<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.disabled_variants = keys
            .into_iter()
            .map(|k| VariantKey::from(k.as_ref()))
            .collect();
        self
    }

    /// Set the image references.
    #[must_use]
    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    #[must_use]
    pub fn has_sizes(&self) -> bool {
        !self.sizes.is_empty()
    }

    /// Whether adding this product requires a color and/or size choice.
    #[must_use]
    pub fn has_variants(&self) -> bool {
        self.has_colors() || self.has_sizes()
    }

    /// First image reference, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    #[must_use]
    pub fn is_disabled(&self, key: &VariantKey) -> bool {
        self.disabled_variants.contains(key)
    }

    /// Whether `key` names a variant this product actually declares.
    #[must_use]
    pub fn declares(&self, key: &VariantKey) -> bool {
        match (self.has_colors(), self.has_sizes()) {
            (true, true) => key.split_pair().is_some_and(|(c, s)| {
                self.colors.iter().any(|x| x == c) && self.sizes.iter().any(|x| x == s)
            }),
            (true, false) => self.colors.iter().any(|c| c == key.as_str()),
            (false, true) => self.sizes.iter().any(|s| s == key.as_str()),
            (false, false) => false,
        }
    }
}

/// Catalog lookup by product identifier.
///
/// The catalog is loaded once from the API and then treated as a synchronous
/// in-memory map.
pub trait ProductLookup {
    /// Look up a product, returning `None` when the id is unknown.
    fn product(&self, id: &ProductId) -> Option<&Product>;
}

impl ProductLookup for HashMap<ProductId, Product> {
    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.get(id)
    }
}

impl ProductLookup for [Product] {
    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.iter().find(|p| &p.id == id)
    }
}
