//! REST API wire types.
//!
//! The API uses camelCase JSON and document ids under `_id`. Every response
//! is wrapped in a `{success, message?, ...}` envelope.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sia_core::{CategoryId, OrderId, Price, Product, ProductId, SlideId, VariantKey};
use thiserror::Error;

// =============================================================================
// Envelope
// =============================================================================

/// Response envelope shared by every endpoint.
///
/// Payload fields are absent when `success` is false, so every payload
/// type defaults them.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductsPayload {
    #[serde(default)]
    pub products: Vec<ApiProduct>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriesPayload {
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarouselPayload {
    #[serde(default)]
    pub slides: Vec<CarouselSlide>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPayload {
    #[serde(default)]
    pub order: Option<OrderReceipt>,
}

/// `PUT /products/{id}` echoes the updated product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPayload {
    #[serde(default)]
    pub product: Option<ApiProduct>,
}

// =============================================================================
// Catalog
// =============================================================================

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A product's category as returned by the API: populated, an id, or absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Populated { name: String },
    Id(String),
}

/// A product as returned by `GET /products`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub mrp: Option<Price>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub colors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sizes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub out_of_stock: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub out_of_stock_variants: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_new_arrival: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ApiProduct {
    /// Convert into a domain product, resolving category ids by name.
    ///
    /// An id with no matching category is kept as-is; a product without a
    /// category lands in `"uncategorized"`.
    #[must_use]
    pub fn into_product(self, category_names: &HashMap<CategoryId, String>) -> Product {
        let category = match self.category {
            Some(CategoryRef::Populated { name }) => name,
            Some(CategoryRef::Id(id)) => category_names
                .get(&CategoryId::new(id.as_str()))
                .cloned()
                .unwrap_or(id),
            None => UNCATEGORIZED.to_string(),
        };

        Product {
            id: self.id,
            name: self.name,
            price: self.price,
            mrp: self.mrp,
            images: self.images,
            colors: self.colors,
            sizes: self.sizes,
            disabled_variants: self
                .out_of_stock_variants
                .iter()
                .map(|k| VariantKey::from(k.as_str()))
                .collect(),
            out_of_stock: self.out_of_stock,
            category: Some(category),
            description: self.description.unwrap_or_default(),
            tags: self.tags,
            is_new_arrival: self.is_new_arrival,
            created_at: self.created_at,
        }
    }
}

impl From<ApiProduct> for Product {
    fn from(product: ApiProduct) -> Self {
        product.into_product(&HashMap::new())
    }
}

/// Category name used for products without one.
pub const UNCATEGORIZED: &str = "uncategorized";

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub show_on_main_page: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_order: i32,
}

/// A home page carousel slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselSlide {
    #[serde(rename = "_id")]
    pub id: SlideId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub button_title: Option<String>,
    #[serde(default)]
    pub button_link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: i32,
}

// =============================================================================
// Orders
// =============================================================================

/// Customer block of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer: OrderCustomer,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub gift_packaging_charge: Decimal,
    /// Always `"To be confirmed"`; shipping is quoted after the order.
    pub delivery_charge: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub payment_mode: String,
    pub notes: String,
}

/// The created order as echoed back by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub order_number: Option<String>,
}

// =============================================================================
// Admin
// =============================================================================

/// Errors from validating a stock update against its product.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockUpdateError {
    #[error("Variant {0} is not offered by this product")]
    UnknownVariant(String),
}

/// Body of `PUT /products/{id}` when changing stock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub out_of_stock: bool,
    pub out_of_stock_variants: BTreeSet<VariantKey>,
}

impl StockUpdate {
    #[must_use]
    pub fn new(out_of_stock: bool, variants: impl IntoIterator<Item = VariantKey>) -> Self {
        Self {
            out_of_stock,
            out_of_stock_variants: variants.into_iter().collect(),
        }
    }

    /// Check that every disabled key names a combination the product offers.
    ///
    /// # Errors
    ///
    /// Returns the first key that isn't declared by `product`.
    pub fn validate(&self, product: &Product) -> Result<(), StockUpdateError> {
        match self.out_of_stock_variants.iter().find(|k| !product.declares(k)) {
            Some(key) => Err(StockUpdateError::UnknownVariant(key.to_string())),
            None => Ok(()),
        }
    }
}
