//! Askama templates for the rendered surfaces.

use askama::Template;
use sia_core::{LineItem, Price, WishlistEntry};

use crate::filters;
use crate::selection::ModalView;

/// Shown instead of an image when the snapshot has no image URL.
const IMAGE_PLACEHOLDER: &str = "🛍️";

/// Cart row display data for templates.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    /// Empty when no color was chosen.
    pub color: String,
    /// Empty when no size was chosen.
    pub size: String,
    pub image_url: Option<String>,
    pub placeholder: String,
    pub price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&LineItem> for CartLineView {
    fn from(line: &LineItem) -> Self {
        let (image_url, placeholder) = split_image(line.snapshot.image.as_deref());
        Self {
            product_id: line.selection.product_id.to_string(),
            name: line.snapshot.name.clone(),
            color: line.selection.color.clone().unwrap_or_default(),
            size: line.selection.size.clone().unwrap_or_default(),
            image_url,
            placeholder,
            price: line.snapshot.price,
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}

/// Wishlist row display data for templates.
#[derive(Debug, Clone)]
pub struct WishlistItemView {
    pub product_id: String,
    pub name: String,
    pub color: String,
    pub size: String,
    pub image_url: Option<String>,
    pub placeholder: String,
    pub price: Price,
}

impl From<&WishlistEntry> for WishlistItemView {
    fn from(entry: &WishlistEntry) -> Self {
        let (image_url, placeholder) = split_image(entry.snapshot.image.as_deref());
        Self {
            product_id: entry.product_id().to_string(),
            name: entry.snapshot.name.clone(),
            color: entry.selection.color.clone().unwrap_or_default(),
            size: entry.selection.size.clone().unwrap_or_default(),
            image_url,
            placeholder,
            price: entry.snapshot.price,
        }
    }
}

/// Image references are either URLs or an emoji stand-in.
fn split_image(image: Option<&str>) -> (Option<String>, String) {
    match image {
        Some(url) if url.starts_with("http") => (Some(url.to_owned()), String::new()),
        Some(other) if !other.trim().is_empty() => (None, other.to_owned()),
        _ => (None, IMAGE_PLACEHOLDER.to_owned()),
    }
}

#[derive(Template)]
#[template(path = "partials/count_badge.html")]
pub struct CountBadgeTemplate {
    pub element_id: &'static str,
    pub css_class: &'static str,
    pub count: u64,
    pub hide_when_empty: bool,
}

#[derive(Template)]
#[template(path = "partials/cart_total.html")]
pub struct CartTotalTemplate {
    pub total: Price,
}

#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub items: Vec<CartLineView>,
}

#[derive(Template)]
#[template(path = "partials/wishlist_items.html")]
pub struct WishlistItemsTemplate {
    pub items: Vec<WishlistItemView>,
}

#[derive(Template)]
#[template(path = "partials/variant_modal.html")]
pub struct VariantModalTemplate {
    pub view: Option<ModalView>,
}
