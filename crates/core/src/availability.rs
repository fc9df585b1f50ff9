//! Variant availability.
//!
//! Works out which colors and sizes of a product can currently be chosen,
//! given its out-of-stock keys. When a product has both axes the lists filter
//! each other: once a color is chosen only sizes that pair with it remain,
//! and vice versa.
//!
//! Products with neither axis are governed solely by their whole-product
//! out-of-stock flag; both functions return empty lists for them.

use crate::types::{Product, VariantKey};

/// Colors that can be chosen, optionally restricted to a chosen size.
///
/// Declaration order is preserved.
#[must_use]
pub fn available_colors(product: &Product, chosen_size: Option<&str>) -> Vec<String> {
    if !product.has_colors() {
        return Vec::new();
    }

    if !product.has_sizes() {
        return product
            .colors
            .iter()
            .filter(|c| !product.is_disabled(&VariantKey::single(c)))
            .cloned()
            .collect();
    }

    product
        .colors
        .iter()
        .filter(|color| match chosen_size {
            Some(size) => !product.is_disabled(&VariantKey::pair(color, size)),
            None => product
                .sizes
                .iter()
                .any(|size| !product.is_disabled(&VariantKey::pair(color, size))),
        })
        .cloned()
        .collect()
}

/// Sizes that can be chosen, optionally restricted to a chosen color.
///
/// Declaration order is preserved.
#[must_use]
pub fn available_sizes(product: &Product, chosen_color: Option<&str>) -> Vec<String> {
    if !product.has_sizes() {
        return Vec::new();
    }

    if !product.has_colors() {
        return product
            .sizes
            .iter()
            .filter(|s| !product.is_disabled(&VariantKey::single(s)))
            .cloned()
            .collect();
    }

    product
        .sizes
        .iter()
        .filter(|size| match chosen_color {
            Some(color) => !product.is_disabled(&VariantKey::pair(color, size)),
            None => product
                .colors
                .iter()
                .any(|color| !product.is_disabled(&VariantKey::pair(color, size))),
        })
        .cloned()
        .collect()
}

/// Whether a complete choice names an in-stock variant of `product`.
///
/// A choice is complete when every declared axis has a value and no value is
/// given for an undeclared axis.
#[must_use]
pub fn is_selectable(product: &Product, color: Option<&str>, size: Option<&str>) -> bool {
    if product.out_of_stock {
        return false;
    }
    if product.has_colors() != color.is_some() || product.has_sizes() != size.is_some() {
        return false;
    }
    match VariantKey::for_choice(color, size) {
        Some(key) => product.declares(&key) && !product.is_disabled(&key),
        None => true,
    }
}
