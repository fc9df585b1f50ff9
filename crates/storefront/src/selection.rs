//! Variant selection workflow.
//!
//! Before a product with colors or sizes can go into the cart, the wishlist
//! or an express checkout, the shopper picks a variant in a modal. The modal
//! is a small state machine:
//!
//! ```text
//! Closed --open(product, action)--> Open --confirm()--> Closed (dispatch action)
//!                                    |  \--cancel()---> Closed (no side effects)
//!                                    \-- choose_color / choose_size (stay Open)
//! ```
//!
//! Only one session exists at a time; opening while already open replaces
//! the previous session. Choosing a value on one axis narrows the other
//! axis to the values that pair with it.

use sia_core::availability::{available_colors, available_sizes};
use sia_core::{Product, VariantSelection};
use thiserror::Error;

/// What happens once the selection is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingAction {
    /// Add the chosen variant to the cart.
    ToCart,
    /// Save the chosen variant to the wishlist.
    ToWishlist,
    /// Check out the chosen variant on its own, leaving the cart untouched.
    BuyNow,
}

impl PendingAction {
    /// Label for the modal's confirm button.
    #[must_use]
    pub const fn confirm_label(self) -> &'static str {
        match self {
            Self::ToCart => "Add to Cart",
            Self::ToWishlist => "Add to Wishlist",
            Self::BuyNow => "Buy Now",
        }
    }
}

/// Errors from modal transitions.
///
/// None of these change the modal's state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// A choice or confirmation arrived while no selection was in progress.
    #[error("no variant selection in progress")]
    NotOpen,

    /// The product has neither colors nor sizes.
    #[error("product has no variants to select")]
    NoVariants,

    /// The value isn't in the currently available list.
    #[error("{axis} {value} is not available")]
    Unavailable {
        /// `"color"` or `"size"`.
        axis: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Confirm was attempted without a required color.
    #[error("Please select a color")]
    MissingColor,

    /// Confirm was attempted without a required size.
    #[error("Please select a size")]
    MissingSize,
}

/// An in-progress selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSelection {
    product: Product,
    action: PendingAction,
    color: Option<String>,
    size: Option<String>,
    available_colors: Vec<String>,
    available_sizes: Vec<String>,
}

impl OpenSelection {
    fn new(product: Product, action: PendingAction) -> Self {
        let available_colors = available_colors(&product, None);
        let available_sizes = available_sizes(&product, None);
        Self {
            product,
            action,
            color: None,
            size: None,
            available_colors,
            available_sizes,
        }
    }

    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub const fn action(&self) -> PendingAction {
        self.action
    }

    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    #[must_use]
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    /// Colors that can be chosen right now.
    #[must_use]
    pub fn available_colors(&self) -> &[String] {
        &self.available_colors
    }

    /// Sizes that can be chosen right now.
    #[must_use]
    pub fn available_sizes(&self) -> &[String] {
        &self.available_sizes
    }
}

/// A confirmed selection, ready to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedSelection {
    pub product: Product,
    pub action: PendingAction,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl ConfirmedSelection {
    #[must_use]
    pub fn selection(&self) -> VariantSelection {
        VariantSelection::new(self.product.id.clone(), self.color.clone(), self.size.clone())
    }
}

/// One choosable value in the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub value: String,
    pub selected: bool,
}

/// Render-ready snapshot of an open modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub product_name: String,
    pub confirm_label: &'static str,
    pub colors: Vec<OptionView>,
    pub sizes: Vec<OptionView>,
}

/// The variant selection modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VariantModal {
    #[default]
    Closed,
    Open(Box<OpenSelection>),
}

impl VariantModal {
    /// Start a selection for `product`.
    ///
    /// Any session already in progress is discarded first.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::NoVariants` if the product has neither colors
    /// nor sizes; the modal is left unchanged.
    pub fn open(
        &mut self,
        product: Product,
        action: PendingAction,
    ) -> Result<&OpenSelection, SelectionError> {
        if !product.has_variants() {
            return Err(SelectionError::NoVariants);
        }

        if self.cancel() {
            tracing::debug!("Replaced an open variant selection");
        }

        *self = Self::Open(Box::new(OpenSelection::new(product, action)));
        self.current().ok_or(SelectionError::NotOpen)
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// The selection in progress, if any.
    #[must_use]
    pub fn current(&self) -> Option<&OpenSelection> {
        match self {
            Self::Open(open) => Some(open),
            Self::Closed => None,
        }
    }

    /// Choose a color and narrow the sizes to those that pair with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the modal is closed or the color isn't currently
    /// available; nothing changes in either case.
    pub fn choose_color(&mut self, color: &str) -> Result<(), SelectionError> {
        let Self::Open(open) = self else {
            return Err(SelectionError::NotOpen);
        };

        if !open.available_colors.iter().any(|c| c == color) {
            return Err(SelectionError::Unavailable {
                axis: "color",
                value: color.to_owned(),
            });
        }

        open.color = Some(color.to_owned());
        open.available_sizes = available_sizes(&open.product, Some(color));
        Ok(())
    }

    /// Choose a size and narrow the colors to those that pair with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the modal is closed or the size isn't currently
    /// available; nothing changes in either case.
    pub fn choose_size(&mut self, size: &str) -> Result<(), SelectionError> {
        let Self::Open(open) = self else {
            return Err(SelectionError::NotOpen);
        };

        if !open.available_sizes.iter().any(|s| s == size) {
            return Err(SelectionError::Unavailable {
                axis: "size",
                value: size.to_owned(),
            });
        }

        open.size = Some(size.to_owned());
        open.available_colors = available_colors(&open.product, Some(size));
        Ok(())
    }

    /// Finish the selection.
    ///
    /// On success the modal closes and the confirmed choice is returned for
    /// dispatch.
    ///
    /// # Errors
    ///
    /// Returns `MissingColor`/`MissingSize` when a declared axis has no
    /// choice yet (the modal stays open), or `NotOpen`.
    pub fn confirm(&mut self) -> Result<ConfirmedSelection, SelectionError> {
        let Self::Open(open) = self else {
            return Err(SelectionError::NotOpen);
        };

        if open.product.has_colors() && open.color.is_none() {
            return Err(SelectionError::MissingColor);
        }
        if open.product.has_sizes() && open.size.is_none() {
            return Err(SelectionError::MissingSize);
        }

        match std::mem::take(self) {
            Self::Open(open) => {
                let OpenSelection {
                    product,
                    action,
                    color,
                    size,
                    ..
                } = *open;
                Ok(ConfirmedSelection {
                    product,
                    action,
                    color,
                    size,
                })
            }
            Self::Closed => Err(SelectionError::NotOpen),
        }
    }

    /// Discard the selection in progress.
    ///
    /// Returns whether a selection was open.
    pub fn cancel(&mut self) -> bool {
        let was_open = self.is_open();
        *self = Self::Closed;
        was_open
    }

    /// Render-ready view of the open modal.
    #[must_use]
    pub fn view(&self) -> Option<ModalView> {
        let open = self.current()?;
        let options = |values: &[String], chosen: Option<&str>| {
            values
                .iter()
                .map(|v| OptionView {
                    value: v.clone(),
                    selected: chosen == Some(v.as_str()),
                })
                .collect::<Vec<_>>()
        };

        Some(ModalView {
            product_name: open.product.name.clone(),
            confirm_label: open.action.confirm_label(),
            colors: options(&open.available_colors, open.color()),
            sizes: options(&open.available_sizes, open.size()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sia_core::Price;

    fn cross_stocked() -> Product {
        Product::new("p1", "Lehenga", Price::from_rupees(2500))
            .with_colors(["A", "B"])
            .with_sizes(["S", "M"])
            .with_disabled(["A|S", "B|M"])
    }

    fn sized_only() -> Product {
        Product::new("p2", "Leggings", Price::from_rupees(399)).with_sizes(["S", "M"])
    }

    #[test]
    fn test_open_computes_initial_lists() {
        let mut modal = VariantModal::default();
        let open = modal.open(cross_stocked(), PendingAction::ToCart).unwrap();
        assert_eq!(open.available_colors(), ["A", "B"]);
        assert_eq!(open.available_sizes(), ["S", "M"]);
        assert_eq!(open.color(), None);
    }

    #[test]
    fn test_open_rejects_plain_product() {
        let mut modal = VariantModal::default();
        let plain = Product::new("p3", "Clutch", Price::from_rupees(650));
        assert_eq!(
            modal.open(plain, PendingAction::ToCart).unwrap_err(),
            SelectionError::NoVariants
        );
        assert!(!modal.is_open());
    }

    #[test]
    fn test_choosing_color_narrows_sizes() {
        let mut modal = VariantModal::default();
        modal.open(cross_stocked(), PendingAction::ToCart).unwrap();
        modal.choose_color("A").unwrap();
        assert_eq!(modal.current().unwrap().available_sizes(), ["M"]);

        let err = modal.choose_size("S").unwrap_err();
        assert!(matches!(err, SelectionError::Unavailable { axis: "size", .. }));
        assert_eq!(modal.current().unwrap().size(), None);
    }

    #[test]
    fn test_choosing_size_narrows_colors() {
        let mut modal = VariantModal::default();
        modal.open(cross_stocked(), PendingAction::ToWishlist).unwrap();
        modal.choose_size("S").unwrap();
        assert_eq!(modal.current().unwrap().available_colors(), ["B"]);
        assert!(modal.choose_color("A").is_err());
    }

    #[test]
    fn test_confirm_requires_every_declared_axis() {
        let mut modal = VariantModal::default();
        modal.open(cross_stocked(), PendingAction::ToCart).unwrap();
        assert_eq!(modal.confirm().unwrap_err(), SelectionError::MissingColor);
        modal.choose_color("B").unwrap();
        assert_eq!(modal.confirm().unwrap_err(), SelectionError::MissingSize);
        assert!(modal.is_open());
        assert_eq!(modal.current().unwrap().color(), Some("B"));
    }

    #[test]
    fn test_confirm_closes_and_returns_choice() {
        let mut modal = VariantModal::default();
        modal.open(cross_stocked(), PendingAction::BuyNow).unwrap();
        modal.choose_color("B").unwrap();
        modal.choose_size("S").unwrap();
        let confirmed = modal.confirm().unwrap();
        assert!(!modal.is_open());
        assert_eq!(confirmed.action, PendingAction::BuyNow);
        assert_eq!(
            confirmed.selection(),
            VariantSelection::new("p1", Some("B".to_string()), Some("S".to_string()))
        );
    }

    #[test]
    fn test_size_only_product_needs_no_color() {
        let mut modal = VariantModal::default();
        modal.open(sized_only(), PendingAction::ToCart).unwrap();
        modal.choose_size("M").unwrap();
        let confirmed = modal.confirm().unwrap();
        assert_eq!(confirmed.color, None);
        assert_eq!(confirmed.size.as_deref(), Some("M"));
    }

    #[test]
    fn test_transitions_while_closed() {
        let mut modal = VariantModal::default();
        assert_eq!(modal.choose_color("A").unwrap_err(), SelectionError::NotOpen);
        assert_eq!(modal.confirm().unwrap_err(), SelectionError::NotOpen);
        assert!(!modal.cancel());
    }

    #[test]
    fn test_cancel_discards_choices() {
        let mut modal = VariantModal::default();
        modal.open(cross_stocked(), PendingAction::ToCart).unwrap();
        modal.choose_color("A").unwrap();
        assert!(modal.cancel());
        assert_eq!(modal, VariantModal::Closed);
    }

    #[test]
    fn test_reopen_replaces_previous_session() {
        let mut modal = VariantModal::default();
        modal.open(cross_stocked(), PendingAction::ToCart).unwrap();
        modal.choose_color("A").unwrap();
        let open = modal.open(sized_only(), PendingAction::ToWishlist).unwrap();
        assert_eq!(open.product().id.as_str(), "p2");
        assert_eq!(open.action(), PendingAction::ToWishlist);
        assert_eq!(open.color(), None);
    }

    #[test]
    fn test_view_marks_selected_options() {
        let mut modal = VariantModal::default();
        assert!(modal.view().is_none());
        modal.open(cross_stocked(), PendingAction::ToCart).unwrap();
        modal.choose_color("B").unwrap();
        let view = modal.view().unwrap();
        assert_eq!(view.confirm_label, "Add to Cart");
        assert!(view.colors.iter().any(|o| o.value == "B" && o.selected));
        assert!(view.colors.iter().any(|o| o.value == "A" && !o.selected));
        assert_eq!(view.sizes.len(), 1);
    }
}
