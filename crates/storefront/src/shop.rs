//! The storefront facade.
//!
//! [`Storefront`] is the single owner of the catalog, the cart and wishlist
//! store, the variant modal and session storage. Hosts construct it once per
//! page and route every shopper action through it; each action returns an
//! [`ActionOutcome`] describing what happened.
//!
//! Actions that name a product fail soft: a catalog that hasn't loaded, an
//! unknown id or a sold-out product never raises an error.

use sia_core::{Product, ProductId, ProductLookup, VariantSelection};

use crate::api::{ApiClient, OrderReceipt, OrderRequest};
use crate::catalog::{Catalog, CatalogSnapshot, CatalogState, LoadTicket};
use crate::checkout::{CheckoutError, CheckoutSource, CustomerDetails, ExpressCheckout, PaymentMode};
use crate::display::{DisplaySink, DisplaySync};
use crate::error::{Result, add_breadcrumb};
use crate::persistence::{Storage, clear_value, keys, load_value, save_value};
use crate::selection::{ConfirmedSelection, ModalView, PendingAction, SelectionError, VariantModal};
use crate::store::{CartStore, WishlistToggle};

/// Lookup used before the catalog loads; wishlist snapshots are kept as-is.
const NO_PRODUCTS: &[Product] = &[];

/// What a shopper action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing to do: unknown or sold-out product, or nothing matched.
    Ignored,
    /// The catalog hasn't loaded yet.
    CatalogUnavailable,
    /// A variant must be chosen first; the modal is open.
    SelectionRequired(ModalView),
    /// A choice was recorded; the modal stays open.
    SelectionUpdated(ModalView),
    /// The choice or confirmation was rejected; the modal stays open.
    Invalid(SelectionError),
    /// The modal was closed without side effects.
    Cancelled,
    AddedToCart,
    AddedToWishlist,
    RemovedFromWishlist,
    /// Wishlist entries moved into the cart.
    MovedToCart { count: usize },
    /// A quantity changed or a line was removed.
    CartUpdated,
    /// This buy-now item is waiting in session storage.
    ExpressReady(Box<ExpressCheckout>),
}

impl ActionOutcome {
    /// Feedback for the shopper, if the outcome warrants any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let message = match self {
            Self::Ignored | Self::Cancelled | Self::CartUpdated | Self::SelectionUpdated(_) => {
                return None;
            }
            Self::CatalogUnavailable => "Products are still loading. Please try again.".to_string(),
            Self::SelectionRequired(view) => format!("Choose options for {}", view.product_name),
            Self::Invalid(err) => err.to_string(),
            Self::AddedToCart => "Item added to cart!".to_string(),
            Self::AddedToWishlist => "Item added to wishlist ♥".to_string(),
            Self::RemovedFromWishlist => "Item removed from wishlist".to_string(),
            Self::MovedToCart { count: 0 } => "Your wishlist is empty".to_string(),
            Self::MovedToCart { count: 1 } => {
                "Item added to cart and removed from wishlist!".to_string()
            }
            Self::MovedToCart { count } => format!("{count} items added to cart!"),
            Self::ExpressReady(_) => "Proceeding to checkout".to_string(),
        };
        Some(message)
    }
}

/// The storefront, owning all shopper-facing state.
#[derive(Debug)]
pub struct Storefront<S, D> {
    catalog: CatalogState,
    store: CartStore<S, D>,
    modal: VariantModal,
    session: S,
}

impl<S: Storage, D: DisplaySink> Storefront<S, D> {
    /// Rehydrate the cart and wishlist from `storage` and render the display.
    ///
    /// `session` holds short-lived state (the buy-now item).
    pub fn new(storage: S, session: S, sink: D) -> Self {
        Self {
            catalog: CatalogState::new(),
            store: CartStore::rehydrate(storage, sink),
            modal: VariantModal::Closed,
            session,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore<S, D> {
        &self.store
    }

    #[must_use]
    pub const fn modal(&self) -> &VariantModal {
        &self.modal
    }

    #[must_use]
    pub const fn display(&self) -> &DisplaySync<D> {
        self.store.display()
    }

    #[must_use]
    pub const fn catalog(&self) -> Option<&Catalog> {
        self.catalog.catalog()
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub const fn begin_catalog_load(&mut self) -> LoadTicket {
        self.catalog.begin_load()
    }

    /// Apply a finished load; stale loads are discarded.
    pub fn finish_catalog_load(&mut self, ticket: LoadTicket, snapshot: CatalogSnapshot) -> bool {
        self.catalog.finish_load(ticket, snapshot)
    }

    /// Fetch and apply the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the products request fails; the catalog then
    /// stays unavailable and product actions fail soft.
    pub async fn load_catalog(&mut self, api: &ApiClient) -> Result<bool> {
        let ticket = self.begin_catalog_load();
        let snapshot = api.load_catalog().await?;
        Ok(self.finish_catalog_load(ticket, snapshot))
    }

    // =========================================================================
    // Product actions
    // =========================================================================

    /// Add a product to the cart, asking for variants first if it has any.
    pub fn add_to_cart(&mut self, id: &ProductId) -> ActionOutcome {
        let product = match self.purchasable(id) {
            Ok(product) => product,
            Err(outcome) => return outcome,
        };

        if product.has_variants() {
            return self.open_modal(product, PendingAction::ToCart);
        }

        self.store.add_to_cart(&product, None, None);
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
        ActionOutcome::AddedToCart
    }

    /// Remove a saved product, or save it (asking for variants if needed).
    pub fn toggle_wishlist(&mut self, id: &ProductId) -> ActionOutcome {
        let product = match self.lookup(id) {
            Ok(product) => product,
            Err(outcome) => return outcome,
        };

        if !self.store.contains_wishlist(id) {
            if product.out_of_stock {
                return ActionOutcome::Ignored;
            }
            if product.has_variants() {
                return self.open_modal(product, PendingAction::ToWishlist);
            }
        }

        match self.store.toggle_wishlist(&product, None, None) {
            WishlistToggle::Added => ActionOutcome::AddedToWishlist,
            WishlistToggle::Removed => ActionOutcome::RemovedFromWishlist,
        }
    }

    /// Check out a single product without touching the cart.
    pub fn buy_now(&mut self, id: &ProductId) -> ActionOutcome {
        let product = match self.purchasable(id) {
            Ok(product) => product,
            Err(outcome) => return outcome,
        };

        if product.has_variants() {
            return self.open_modal(product, PendingAction::BuyNow);
        }

        self.stash_express(ExpressCheckout::new(&product, None, None))
    }

    // =========================================================================
    // Variant modal
    // =========================================================================

    pub fn choose_color(&mut self, color: &str) -> ActionOutcome {
        let result = self.modal.choose_color(color);
        self.after_choice(result)
    }

    pub fn choose_size(&mut self, size: &str) -> ActionOutcome {
        let result = self.modal.choose_size(size);
        self.after_choice(result)
    }

    /// Confirm the open selection and carry out its pending action.
    pub fn confirm_selection(&mut self) -> ActionOutcome {
        match self.modal.confirm() {
            Ok(confirmed) => {
                self.store.display_mut().show_modal(None);
                self.dispatch(confirmed)
            }
            Err(SelectionError::NotOpen) => ActionOutcome::Ignored,
            Err(err) => ActionOutcome::Invalid(err),
        }
    }

    pub fn cancel_selection(&mut self) -> ActionOutcome {
        if self.modal.cancel() {
            self.store.display_mut().show_modal(None);
            ActionOutcome::Cancelled
        } else {
            ActionOutcome::Ignored
        }
    }

    // =========================================================================
    // Cart and wishlist actions
    // =========================================================================

    pub fn change_quantity(&mut self, selection: &VariantSelection, delta: i64) -> ActionOutcome {
        if self.store.change_quantity(selection, delta) {
            ActionOutcome::CartUpdated
        } else {
            ActionOutcome::Ignored
        }
    }

    pub fn remove_from_cart(&mut self, selection: &VariantSelection) -> ActionOutcome {
        if self.store.remove_from_cart(selection) {
            ActionOutcome::CartUpdated
        } else {
            ActionOutcome::Ignored
        }
    }

    pub fn clear_cart(&mut self) -> ActionOutcome {
        if self.store.cart_len() == 0 {
            return ActionOutcome::Ignored;
        }
        self.store.clear_cart();
        ActionOutcome::CartUpdated
    }

    pub fn remove_from_wishlist(&mut self, id: &ProductId) -> ActionOutcome {
        if self.store.remove_from_wishlist(id) {
            ActionOutcome::RemovedFromWishlist
        } else {
            ActionOutcome::Ignored
        }
    }

    /// Move one saved product into the cart with its saved variants.
    ///
    /// Works before the catalog loads, using the saved snapshot.
    pub fn move_to_cart(&mut self, id: &ProductId) -> ActionOutcome {
        let moved = match self.catalog.catalog() {
            Some(catalog) => self.store.move_to_cart(id, catalog),
            None => self.store.move_to_cart(id, NO_PRODUCTS),
        };

        if moved {
            add_breadcrumb("wishlist", "Moved to cart", Some(&[("product_id", id.as_str())]));
            ActionOutcome::MovedToCart { count: 1 }
        } else {
            ActionOutcome::Ignored
        }
    }

    pub fn move_all_wishlist_to_cart(&mut self) -> ActionOutcome {
        let count = match self.catalog.catalog() {
            Some(catalog) => self.store.move_all_wishlist_to_cart(catalog),
            None => self.store.move_all_wishlist_to_cart(NO_PRODUCTS),
        };
        ActionOutcome::MovedToCart { count }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// The pending buy-now item, if any.
    #[must_use]
    pub fn express_checkout(&self) -> Option<ExpressCheckout> {
        load_value(&self.session, keys::EXPRESS_CHECKOUT)
    }

    /// Build the order for `source` without sending it.
    ///
    /// # Errors
    ///
    /// Returns an error if there is nothing to check out or the details are
    /// invalid.
    pub fn prepare_order(
        &self,
        details: &CustomerDetails,
        payment: PaymentMode,
        source: CheckoutSource,
    ) -> std::result::Result<OrderRequest, CheckoutError> {
        match source {
            CheckoutSource::Cart => OrderRequest::from_lines(self.store.cart(), details, payment),
            CheckoutSource::Express => {
                let express = self.express_checkout().ok_or(CheckoutError::NoExpressItem)?;
                OrderRequest::from_lines(std::slice::from_ref(&express.item), details, payment)
            }
        }
    }

    /// Place an order.
    ///
    /// On success a cart checkout clears the cart and an express checkout
    /// consumes the buy-now item. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the order can't be built (no network call is
    /// made) or the API fails or rejects it.
    pub async fn checkout(
        &mut self,
        api: &ApiClient,
        details: &CustomerDetails,
        payment: PaymentMode,
        source: CheckoutSource,
    ) -> Result<Option<OrderReceipt>> {
        let order = self.prepare_order(details, payment, source)?;
        add_breadcrumb(
            "checkout",
            "Submitting order",
            Some(&[("source", source_label(source)), ("payment", payment.as_str())]),
        );

        let receipt = match api.submit_order(&order).await {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::error!(error = %e, items = order.items.len(), "Order submission failed");
                return Err(e.into());
            }
        };

        match source {
            CheckoutSource::Cart => self.store.clear_cart(),
            CheckoutSource::Express => clear_value(&mut self.session, keys::EXPRESS_CHECKOUT),
        }

        tracing::info!(
            total = %order.total_amount,
            source = source_label(source),
            "Checkout complete"
        );
        Ok(receipt)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lookup(&self, id: &ProductId) -> std::result::Result<Product, ActionOutcome> {
        let Some(catalog) = self.catalog.catalog() else {
            return Err(ActionOutcome::CatalogUnavailable);
        };

        catalog.product(id).cloned().ok_or_else(|| {
            tracing::debug!(product_id = %id, "Product not in catalog, ignoring action");
            ActionOutcome::Ignored
        })
    }

    fn purchasable(&self, id: &ProductId) -> std::result::Result<Product, ActionOutcome> {
        let product = self.lookup(id)?;
        if product.out_of_stock {
            tracing::debug!(product_id = %id, "Product is out of stock, ignoring action");
            return Err(ActionOutcome::Ignored);
        }
        Ok(product)
    }

    fn open_modal(&mut self, product: Product, action: PendingAction) -> ActionOutcome {
        if let Err(err) = self.modal.open(product, action) {
            return ActionOutcome::Invalid(err);
        }

        let view = self.modal.view();
        self.store.display_mut().show_modal(view.clone());
        view.map_or(ActionOutcome::Ignored, ActionOutcome::SelectionRequired)
    }

    fn after_choice(&mut self, result: std::result::Result<(), SelectionError>) -> ActionOutcome {
        match result {
            Ok(()) => {
                let view = self.modal.view();
                self.store.display_mut().show_modal(view.clone());
                view.map_or(ActionOutcome::Ignored, ActionOutcome::SelectionUpdated)
            }
            Err(SelectionError::NotOpen) => ActionOutcome::Ignored,
            Err(err) => ActionOutcome::Invalid(err),
        }
    }

    fn dispatch(&mut self, confirmed: ConfirmedSelection) -> ActionOutcome {
        let ConfirmedSelection {
            product,
            action,
            color,
            size,
        } = confirmed;

        match action {
            PendingAction::ToCart => {
                self.store.add_to_cart(&product, color, size);
                ActionOutcome::AddedToCart
            }
            PendingAction::ToWishlist if self.store.contains_wishlist(&product.id) => {
                self.store.move_selection_to_cart(&product, color, size);
                ActionOutcome::MovedToCart { count: 1 }
            }
            PendingAction::ToWishlist => {
                self.store.toggle_wishlist(&product, color, size);
                ActionOutcome::AddedToWishlist
            }
            PendingAction::BuyNow => {
                self.stash_express(ExpressCheckout::new(&product, color, size))
            }
        }
    }

    fn stash_express(&mut self, express: ExpressCheckout) -> ActionOutcome {
        save_value(&mut self.session, keys::EXPRESS_CHECKOUT, &express);
        add_breadcrumb(
            "checkout",
            "Buy now",
            Some(&[("product_id", express.item.selection.product_id.as_str())]),
        );
        ActionOutcome::ExpressReady(Box::new(express))
    }
}

const fn source_label(source: CheckoutSource) -> &'static str {
    match source {
        CheckoutSource::Cart => "cart",
        CheckoutSource::Express => "express",
    }
}
