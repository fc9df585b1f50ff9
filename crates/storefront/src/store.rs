//! Cart and wishlist store.
//!
//! [`CartStore`] owns both collections. Every mutation writes the touched
//! collection through to storage and then re-renders the display, so the
//! persisted state, the in-memory state and the surfaces never disagree
//! once a call returns.
//!
//! Cart lines are unique per variant selection. Wishlist matching is per
//! product: toggling a product that is already saved removes it regardless
//! of which variant was saved.

use sia_core::{
    ItemSnapshot, LineItem, Price, Product, ProductId, ProductLookup, VariantSelection,
    WishlistEntry,
};

use crate::display::{DisplaySink, DisplaySync};
use crate::persistence::{Storage, keys, load_entries, save_entries};

/// Result of toggling a product on the wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistToggle {
    Added,
    Removed,
}

/// The authoritative cart and wishlist.
#[derive(Debug)]
pub struct CartStore<S, D> {
    cart: Vec<LineItem>,
    wishlist: Vec<WishlistEntry>,
    storage: S,
    display: DisplaySync<D>,
}

impl<S: Storage, D: DisplaySink> CartStore<S, D> {
    /// Rebuild the store from persisted state and render every surface.
    ///
    /// Cart lines are normalized on the way in: zero-quantity lines are
    /// dropped and lines with the same selection are merged.
    pub fn rehydrate(storage: S, sink: D) -> Self {
        let stored: Vec<LineItem> = load_entries(&storage, keys::CART);
        let stored_len = stored.len();
        let cart = normalize_cart(stored);
        if cart.len() != stored_len {
            tracing::warn!(
                stored = stored_len,
                kept = cart.len(),
                "Normalized persisted cart"
            );
        }

        let wishlist = load_entries(&storage, keys::WISHLIST);

        let mut store = Self {
            cart,
            wishlist,
            storage,
            display: DisplaySync::new(sink),
        };
        store.refresh_display();
        tracing::debug!(
            cart_lines = store.cart.len(),
            wishlist_entries = store.wishlist.len(),
            "Rehydrated store"
        );
        store
    }

    #[must_use]
    pub fn cart(&self) -> &[LineItem] {
        &self.cart
    }

    #[must_use]
    pub fn wishlist(&self) -> &[WishlistEntry] {
        &self.wishlist
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub const fn display(&self) -> &DisplaySync<D> {
        &self.display
    }

    pub const fn display_mut(&mut self) -> &mut DisplaySync<D> {
        &mut self.display
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of `product` with the given variant choices.
    pub fn add_to_cart(&mut self, product: &Product, color: Option<String>, size: Option<String>) {
        let selection = VariantSelection::new(product.id.clone(), color, size);
        self.add_line(selection, ItemSnapshot::from(product));
        self.persist_cart();
        self.refresh_display();
    }

    /// Adjust the quantity of the matching line by `delta`.
    ///
    /// A resulting quantity of zero or less removes the line. Returns whether
    /// a line matched; an unmatched selection changes nothing.
    pub fn change_quantity(&mut self, selection: &VariantSelection, delta: i64) -> bool {
        let Some(index) = self.cart.iter().position(|l| &l.selection == selection) else {
            tracing::debug!(product_id = %selection.product_id, "No cart line to update");
            return false;
        };

        let current = self.cart.get(index).map_or(0, |l| i64::from(l.quantity));
        let updated = current.saturating_add(delta);
        if updated <= 0 {
            self.cart.remove(index);
        } else if let Some(line) = self.cart.get_mut(index) {
            line.quantity = u32::try_from(updated).unwrap_or(u32::MAX);
        }

        self.persist_cart();
        self.refresh_display();
        true
    }

    /// Remove the matching line; returns whether one was removed.
    pub fn remove_from_cart(&mut self, selection: &VariantSelection) -> bool {
        let before = self.cart.len();
        self.cart.retain(|l| &l.selection != selection);
        if self.cart.len() == before {
            return false;
        }

        self.persist_cart();
        self.refresh_display();
        true
    }

    /// Sum of `price * quantity` over every line.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.cart.iter().map(LineItem::line_total).sum()
    }

    /// Total units in the cart.
    #[must_use]
    pub fn cart_count(&self) -> u32 {
        self.cart.iter().fold(0, |n, l| n.saturating_add(l.quantity))
    }

    /// Distinct lines in the cart.
    #[must_use]
    pub fn cart_len(&self) -> usize {
        self.cart.len()
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist_cart();
        self.refresh_display();
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Add the product if absent, otherwise remove every entry for it.
    ///
    /// Removal ignores `color` and `size`.
    pub fn toggle_wishlist(
        &mut self,
        product: &Product,
        color: Option<String>,
        size: Option<String>,
    ) -> WishlistToggle {
        let outcome = if self.contains_wishlist(&product.id) {
            self.wishlist.retain(|e| e.product_id() != &product.id);
            WishlistToggle::Removed
        } else {
            self.wishlist.push(WishlistEntry::new(
                VariantSelection::new(product.id.clone(), color, size),
                ItemSnapshot::from(product),
            ));
            WishlistToggle::Added
        };

        self.persist_wishlist();
        self.refresh_display();
        outcome
    }

    #[must_use]
    pub fn contains_wishlist(&self, id: &ProductId) -> bool {
        self.wishlist.iter().any(|e| e.product_id() == id)
    }

    /// Remove every entry for `id`; returns whether any was removed.
    pub fn remove_from_wishlist(&mut self, id: &ProductId) -> bool {
        let before = self.wishlist.len();
        self.wishlist.retain(|e| e.product_id() != id);
        if self.wishlist.len() == before {
            return false;
        }

        self.persist_wishlist();
        self.refresh_display();
        true
    }

    /// Move the first wishlist entry for `id` into the cart.
    ///
    /// The entry's stored variant choices are kept. Its snapshot is refreshed
    /// from `catalog` when the product is still listed. Returns whether an
    /// entry was moved.
    pub fn move_to_cart<L>(&mut self, id: &ProductId, catalog: &L) -> bool
    where
        L: ProductLookup + ?Sized,
    {
        let Some(index) = self.wishlist.iter().position(|e| e.product_id() == id) else {
            return false;
        };

        let entry = self.wishlist.remove(index);
        let snapshot = current_snapshot(&entry, catalog);
        self.add_line(entry.selection, snapshot);

        self.persist_cart();
        self.persist_wishlist();
        self.refresh_display();
        true
    }

    /// Add `product` to the cart with fresh variant choices and drop it from
    /// the wishlist.
    pub fn move_selection_to_cart(
        &mut self,
        product: &Product,
        color: Option<String>,
        size: Option<String>,
    ) {
        let selection = VariantSelection::new(product.id.clone(), color, size);
        self.add_line(selection, ItemSnapshot::from(product));
        self.wishlist.retain(|e| e.product_id() != &product.id);

        self.persist_cart();
        self.persist_wishlist();
        self.refresh_display();
    }

    /// Move every wishlist entry into the cart and empty the wishlist.
    ///
    /// Returns the number of entries moved.
    pub fn move_all_wishlist_to_cart<L>(&mut self, catalog: &L) -> usize
    where
        L: ProductLookup + ?Sized,
    {
        if self.wishlist.is_empty() {
            return 0;
        }

        let entries = std::mem::take(&mut self.wishlist);
        let moved = entries.len();
        for entry in entries {
            let snapshot = current_snapshot(&entry, catalog);
            self.add_line(entry.selection, snapshot);
        }

        self.persist_cart();
        self.persist_wishlist();
        self.refresh_display();
        tracing::info!(moved, "Moved wishlist to cart");
        moved
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn add_line(&mut self, selection: VariantSelection, snapshot: ItemSnapshot) {
        if let Some(line) = self.cart.iter_mut().find(|l| l.selection == selection) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.cart.push(LineItem::new(selection, snapshot, 1));
        }
    }

    fn persist_cart(&mut self) {
        save_entries(&mut self.storage, keys::CART, &self.cart);
    }

    fn persist_wishlist(&mut self) {
        save_entries(&mut self.storage, keys::WISHLIST, &self.wishlist);
    }

    fn refresh_display(&mut self) {
        self.display.sync(&self.cart, &self.wishlist);
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Drop empty lines and merge lines that share a selection.
fn normalize_cart(lines: Vec<LineItem>) -> Vec<LineItem> {
    let mut merged: Vec<LineItem> = Vec::with_capacity(lines.len());
    for line in lines.into_iter().filter(|l| l.quantity > 0) {
        if let Some(existing) = merged.iter_mut().find(|m| m.selection == line.selection) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            merged.push(line);
        }
    }
    merged
}

fn current_snapshot<L>(entry: &WishlistEntry, catalog: &L) -> ItemSnapshot
where
    L: ProductLookup + ?Sized,
{
    catalog
        .product(entry.product_id())
        .map_or_else(|| entry.snapshot.clone(), ItemSnapshot::from)
}
