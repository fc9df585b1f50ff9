//! Display synchronization.
//!
//! After every cart or wishlist mutation the store re-renders each surface
//! from the in-memory collections and hands the result to a [`DisplaySink`],
//! which replaces the surface's previous content wholesale. Rendering is a
//! pure function of the collections, so running `sync` twice in a row leaves
//! the sink unchanged.

mod templates;

use std::collections::BTreeMap;

use askama::Template;
use sia_core::{LineItem, Price, WishlistEntry};

use crate::selection::ModalView;

pub use templates::{CartLineView, WishlistItemView};
use templates::{
    CartItemsTemplate, CartTotalTemplate, CountBadgeTemplate, VariantModalTemplate,
    WishlistItemsTemplate,
};

/// A region of the page whose content is owned by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Surface {
    HeaderCartCount,
    BottomBarCartCount,
    HeaderWishlistCount,
    BottomBarWishlistCount,
    CartSidebar,
    CartTotal,
    WishlistSidebar,
    VariantModal,
}

impl Surface {
    /// Surfaces derived from the cart and wishlist.
    pub const COLLECTIONS: [Self; 7] = [
        Self::HeaderCartCount,
        Self::BottomBarCartCount,
        Self::HeaderWishlistCount,
        Self::BottomBarWishlistCount,
        Self::CartSidebar,
        Self::CartTotal,
        Self::WishlistSidebar,
    ];

    /// DOM id of the element this surface replaces.
    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::HeaderCartCount => "cart-count",
            Self::BottomBarCartCount => "bottom-cart-count",
            Self::HeaderWishlistCount => "wishlist-count",
            Self::BottomBarWishlistCount => "bottom-wishlist-count",
            Self::CartSidebar => "cart-items",
            Self::CartTotal => "cart-total",
            Self::WishlistSidebar => "wishlist-items",
            Self::VariantModal => "variant-modal",
        }
    }
}

/// Destination for rendered surfaces.
pub trait DisplaySink {
    /// Replace the full content of `surface`.
    fn replace(&mut self, surface: Surface, content: String);
}

/// In-memory sink holding the latest content of each surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedSurfaces {
    surfaces: BTreeMap<Surface, String>,
}

impl RenderedSurfaces {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest content of `surface`, if it has been rendered.
    #[must_use]
    pub fn get(&self, surface: Surface) -> Option<&str> {
        self.surfaces.get(&surface).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Surface, &str)> {
        self.surfaces.iter().map(|(s, c)| (*s, c.as_str()))
    }
}

impl DisplaySink for RenderedSurfaces {
    fn replace(&mut self, surface: Surface, content: String) {
        self.surfaces.insert(surface, content);
    }
}

/// Renders the storefront surfaces into a sink.
#[derive(Debug, Clone, Default)]
pub struct DisplaySync<D> {
    sink: D,
}

impl<D: DisplaySink> DisplaySync<D> {
    pub const fn new(sink: D) -> Self {
        Self { sink }
    }

    pub const fn sink(&self) -> &D {
        &self.sink
    }

    pub const fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }

    pub fn into_sink(self) -> D {
        self.sink
    }

    /// Re-render every collection surface.
    ///
    /// A surface whose template fails to render keeps its previous content.
    pub fn sync(&mut self, cart: &[LineItem], wishlist: &[WishlistEntry]) {
        for surface in Surface::COLLECTIONS {
            match render(surface, cart, wishlist) {
                Ok(content) => self.sink.replace(surface, content),
                Err(e) => {
                    tracing::warn!(
                        surface = surface.element_id(),
                        error = %e,
                        "Failed to render surface"
                    );
                }
            }
        }
    }

    /// Render the variant modal; `None` renders it closed.
    pub fn show_modal(&mut self, view: Option<ModalView>) {
        match (VariantModalTemplate { view }).render() {
            Ok(content) => self.sink.replace(Surface::VariantModal, content),
            Err(e) => tracing::warn!(error = %e, "Failed to render variant modal"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn render(
    surface: Surface,
    cart: &[LineItem],
    wishlist: &[WishlistEntry],
) -> askama::Result<String> {
    let cart_count: u64 = cart.iter().map(|l| u64::from(l.quantity)).sum();
    let wishlist_count = wishlist.len() as u64;

    match surface {
        Surface::HeaderCartCount => badge(surface, "cart-count", cart_count, false),
        Surface::BottomBarCartCount => badge(surface, "bottom-count", cart_count, true),
        Surface::HeaderWishlistCount => badge(surface, "wishlist-count", wishlist_count, false),
        Surface::BottomBarWishlistCount => badge(surface, "bottom-count", wishlist_count, true),
        Surface::CartSidebar => CartItemsTemplate {
            items: cart.iter().map(CartLineView::from).collect(),
        }
        .render(),
        Surface::CartTotal => CartTotalTemplate {
            total: cart.iter().map(LineItem::line_total).sum::<Price>(),
        }
        .render(),
        Surface::WishlistSidebar => WishlistItemsTemplate {
            items: wishlist.iter().map(WishlistItemView::from).collect(),
        }
        .render(),
        Surface::VariantModal => VariantModalTemplate { view: None }.render(),
    }
}

fn badge(
    surface: Surface,
    css_class: &'static str,
    count: u64,
    hide_when_empty: bool,
) -> askama::Result<String> {
    CountBadgeTemplate {
        element_id: surface.element_id(),
        css_class,
        count,
        hide_when_empty,
    }
    .render()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::selection::{PendingAction, VariantModal};
    use sia_core::{ItemSnapshot, Product, VariantSelection};

    fn line(id: &str, color: Option<&str>, price: i64, qty: u32) -> LineItem {
        LineItem::new(
            VariantSelection::new(id, color.map(str::to_owned), None),
            ItemSnapshot {
                name: format!("Item {id}"),
                price: Price::from_rupees(price),
                image: Some("https://cdn.example.com/item.jpg".to_string()),
            },
            qty,
        )
    }

    fn entry(id: &str) -> WishlistEntry {
        WishlistEntry::new(
            VariantSelection::plain(id),
            ItemSnapshot {
                name: format!("Saved {id}"),
                price: Price::from_rupees(999),
                image: None,
            },
        )
    }

    fn synced(cart: &[LineItem], wishlist: &[WishlistEntry]) -> RenderedSurfaces {
        let mut display = DisplaySync::new(RenderedSurfaces::new());
        display.sync(cart, wishlist);
        display.into_sink()
    }

    #[test]
    fn test_sync_renders_every_collection_surface() {
        let rendered = synced(&[], &[]);
        for surface in Surface::COLLECTIONS {
            assert!(rendered.get(surface).is_some(), "{surface:?} not rendered");
        }
        assert!(rendered.get(Surface::VariantModal).is_none());
    }

    #[test]
    fn test_sync_is_idempotent() {
        let cart = [line("p1", Some("Red"), 500, 1), line("p2", None, 1000, 1)];
        let wishlist = [entry("p3")];

        let mut display = DisplaySync::new(RenderedSurfaces::new());
        display.sync(&cart, &wishlist);
        let first = display.sink().clone();
        display.sync(&cart, &wishlist);
        assert_eq!(display.sink(), &first);
    }

    #[test]
    fn test_counts_and_total() {
        let cart = [line("p1", Some("Red"), 500, 1), line("p2", None, 1000, 2)];
        let rendered = synced(&cart, &[entry("p3")]);

        let header = rendered.get(Surface::HeaderCartCount).unwrap();
        assert!(header.contains("id=\"cart-count\""));
        assert!(header.contains(">3<"));
        assert!(rendered.get(Surface::HeaderWishlistCount).unwrap().contains(">1<"));
        assert!(rendered.get(Surface::CartTotal).unwrap().contains("₹2,500"));
    }

    #[test]
    fn test_bottom_bar_badges_hidden_when_empty() {
        let rendered = synced(&[], &[]);
        let bottom = rendered.get(Surface::BottomBarCartCount).unwrap();
        assert!(bottom.contains("display: none"));
        assert!(bottom.contains(">0<"));

        let header = rendered.get(Surface::HeaderCartCount).unwrap();
        assert!(!header.contains("display"));

        let rendered = synced(&[line("p1", None, 500, 1)], &[entry("p2")]);
        assert!(rendered.get(Surface::BottomBarCartCount).unwrap().contains("display: flex"));
        assert!(
            rendered
                .get(Surface::BottomBarWishlistCount)
                .unwrap()
                .contains("display: flex")
        );
    }

    #[test]
    fn test_empty_messages() {
        let rendered = synced(&[], &[]);
        assert!(rendered.get(Surface::CartSidebar).unwrap().contains("Your cart is empty"));
        assert!(
            rendered
                .get(Surface::WishlistSidebar)
                .unwrap()
                .contains("Your wishlist is empty")
        );
    }

    #[test]
    fn test_cart_sidebar_lists_variants() {
        let rendered = synced(&[line("p1", Some("Red"), 500, 2)], &[]);
        let sidebar = rendered.get(Surface::CartSidebar).unwrap();
        assert!(sidebar.contains("Item p1"));
        assert!(sidebar.contains("Color: Red"));
        assert!(!sidebar.contains("Size:"));
        assert!(sidebar.contains("₹1,000"));
        assert!(sidebar.contains("data-product-id=\"p1\""));
    }

    #[test]
    fn test_wishlist_sidebar_uses_placeholder_without_image() {
        let rendered = synced(&[], &[entry("p9")]);
        let sidebar = rendered.get(Surface::WishlistSidebar).unwrap();
        assert!(sidebar.contains("Saved p9"));
        assert!(sidebar.contains("🛍️"));
        assert!(!sidebar.contains("<img"));
    }

    #[test]
    fn test_show_modal_open_and_closed() {
        let product = Product::new("p1", "Kurti", Price::from_rupees(799))
            .with_colors(["Red", "Blue"])
            .with_disabled(["Blue"]);
        let mut modal = VariantModal::default();
        modal.open(product, PendingAction::ToWishlist).unwrap();

        let mut display = DisplaySync::new(RenderedSurfaces::new());
        display.show_modal(modal.view());
        let html = display.sink().get(Surface::VariantModal).unwrap().to_string();
        assert!(html.contains("active"));
        assert!(html.contains("Kurti"));
        assert!(html.contains("data-color=\"Red\""));
        assert!(!html.contains("data-color=\"Blue\""));
        assert!(!html.contains("variant-size-section"));
        assert!(html.contains("Add to Wishlist"));

        display.show_modal(None);
        let html = display.sink().get(Surface::VariantModal).unwrap();
        assert!(!html.contains("active"));
    }
}
