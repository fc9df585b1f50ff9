//! Product catalog index.
//!
//! The catalog is loaded once per page from the API and then answers id
//! lookups for the cart, wishlist and variant modal, plus the category
//! listings (sorting, paging, new arrivals).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use sia_core::{Product, ProductId, ProductLookup};

use crate::api::{CarouselSlide, Category};

/// Products shown per listing page.
pub const PAGE_SIZE: usize = 12;

/// Maximum products in the new arrivals showcase.
pub const NEW_ARRIVALS_LIMIT: usize = 8;

/// Raw catalog data as loaded from the API.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// Products in API order (newest first).
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    /// Slides sorted by their display order.
    pub slides: Vec<CarouselSlide>,
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// API order, newest first.
    #[default]
    Default,
    PriceLowHigh,
    PriceHighLow,
    NameAz,
    NameZa,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceLowHigh => "price-low",
            Self::PriceHighLow => "price-high",
            Self::NameAz => "name-az",
            Self::NameZa => "name-za",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "price-low" => Ok(Self::PriceLowHigh),
            "price-high" => Ok(Self::PriceHighLow),
            "name-az" => Ok(Self::NameAz),
            "name-za" => Ok(Self::NameZa),
            other => Err(format!(
                "unknown sort order '{other}' \
                 (expected default, price-low, price-high, name-az or name-za)"
            )),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    pub items: Vec<&'a Product>,
    /// 1-based page number.
    pub page: usize,
    pub total_pages: usize,
}

/// Indexed catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
    categories: Vec<Category>,
    slides: Vec<CarouselSlide>,
}

impl Catalog {
    #[must_use]
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        let CatalogSnapshot {
            products,
            mut categories,
            slides,
        } = snapshot;

        let index = products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        categories.sort_by_key(|c| c.display_order);

        Self {
            products,
            index,
            categories,
            slides,
        }
    }

    /// All products in API order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Categories sorted by display order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Categories featured on the home page that have at least one product.
    #[must_use]
    pub fn main_page_categories(&self) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| c.show_on_main_page && self.in_category(&c.name).next().is_some())
            .collect()
    }

    #[must_use]
    pub fn slides(&self) -> &[CarouselSlide] {
        &self.slides
    }

    /// Products in `category`, in API order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |p| p.category.as_deref() == Some(category))
    }

    /// Products of a listing in the requested order.
    ///
    /// Whole-product-disabled items are left out of listings.
    #[must_use]
    pub fn sorted(&self, category: Option<&str>, order: SortOrder) -> Vec<&Product> {
        let mut items: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| category.is_none_or(|c| p.category.as_deref() == Some(c)))
            .filter(|p| !p.out_of_stock)
            .collect();

        match order {
            SortOrder::Default => {}
            SortOrder::PriceLowHigh => items.sort_by_key(|p| p.price),
            SortOrder::PriceHighLow => items.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::NameAz => items.sort_by_cached_key(|p| p.name.to_lowercase()),
            SortOrder::NameZa => {
                items.sort_by_cached_key(|p| p.name.to_lowercase());
                items.reverse();
            }
        }

        items
    }

    /// One page of a sorted listing; pages are 1-based and clamped.
    #[must_use]
    pub fn page(&self, category: Option<&str>, order: SortOrder, page: usize) -> Page<'_> {
        let items = self.sorted(category, order);
        let total_pages = items.len().div_ceil(PAGE_SIZE).max(1);
        let page = page.clamp(1, total_pages);

        Page {
            items: items
                .into_iter()
                .skip((page - 1) * PAGE_SIZE)
                .take(PAGE_SIZE)
                .collect(),
            page,
            total_pages,
        }
    }

    /// Newest products flagged as new arrivals that are in stock.
    #[must_use]
    pub fn new_arrivals(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.is_new_arrival && !p.out_of_stock)
            .take(NEW_ARRIVALS_LIMIT)
            .collect()
    }
}

impl From<CatalogSnapshot> for Catalog {
    fn from(snapshot: CatalogSnapshot) -> Self {
        Self::new(snapshot)
    }
}

impl ProductLookup for Catalog {
    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).and_then(|&i| self.products.get(i))
    }
}

// =============================================================================
// Load tracking
// =============================================================================

/// Identifies one catalog load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// The catalog plus the generation of the most recent load.
///
/// Only the response for the latest `begin_load` is applied; an older load
/// that finishes late is discarded. A catalog from an earlier load stays
/// available while a reload is in flight.
#[derive(Debug, Default)]
pub struct CatalogState {
    generation: u64,
    catalog: Option<Catalog>,
}

impl CatalogState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load and return its ticket.
    pub const fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Apply a finished load if its ticket is still current.
    ///
    /// Returns whether the snapshot was applied.
    pub fn finish_load(&mut self, ticket: LoadTicket, snapshot: CatalogSnapshot) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "Discarding stale catalog load"
            );
            return false;
        }

        let catalog = Catalog::new(snapshot);
        tracing::info!(products = catalog.len(), "Catalog loaded");
        self.catalog = Some(catalog);
        true
    }

    /// Whether a catalog has finished loading.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.catalog.is_some()
    }

    #[must_use]
    pub const fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }
}
