//! Cache types for catalog responses.

use super::types::{ApiProduct, CarouselSlide, Category};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Categories,
    Carousel,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<ApiProduct>),
    Categories(Vec<Category>),
    Carousel(Vec<CarouselSlide>),
}
