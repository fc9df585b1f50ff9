//! Catalog loading against the mock API.

#![allow(clippy::unwrap_used)]

use sia_core::{ProductId, ProductLookup};
use serde_json::json;
use sia_integration_tests::{Fixture, MockApi};
use sia_storefront::{
    ActionOutcome, ApiClient, MemoryStorage, RenderedSurfaces, SortOrder, Storefront,
};

fn shop() -> Storefront<MemoryStorage, RenderedSurfaces> {
    Storefront::new(
        MemoryStorage::new(),
        MemoryStorage::new(),
        RenderedSurfaces::new(),
    )
}

// =============================================================================
// Loading
// =============================================================================

#[tokio::test]
async fn test_load_catalog_resolves_categories() {
    let mock = MockApi::start(Fixture::sample()).await.unwrap();
    let api = ApiClient::new(&mock.config()).unwrap();

    let snapshot = api.load_catalog().await.unwrap();
    let category_of = |id: &str| {
        snapshot
            .products
            .iter()
            .find(|p| p.id.as_str() == id)
            .and_then(|p| p.category.clone())
            .unwrap()
    };

    assert_eq!(category_of("p-lehenga"), "Lehengas");
    assert_eq!(category_of("p-clutch"), "Accessories");
    assert_eq!(category_of("p-kurti"), "uncategorized");
}

#[tokio::test]
async fn test_null_product_fields_do_not_block_catalog() {
    let mut fixture = Fixture::sample();
    fixture.products.push(json!({
        "_id": "p-potli",
        "name": "Potli Bag",
        "price": 700,
        "category": null,
        "images": null,
        "tags": null,
        "colors": null,
        "sizes": null,
        "outOfStock": null,
        "outOfStockVariants": null,
        "isNewArrival": null
    }));
    let mock = MockApi::start(fixture).await.unwrap();
    let api = ApiClient::new(&mock.config()).unwrap();
    let mut shop = shop();

    assert!(shop.load_catalog(&api).await.unwrap());
    assert_eq!(shop.catalog().unwrap().len(), 5);

    let potli = ProductId::new("p-potli");
    assert_eq!(shop.add_to_cart(&potli), ActionOutcome::AddedToCart);
    assert_eq!(shop.add_to_cart(&ProductId::new("p-clutch")), ActionOutcome::AddedToCart);
    assert_eq!(shop.store().cart_len(), 2);
}

#[tokio::test]
async fn test_loaded_catalog_orders_categories_and_slides() {
    let mock = MockApi::start(Fixture::sample()).await.unwrap();
    let api = ApiClient::new(&mock.config()).unwrap();
    let mut shop = shop();

    assert!(shop.load_catalog(&api).await.unwrap());
    let catalog = shop.catalog().unwrap();

    let names: Vec<_> = catalog.categories().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Accessories", "Lehengas"]);
    assert_eq!(catalog.main_page_categories().len(), 1);

    let slides: Vec<_> = catalog.slides().iter().map(|s| s.title.as_str()).collect();
    assert_eq!(slides, ["New Season", "Festive Edit"]);
}

#[tokio::test]
async fn test_listings_hide_sold_out_products() {
    let mock = MockApi::start(Fixture::sample()).await.unwrap();
    let api = ApiClient::new(&mock.config()).unwrap();
    let mut shop = shop();
    shop.load_catalog(&api).await.unwrap();
    let catalog = shop.catalog().unwrap();

    let listed: Vec<_> = catalog
        .sorted(None, SortOrder::PriceLowHigh)
        .into_iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(listed, ["p-kurti", "p-clutch", "p-lehenga"]);

    let lehengas = catalog.sorted(Some("Lehengas"), SortOrder::Default);
    assert_eq!(lehengas.len(), 1);

    let arrivals: Vec<_> = catalog.new_arrivals().into_iter().map(|p| p.id.as_str()).collect();
    assert_eq!(arrivals, ["p-lehenga"]);

    // Still resolvable by id for cart snapshots
    assert!(catalog.product(&ProductId::new("p-saree")).unwrap().out_of_stock);
}

#[tokio::test]
async fn test_catalog_responses_are_cached() {
    let mock = MockApi::start(Fixture::sample()).await.unwrap();
    let api = ApiClient::new(&mock.config()).unwrap();

    api.load_catalog().await.unwrap();
    api.load_catalog().await.unwrap();
    assert_eq!(mock.product_requests(), 1);

    api.invalidate_cache();
    api.load_catalog().await.unwrap();
    assert_eq!(mock.product_requests(), 2);
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_category_failure_degrades_to_empty_list() {
    let mock = MockApi::start(Fixture::sample()).await.unwrap();
    mock.fail_categories(true);
    let api = ApiClient::new(&mock.config()).unwrap();

    let snapshot = api.load_catalog().await.unwrap();
    assert!(snapshot.categories.is_empty());
    assert_eq!(snapshot.products.len(), 4);

    // Unresolvable ids are kept as-is
    let clutch = snapshot.products.iter().find(|p| p.id.as_str() == "p-clutch").unwrap();
    assert_eq!(clutch.category.as_deref(), Some("cat-2"));
}

#[tokio::test]
async fn test_product_failure_leaves_catalog_unavailable() {
    let mock = MockApi::start(Fixture::sample()).await.unwrap();
    mock.fail_products(true);
    let api = ApiClient::new(&mock.config()).unwrap();
    let mut shop = shop();

    let err = shop.load_catalog(&api).await.unwrap_err();
    assert!(err.is_server_error());
    assert!(shop.catalog().is_none());
    assert_eq!(
        shop.add_to_cart(&ProductId::new("p-clutch")),
        ActionOutcome::CatalogUnavailable
    );
}
