//! Admin stock updates against the mock API.

#![allow(clippy::unwrap_used)]

use sia_core::{ProductId, ProductLookup, VariantKey};
use sia_integration_tests::{Fixture, MockApi};
use sia_storefront::api::{StockUpdate, StockUpdateError};
use sia_storefront::{ActionOutcome, ApiClient, MemoryStorage, RenderedSurfaces, Storefront};

#[tokio::test]
async fn test_stock_update_round_trip() {
    let mock = MockApi::start(Fixture::sample()).await.unwrap();
    let api = ApiClient::new(&mock.config()).unwrap();
    api.load_catalog().await.unwrap();

    let update = StockUpdate::new(
        false,
        [VariantKey::pair("Green", "S"), VariantKey::pair("Green", "M")],
    );
    let updated = api
        .update_stock(&ProductId::new("p-lehenga"), &update)
        .await
        .unwrap()
        .unwrap();

    assert!(updated.is_disabled(&VariantKey::pair("Green", "S")));
    assert!(updated.is_disabled(&VariantKey::pair("Green", "M")));
    assert!(!updated.is_disabled(&VariantKey::pair("Red", "S")));

    let (id, body) = &mock.stock_updates()[0];
    assert_eq!(id, "p-lehenga");
    assert_eq!(body["outOfStock"], false);
    assert_eq!(body["outOfStockVariants"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_stock_update_invalidates_catalog_cache() {
    let mock = MockApi::start(Fixture::sample()).await.unwrap();
    let api = ApiClient::new(&mock.config()).unwrap();
    let mut shop = Storefront::new(
        MemoryStorage::new(),
        MemoryStorage::new(),
        RenderedSurfaces::new(),
    );
    shop.load_catalog(&api).await.unwrap();
    assert_eq!(shop.add_to_cart(&ProductId::new("p-clutch")), ActionOutcome::AddedToCart);

    let update = StockUpdate::new(true, Vec::<VariantKey>::new());
    api.update_stock(&ProductId::new("p-clutch"), &update)
        .await
        .unwrap();

    // The next page load sees the product sold out
    shop.load_catalog(&api).await.unwrap();
    assert_eq!(mock.product_requests(), 2);
    let clutch = shop.catalog().unwrap().product(&ProductId::new("p-clutch")).unwrap();
    assert!(clutch.out_of_stock);
    assert_eq!(shop.add_to_cart(&ProductId::new("p-clutch")), ActionOutcome::Ignored);

    // Lines already in the cart are untouched
    assert_eq!(shop.store().cart_count(), 1);
}

#[tokio::test]
async fn test_unknown_variant_is_rejected_before_sending() {
    let mock = MockApi::start(Fixture::sample()).await.unwrap();
    let api = ApiClient::new(&mock.config()).unwrap();
    let snapshot = api.load_catalog().await.unwrap();
    let lehenga = snapshot.products.product(&ProductId::new("p-lehenga")).unwrap();

    let update = StockUpdate::new(false, [VariantKey::pair("Blue", "S")]);
    assert_eq!(
        update.validate(lehenga).unwrap_err(),
        StockUpdateError::UnknownVariant("Blue|S".to_string())
    );
    assert!(mock.stock_updates().is_empty());
}
