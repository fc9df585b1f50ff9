//! Cart and express checkout against the mock orders endpoint.

#![allow(clippy::unwrap_used)]

use sia_core::ProductId;
use sia_integration_tests::{Fixture, MockApi, OrderBehavior};
use sia_storefront::api::ApiError;
use sia_storefront::checkout::CheckoutError;
use sia_storefront::{
    ActionOutcome, ApiClient, AppError, CheckoutSource, CustomerDetails, FileStorage,
    PaymentMode, RenderedSurfaces, Storefront,
};
use tempfile::TempDir;

type Shop = Storefront<FileStorage, RenderedSurfaces>;

struct Harness {
    mock: MockApi,
    api: ApiClient,
    dir: TempDir,
}

impl Harness {
    async fn start() -> Self {
        let mock = MockApi::start(Fixture::sample()).await.unwrap();
        let api = ApiClient::new(&mock.config()).unwrap();
        Self {
            mock,
            api,
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// A fresh page load over the same storage.
    async fn shop(&self) -> Shop {
        let storage = FileStorage::open(self.dir.path().join("local")).unwrap();
        let session = FileStorage::open(self.dir.path().join("session")).unwrap();
        let mut shop = Storefront::new(storage, session, RenderedSurfaces::new());
        shop.load_catalog(&self.api).await.unwrap();
        shop
    }
}

fn customer() -> CustomerDetails {
    CustomerDetails {
        name: "Asha Verma".to_string(),
        phone: "9876543210".to_string(),
        address: "12 MG Road, Jaipur".to_string(),
        ..CustomerDetails::default()
    }
}

fn id(s: &str) -> ProductId {
    ProductId::new(s)
}

/// Clutch plus a green medium lehenga: ₹3,500.
fn fill_cart(shop: &mut Shop) {
    assert_eq!(shop.add_to_cart(&id("p-clutch")), ActionOutcome::AddedToCart);
    assert!(matches!(
        shop.add_to_cart(&id("p-lehenga")),
        ActionOutcome::SelectionRequired(_)
    ));
    shop.choose_color("Green");
    shop.choose_size("M");
    assert_eq!(shop.confirm_selection(), ActionOutcome::AddedToCart);
}

// =============================================================================
// Cart checkout
// =============================================================================

#[tokio::test]
async fn test_cart_checkout_places_order_and_clears_cart() {
    let h = Harness::start().await;
    let mut shop = h.shop().await;
    fill_cart(&mut shop);

    let receipt = shop
        .checkout(&h.api, &customer(), PaymentMode::Cod, CheckoutSource::Cart)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(receipt.order_number.as_deref(), Some("SIA-0001"));
    assert_eq!(shop.store().cart_len(), 0);

    let orders = h.mock.orders();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order["totalAmount"].as_f64(), Some(3500.0));
    assert_eq!(order["subtotal"].as_f64(), Some(3500.0));
    assert_eq!(order["paymentMode"], "COD");
    assert_eq!(order["deliveryCharge"], "To be confirmed");
    assert_eq!(order["customer"]["email"], "noemail@siacreations.com");
    assert_eq!(order["customer"]["pincode"], "000000");

    let items = order["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["productId"], "p-clutch");
    assert!(items[0].get("color").is_none());
    assert_eq!(items[1]["productName"], "Bridal Lehenga");
    assert_eq!(items[1]["color"], "Green");
    assert_eq!(items[1]["size"], "M");

    // The cleared cart is what the next page load sees
    assert_eq!(h.shop().await.store().cart_len(), 0);
}

#[tokio::test]
async fn test_rejected_order_keeps_cart() {
    let h = Harness::start().await;
    h.mock
        .set_order_behavior(OrderBehavior::Reject("Bridal Lehenga is out of stock".to_string()));
    let mut shop = h.shop().await;
    fill_cart(&mut shop);

    let err = shop
        .checkout(&h.api, &customer(), PaymentMode::Online, CheckoutSource::Cart)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Api(ApiError::Rejected(_))));
    assert_eq!(err.user_message(), "Bridal Lehenga is out of stock");
    assert!(!err.is_server_error());
    assert_eq!(shop.store().cart_len(), 2);
    assert_eq!(h.shop().await.store().cart_len(), 2);
}

#[tokio::test]
async fn test_bad_request_surfaces_service_message() {
    let h = Harness::start().await;
    h.mock.set_order_behavior(OrderBehavior::BadRequest(
        "Bridal Lehenga is out of stock".to_string(),
    ));
    let mut shop = h.shop().await;
    fill_cart(&mut shop);

    let err = shop
        .checkout(&h.api, &customer(), PaymentMode::Cod, CheckoutSource::Cart)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Api(ApiError::Rejected(_))));
    assert_eq!(err.user_message(), "Bridal Lehenga is out of stock");
    assert!(!err.is_server_error());
    assert!(h.mock.orders().is_empty());
    assert_eq!(shop.store().cart_len(), 2);
}

#[tokio::test]
async fn test_server_error_hides_details_and_keeps_cart() {
    let h = Harness::start().await;
    h.mock.set_order_behavior(OrderBehavior::ServerError);
    let mut shop = h.shop().await;
    fill_cart(&mut shop);

    let err = shop
        .checkout(&h.api, &customer(), PaymentMode::Cod, CheckoutSource::Cart)
        .await
        .unwrap_err();

    assert!(err.is_server_error());
    assert_eq!(
        err.user_message(),
        "Failed to connect to server. Please try again or contact us directly."
    );
    assert_eq!(shop.store().cart_count(), 2);
}

#[tokio::test]
async fn test_invalid_checkout_makes_no_request() {
    let h = Harness::start().await;
    let mut shop = h.shop().await;

    let err = shop
        .checkout(&h.api, &customer(), PaymentMode::Cod, CheckoutSource::Cart)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Checkout(CheckoutError::EmptyCart)));

    fill_cart(&mut shop);
    let mut details = customer();
    details.phone = "12345".to_string();
    let err = shop
        .checkout(&h.api, &details, PaymentMode::Cod, CheckoutSource::Cart)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Checkout(CheckoutError::InvalidPhone(_))));

    assert!(h.mock.orders().is_empty());
    assert_eq!(shop.store().cart_len(), 2);
}

// =============================================================================
// Express checkout
// =============================================================================

#[tokio::test]
async fn test_express_checkout_leaves_cart_alone() {
    let h = Harness::start().await;
    let mut shop = h.shop().await;
    assert_eq!(shop.add_to_cart(&id("p-clutch")), ActionOutcome::AddedToCart);

    assert!(matches!(
        shop.buy_now(&id("p-kurti")),
        ActionOutcome::SelectionRequired(_)
    ));
    shop.choose_color("Pink");
    assert!(matches!(
        shop.confirm_selection(),
        ActionOutcome::ExpressReady(_)
    ));

    // Survives into the next page load (the checkout page)
    let mut checkout_page = h.shop().await;
    assert!(checkout_page.express_checkout().is_some());

    checkout_page
        .checkout(&h.api, &customer(), PaymentMode::Online, CheckoutSource::Express)
        .await
        .unwrap();

    let orders = h.mock.orders();
    let items = orders[0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["productId"], "p-kurti");
    assert_eq!(items[0]["color"], "Pink");
    assert_eq!(items[0]["quantity"], 1);
    assert_eq!(orders[0]["totalAmount"].as_f64(), Some(500.0));
    assert_eq!(orders[0]["paymentMode"], "Online");

    assert!(checkout_page.express_checkout().is_none());
    assert_eq!(checkout_page.store().cart_len(), 1);
    assert_eq!(checkout_page.store().cart()[0].selection.product_id.as_str(), "p-clutch");
}

#[tokio::test]
async fn test_express_checkout_without_item() {
    let h = Harness::start().await;
    let mut shop = h.shop().await;

    let err = shop
        .checkout(&h.api, &customer(), PaymentMode::Cod, CheckoutSource::Express)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Checkout(CheckoutError::NoExpressItem)));
    assert!(h.mock.orders().is_empty());
}
