//! Integration tests for the Sia Creations storefront.
//!
//! The tests drive `sia-storefront` end to end against [`MockApi`], an
//! in-process axum server speaking the storefront REST API, with real
//! file-backed storage in a temporary directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sia-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Catalog loading, category resolution, caching
//! - `checkout` - Cart and express checkout against the orders endpoint
//! - `persistence` - Rehydrating the cart and wishlist across restarts
//! - `stock` - Admin stock updates

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use sia_storefront::config::ApiConfig;
use tokio::task::JoinHandle;
use url::Url;

/// How the mock answers `POST /orders`.
#[derive(Debug, Clone, Default)]
pub enum OrderBehavior {
    /// `success: true` with a receipt.
    #[default]
    Accept,
    /// `success: false` with this message.
    Reject(String),
    /// HTTP 400 with `success: false` and this message.
    BadRequest(String),
    /// HTTP 500.
    ServerError,
}

/// Data served by the mock.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    pub products: Vec<Value>,
    pub categories: Vec<Value>,
    pub slides: Vec<Value>,
}

impl Fixture {
    /// A small catalog covering every shape the API sends.
    ///
    /// - `p-lehenga`: colors and sizes, `Red|S` sold out, populated category
    /// - `p-clutch`: no variants, category given by id
    /// - `p-kurti`: colors only, no category
    /// - `p-saree`: whole product out of stock
    #[must_use]
    pub fn sample() -> Self {
        Self {
            products: vec![
                json!({
                    "_id": "p-lehenga",
                    "name": "Bridal Lehenga",
                    "price": 2500,
                    "mrp": 3200,
                    "category": { "_id": "cat-1", "name": "Lehengas" },
                    "images": ["https://cdn.example.com/lehenga.jpg"],
                    "colors": ["Red", "Green"],
                    "sizes": ["S", "M"],
                    "outOfStockVariants": ["Red|S"],
                    "isNewArrival": true
                }),
                json!({
                    "_id": "p-clutch",
                    "name": "Zari Clutch",
                    "price": 1000,
                    "category": "cat-2"
                }),
                json!({
                    "_id": "p-kurti",
                    "name": "Cotton Kurti",
                    "price": 500,
                    "category": null,
                    "colors": ["Pink", "Blue"]
                }),
                json!({
                    "_id": "p-saree",
                    "name": "Banarasi Saree",
                    "price": 3000,
                    "category": "cat-1",
                    "outOfStock": true,
                    "isNewArrival": true
                }),
            ],
            categories: vec![
                json!({
                    "_id": "cat-1",
                    "name": "Lehengas",
                    "showOnMainPage": true,
                    "displayOrder": 2
                }),
                json!({ "_id": "cat-2", "name": "Accessories", "displayOrder": 1 }),
            ],
            slides: vec![
                json!({
                    "_id": "s-2",
                    "title": "Festive Edit",
                    "imageUrl": "https://cdn.example.com/s2.jpg",
                    "order": 2
                }),
                json!({
                    "_id": "s-1",
                    "title": "New Season",
                    "imageUrl": "https://cdn.example.com/s1.jpg",
                    "order": 1
                }),
            ],
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    fixture: Fixture,
    order_behavior: OrderBehavior,
    fail_products: bool,
    fail_categories: bool,
    product_requests: usize,
    orders: Vec<Value>,
    stock_updates: Vec<(String, Value)>,
}

type Shared = Arc<Mutex<MockState>>;

/// In-process storefront API.
///
/// The server stops when the value is dropped.
pub struct MockApi {
    base_url: Url,
    state: Shared,
    server: JoinHandle<()>,
}

impl MockApi {
    /// Serve `fixture` on an ephemeral local port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener can't be bound.
    pub async fn start(fixture: Fixture) -> std::io::Result<Self> {
        let state: Shared = Arc::new(Mutex::new(MockState {
            fixture,
            ..MockState::default()
        }));

        let app = Router::new()
            .route("/api/products", get(list_products))
            .route("/api/products/{id}", put(update_product))
            .route("/api/categories", get(list_categories))
            .route("/api/carousel", get(list_slides))
            .route("/api/orders", post(create_order))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = Url::parse(&format!("http://{addr}/api/")).map_err(std::io::Error::other)?;
        // Runs until aborted on drop
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url,
            state,
            server,
        })
    }

    /// Client settings pointing at this server.
    #[must_use]
    pub fn config(&self) -> ApiConfig {
        ApiConfig::new(self.base_url.clone())
    }

    pub fn set_order_behavior(&self, behavior: OrderBehavior) {
        self.lock().order_behavior = behavior;
    }

    pub fn fail_products(&self, fail: bool) {
        self.lock().fail_products = fail;
    }

    pub fn fail_categories(&self, fail: bool) {
        self.lock().fail_categories = fail;
    }

    /// Number of `GET /products` requests served.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.lock().product_requests
    }

    /// Order bodies received, in arrival order.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        self.lock().orders.clone()
    }

    /// `(product id, body)` of each stock update received.
    #[must_use]
    pub fn stock_updates(&self) -> Vec<(String, Value)> {
        self.lock().stock_updates.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        lock(&self.state)
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn server_error(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "message": message })),
    )
}

async fn list_products(State(state): State<Shared>) -> (StatusCode, Json<Value>) {
    let mut state = lock(&state);
    state.product_requests += 1;
    if state.fail_products {
        return server_error("Database unavailable");
    }
    (
        StatusCode::OK,
        Json(json!({ "success": true, "products": state.fixture.products })),
    )
}

async fn list_categories(State(state): State<Shared>) -> (StatusCode, Json<Value>) {
    let state = lock(&state);
    if state.fail_categories {
        return server_error("Database unavailable");
    }
    (
        StatusCode::OK,
        Json(json!({ "success": true, "categories": state.fixture.categories })),
    )
}

async fn list_slides(State(state): State<Shared>) -> Json<Value> {
    let state = lock(&state);
    Json(json!({ "success": true, "slides": state.fixture.slides }))
}

async fn create_order(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = lock(&state);
    match state.order_behavior.clone() {
        OrderBehavior::Accept => {
            state.orders.push(body);
            let number = state.orders.len();
            (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "order": {
                        "_id": format!("ord-{number}"),
                        "orderNumber": format!("SIA-{number:04}")
                    }
                })),
            )
        }
        OrderBehavior::Reject(message) => (
            StatusCode::OK,
            Json(json!({ "success": false, "message": message })),
        ),
        OrderBehavior::BadRequest(message) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": message })),
        ),
        OrderBehavior::ServerError => server_error("MongoServerError: connection reset"),
    }
}

async fn update_product(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = lock(&state);
    state.stock_updates.push((id.clone(), body.clone()));

    let Some(product) = state
        .fixture
        .products
        .iter_mut()
        .find(|p| p["_id"].as_str() == Some(id.as_str()))
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Product not found" })),
        );
    };

    if let Some(fields) = body.as_object() {
        for (key, value) in fields {
            product[key] = value.clone();
        }
    }
    let product = product.clone();
    (StatusCode::OK, Json(json!({ "success": true, "product": product })))
}
