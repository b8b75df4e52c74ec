use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::{notify::Notifier, orders::OrderService, products::ProductService};

pub mod orders;
pub mod products;

/// Shared state for every handler: the two resource services plus the
/// order-notification sink.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub orders: OrderService,
    pub notifier: Arc<dyn Notifier>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let product_routes = Router::new()
        .route("/products", get(products::list).post(products::create))
        .route("/products/batch", post(products::create_batch))
        .route(
            "/products/:product_id",
            get(products::get).patch(products::patch).delete(products::delete),
        );

    let order_routes = Router::new()
        .route("/orders", get(orders::list).post(orders::create))
        .route("/orders/:order_id", get(orders::get).patch(orders::patch));

    Router::new()
        .route("/health", get(health))
        .merge(product_routes)
        .merge(order_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
