//! # Routes
//!
//! Axum router configuration for the parkpay API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health, /api/health - Health check
/// - GET  /products - List parking passes
/// - GET  /products/{id} - Get parking pass by ID
/// - POST /create-checkout-session - Hosted checkout for a catalog pass
/// - GET  /verify-session/{session_id} - Verify a checkout by order status
/// - POST /api/create-razorpay-order - Create a gateway order
/// - POST /api/verify-razorpay-payment - Verify a completed payment
/// - POST /webhook - Razorpay webhook handler (raw body)
pub fn create_router(state: AppState) -> Router {
    // Restrict CORS to the configured front-end origin in production;
    // stay permissive in development.
    let cors = match (
        state.config.is_production(),
        state.config.allowed_origin.as_deref(),
    ) {
        (true, Some(origin)) => match origin.parse::<HeaderValue>() {
            Ok(value) => CorsLayer::new()
                .allow_origin(value)
                .allow_methods(Any)
                .allow_headers(Any),
            Err(_) => {
                tracing::warn!("Invalid ALLOWED_ORIGIN {origin:?}, CORS left permissive");
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        },
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        .route("/api/health", get(handlers::health))
        // Catalog
        .route("/products", get(handlers::list_products))
        .route("/products/{product_id}", get(handlers::get_product))
        // Checkout-session flow (catalog products)
        .route(
            "/create-checkout-session",
            post(handlers::create_checkout_session),
        )
        .route(
            "/verify-session/{session_id}",
            get(handlers::verify_session),
        )
        // Direct order flow (spot reservations)
        .route(
            "/api/create-razorpay-order",
            post(handlers::create_order),
        )
        .route(
            "/api/verify-razorpay-payment",
            post(handlers::verify_payment),
        )
        // Webhook (raw body, no CORS concerns for gateway-initiated calls)
        .route("/webhook", post(handlers::razorpay_webhook))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
