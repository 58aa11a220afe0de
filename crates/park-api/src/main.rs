//! # parkpay
//!
//! Payment backend for parking reservations.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export RAZORPAY_KEY_ID=rzp_test_...
//! export RAZORPAY_KEY_SECRET=...
//! export RAZORPAY_WEBHOOK_SECRET=...
//!
//! # Run the server
//! parkpay
//! ```

use park_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state; missing gateway credentials abort here
    let state = AppState::new()?;

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.catalog.products.len());
    info!("Payment provider: {}", state.gateway.provider_name());

    let app = routes::create_router(state);

    info!("parkpay starting on http://{}", addr);

    if !is_prod {
        info!("Health:   GET  http://{}/health", addr);
        info!("Order:    POST http://{}/api/create-razorpay-order", addr);
        info!("Webhook:  POST http://{}/webhook", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
