//! # park-api
//!
//! HTTP API layer for parkpay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for orders, checkout sessions, and the catalog
//! - Webhook handler for gateway payment events
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/products` | List parking passes |
//! | GET | `/products/{id}` | Get parking pass |
//! | POST | `/create-checkout-session` | Hosted checkout for a pass |
//! | GET | `/verify-session/{id}` | Verify checkout by order status |
//! | POST | `/api/create-razorpay-order` | Create a gateway order |
//! | POST | `/api/verify-razorpay-payment` | Verify a completed payment |
//! | POST | `/webhook` | Razorpay webhook |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
