//! # Request Handlers
//!
//! Axum request handlers for the parkpay API: request validation, one
//! gateway call per request, and response shaping. All errors convert to
//! an HTTP response here; nothing propagates past the handler boundary.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use park_core::{
    validate, Currency, OrderRequest, PaymentConfirmation, PaymentError, Product,
};
use park_razorpay::{dispatch_webhook_event, LoggingWebhookHandler};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create order request (all fields validated by hand so missing fields
/// yield a 400 naming the field, not a deserialization failure)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub spot_name: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

/// Create order response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// Gateway-assigned order id
    pub order_id: String,
    /// Amount in paise
    pub amount: i64,
    /// Currency code
    pub currency: Currency,
}

/// Checkout session request for a catalog product
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub vehicle_data: Option<VehicleData>,
    #[serde(default)]
    pub success_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleData {
    #[serde(default)]
    pub plate_number: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub vehicle_model: Option<String>,
}

/// Checkout session response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionResponse {
    pub session_id: String,
    pub url: String,
    pub product_info: ProductView,
}

/// Payment verification request. Razorpay field names are kept as the
/// client SDK emits them.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
    #[serde(default, rename = "bookingData")]
    pub booking_data: Option<serde_json::Value>,
    #[serde(default, rename = "spotId")]
    pub spot_id: Option<String>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
}

/// Payment verification response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub payment_id: String,
    pub order_id: String,
    pub booking_data: serde_json::Value,
}

/// A catalog product shaped for the front-end, price pre-formatted
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Formatted price string (e.g., "₹300.00")
    pub price: String,
    /// Amount in paise
    pub amount: i64,
    pub currency: Currency,
    pub duration_hours: u32,
}

impl ProductView {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            amount: product.price.amount,
            currency: product.price.currency,
            duration_hours: product.duration_hours,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Convert a `PaymentError` into an HTTP response.
///
/// The raw provider detail is logged for operators; it reaches the body
/// only outside production. Auth failures always get the fixed user-safe
/// message.
fn payment_error_response(err: PaymentError, production: bool) -> HandlerError {
    let code = err.status_code();
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if code >= 500 {
        error!("Payment operation failed: {} (detail: {:?})", err, err.detail());
    } else {
        warn!("Payment operation rejected: {}", err);
    }

    let body = match &err {
        PaymentError::GatewayRejected { message } => {
            ErrorResponse::new("Payment gateway rejected the request").with_message(message.clone())
        }
        PaymentError::GatewayAuth => ErrorResponse::new("Payment processing failed")
            .with_message("Payment gateway authentication failed"),
        PaymentError::GatewayUnavailable { message } => {
            let response = ErrorResponse::new("Payment gateway temporarily unavailable");
            if production {
                response.with_message("Please try again later")
            } else {
                response.with_message(message.clone())
            }
        }
        PaymentError::Network(detail) => {
            let response = ErrorResponse::new("Payment gateway temporarily unavailable");
            if production {
                response.with_message("Please try again later")
            } else {
                response.with_message(detail.clone())
            }
        }
        PaymentError::Internal(detail) | PaymentError::Serialization(detail) => {
            let response = ErrorResponse::new("Something went wrong");
            if production {
                response
            } else {
                response.with_message(detail.clone())
            }
        }
        // Validation, not-found, and signature errors are safe to show
        _ => ErrorResponse::new(err.to_string()),
    };

    (status, Json(body))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "parkpay",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// List catalog products with formatted prices
pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let products: Vec<ProductView> = state
        .catalog
        .active_products()
        .map(ProductView::from_product)
        .collect();

    Json(serde_json::json!({
        "products": products,
        "count": products.len(),
    }))
}

/// Get a single catalog product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductView>, HandlerError> {
    let product = state
        .catalog
        .get(&product_id)
        .filter(|p| p.active)
        .ok_or_else(|| {
            payment_error_response(
                PaymentError::ProductNotFound { product_id },
                state.config.is_production(),
            )
        })?;

    Ok(Json(ProductView::from_product(product)))
}

/// Create a gateway order for a parking spot reservation
#[instrument(skip(state, request))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, HandlerError> {
    let production = state.config.is_production();
    let fail = |e: PaymentError| payment_error_response(e, production);

    // Validate before any gateway work
    let amount = request
        .amount
        .ok_or_else(|| PaymentError::Validation("Missing required field: amount".to_string()))
        .and_then(validate::validate_amount)
        .map_err(fail)?;
    let spot_name = validate::require_field("spotName", request.spot_name.as_deref()).map_err(fail)?;
    let duration = validate::require_field("duration", request.duration.as_deref()).map_err(fail)?;

    let order_request = OrderRequest::new(amount, Currency::INR)
        .with_note("spot_name", spot_name)
        .with_note("duration", duration);

    info!(
        "Creating order: spot={}, duration={}, amount={} paise",
        spot_name,
        duration,
        order_request.amount_minor_units()
    );

    let order = state
        .gateway
        .create_order(&order_request)
        .await
        .map_err(fail)?;

    info!("Created order: {}", order.order_id);

    Ok(Json(CreateOrderResponse {
        order_id: order.order_id,
        amount: order.amount,
        currency: order.currency,
    }))
}

/// Create a hosted checkout session for a catalog product
#[instrument(skip(state, request))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(request): Json<CreateCheckoutSessionRequest>,
) -> Result<Json<CreateCheckoutSessionResponse>, HandlerError> {
    let production = state.config.is_production();
    let fail = |e: PaymentError| payment_error_response(e, production);

    let product_id = validate::require_field("productId", request.product_id.as_deref()).map_err(fail)?;

    let vehicle = request.vehicle_data.as_ref().ok_or_else(|| {
        fail(PaymentError::Validation(
            "Missing required field: vehicleData".to_string(),
        ))
    })?;
    let plate_number =
        validate::require_field("plateNumber", vehicle.plate_number.as_deref()).map_err(fail)?;
    let owner_name =
        validate::require_field("ownerName", vehicle.owner_name.as_deref()).map_err(fail)?;

    let product = state
        .catalog
        .get(product_id)
        .filter(|p| p.active)
        .ok_or_else(|| {
            fail(PaymentError::ProductNotFound {
                product_id: product_id.to_string(),
            })
        })?;

    let mut notes = HashMap::new();
    notes.insert("product_id".to_string(), product.id.clone());
    notes.insert("duration".to_string(), product.duration_display());
    notes.insert("plate_number".to_string(), plate_number.to_string());
    notes.insert("owner_name".to_string(), owner_name.to_string());
    if let Some(model) = vehicle.vehicle_model.as_deref() {
        notes.insert("vehicle_model".to_string(), model.to_string());
    }

    info!(
        "Creating checkout session: product={}, plate={}",
        product.id, plate_number
    );

    let link = state
        .gateway
        .create_checkout_link(product, &notes, request.success_url.as_deref())
        .await
        .map_err(fail)?;

    info!("Created checkout session: {}", link.link_id);

    Ok(Json(CreateCheckoutSessionResponse {
        session_id: link.link_id,
        url: link.url,
        product_info: ProductView::from_product(product),
    }))
}

/// Verify a checkout session by fetching its order from the gateway.
///
/// A non-paid status is a result, not an error: the caller gets
/// `{success: false, payment_status}` with a 200.
#[instrument(skip(state))]
pub async fn verify_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, HandlerError> {
    let production = state.config.is_production();

    let order = state
        .gateway
        .fetch_order(&session_id)
        .await
        .map_err(|e| payment_error_response(e, production))?;

    if order.status.is_paid() {
        Ok(Json(serde_json::json!({
            "success": true,
            "session": {
                "id": order.order_id,
                "payment_status": order.status.as_str(),
                "amount_total": order.amount,
                "metadata": order.notes,
            }
        })))
    } else {
        Ok(Json(serde_json::json!({
            "success": false,
            "payment_status": order.status.as_str(),
        })))
    }
}

/// Verify a completed payment: presence checks, then mandatory signature
/// verification. No gateway call is made.
#[instrument(skip(state, request))]
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, HandlerError> {
    let production = state.config.is_production();
    let fail = |e: PaymentError| payment_error_response(e, production);

    // Every field is required; reject before touching the gateway
    let order_id =
        validate::require_field("razorpay_order_id", request.razorpay_order_id.as_deref())
            .map_err(fail)?;
    let payment_id =
        validate::require_field("razorpay_payment_id", request.razorpay_payment_id.as_deref())
            .map_err(fail)?;
    let signature =
        validate::require_field("razorpay_signature", request.razorpay_signature.as_deref())
            .map_err(fail)?;
    validate::require_field("spotId", request.spot_id.as_deref()).map_err(fail)?;
    validate::require_field("userId", request.user_id.as_deref()).map_err(fail)?;

    let booking_data = request
        .booking_data
        .filter(|v| !v.is_null())
        .ok_or_else(|| {
            fail(PaymentError::Validation(
                "Missing required field: bookingData".to_string(),
            ))
        })?;

    let confirmation = PaymentConfirmation {
        order_id: order_id.to_string(),
        payment_id: payment_id.to_string(),
        signature: signature.to_string(),
    };

    state
        .gateway
        .verify_payment_signature(&confirmation)
        .map_err(fail)?;

    info!(
        "Verified payment: order={}, payment={}",
        confirmation.order_id, confirmation.payment_id
    );

    Ok(Json(VerifyPaymentResponse {
        success: true,
        payment_id: confirmation.payment_id,
        order_id: confirmation.order_id,
        booking_data,
    }))
}

/// Handle a Razorpay webhook.
///
/// The body is taken as raw bytes because the signature covers the exact
/// byte sequence; signature failures get a plaintext 400 and the event is
/// never dispatched. Once verified, the event is always acknowledged so
/// the gateway does not retry delivery.
#[instrument(skip(state, headers, body))]
pub async fn razorpay_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let signature = headers
        .get("x-razorpay-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                "Missing X-Razorpay-Signature header".to_string(),
            )
        })?;

    let event = state.gateway.verify_webhook(&body, signature).map_err(|e| {
        error!("Webhook verification failed: {}", e);
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    info!("Received webhook: type={:?}", event.event_type);

    // Dispatch only logs in this design; a handler error must not turn
    // into a non-2xx or the gateway will retry a verified event.
    if let Err(e) = dispatch_webhook_event(&LoggingWebhookHandler, &event) {
        error!("Webhook handler error: {}", e);
    }

    Ok(Json(serde_json::json!({ "received": true })))
}
