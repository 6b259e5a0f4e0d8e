use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

use crate::metrics;
use crate::services::payments::{CreateOrderRequest, GatewayError};
use crate::AppState;

/// Proxy an order-creation call to the payment gateway. The gateway's
/// JSON is returned verbatim on success; every failure normalizes to
/// `{error}` with HTTP 400, the only structured external contract in
/// the system.
/// POST /payments/orders
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    // Validate the amount before touching the gateway at all.
    if let Err(e) = req.validate_amount() {
        metrics::record_payment_order("invalid");
        return Err((StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))));
    }

    let gateway = state.gateway.as_ref().ok_or_else(|| {
        metrics::record_payment_order("unconfigured");
        tracing::error!("Order request received but gateway credentials are not configured");
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": GatewayError::NotConfigured.to_string() })),
        )
    })?;

    match gateway.create_order(&req).await {
        Ok(order) => {
            metrics::record_payment_order("created");
            Ok(Json(order))
        }
        Err(e) => {
            metrics::record_payment_order("rejected");
            tracing::warn!("Order creation failed: {}", e);
            let message = match e {
                GatewayError::Transport(_) => {
                    "Order creation failed: gateway unreachable".to_string()
                }
                other => other.to_string(),
            };
            Err((StatusCode::BAD_REQUEST, Json(json!({ "error": message }))))
        }
    }
}
