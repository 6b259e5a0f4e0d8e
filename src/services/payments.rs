//! Payment order gateway client.
//!
//! A stateless proxy: one authenticated POST to the gateway's
//! order-creation endpoint, response returned verbatim. No retries, no
//! idempotency keys, no persisted order state; the gateway is the
//! source of truth.

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Amount is required")]
    MissingAmount,
    #[error("Payment gateway is not configured on the server")]
    NotConfigured,
    #[error("{0}")]
    Rejected(String),
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Minor currency units (paise for INR).
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub receipt: Option<String>,
    pub notes: Option<serde_json::Value>,
}

impl CreateOrderRequest {
    pub fn validate_amount(&self) -> Result<i64, GatewayError> {
        match self.amount {
            Some(amount) if amount > 0 => Ok(amount),
            _ => Err(GatewayError::MissingAmount),
        }
    }
}

pub struct OrderGateway {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl OrderGateway {
    pub fn new(base_url: &str, key_id: &str, key_secret: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            key_id: key_id.to_string(),
            key_secret: key_secret.to_string(),
        }
    }

    /// Create an order at the gateway and return its JSON verbatim.
    pub async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<serde_json::Value, GatewayError> {
        let amount = req.validate_amount()?;

        let body = json!({
            "amount": amount,
            "currency": req.currency.as_deref().unwrap_or("INR"),
            "receipt": req.receipt,
            "notes": req.notes,
        });

        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload: serde_json::Value = response.json().await?;

        if status.is_success() {
            Ok(payload)
        } else {
            let message = payload
                .pointer("/error/description")
                .and_then(|v| v.as_str())
                .unwrap_or("Order creation rejected by the payment gateway")
                .to_string();
            tracing::warn!("Gateway rejected order ({}): {}", status, message);
            Err(GatewayError::Rejected(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(amount: Option<i64>) -> CreateOrderRequest {
        CreateOrderRequest {
            amount,
            currency: None,
            receipt: None,
            notes: None,
        }
    }

    #[test]
    fn test_amount_is_required() {
        assert!(matches!(
            order(None).validate_amount(),
            Err(GatewayError::MissingAmount)
        ));
        assert!(matches!(
            order(Some(0)).validate_amount(),
            Err(GatewayError::MissingAmount)
        ));
        assert!(matches!(
            order(Some(-500)).validate_amount(),
            Err(GatewayError::MissingAmount)
        ));
        assert_eq!(order(Some(49900)).validate_amount().unwrap(), 49900);
    }

    #[test]
    fn test_error_messages_are_stable() {
        assert_eq!(GatewayError::MissingAmount.to_string(), "Amount is required");
        assert_eq!(
            GatewayError::NotConfigured.to_string(),
            "Payment gateway is not configured on the server"
        );
    }
}
