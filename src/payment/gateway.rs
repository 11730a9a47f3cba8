use crate::config::PaymentConfig;
use crate::error::{Result, SiteError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Order as issued by the gateway (or fabricated locally in the same shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default = "order_entity")]
    pub entity: String,
    /// Minor currency units (paise, cents)
    pub amount: u64,
    #[serde(default)]
    pub amount_paid: u64,
    #[serde(default)]
    pub amount_due: u64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub notes: Value,
    pub created_at: i64,
}

fn order_entity() -> String {
    "order".to_string()
}

/// Validated order parameters, amount already in minor units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
    pub notes: Map<String, Value>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, order: &NewOrder) -> Result<Order>;

    /// Public key id handed to the checkout widget
    fn key_id(&self) -> &str;
}

#[derive(Deserialize)]
struct GatewayErrorBody {
    error: GatewayErrorDetail,
}

#[derive(Deserialize)]
struct GatewayErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

/// Hosted gateway REST client (orders API, HTTP basic auth).
pub struct RazorpayGateway {
    http: reqwest::Client,
    api_base: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayGateway {
    pub fn new(config: &PaymentConfig) -> Result<Self> {
        let (Some(key_id), Some(key_secret)) = (&config.key_id, &config.key_secret) else {
            return Err(SiteError::Config("payment gateway key id/secret are not configured".to_string()));
        };
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            key_id: key_id.clone(),
            key_secret: key_secret.clone(),
        })
    }

    pub fn orders_url(&self) -> String {
        format!("{}/v1/orders", self.api_base)
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, order: &NewOrder) -> Result<Order> {
        debug!(amount = order.amount, currency = %order.currency, receipt = %order.receipt, "creating gateway order");
        let response = self
            .http
            .post(self.orders_url())
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(order)
            .send()
            .await
            .map_err(|e| SiteError::gateway(format!("order request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<GatewayErrorBody>(&body) {
                Ok(b) => format!("{} ({}): {}", status.as_u16(), b.error.code, b.error.description),
                Err(_) => format!("{}: {}", status.as_u16(), body.chars().take(200).collect::<String>()),
            };
            warn!(%message, "gateway rejected order");
            return Err(SiteError::gateway(message));
        }

        response
            .json::<Order>()
            .await
            .map_err(|e| SiteError::gateway(format!("unreadable order response: {e}")))
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gateway_requires_both_keys() {
        let mut config = PaymentConfig::default();
        assert!(RazorpayGateway::new(&config).is_err());
        config.key_id = Some("rzp_test_1".into());
        config.key_secret = Some("secret".into());
        config.api_base = "https://gateway.example/".into();
        let gateway = RazorpayGateway::new(&config).unwrap();
        assert_eq!(gateway.orders_url(), "https://gateway.example/v1/orders");
        assert_eq!(gateway.key_id(), "rzp_test_1");
    }

    #[test]
    fn order_response_shape_is_read() {
        let order: Order = serde_json::from_value(json!({
            "id": "order_EKwxwAgItmmXdp",
            "entity": "order",
            "amount": 50000,
            "amount_paid": 0,
            "amount_due": 50000,
            "currency": "INR",
            "receipt": "receipt#1",
            "offer_id": null,
            "status": "created",
            "attempts": 0,
            "notes": [],
            "created_at": 1582628071
        }))
        .unwrap();
        assert_eq!(order.amount_due, 50000);
        assert_eq!(order.status, "created");
    }

    #[test]
    fn new_order_serializes_for_the_orders_api() {
        let body = serde_json::to_value(NewOrder {
            amount: 150000,
            currency: "INR".into(),
            receipt: "rcpt_1".into(),
            notes: Map::new(),
        })
        .unwrap();
        assert_eq!(body, json!({"amount": 150000, "currency": "INR", "receipt": "rcpt_1", "notes": {}}));
    }
}
