use super::gateway::{NewOrder, Order, PaymentGateway};
use crate::config::FallbackPolicy;
use crate::constants::{FALLBACK_ORDER_PREFIX, MAX_RECEIPT_LEN, MOCK_ORDER_PREFIX, SUPPORTED_CURRENCIES};
use crate::error::{Result, SiteError};
use crate::metrics::PaymentMetrics;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

const MAX_NOTES: usize = 15;
const MAX_NOTE_LEN: usize = 256;

/// Body of the create-order route
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    /// Major currency units, e.g. rupees
    pub amount: f64,
    pub currency: Option<String>,
    pub receipt: Option<String>,
    #[serde(default)]
    pub notes: Option<Map<String, Value>>,
}

impl OrderRequest {
    pub fn validate(&self) -> Result<NewOrder> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(SiteError::Validation("amount must be a positive number".to_string()));
        }
        let minor = (self.amount * 100.0).round();
        if minor < 1.0 || minor > u32::MAX as f64 {
            return Err(SiteError::Validation("amount is out of range".to_string()));
        }

        let currency = self.currency.as_deref().unwrap_or("INR").trim().to_ascii_uppercase();
        if !SUPPORTED_CURRENCIES.contains(&currency.as_str()) {
            return Err(SiteError::Validation(format!(
                "unsupported currency '{currency}' (expected one of {})",
                SUPPORTED_CURRENCIES.join(", ")
            )));
        }

        let receipt = match self.receipt.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => format!("rcpt_{}", &Uuid::new_v4().simple().to_string()[..12]),
        };
        if receipt.chars().count() > MAX_RECEIPT_LEN {
            return Err(SiteError::Validation(format!("receipt must be at most {MAX_RECEIPT_LEN} characters")));
        }

        let notes = self.notes.clone().unwrap_or_default();
        if notes.len() > MAX_NOTES {
            return Err(SiteError::Validation(format!("at most {MAX_NOTES} notes are allowed")));
        }
        let notes = notes
            .into_iter()
            .map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, Value::String(text.chars().take(MAX_NOTE_LEN).collect()))
            })
            .collect();

        Ok(NewOrder { amount: minor as u64, currency, receipt, notes })
    }
}

/// Where an order came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderMode {
    Gateway,
    /// Gateway call failed, order fabricated
    Fallback,
    /// No gateway configured, order fabricated
    Mock,
}

#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub order: Order,
    pub mode: OrderMode,
    pub key_id: Option<String>,
}

/// Creates orders through the gateway under one explicit fallback policy.
pub struct OrderService {
    gateway: Option<Arc<dyn PaymentGateway>>,
    policy: FallbackPolicy,
}

impl OrderService {
    pub fn new(gateway: Option<Arc<dyn PaymentGateway>>, policy: FallbackPolicy) -> Self {
        Self { gateway, policy }
    }

    pub fn has_gateway(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub async fn create(&self, request: &OrderRequest) -> Result<CreatedOrder> {
        let new_order = request.validate()?;

        let Some(gateway) = &self.gateway else {
            return match self.policy {
                FallbackPolicy::MockOrder => {
                    PaymentMetrics::record_synthetic_order("mock");
                    info!(receipt = %new_order.receipt, "no payment gateway configured; issuing mock order");
                    Ok(CreatedOrder {
                        order: synthetic_order(MOCK_ORDER_PREFIX, &new_order),
                        mode: OrderMode::Mock,
                        key_id: None,
                    })
                }
                FallbackPolicy::Disabled => Err(SiteError::Config("payment gateway is not configured".to_string())),
            };
        };

        let started = Instant::now();
        match gateway.create_order(&new_order).await {
            Ok(order) => {
                PaymentMetrics::record_order_created(started.elapsed().as_secs_f64());
                info!(order = %order.id, amount = order.amount, currency = %order.currency, "gateway order created");
                Ok(CreatedOrder { order, mode: OrderMode::Gateway, key_id: Some(gateway.key_id().to_string()) })
            }
            Err(e) => {
                PaymentMetrics::record_gateway_error();
                match self.policy {
                    FallbackPolicy::MockOrder => {
                        PaymentMetrics::record_synthetic_order("fallback");
                        warn!(error = %e, receipt = %new_order.receipt, "gateway order failed; issuing fallback order");
                        Ok(CreatedOrder {
                            order: synthetic_order(FALLBACK_ORDER_PREFIX, &new_order),
                            mode: OrderMode::Fallback,
                            key_id: Some(gateway.key_id().to_string()),
                        })
                    }
                    FallbackPolicy::Disabled => Err(e),
                }
            }
        }
    }
}

fn synthetic_order(prefix: &str, new_order: &NewOrder) -> Order {
    Order {
        id: format!("{prefix}{}", Uuid::new_v4().simple()),
        entity: "order".to_string(),
        amount: new_order.amount,
        amount_paid: 0,
        amount_due: new_order.amount,
        currency: new_order.currency.clone(),
        receipt: Some(new_order.receipt.clone()),
        status: "created".to_string(),
        attempts: 0,
        notes: Value::Object(new_order.notes.clone()),
        created_at: Utc::now().timestamp(),
    }
}
