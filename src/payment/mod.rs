//! Checkout: gateway orders with an explicit fallback policy, and signature
//! verification of the browser's checkout result.

pub mod gateway;
pub mod orders;
pub mod signature;
pub mod verify;

pub use gateway::{NewOrder, Order, PaymentGateway, RazorpayGateway};
pub use orders::{CreatedOrder, OrderMode, OrderRequest, OrderService};
pub use signature::{expected_signature, invoice_number, signature_matches};
pub use verify::{PaymentProof, Verification, Verifier};

use crate::config::PaymentConfig;
use crate::error::Result;
use std::sync::Arc;
use tracing::info;

/// Build the order service and verifier from configuration. Without
/// credentials there is no gateway and the fallback policy decides.
pub fn from_config(config: &PaymentConfig) -> Result<(OrderService, Verifier)> {
    let gateway: Option<Arc<dyn PaymentGateway>> = if config.has_credentials() {
        Some(Arc::new(RazorpayGateway::new(config)?))
    } else {
        info!(fallback = ?config.fallback, "payment gateway credentials not set");
        None
    };
    Ok((OrderService::new(gateway, config.fallback), Verifier::from_config(config)))
}
