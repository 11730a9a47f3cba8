use super::signature::signature_matches;
use crate::config::PaymentConfig;
use crate::constants::is_synthetic_order_id;
use crate::metrics::PaymentMetrics;
use serde::Deserialize;
use tracing::{debug, warn};

/// Checkout result posted back by the browser
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentProof {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    #[serde(default)]
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Signature checked against the secret
    Verified,
    /// Locally fabricated order accepted without a signature
    Synthetic,
    Mismatch,
    /// No secret configured, a real order cannot be checked
    Unverifiable,
}

impl Verification {
    pub fn is_verified(self) -> bool {
        matches!(self, Verification::Verified | Verification::Synthetic)
    }

    fn label(self) -> &'static str {
        match self {
            Verification::Verified => "verified",
            Verification::Synthetic => "synthetic",
            Verification::Mismatch => "mismatch",
            Verification::Unverifiable => "unverifiable",
        }
    }
}

pub struct Verifier {
    secret: Option<String>,
    accept_synthetic: bool,
}

impl Verifier {
    pub fn new(secret: Option<String>, accept_synthetic: bool) -> Self {
        Self { secret: secret.filter(|s| !s.is_empty()), accept_synthetic }
    }

    pub fn from_config(config: &PaymentConfig) -> Self {
        Self::new(config.key_secret.clone(), config.accept_mock_orders)
    }

    pub fn verify(&self, proof: &PaymentProof) -> Verification {
        let outcome = if self.accept_synthetic && is_synthetic_order_id(&proof.razorpay_order_id) {
            debug!(order = %proof.razorpay_order_id, "accepting synthetic order without signature");
            Verification::Synthetic
        } else {
            match &self.secret {
                None => Verification::Unverifiable,
                Some(secret) => {
                    if signature_matches(
                        secret,
                        &proof.razorpay_order_id,
                        &proof.razorpay_payment_id,
                        &proof.razorpay_signature,
                    ) {
                        Verification::Verified
                    } else {
                        Verification::Mismatch
                    }
                }
            }
        };
        if !outcome.is_verified() {
            warn!(order = %proof.razorpay_order_id, outcome = outcome.label(), "payment verification failed");
        }
        PaymentMetrics::record_verification(outcome.label());
        outcome
    }
}
