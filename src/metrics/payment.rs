//! Payment metrics.
//!
//! Fabricated orders and shortcut verifications are counted separately so a
//! dashboard can tell real gateway traffic from fallback traffic.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct PaymentMetrics;

impl PaymentMetrics {
    pub fn record_order_created(duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "payment", "orders_created")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "payment", "gateway_duration_seconds")).record(duration_secs);
    }

    pub fn record_gateway_error() {
        ::metrics::counter!(phase_metric!(counter, "payment", "gateway_errors")).increment(1);
    }

    pub fn record_synthetic_order(kind: &'static str) {
        ::metrics::counter!(phase_metric!(counter, "payment", "synthetic_orders"), "kind" => kind).increment(1);
    }

    pub fn record_verification(outcome: &'static str) {
        ::metrics::counter!(phase_metric!(counter, "payment", "verifications"), "outcome" => outcome).increment(1);
    }
}

impl PhaseMetrics for PaymentMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};
        let _ = counter!(phase_metric!(counter, "payment", "orders_created"));
        let _ = counter!(phase_metric!(counter, "payment", "gateway_errors"));
        let _ = counter!(phase_metric!(counter, "payment", "synthetic_orders"));
        let _ = counter!(phase_metric!(counter, "payment", "verifications"));
        let _ = histogram!(phase_metric!(histogram, "payment", "gateway_duration_seconds"));
    }

    fn phase_name() -> &'static str {
        "payment"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "payment", "orders_created"),
                metric_type: MetricType::Counter,
                help: "Orders created by the payment gateway",
            },
            MetricDoc {
                name: phase_metric!(counter, "payment", "gateway_errors"),
                metric_type: MetricType::Counter,
                help: "Failed order-creation calls to the gateway",
            },
            MetricDoc {
                name: phase_metric!(counter, "payment", "synthetic_orders"),
                metric_type: MetricType::Counter,
                help: "Orders fabricated locally (mock or fallback)",
            },
            MetricDoc {
                name: phase_metric!(counter, "payment", "verifications"),
                metric_type: MetricType::Counter,
                help: "Payment verifications by outcome",
            },
            MetricDoc {
                name: phase_metric!(histogram, "payment", "gateway_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Latency of successful order-creation calls",
            },
        ]
    }
}
