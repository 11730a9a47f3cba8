//! CMS access metrics: query latency, failures and writes.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct CmsMetrics;

impl CmsMetrics {
    pub fn record_query_success(doc_type: &str, duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "cms", "queries_success"), "doc_type" => doc_type.to_string())
            .increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "cms", "query_duration_seconds")).record(duration_secs);
    }

    pub fn record_query_error(doc_type: &str) {
        ::metrics::counter!(phase_metric!(counter, "cms", "queries_error"), "doc_type" => doc_type.to_string())
            .increment(1);
    }

    pub fn record_mutation(success: bool) {
        if success {
            ::metrics::counter!(phase_metric!(counter, "cms", "mutations_success")).increment(1);
        } else {
            ::metrics::counter!(phase_metric!(counter, "cms", "mutations_error")).increment(1);
        }
    }

    /// A page or route served constant content because a fetch failed
    pub fn record_fallback(content: &'static str) {
        ::metrics::counter!(phase_metric!(counter, "cms", "fallbacks"), "content" => content).increment(1);
    }
}

impl PhaseMetrics for CmsMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};
        let _ = counter!(phase_metric!(counter, "cms", "queries_success"));
        let _ = counter!(phase_metric!(counter, "cms", "queries_error"));
        let _ = counter!(phase_metric!(counter, "cms", "mutations_success"));
        let _ = counter!(phase_metric!(counter, "cms", "mutations_error"));
        let _ = counter!(phase_metric!(counter, "cms", "fallbacks"));
        let _ = histogram!(phase_metric!(histogram, "cms", "query_duration_seconds"));
    }

    fn phase_name() -> &'static str {
        "cms"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "cms", "queries_success"),
                metric_type: MetricType::Counter,
                help: "CMS read queries that returned a result",
            },
            MetricDoc {
                name: phase_metric!(counter, "cms", "queries_error"),
                metric_type: MetricType::Counter,
                help: "CMS read queries that failed (transport or non-2xx)",
            },
            MetricDoc {
                name: phase_metric!(counter, "cms", "mutations_success"),
                metric_type: MetricType::Counter,
                help: "Committed CMS mutation batches",
            },
            MetricDoc {
                name: phase_metric!(counter, "cms", "mutations_error"),
                metric_type: MetricType::Counter,
                help: "Rejected CMS mutation batches",
            },
            MetricDoc {
                name: phase_metric!(counter, "cms", "fallbacks"),
                metric_type: MetricType::Counter,
                help: "Responses served with constant fallback content",
            },
            MetricDoc {
                name: phase_metric!(histogram, "cms", "query_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Latency of successful CMS queries",
            },
        ]
    }
}
