use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

/// Response cache hit ratio
pub struct CacheMetrics;

impl CacheMetrics {
    pub fn record_hit() {
        ::metrics::counter!(phase_metric!(counter, "cache", "hits")).increment(1);
    }

    pub fn record_miss() {
        ::metrics::counter!(phase_metric!(counter, "cache", "misses")).increment(1);
    }
}

impl PhaseMetrics for CacheMetrics {
    fn register_metrics() {
        let _ = metrics::counter!(phase_metric!(counter, "cache", "hits"));
        let _ = metrics::counter!(phase_metric!(counter, "cache", "misses"));
    }

    fn phase_name() -> &'static str {
        "cache"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "cache", "hits"),
                metric_type: MetricType::Counter,
                help: "CMS reads answered from the response cache",
            },
            MetricDoc {
                name: phase_metric!(counter, "cache", "misses"),
                metric_type: MetricType::Counter,
                help: "CMS reads that went to the content store",
            },
        ]
    }
}
