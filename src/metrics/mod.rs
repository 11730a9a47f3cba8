//! Prometheus metrics for the site.
//!
//! Each area (CMS access, response cache, payments) owns a small metrics
//! struct with recording helpers and a [`PhaseMetrics`] impl that registers
//! and documents its series. The recorder is installed once per process and
//! rendered by the `/metrics` route.

pub mod cache;
pub mod cms;
pub mod payment;
pub mod registry;

pub use cache::CacheMetrics;
pub use cms::CmsMetrics;
pub use payment::PaymentMetrics;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::{Once, OnceLock};
use tracing::{info, warn};

static INIT: Once = Once::new();
static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder and register every metric. Idempotent.
pub fn init_metrics() {
    INIT.call_once(|| match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if HANDLE.set(handle).is_err() {
                warn!("metrics handle was already stored");
            }
            registry::register_all_metrics();
            info!("Prometheus recorder installed");
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
        }
    });
}

/// Text exposition of the current metric values; `None` before [`init_metrics`].
pub fn render() -> Option<String> {
    HANDLE.get().map(PrometheusHandle::render)
}

/// Implemented by each area's metrics struct
pub trait PhaseMetrics {
    /// Pre-register series so they appear in `/metrics` before first use
    fn register_metrics();

    fn phase_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
}

/// Metric names follow `site_{phase}_{name}` with `_total` on counters.
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("site_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("site_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;
