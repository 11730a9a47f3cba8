//! Registers every area's metrics at startup and reports name clashes.

use crate::metrics::{CacheMetrics, CmsMetrics, MetricDoc, PaymentMetrics, PhaseMetrics};
use std::collections::HashMap;
use tracing::{info, warn};

pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_phase_metrics::<CmsMetrics>(&mut all_metrics);
    register_phase_metrics::<CacheMetrics>(&mut all_metrics);
    register_phase_metrics::<PaymentMetrics>(&mut all_metrics);

    info!("Registered {} metrics", all_metrics.len());
}

fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<&'static str, (&'static str, MetricDoc)>) {
    T::register_metrics();
    let phase_name = T::phase_name();

    for doc in T::metrics_documentation() {
        if let Some((owner, _)) = all_metrics.get(doc.name) {
            warn!("Metric name conflict: '{}' is defined by both '{}' and '{}'", doc.name, owner, phase_name);
        } else {
            all_metrics.insert(doc.name, (phase_name, doc));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn metric_names_are_unique_and_prefixed() {
        let mut docs = CmsMetrics::metrics_documentation();
        docs.extend(CacheMetrics::metrics_documentation());
        docs.extend(PaymentMetrics::metrics_documentation());
        let names: HashSet<_> = docs.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), docs.len());
        assert!(docs.iter().all(|d| d.name.starts_with("site_")));
    }
}
