use super::{ContentSource, Mutation, MutationOutcome, Query};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::metrics::CacheMetrics;
use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Read-through response cache in front of another [`ContentSource`].
///
/// Entries expire after the TTL and the entry count is bounded; there is no
/// other invalidation. Writes and `fresh` queries go straight through.
pub struct CachedSource {
    inner: Arc<dyn ContentSource>,
    cache: Cache<String, Value>,
}

impl CachedSource {
    pub fn new(inner: Arc<dyn ContentSource>, ttl: Duration, max_entries: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_entries).time_to_live(ttl).build();
        Self { inner, cache }
    }

    pub fn from_config(inner: Arc<dyn ContentSource>, config: &CacheConfig) -> Self {
        Self::new(inner, Duration::from_secs(config.ttl_seconds), config.max_entries)
    }

    /// Approximate; pending maintenance may lag behind recent inserts.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl ContentSource for CachedSource {
    async fn fetch(&self, query: &Query) -> Result<Value> {
        if query.fresh {
            return self.inner.fetch(query).await;
        }
        let key = query.cache_key();
        if let Some(hit) = self.cache.get(&key).await {
            CacheMetrics::record_hit();
            trace!(key = %key, "response cache hit");
            return Ok(hit);
        }
        CacheMetrics::record_miss();
        let value = self.inner.fetch(query).await?;
        self.cache.insert(key, value.clone()).await;
        Ok(value)
    }

    async fn mutate(&self, mutations: Vec<Mutation>) -> Result<MutationOutcome> {
        self.inner.mutate(mutations).await
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::InMemorySource;
    use serde_json::json;

    fn backing() -> Arc<InMemorySource> {
        Arc::new(InMemorySource::with_documents(vec![
            json!({"_id": "t1", "_type": "testimonial", "name": "Ada", "quote": "Great", "isActive": true}),
        ]))
    }

    #[tokio::test]
    async fn repeated_reads_hit_the_cache() {
        let inner = backing();
        let cached = CachedSource::new(inner.clone(), Duration::from_secs(60), 10);
        let q = Query::new("testimonial");
        cached.fetch(&q).await.unwrap();
        cached.fetch(&q).await.unwrap();
        assert_eq!(inner.fetch_count(), 1);
    }

    #[tokio::test]
    async fn fresh_queries_bypass_the_cache() {
        let inner = backing();
        let cached = CachedSource::new(inner.clone(), Duration::from_secs(60), 10);
        let q = Query::new("testimonial").fresh();
        cached.fetch(&q).await.unwrap();
        cached.fetch(&q).await.unwrap();
        assert_eq!(inner.fetch_count(), 2);
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let inner = backing();
        let cached = CachedSource::new(inner.clone(), Duration::from_millis(50), 10);
        let q = Query::new("testimonial");
        cached.fetch(&q).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        cached.fetch(&q).await.unwrap();
        assert_eq!(inner.fetch_count(), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let inner = backing();
        let cached = CachedSource::new(inner.clone(), Duration::from_secs(60), 10);
        let q = Query::new("testimonial");
        inner.set_unavailable(true);
        assert!(cached.fetch(&q).await.is_err());
        inner.set_unavailable(false);
        assert!(cached.fetch(&q).await.is_ok());
    }

    #[tokio::test]
    async fn entry_count_is_bounded() {
        let inner = backing();
        let cached = CachedSource::new(inner.clone(), Duration::from_secs(60), 2);
        for i in 0..20 {
            let q = Query::new("testimonial").eq("name", format!("speaker-{i}"));
            cached.fetch(&q).await.unwrap();
        }
        cached.cache.run_pending_tasks().await;
        assert_eq!(inner.fetch_count(), 20);
        assert!(cached.entry_count() <= 2, "cache holds {} entries", cached.entry_count());
    }
}
