use crate::cms::{CachedSource, CmsClient, ContentSource, InMemorySource};
use crate::config::{Config, FeatureFlags};
use crate::error::Result;
use crate::payment::{self, OrderService, Verifier};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<dyn ContentSource>,
    pub orders: Arc<OrderService>,
    pub verifier: Arc<Verifier>,
    pub features: FeatureFlags,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(content: Arc<dyn ContentSource>, orders: OrderService, verifier: Verifier, features: FeatureFlags) -> Self {
        Self {
            content,
            orders: Arc::new(orders),
            verifier: Arc::new(verifier),
            features,
            static_dir: PathBuf::from("static"),
        }
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let content = content_source(config)?;
        let (orders, verifier) = payment::from_config(&config.payment)?;
        Ok(Self::new(content, orders, verifier, config.features.clone()).with_static_dir(&config.server.static_dir))
    }
}

/// Live CMS client, or an ndjson export when one is configured, behind the
/// response cache when enabled.
pub fn content_source(config: &Config) -> Result<Arc<dyn ContentSource>> {
    let base: Arc<dyn ContentSource> = match &config.cms.export_path {
        Some(path) => {
            info!(path = %path, "serving content from dataset export");
            Arc::new(InMemorySource::from_ndjson(path)?)
        }
        None => {
            info!(project = %config.cms.project_id, dataset = %config.cms.dataset, cdn = config.cms.use_cdn, "using CMS API");
            Arc::new(CmsClient::new(&config.cms)?)
        }
    };
    if config.cache.enabled {
        Ok(Arc::new(CachedSource::from_config(base, &config.cache)))
    } else {
        Ok(base)
    }
}
