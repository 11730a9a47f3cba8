//! Access to the hosted content store.
//!
//! Everything that reads or writes documents goes through [`ContentSource`];
//! the HTTP client, the in-memory source and the response cache all
//! implement it.

pub mod cache;
pub mod client;
pub mod memory;
pub mod query;

pub use cache::CachedSource;
pub use client::CmsClient;
pub use memory::InMemorySource;
pub use query::{Direction, Filter, Query, Slice};

use crate::constants::SITE_SETTINGS_TYPE;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One write operation, serialized in the CMS mutation format
/// (`{"createOrReplace": {...}}`, `{"patch": {"id": ..., "set": {...}}}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutation {
    Create(Value),
    CreateOrReplace(Value),
    CreateIfNotExists(Value),
    Patch(Patch),
    Delete { id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patch {
    pub id: String,
    pub set: Map<String, Value>,
}

impl Patch {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), set: Map::new() }
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.insert(field.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub results: Vec<MutationResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MutationResult {
    pub id: String,
    #[serde(default)]
    pub operation: String,
}

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Run a read query; yields the raw `result` value (array, object or null).
    async fn fetch(&self, query: &Query) -> Result<Value>;

    async fn mutate(&self, mutations: Vec<Mutation>) -> Result<MutationOutcome>;

    /// Cheapest possible round trip, used by health checks
    async fn ping(&self) -> Result<()> {
        self.fetch(&Query::new(SITE_SETTINGS_TYPE).project(["_id"]).first().fresh())
            .await
            .map(|_| ())
    }
}
