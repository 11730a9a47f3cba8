//! Bulk import of content documents, validated before anything is written.

use crate::cms::{ContentSource, Mutation};
use crate::error::{Result, SiteError};
use crate::schema::SchemaRegistry;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Documents sent per mutation request
pub const DEFAULT_BATCH_SIZE: usize = 50;

#[derive(Debug, Default)]
pub struct MigrationPlan {
    pub accepted: Vec<Value>,
    pub rejected: Vec<Rejected>,
}

#[derive(Debug)]
pub struct Rejected {
    pub label: String,
    pub problems: Vec<String>,
}

/// Read a JSON array, a single JSON object, or newline-delimited JSON.
pub fn read_documents(path: impl AsRef<Path>) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    if path.extension().is_some_and(|ext| ext == "ndjson") {
        return content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(SiteError::from))
            .collect();
    }
    Ok(vec![serde_json::from_str(trimmed)?])
}

fn label(index: usize, doc: &Value) -> String {
    doc.get("_id").and_then(Value::as_str).map(str::to_string).unwrap_or_else(|| format!("#{index}"))
}

/// Split documents into those that can be written and those that cannot.
pub fn plan(registry: &SchemaRegistry, documents: Vec<Value>) -> MigrationPlan {
    let mut plan = MigrationPlan::default();
    for (index, doc) in documents.into_iter().enumerate() {
        let label = label(index, &doc);
        let mut problems = Vec::new();
        if doc.get("_id").and_then(Value::as_str).map_or(true, str::is_empty) {
            problems.push("_id is required for createOrReplace".to_string());
        }
        match registry.violations(&doc) {
            Ok(found) => problems.extend(found),
            Err(e) => problems.push(e.to_string()),
        }
        if problems.is_empty() {
            plan.accepted.push(doc);
        } else {
            plan.rejected.push(Rejected { label, problems });
        }
    }
    plan
}

/// Write accepted documents in batches; returns how many were written.
pub async fn apply(source: &dyn ContentSource, documents: &[Value], batch_size: usize) -> Result<usize> {
    let mut written = 0;
    for (n, batch) in documents.chunks(batch_size.max(1)).enumerate() {
        let mutations = batch.iter().cloned().map(Mutation::CreateOrReplace).collect();
        match source.mutate(mutations).await {
            Ok(outcome) => {
                written += batch.len();
                info!(batch = n + 1, documents = batch.len(), transaction = %outcome.transaction_id, "batch written");
            }
            Err(e) => {
                warn!(batch = n + 1, written, "batch failed");
                return Err(e);
            }
        }
    }
    Ok(written)
}
