//! Per-content-type fetch functions.
//!
//! Each function issues exactly one query against a [`ContentSource`] and
//! shapes the result for pages and API routes. Errors propagate; callers
//! decide on fallback content.

pub mod events;
pub mod locations;
pub mod policies;
pub mod registrations;
pub mod settings;
pub mod sponsorship;

use crate::cms::{ContentSource, Query};
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Run a list query. Documents that do not match `T` are skipped with a warning
/// so one half-edited draft does not blank a whole page.
pub(crate) async fn fetch_list<T: DeserializeOwned>(source: &dyn ContentSource, query: &Query) -> Result<Vec<T>> {
    let items = match source.fetch(query).await? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => vec![other],
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let id = item.get("_id").and_then(Value::as_str).unwrap_or("?").to_string();
        match serde_json::from_value::<T>(item) {
            Ok(v) => out.push(v),
            Err(e) => warn!(doc_type = %query.doc_type, id = %id, error = %e, "skipping malformed document"),
        }
    }
    Ok(out)
}

/// Run a single-document query; `null` means not found.
pub(crate) async fn fetch_one<T: DeserializeOwned>(source: &dyn ContentSource, query: &Query) -> Result<Option<T>> {
    match source.fetch(query).await? {
        Value::Null => Ok(None),
        value => Ok(Some(serde_json::from_value(value)?)),
    }
}
