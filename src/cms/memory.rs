use super::{ContentSource, Direction, Filter, Mutation, MutationOutcome, MutationResult, Query, Slice};
use crate::error::{Result, SiteError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering as CmpOrdering;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Content source backed by a document list held in memory.
///
/// Serves a dataset export (one JSON document per line) for offline runs and
/// stands in for the hosted CMS in tests. Evaluates the subset of the query
/// language that [`Query`] can express.
#[derive(Debug, Default)]
pub struct InMemorySource {
    documents: RwLock<Vec<Value>>,
    unavailable: AtomicBool,
    fetches: AtomicUsize,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Value>) -> Self {
        Self { documents: RwLock::new(documents), ..Self::default() }
    }

    /// Load an export file; blank lines are skipped.
    pub fn from_ndjson(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let documents = content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<std::result::Result<Vec<Value>, _>>()?;
        Ok(Self::with_documents(documents))
    }

    /// Simulate an outage: every call fails with a 503 until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `fetch` calls served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub async fn documents(&self) -> Vec<Value> {
        self.documents.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Value> {
        self.documents.read().await.iter().find(|d| doc_id(d) == Some(id)).cloned()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SiteError::Cms { status: 503, message: "content store unavailable".to_string() });
        }
        Ok(())
    }
}

fn doc_id(doc: &Value) -> Option<&str> {
    doc.get("_id").and_then(Value::as_str)
}

/// Resolve a dotted path such as `slug.current`
fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |v, key| v.get(key))
}

fn matches(doc: &Value, query: &Query) -> bool {
    if doc.get("_type").and_then(Value::as_str) != Some(query.doc_type.as_str()) {
        return false;
    }
    query.filters.iter().all(|f| match f {
        Filter::Eq { path, value } => lookup(doc, path) == Some(value),
        Filter::Defined(path) => lookup(doc, path).is_some_and(|v| !v.is_null()),
    })
}

/// Null and missing values sort before everything else.
fn compare(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    let rank = |v: Option<&Value>| match v {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(_) => 4,
    };
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(CmpOrdering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn project(doc: &Value, fields: &[String]) -> Value {
    if fields.is_empty() {
        return doc.clone();
    }
    let mut out = Map::new();
    for field in fields {
        if let Some(v) = doc.get(field) {
            out.insert(field.clone(), v.clone());
        }
    }
    Value::Object(out)
}

#[async_trait]
impl ContentSource for InMemorySource {
    async fn fetch(&self, query: &Query) -> Result<Value> {
        self.check_available()?;
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let documents = self.documents.read().await;
        let mut hits: Vec<&Value> = documents.iter().filter(|d| matches(d, query)).collect();

        hits.sort_by(|a, b| {
            for o in &query.order {
                let ord = compare(lookup(a, &o.path), lookup(b, &o.path));
                let ord = match o.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                };
                if ord != CmpOrdering::Equal {
                    return ord;
                }
            }
            CmpOrdering::Equal
        });

        let result = match query.slice {
            Some(Slice::Index(i)) => hits.get(i).map(|d| project(d, &query.projection)).unwrap_or(Value::Null),
            Some(Slice::Range(start, end)) => Value::Array(
                hits.iter()
                    .skip(start)
                    .take(end.saturating_sub(start))
                    .map(|d| project(d, &query.projection))
                    .collect(),
            ),
            None => Value::Array(hits.iter().map(|d| project(d, &query.projection)).collect()),
        };
        Ok(result)
    }

    async fn mutate(&self, mutations: Vec<Mutation>) -> Result<MutationOutcome> {
        self.check_available()?;
        let mut documents = self.documents.write().await;
        let mut results = Vec::with_capacity(mutations.len());

        // Validate and apply against a copy so a failing batch changes nothing
        let mut staged = documents.clone();
        for mutation in mutations {
            let (id, operation) = apply(&mut staged, mutation)?;
            results.push(MutationResult { id, operation: operation.to_string() });
        }
        *documents = staged;

        let outcome = MutationOutcome { transaction_id: Uuid::new_v4().simple().to_string(), results };
        debug!(count = outcome.results.len(), "in-memory mutation applied");
        Ok(outcome)
    }
}

fn with_identity(mut doc: Value) -> Result<(String, Value)> {
    let obj = doc
        .as_object_mut()
        .ok_or_else(|| SiteError::Validation("documents must be JSON objects".to_string()))?;
    if obj.get("_type").and_then(Value::as_str).is_none() {
        return Err(SiteError::Validation("documents need a _type".to_string()));
    }
    let id = match obj.get("_id").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            let id = Uuid::new_v4().simple().to_string();
            obj.insert("_id".to_string(), Value::String(id.clone()));
            id
        }
    };
    obj.insert("_rev".to_string(), Value::String(Uuid::new_v4().simple().to_string()));
    Ok((id, doc))
}

fn apply(documents: &mut Vec<Value>, mutation: Mutation) -> Result<(String, &'static str)> {
    let position = |docs: &Vec<Value>, id: &str| docs.iter().position(|d| doc_id(d) == Some(id));

    match mutation {
        Mutation::Create(doc) => {
            let (id, doc) = with_identity(doc)?;
            if position(documents, &id).is_some() {
                return Err(SiteError::Cms { status: 409, message: format!("document '{id}' already exists") });
            }
            documents.push(doc);
            Ok((id, "create"))
        }
        Mutation::CreateOrReplace(doc) => {
            let (id, doc) = with_identity(doc)?;
            match position(documents, &id) {
                Some(i) => {
                    documents[i] = doc;
                    Ok((id, "update"))
                }
                None => {
                    documents.push(doc);
                    Ok((id, "create"))
                }
            }
        }
        Mutation::CreateIfNotExists(doc) => {
            let (id, doc) = with_identity(doc)?;
            if position(documents, &id).is_none() {
                documents.push(doc);
                Ok((id, "create"))
            } else {
                Ok((id, "none"))
            }
        }
        Mutation::Patch(patch) => {
            let i = position(documents, &patch.id).ok_or_else(|| SiteError::Cms {
                status: 404,
                message: format!("document '{}' not found", patch.id),
            })?;
            if let Some(obj) = documents[i].as_object_mut() {
                for (k, v) in patch.set {
                    obj.insert(k, v);
                }
                obj.insert("_rev".to_string(), Value::String(Uuid::new_v4().simple().to_string()));
            }
            Ok((patch.id, "update"))
        }
        Mutation::Delete { id } => {
            if let Some(i) = position(documents, &id) {
                documents.remove(i);
            }
            Ok((id, "delete"))
        }
    }
}
