use super::{ContentSource, Mutation, MutationOutcome, Query};
use crate::config::CmsConfig;
use crate::error::{Result, SiteError};
use crate::metrics::CmsMetrics;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

/// HTTP client for the hosted CMS query and mutation endpoints.
#[derive(Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    project_id: String,
    dataset: String,
    api_version: String,
    use_cdn: bool,
    token: Option<String>,
    api_host: Option<String>,
}

impl CmsClient {
    pub fn new(config: &CmsConfig) -> Result<Self> {
        if config.project_id.trim().is_empty() {
            return Err(SiteError::Config("CMS project id is not configured".to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .user_agent(concat!("conf_site/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            project_id: config.project_id.clone(),
            dataset: config.dataset.clone(),
            api_version: config.api_version.trim_start_matches('v').to_string(),
            use_cdn: config.use_cdn,
            token: config.token.clone().filter(|t| !t.is_empty()),
            api_host: config.api_host.clone().map(|h| h.trim_end_matches('/').to_string()),
        })
    }

    fn host(&self, cdn: bool) -> String {
        match &self.api_host {
            Some(host) => host.clone(),
            None if cdn => format!("https://{}.apicdn.sanity.io", self.project_id),
            None => format!("https://{}.api.sanity.io", self.project_id),
        }
    }

    /// Read endpoint; only `fresh` queries skip the CDN.
    pub fn query_url(&self, fresh: bool) -> String {
        let cdn = self.use_cdn && !fresh;
        format!("{}/v{}/data/query/{}", self.host(cdn), self.api_version, self.dataset)
    }

    pub fn mutate_url(&self) -> String {
        format!("{}/v{}/data/mutate/{}", self.host(false), self.api_version, self.dataset)
    }

    /// Query-string pairs: the query itself plus `$name=<json>` per parameter.
    pub fn query_pairs(query: &Query) -> Vec<(String, String)> {
        let (groq, params) = query.to_groq();
        let mut pairs = vec![("query".to_string(), groq)];
        for (name, value) in params {
            pairs.push((format!("${name}"), value.to_string()));
        }
        pairs
    }

    async fn read_error(response: reqwest::Response) -> SiteError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        SiteError::Cms { status, message: error_message(&body) }
    }
}

/// Pull a readable message out of a CMS error body.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.pointer("/error/description")
                .or_else(|| v.pointer("/error/message"))
                .or_else(|| v.get("message"))
                .or_else(|| v.get("error"))
        })
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[async_trait]
impl ContentSource for CmsClient {
    async fn fetch(&self, query: &Query) -> Result<Value> {
        let url = self.query_url(query.fresh);
        let pairs = Self::query_pairs(query);
        debug!(doc_type = %query.doc_type, query = %pairs[0].1, "CMS query");

        let started = Instant::now();
        let mut request = self.http.get(&url).query(&pairs);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                CmsMetrics::record_query_error(&query.doc_type);
                return Err(e.into());
            }
        };
        if !response.status().is_success() {
            CmsMetrics::record_query_error(&query.doc_type);
            let err = Self::read_error(response).await;
            warn!(doc_type = %query.doc_type, error = %err, "CMS query rejected");
            return Err(err);
        }

        let body: QueryResponse = response.json().await?;
        CmsMetrics::record_query_success(&query.doc_type, started.elapsed().as_secs_f64());
        Ok(body.result)
    }

    async fn mutate(&self, mutations: Vec<Mutation>) -> Result<MutationOutcome> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| SiteError::Config("CMS write token is not configured".to_string()))?;
        let count = mutations.len();

        let response = self
            .http
            .post(self.mutate_url())
            .query(&[("returnIds", "true")])
            .bearer_auth(token)
            .json(&json!({ "mutations": mutations }))
            .send()
            .await?;

        if !response.status().is_success() {
            CmsMetrics::record_mutation(false);
            return Err(Self::read_error(response).await);
        }
        let outcome: MutationOutcome = response.json().await?;
        CmsMetrics::record_mutation(true);
        debug!(count, transaction = %outcome.transaction_id, "CMS mutation committed");
        Ok(outcome)
    }
}
