use crate::constants::{DEFAULT_CMS_API_VERSION, DEFAULT_RAZORPAY_API_BASE};
use crate::error::{Result, SiteError};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cms: CmsConfig,
    pub cache: CacheConfig,
    pub payment: PaymentConfig,
    pub features: FeatureFlags,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000, static_dir: "static".to_string() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    /// Write token; reads work without it on public datasets
    pub token: Option<String>,
    /// Replaces the `https://{project}.api(cdn).sanity.io` host, mainly for proxies
    pub api_host: Option<String>,
    pub timeout_seconds: u64,
    /// Serve content from an ndjson dataset export instead of the live API
    pub export_path: Option<String>,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: DEFAULT_CMS_API_VERSION.to_string(),
            use_cdn: true,
            token: None,
            api_host: None,
            timeout_seconds: 10,
            export_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_seconds: u64,
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true, ttl_seconds: 60, max_entries: 500 }
    }
}

/// What the order endpoint does when the gateway cannot create an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Surface the gateway failure to the caller
    Disabled,
    /// Fabricate a local order so checkout can continue
    MockOrder,
}

impl FallbackPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "disabled" | "off" | "none" => Some(FallbackPolicy::Disabled),
            "mock_order" | "mock" | "on" => Some(FallbackPolicy::MockOrder),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub key_id: Option<String>,
    pub key_secret: Option<String>,
    pub api_base: String,
    pub fallback: FallbackPolicy,
    /// Report locally fabricated order ids as verified without an HMAC check
    pub accept_mock_orders: bool,
    pub timeout_seconds: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            key_id: None,
            key_secret: None,
            api_base: DEFAULT_RAZORPAY_API_BASE.to_string(),
            fallback: FallbackPolicy::MockOrder,
            accept_mock_orders: true,
            timeout_seconds: 15,
        }
    }
}

impl PaymentConfig {
    pub fn has_credentials(&self) -> bool {
        matches!((&self.key_id, &self.key_secret), (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub show_sponsorship: bool,
    pub show_map: bool,
    pub show_testimonials: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self { show_sponsorship: true, show_map: true, show_testimonials: true }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, then apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// A missing file is not an error; every section has defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                SiteError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            Self::from_toml(&content)?
        } else {
            Config::default()
        };
        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from a variable lookup (the process environment in production).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CMS_PROJECT_ID") {
            self.cms.project_id = v;
        }
        if let Some(v) = lookup("CMS_DATASET") {
            self.cms.dataset = v;
        }
        if let Some(v) = lookup("CMS_API_VERSION") {
            self.cms.api_version = v;
        }
        if let Some(v) = lookup("CMS_USE_CDN") {
            self.cms.use_cdn = parse_bool("CMS_USE_CDN", &v)?;
        }
        if let Some(v) = lookup("CMS_TOKEN") {
            self.cms.token = Some(v);
        }
        if let Some(v) = lookup("CMS_EXPORT_PATH") {
            self.cms.export_path = Some(v);
        }
        if let Some(v) = lookup("RAZORPAY_KEY_ID") {
            self.payment.key_id = Some(v);
        }
        if let Some(v) = lookup("RAZORPAY_KEY_SECRET") {
            self.payment.key_secret = Some(v);
        }
        if let Some(v) = lookup("PAYMENT_FALLBACK") {
            self.payment.fallback = FallbackPolicy::parse(&v)
                .ok_or_else(|| SiteError::Config(format!("PAYMENT_FALLBACK: unknown policy '{v}'")))?;
        }
        if let Some(v) = lookup("PAYMENT_ACCEPT_MOCK_ORDERS") {
            self.payment.accept_mock_orders = parse_bool("PAYMENT_ACCEPT_MOCK_ORDERS", &v)?;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = v
                .parse()
                .map_err(|_| SiteError::Config(format!("PORT: '{v}' is not a valid port")))?;
        }
        if let Some(v) = lookup("SITE_FEATURE_SPONSORSHIP") {
            self.features.show_sponsorship = parse_bool("SITE_FEATURE_SPONSORSHIP", &v)?;
        }
        if let Some(v) = lookup("SITE_FEATURE_MAP") {
            self.features.show_map = parse_bool("SITE_FEATURE_MAP", &v)?;
        }
        if let Some(v) = lookup("SITE_FEATURE_TESTIMONIALS") {
            self.features.show_testimonials = parse_bool("SITE_FEATURE_TESTIMONIALS", &v)?;
        }
        Ok(())
    }

    /// Startup checks; returns every problem at once.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        let offline = self.cms.export_path.is_some();
        if !offline && self.cms.project_id.trim().is_empty() {
            problems.push("cms.project_id is required (CMS_PROJECT_ID)".to_string());
        } else if !self
            .cms
            .project_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            problems.push(format!("cms.project_id '{}' has invalid characters", self.cms.project_id));
        }
        if self.cms.dataset.trim().is_empty() {
            problems.push("cms.dataset must not be empty".to_string());
        }
        if self.cache.enabled && self.cache.max_entries == 0 {
            problems.push("cache.max_entries must be > 0 when the cache is enabled".to_string());
        }
        if self.payment.key_id.is_some() != self.payment.key_secret.is_some() {
            problems.push("payment.key_id and payment.key_secret must be set together".to_string());
        }
        if self.payment.fallback == FallbackPolicy::Disabled && !self.payment.has_credentials() {
            problems.push("payment gateway credentials are required when the fallback is disabled".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SiteError::Config(problems.join("; ")))
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SiteError::Config(format!("{key}: expected a boolean, got '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cms.dataset, "production");
        assert!(config.cms.use_cdn);
        assert_eq!(config.payment.fallback, FallbackPolicy::MockOrder);
        assert!(config.payment.accept_mock_orders);
    }

    #[test]
    fn toml_sections_are_parsed() {
        let config = Config::from_toml(
            r#"
            [cms]
            project_id = "abc123"
            use_cdn = false

            [payment]
            fallback = "disabled"
            key_id = "rzp_test"
            key_secret = "s3cret"

            [cache]
            ttl_seconds = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.cms.project_id, "abc123");
        assert!(!config.cms.use_cdn);
        assert_eq!(config.payment.fallback, FallbackPolicy::Disabled);
        assert_eq!(config.cache.ttl_seconds, 5);
        assert_eq!(config.cache.max_entries, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::default();
        config
            .apply_env(lookup(&[
                ("CMS_PROJECT_ID", "proj1"),
                ("CMS_USE_CDN", "false"),
                ("PORT", "8081"),
                ("PAYMENT_FALLBACK", "off"),
            ]))
            .unwrap();
        assert_eq!(config.cms.project_id, "proj1");
        assert!(!config.cms.use_cdn);
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.payment.fallback, FallbackPolicy::Disabled);
    }

    #[test]
    fn bad_env_values_are_config_errors() {
        let mut config = Config::default();
        let err = config.apply_env(lookup(&[("CMS_USE_CDN", "maybe")])).unwrap_err();
        assert!(matches!(err, SiteError::Config(_)));
        let err = config.apply_env(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn validate_collects_all_problems() {
        let mut config = Config::default();
        config.payment.fallback = FallbackPolicy::Disabled;
        config.payment.key_id = Some("only-id".to_string());
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("cms.project_id"));
        assert!(message.contains("set together"));
        assert!(message.contains("fallback is disabled"));
    }

    #[test]
    fn export_path_replaces_project_id() {
        let mut config = Config::default();
        config.apply_env(lookup(&[("CMS_EXPORT_PATH", "data/production.ndjson")])).unwrap();
        assert_eq!(config.cms.export_path.as_deref(), Some("data/production.ndjson"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.static_dir, "static");
    }
}
