use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CMS request failed with status {status}: {message}")]
    Cms { status: u16, message: String },

    #[error("Payment gateway error: {message}")]
    Gateway { message: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl SiteError {
    pub fn gateway(message: impl Into<String>) -> Self {
        SiteError::Gateway { message: message.into() }
    }

    /// True for errors caused by bad caller input rather than a failing dependency.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SiteError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
