pub mod cms;
pub mod config;
pub mod constants;
pub mod content;
pub mod domain;
pub mod error;
pub mod fallback;
pub mod logging;
pub mod metrics;
pub mod migration;
pub mod payment;
pub mod schema;
pub mod web;

pub use config::Config;
pub use error::{Result, SiteError};
