//! HTTP surface: server-rendered pages and the JSON API.

pub mod api;
pub mod error;
pub mod models;
pub mod pages;
pub mod router;
pub mod state;
pub mod templates;

pub use error::ApiError;
pub use router::app_router;
pub use state::AppState;
