use super::fetch_one;
use crate::cms::{ContentSource, Query};
use crate::constants::SITE_SETTINGS_TYPE;
use crate::domain::SiteSettings;
use crate::error::Result;
use crate::fallback;

/// The settings singleton, or the built-in defaults when none is published.
pub async fn site_settings(source: &dyn ContentSource) -> Result<SiteSettings> {
    let query = Query::new(SITE_SETTINGS_TYPE).first();
    let settings: Option<SiteSettings> = fetch_one(source, &query).await?;
    Ok(settings.map(fallback::complete_settings).unwrap_or_else(fallback::site_settings))
}
