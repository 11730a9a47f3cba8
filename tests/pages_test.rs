mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{app, documents, get, source, state_with};
use conf_site::cms::InMemorySource;
use conf_site::config::FallbackPolicy;
use conf_site::constants::{DEFAULT_CONTACT_EMAIL, DEFAULT_SITE_NAME};
use conf_site::web::app_router;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn homepage_renders_published_content() -> Result<()> {
    let (status, html) = get(&app(source()), "/").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Global Science Summit"));
    assert!(html.contains("/events/summit-2025"));
    assert!(html.contains("Gold"));
    assert!(html.contains("Superb program"));
    Ok(())
}

#[tokio::test]
async fn homepage_survives_a_cms_outage() -> Result<()> {
    let src = source();
    src.set_unavailable(true);
    let (status, html) = get(&app(src), "/").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(DEFAULT_SITE_NAME));
    assert!(html.contains(DEFAULT_CONTACT_EMAIL));
    Ok(())
}

#[tokio::test]
async fn event_page_fills_missing_fields_with_placeholders() -> Result<()> {
    let (status, html) = get(&app(source()), "/events/summit-2025").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Summit 2025"));
    assert!(html.contains("November 20, 2025"));
    assert!(html.contains("To be announced"));
    Ok(())
}

#[tokio::test]
async fn unknown_pages_are_404() -> Result<()> {
    let router = app(source());
    let (status, html) = get(&router, "/events/no-such-event").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Page not found"));

    let (status, _) = get(&router, "/definitely/not/here").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn locations_page_embeds_markers_or_fallback() -> Result<()> {
    let (status, html) = get(&app(source()), "/locations").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("\"title\":\"Tokyo\""));
    assert!(!html.contains("Nowhere"));

    let src = source();
    src.set_unavailable(true);
    let (status, html) = get(&app(src), "/locations").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("sample locations"));
    assert!(html.contains("\"title\":\"London\""));
    Ok(())
}

#[tokio::test]
async fn sponsorship_and_policy_pages_render() -> Result<()> {
    let router = app(source());
    let (status, html) = get(&router, "/sponsorship").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Keynote mention"));
    assert!(html.contains("INR 150000"));

    let (status, html) = get(&router, "/cancellation-policy").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("will be published soon"));
    Ok(())
}

#[tokio::test]
async fn map_popups_render_cms_text_as_text() -> Result<()> {
    let mut docs = documents();
    docs.push(json!({"_id": "m-html", "_type": "mapLocation", "title": "<img src=x onerror=alert(1)>",
                     "address": "<b>Main St</b>", "latitude": 48.85, "longitude": 2.35, "isActive": true}));
    let (status, html) = get(&app(Arc::new(InMemorySource::with_documents(docs))), "/locations").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("onerror=alert(1)"));
    assert!(html.contains("title.textContent = m.title"));
    assert!(html.contains("document.createTextNode(m.address)"));
    assert!(html.contains("bindPopup(popup)"));
    assert!(!html.contains("'<strong>' + m.title"));
    Ok(())
}

#[tokio::test]
async fn disabled_sections_are_404_without_fetching_their_content() -> Result<()> {
    let src = source();
    let mut state = state_with(src.clone(), None, FallbackPolicy::MockOrder, true);
    state.features.show_map = false;
    let (status, html) = get(&app_router(state), "/locations").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Page not found"));
    // only the site settings lookup for the layout
    assert_eq!(src.fetch_count(), 1);

    let src = source();
    let mut state = state_with(src.clone(), None, FallbackPolicy::MockOrder, true);
    state.features.show_sponsorship = false;
    let (status, _) = get(&app_router(state), "/sponsorship").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(src.fetch_count(), 1);
    Ok(())
}
