#![allow(dead_code)]

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use conf_site::cms::{ContentSource, InMemorySource};
use conf_site::config::{FallbackPolicy, FeatureFlags};
use conf_site::payment::{OrderService, PaymentGateway, Verifier};
use conf_site::web::{app_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const SECRET: &str = "test_secret";

pub fn documents() -> Vec<Value> {
    vec![
        json!({"_id": "settings", "_type": "siteSettings", "siteName": "Global Science Summit",
               "contact": {"email": "hello@summit.example"}}),
        json!({"_id": "c-old", "_type": "conference", "title": "Summit 2023",
               "slug": {"current": "summit-2023"}, "date": "2023-05-01", "location": "Paris"}),
        json!({"_id": "c-new", "_type": "conference", "title": "Summit 2025",
               "slug": {"current": "summit-2025"}, "date": "2025-11-20"}),
        json!({"_id": "c-mid", "_type": "conference", "title": "Summit 2024",
               "slug": {"current": "summit-2024"}, "date": "2024-08-12", "location": "Lisbon"}),
        json!({"_id": "c-draft", "_type": "conference", "title": "No slug yet"}),
        json!({"_id": "t-gold", "_type": "sponsorshipTier", "name": "Gold", "isActive": true, "order": 1,
               "price": {"INR": 150000, "USD": 1800}, "benefits": ["Booth", "Keynote mention"]}),
        json!({"_id": "t-old", "_type": "sponsorshipTier", "name": "Legacy", "isActive": false, "order": 0}),
        json!({"_id": "m-1", "_type": "mapLocation", "title": "Berlin", "latitude": 52.52, "longitude": 13.40,
               "isActive": true, "priority": 1}),
        json!({"_id": "m-2", "_type": "mapLocation", "title": "Tokyo", "latitude": 35.68, "longitude": 139.69,
               "isActive": true, "priority": 5}),
        json!({"_id": "m-bad", "_type": "mapLocation", "title": "Nowhere", "latitude": 123.0, "longitude": 10.0,
               "isActive": true, "priority": 9}),
        json!({"_id": "m-off", "_type": "mapLocation", "title": "Closed", "latitude": 10.0, "longitude": 10.0,
               "isActive": false, "priority": 3}),
        json!({"_id": "cl-1", "_type": "conferenceLocation", "title": "Madrid", "latitude": 40.41,
               "longitude": -3.70, "isActive": true, "priority": 2}),
        json!({"_id": "vip-1", "_type": "specialRegistration", "fullName": "Dr. Rao",
               "email": "rao@example.org", "paymentStatus": "pending"}),
        json!({"_id": "q-1", "_type": "testimonial", "name": "Ana", "quote": "Superb program", "rating": 5,
               "isActive": true}),
    ]
}

pub fn source() -> Arc<InMemorySource> {
    Arc::new(InMemorySource::with_documents(documents()))
}

pub fn state_with(
    source: Arc<InMemorySource>,
    gateway: Option<Arc<dyn PaymentGateway>>,
    policy: FallbackPolicy,
    accept_mock_orders: bool,
) -> AppState {
    let content: Arc<dyn ContentSource> = source;
    AppState::new(
        content,
        OrderService::new(gateway, policy),
        Verifier::new(Some(SECRET.to_string()), accept_mock_orders),
        FeatureFlags::default(),
    )
}

pub fn app(source: Arc<InMemorySource>) -> Router {
    app_router(state_with(source, None, FallbackPolicy::MockOrder, true))
}

pub async fn get(app: &Router, uri: &str) -> Result<(StatusCode, String)> {
    let response = app.clone().oneshot(Request::builder().uri(uri).body(Body::empty())?).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, String::from_utf8(bytes.to_vec())?))
}

pub async fn get_json(app: &Router, uri: &str) -> Result<(StatusCode, Value)> {
    let (status, body) = get(app, uri).await?;
    Ok((status, serde_json::from_str(&body)?))
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))?;
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}
