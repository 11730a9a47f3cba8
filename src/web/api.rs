use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::FallbackPolicy;
use crate::content::{events, locations, registrations, settings, sponsorship};
use crate::domain::{ConferenceEvent, LocationKind, MapLocation, PaymentStatus, SponsorRegistration, SponsorshipTier};
use crate::fallback;
use crate::metrics::CmsMetrics;
use crate::payment::{invoice_number, OrderRequest, PaymentProof};
use crate::web::error::ApiError;
use crate::web::state::AppState;

/// `{success, data, count}` envelope; `fallback` only appears when set
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { success: true, count: data.len(), data, fallback: false }
    }

    pub fn fallback(data: Vec<T>) -> Self {
        Self { fallback: true, ..Self::new(data) }
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(v)| v).map_err(|e| ApiError::bad_request(e.body_text()))
}

pub async fn list_events(State(state): State<AppState>) -> ApiResult<Json<ListResponse<ConferenceEvent>>> {
    let events = events::list_events(state.content.as_ref()).await?;
    Ok(Json(ListResponse::new(events)))
}

pub async fn list_sponsorship_tiers(
    State(state): State<AppState>,
) -> ApiResult<Json<ListResponse<SponsorshipTier>>> {
    let tiers = sponsorship::list_tiers(state.content.as_ref()).await?;
    Ok(Json(ListResponse::new(tiers)))
}

pub async fn list_conference_locations(
    State(state): State<AppState>,
) -> ApiResult<Json<ListResponse<MapLocation>>> {
    let pins = locations::active_locations(state.content.as_ref(), LocationKind::Conference).await?;
    Ok(Json(ListResponse::new(pins)))
}

pub async fn list_map_locations(State(state): State<AppState>) -> Json<ListResponse<MapLocation>> {
    match locations::active_locations(state.content.as_ref(), LocationKind::Map).await {
        Ok(pins) => Json(ListResponse::new(pins)),
        Err(e) => {
            warn!(error = %e, "map locations fetch failed, returning test locations");
            CmsMetrics::record_fallback("map_locations");
            Json(ListResponse::fallback(locations::prepare_markers(fallback::test_locations())))
        }
    }
}

pub async fn get_site_settings(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let settings = settings::site_settings(state.content.as_ref()).await?;
    Ok(Json(json!({"success": true, "data": settings})))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let cms_up = match state.content.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "CMS health check failed");
            false
        }
    };
    let payment = match (state.orders.has_gateway(), state.orders.policy()) {
        (true, _) => "configured",
        (false, FallbackPolicy::MockOrder) => "mock",
        (false, FallbackPolicy::Disabled) => "unavailable",
    };
    Json(json!({
        "status": if cms_up { "healthy" } else { "degraded" },
        "services": {
            "cms": if cms_up { "connected" } else { "unreachable" },
            "payment": payment,
        },
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn create_order(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OrderRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let request = body(payload)?;
    let created = state.orders.create(&request).await?;
    Ok(Json(json!({
        "success": true,
        "order": created.order,
        "mode": created.mode,
        "keyId": created.key_id,
    })))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorshipData {
    pub tier: Option<String>,
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    #[serde(flatten)]
    pub proof: PaymentProof,
    #[serde(default, rename = "registrationId")]
    pub registration_id: Option<String>,
    #[serde(default, rename = "sponsorshipData")]
    pub sponsorship_data: Option<SponsorshipData>,
}

pub async fn verify_payment(
    State(state): State<AppState>,
    payload: std::result::Result<Json<VerifyRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let request = body(payload)?;
    let proof = &request.proof;
    if proof.razorpay_order_id.trim().is_empty() || proof.razorpay_payment_id.trim().is_empty() {
        return Err(ApiError::bad_request("razorpay_order_id and razorpay_payment_id are required"));
    }

    if !state.verifier.verify(proof).is_verified() {
        let rejected = json!({"success": false, "verified": false, "error": "Payment verification failed"});
        return Ok((StatusCode::BAD_REQUEST, Json(rejected)).into_response());
    }

    let invoice = invoice_number(Utc::now().date_naive(), &proof.razorpay_payment_id);
    info!(order = %proof.razorpay_order_id, invoice = %invoice, "payment verified");

    // Follow-up writes do not change the outcome the payer sees.
    let source = state.content.as_ref();
    if let Some(id) = request.registration_id.as_deref().filter(|id| !id.is_empty()) {
        if let Err(e) =
            registrations::mark_paid(source, id, &proof.razorpay_order_id, &proof.razorpay_payment_id).await
        {
            warn!(error = %e, registration = %id, "could not mark registration paid");
        }
    }
    if let Some(data) = request.sponsorship_data.clone() {
        let record = SponsorRegistration {
            tier: data.tier,
            company_name: data.company_name,
            contact_name: data.contact_name,
            email: data.email,
            phone: data.phone,
            amount: data.amount,
            currency: data.currency,
            razorpay_order_id: proof.razorpay_order_id.clone(),
            razorpay_payment_id: proof.razorpay_payment_id.clone(),
            invoice_number: invoice.clone(),
            payment_status: PaymentStatus::Paid,
        };
        if let Err(e) = registrations::record_sponsorship(source, &record).await {
            warn!(error = %e, order = %proof.razorpay_order_id, "could not record sponsorship");
        }
    }

    Ok(Json(json!({
        "success": true,
        "verified": true,
        "invoiceNumber": invoice,
        "orderId": proof.razorpay_order_id,
        "paymentId": proof.razorpay_payment_id,
    }))
    .into_response())
}

pub async fn metrics() -> Response {
    match crate::metrics::render() {
        Some(text) => ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], text).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder is not installed").into_response(),
    }
}
