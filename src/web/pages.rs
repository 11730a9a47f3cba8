use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::content::{events, locations, policies, settings, sponsorship};
use crate::domain::LocationKind;
use crate::error::Result;
use crate::fallback;
use crate::metrics::CmsMetrics;
use crate::web::models::{markers_json, EventCard, Layout, PolicyView, TestimonialView, TierView};
use crate::web::state::AppState;
use crate::web::templates::{
    ErrorTemplate, EventTemplate, IndexTemplate, LocationsTemplate, PolicyTemplate, SponsorshipTemplate,
};

/// Log a failed fetch and substitute constant content.
pub(crate) fn or_fallback<T>(result: Result<T>, content: &'static str, fallback: impl FnOnce() -> T) -> T {
    result.unwrap_or_else(|e| {
        warn!(error = %e, content, "content fetch failed, serving fallback");
        CmsMetrics::record_fallback(content);
        fallback()
    })
}

async fn layout(state: &AppState) -> Layout {
    let settings = or_fallback(
        settings::site_settings(state.content.as_ref()).await,
        "site_settings",
        fallback::site_settings,
    );
    Layout::new(&settings, &state.features)
}

fn error_page(layout: Layout, status: StatusCode, title: &str, message: &str) -> Response {
    let page = ErrorTemplate {
        layout,
        status: status.as_u16(),
        title: title.to_string(),
        message: message.to_string(),
    };
    (status, page).into_response()
}

fn not_found_page(layout: Layout) -> Response {
    error_page(layout, StatusCode::NOT_FOUND, "Page not found", "The page you were looking for does not exist.")
}

pub async fn index(State(state): State<AppState>) -> Response {
    let source = state.content.as_ref();
    let (site, events, tiers, testimonials) = tokio::join!(
        settings::site_settings(source),
        events::list_events(source),
        sponsorship::list_tiers(source),
        policies::testimonials(source),
    );

    let site = or_fallback(site, "site_settings", fallback::site_settings);
    let events = or_fallback(events, "events", Vec::new);
    let tiers = or_fallback(tiers, "sponsorship_tiers", Vec::new);
    let testimonials = or_fallback(testimonials, "testimonials", Vec::new);

    IndexTemplate {
        layout: Layout::new(&site, &state.features),
        events: events.iter().map(EventCard::from).collect(),
        tiers: tiers.iter().map(TierView::from).collect(),
        testimonials: testimonials.iter().map(TestimonialView::from).collect(),
        show_sponsorship: state.features.show_sponsorship,
        show_testimonials: state.features.show_testimonials,
    }
    .into_response()
}

pub async fn event_page(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let (layout, event) = tokio::join!(layout(&state), events::event_by_slug(state.content.as_ref(), &slug));
    match event {
        Ok(Some(event)) => EventTemplate { layout, event: EventCard::from(&event) }.into_response(),
        Ok(None) => not_found_page(layout),
        Err(e) => {
            warn!(error = %e, slug = %slug, "event fetch failed");
            error_page(
                layout,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "This conference could not be loaded right now. Please try again shortly.",
            )
        }
    }
}

pub async fn sponsorship_page(State(state): State<AppState>) -> Response {
    if !state.features.show_sponsorship {
        return not_found_page(layout(&state).await);
    }
    let (layout, tiers) = tokio::join!(layout(&state), sponsorship::list_tiers(state.content.as_ref()));
    let (tiers, unavailable) = match tiers {
        Ok(tiers) => (tiers.iter().map(TierView::from).collect(), false),
        Err(e) => {
            warn!(error = %e, "sponsorship tiers fetch failed");
            CmsMetrics::record_fallback("sponsorship_tiers");
            (Vec::new(), true)
        }
    };
    SponsorshipTemplate { layout, tiers, unavailable }.into_response()
}

pub async fn locations_page(State(state): State<AppState>) -> Response {
    if !state.features.show_map {
        return not_found_page(layout(&state).await);
    }
    let (layout, pins) = tokio::join!(
        layout(&state),
        locations::active_locations(state.content.as_ref(), LocationKind::Map)
    );
    let (pins, is_fallback) = match pins {
        Ok(pins) => (pins, false),
        Err(e) => {
            warn!(error = %e, "map locations fetch failed, showing test locations");
            CmsMetrics::record_fallback("map_locations");
            (locations::prepare_markers(fallback::test_locations()), true)
        }
    };
    LocationsTemplate { layout, markers_json: markers_json(&pins), count: pins.len(), is_fallback }.into_response()
}

pub async fn cancellation_policy_page(State(state): State<AppState>) -> Response {
    let (layout, policy) = tokio::join!(layout(&state), policies::cancellation_policy(state.content.as_ref()));
    let policy = or_fallback(policy, "cancellation_policy", || None);
    PolicyTemplate { layout, policy: PolicyView::new(policy.as_ref()) }.into_response()
}

pub async fn not_found(State(state): State<AppState>) -> Response {
    not_found_page(layout(&state).await)
}
