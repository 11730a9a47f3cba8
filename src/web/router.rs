use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::web::{api, pages};
use crate::web::state::AppState;

pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api = Router::new()
        .route("/events", get(api::list_events))
        .route("/sponsorship-tiers", get(api::list_sponsorship_tiers))
        .route("/conference-locations", get(api::list_conference_locations))
        .route("/map-locations", get(api::list_map_locations))
        .route("/site-settings", get(api::get_site_settings))
        .route("/health", get(api::health))
        .route("/payment/create-order", post(api::create_order))
        .route("/payment/verify", post(api::verify_payment));

    Router::new()
        .route("/", get(pages::index))
        .route("/events/:slug", get(pages::event_page))
        .route("/sponsorship", get(pages::sponsorship_page))
        .route("/locations", get(pages::locations_page))
        .route("/cancellation-policy", get(pages::cancellation_policy_page))
        .route("/metrics", get(api::metrics))
        .nest("/api", api)
        .nest_service("/static", ServeDir::new(&state.static_dir))
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
