//! Public site information API
//!
//! Used by monitoring and by clients that want the configured titles.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::api::middleware::AppState;

/// Response for public site info
#[derive(Debug, Serialize)]
pub struct SiteInfoResponse {
    pub version: String,
    pub site_title: String,
    pub site_tagline: String,
    pub vote_site_url: String,
    pub uptime_seconds: u64,
    pub total_requests: u64,
    pub avg_response_time_ms: f64,
}

/// Build the public site router
pub fn router() -> Router<AppState> {
    Router::new().route("/info", get(get_site_info))
}

/// GET /api/site/info
async fn get_site_info(State(state): State<AppState>) -> Json<SiteInfoResponse> {
    let stats = &state.request_stats;
    let site = &state.config.site;

    Json(SiteInfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        site_title: site.title.clone(),
        site_tagline: site.tagline.clone(),
        vote_site_url: state.config.vote.site_url.clone(),
        uptime_seconds: stats.uptime_seconds(),
        total_requests: stats.total_requests(),
        avg_response_time_ms: stats.avg_response_time_us() / 1000.0,
    })
}
