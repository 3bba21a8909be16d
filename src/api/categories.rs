//! Category API endpoints
//!
//! JSON form of the two views, for clients that render themselves:
//! - GET /api/categories?q= - listing snapshot
//! - GET /api/categories/{id} - detail snapshot

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::api::middleware::{cache_control_for_view, AppState};
use crate::api::pages::SearchQuery;
use crate::views::{CategoryDetailView, CategoryListView};

/// Build the category router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/{id}", get(get_category))
}

/// GET /api/categories
async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let view = CategoryListView::new(state.api.clone());
    view.set_search_term(query.q);
    view.activate().await;

    let snapshot = view.snapshot();
    let cache_control = cache_control_for_view(&snapshot.status, state.config.site.revalidate_secs);
    ([(header::CACHE_CONTROL, cache_control)], Json(snapshot)).into_response()
}

/// GET /api/categories/{id}
async fn get_category(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let view = CategoryDetailView::new(state.api.clone(), state.config.vote.site_url.clone());
    view.load(id).await;

    let snapshot = view.snapshot();
    let cache_control = cache_control_for_view(&snapshot.status, state.config.site.revalidate_secs);
    ([(header::CACHE_CONTROL, cache_control)], Json(snapshot)).into_response()
}
