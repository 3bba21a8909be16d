//! Server-rendered pages
//!
//! - GET / and /tca - category grid, `?q=` filters
//! - GET /tca/category/{id} - ranked nominees
//! - GET /tca/category/{id}/vote - hand off to the vote site
//!
//! Each request builds a fresh view, lets its fetch settle, and renders the
//! resulting snapshot. A dropped request drops the view, which cancels the
//! fetch.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::api::middleware::{cache_control_for_view, ApiError, AppState};
use crate::models::CategoryKey;
use crate::render::{CATEGORIES_TEMPLATE, CATEGORY_TEMPLATE};
use crate::views::{CategoryDetailView, CategoryListView, VoteHandoff};

/// Query parameters for the category grid
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET / and /tca
pub async fn categories_page(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let view = CategoryListView::new(state.api.clone());
    view.set_search_term(query.q);
    view.activate().await;

    let snapshot = view.snapshot();
    let html = state
        .renderer
        .render_category_list(&snapshot, uri.path())
        .map_err(|e| ApiError::render_failed(CATEGORIES_TEMPLATE, &e))?;

    let cache_control = cache_control_for_view(&snapshot.status, state.config.site.revalidate_secs);
    Ok(([(header::CACHE_CONTROL, cache_control)], Html(html)).into_response())
}

/// GET /tca/category/{id}
pub async fn category_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let view = CategoryDetailView::new(state.api.clone(), state.config.vote.site_url.clone());
    view.load(id).await;

    let snapshot = view.snapshot();
    let html = state
        .renderer
        .render_category_detail(&snapshot, uri.path())
        .map_err(|e| ApiError::render_failed(CATEGORY_TEMPLATE, &e))?;

    let cache_control = cache_control_for_view(&snapshot.status, state.config.site.revalidate_secs);
    Ok(([(header::CACHE_CONTROL, cache_control)], Html(html)).into_response())
}

/// GET /tca/category/{id}/vote
///
/// 303 to the external vote page. Nothing is fetched.
pub async fn vote_redirect(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let handoff = VoteHandoff::new(&state.config.vote.site_url, CategoryKey::from(id));
    tracing::info!(category = %handoff.category, url = %handoff.url, "Vote handoff");
    Redirect::to(&handoff.url)
}

/// Fallback for unknown routes
pub async fn not_found_page(State(state): State<AppState>, uri: Uri) -> Response {
    let html = state.renderer.render_not_found(uri.path());
    (StatusCode::NOT_FOUND, Html(html)).into_response()
}
