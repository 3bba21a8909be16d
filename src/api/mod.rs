//! Web layer - HTTP handlers and routing
//!
//! It includes:
//! - Server-rendered category and nominee pages
//! - Vote handoff redirect
//! - JSON view snapshots
//! - Site info endpoint
//! - Embedded static assets

pub mod categories;
pub mod middleware;
pub mod pages;
pub mod site;
pub mod static_files;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use middleware::{
    cache_control_for_view, cache_control_no_cache, cache_control_revalidate,
    cache_control_static, ApiError, AppState, RequestStats,
};

/// Build the JSON API router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .nest("/categories", categories::router())
        .nest("/site", site::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::categories_page))
        .route("/tca", get(pages::categories_page))
        .route("/tca/category/{id}", get(pages::category_page))
        .route("/tca/category/{id}/vote", get(pages::vote_redirect))
        .route("/static/{*path}", get(static_files::serve_asset))
        .nest("/api", build_api_router())
        .fallback(pages::not_found_page)
        .layer(
            ServiceBuilder::new()
                // Request stats (outermost layer, runs for all requests)
                .layer(axum_middleware::from_fn_with_state(
                    state.clone(),
                    middleware::request_stats_middleware,
                ))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use axum_test::TestServer;
    use serde_json::Value;
    use std::sync::Arc;

    use crate::client::testing::{category, detail, nominee, Reply, StubApi};
    use crate::config::Config;
    use crate::render::PageRenderer;
    use crate::views::{DETAIL_ERROR_MESSAGE, LIST_ERROR_MESSAGE};

    fn server_with(api: StubApi) -> (TestServer, Arc<StubApi>) {
        let api = Arc::new(api);
        let config = Config::default();
        let renderer = PageRenderer::new(&config.site).unwrap();
        let state = AppState::new(api.clone(), renderer, config);
        (TestServer::new(build_router(state)).unwrap(), api)
    }

    fn stub() -> StubApi {
        StubApi::with_categories(vec![
            category(1, "Music", Some("Best music creator")),
            category(2, "Comedy", Some("Funniest creator")),
        ])
        .with_detail(
            "1",
            Reply::Ok(detail(1, "Music", vec![nominee("low", 5), nominee("top", 900)])),
        )
        .with_detail("2", Reply::Ok(detail(2, "Comedy", Vec::new())))
        .with_detail("3", Reply::Status(500))
    }

    #[tokio::test]
    async fn test_home_renders_categories() {
        let (server, api) = server_with(stub());

        let response = server.get("/").await;

        response.assert_status_ok();
        assert_eq!(
            response.header(header::CACHE_CONTROL),
            "public, max-age=60, stale-while-revalidate=60"
        );
        let html = response.text();
        assert!(html.contains("Music"));
        assert!(html.contains("Comedy"));
        assert!(html.contains("2 of 2 categories found"));
        assert_eq!(api.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_tca_route_filters_by_query() {
        let (server, _api) = server_with(stub());

        let response = server.get("/tca").add_query_param("q", "FUNNIEST").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("1 of 2 categories found"));
        assert!(html.contains(r#"href="/tca/category/2""#));
        assert!(!html.contains(r#"href="/tca/category/1""#));
    }

    #[tokio::test]
    async fn test_home_upstream_failure_is_not_cached() {
        let (server, _api) = server_with(StubApi::new(Reply::Timeout));

        let response = server.get("/").await;

        response.assert_status_ok();
        assert_eq!(response.header(header::CACHE_CONTROL), "no-cache");
        assert!(response.text().contains(LIST_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_category_page_ranked() {
        let (server, api) = server_with(stub());

        let response = server.get("/tca/category/1").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.find("Nominee top").unwrap() < html.find("Nominee low").unwrap());
        assert!(html.contains("900 votes"));
        assert!(html.contains(r#"href="/tca/category/1/vote""#));
        assert_eq!(api.detail_calls(), 1);
        assert_eq!(api.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_category_page_empty_and_error() {
        let (server, _api) = server_with(stub());

        let empty = server.get("/tca/category/2").await;
        empty.assert_status_ok();
        assert!(empty.text().contains("No nominees yet"));

        let failed = server.get("/tca/category/3").await;
        failed.assert_status_ok();
        assert_eq!(failed.header(header::CACHE_CONTROL), "no-cache");
        assert!(failed.text().contains(DETAIL_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_vote_redirect() {
        let (server, api) = server_with(stub());

        let response = server.get("/tca/category/12/vote").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header(header::LOCATION),
            "https://www.tca2025.com/category/12"
        );
        assert_eq!(api.detail_calls(), 0);
    }

    #[tokio::test]
    async fn test_vote_link_for_key_with_slash() {
        let (server, _api) = server_with(
            stub().with_detail("a/b", Reply::Ok(detail(4, "Slash", vec![nominee("x", 1)]))),
        );

        let html = server.get("/tca/category/a%2Fb").await.text();
        assert!(html.contains(r#"href="/tca/category/a%2Fb/vote""#));

        let response = server.get("/tca/category/a%2Fb/vote").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header(header::LOCATION),
            "https://www.tca2025.com/category/a%2Fb"
        );
    }

    #[tokio::test]
    async fn test_api_categories_snapshot() {
        let (server, _api) = server_with(stub());

        let response = server.get("/api/categories").add_query_param("q", "mus").await;

        response.assert_status_ok();
        let json: Value = response.json();
        assert_eq!(json["status"]["state"], "content");
        assert_eq!(json["status"]["data"][0]["name"], "Music");
        assert_eq!(json["shown"], 1);
        assert_eq!(json["total"], 2);
        assert_eq!(json["search_term"], "mus");
    }

    #[tokio::test]
    async fn test_api_category_snapshot() {
        let (server, _api) = server_with(stub());

        let json: Value = server.get("/api/categories/1").await.json();

        assert_eq!(json["category_id"], "1");
        assert_eq!(json["category"]["name"], "Music");
        assert_eq!(json["status"]["state"], "content");
        assert_eq!(json["status"]["data"][0]["nominee_id"], "top");
        assert_eq!(json["status"]["data"][0]["tier"], "gold");
        assert_eq!(json["vote"]["url"], "https://www.tca2025.com/category/1");
    }

    #[tokio::test]
    async fn test_api_category_error_snapshot() {
        let (server, _api) = server_with(stub());

        let response = server.get("/api/categories/404").await;

        response.assert_status_ok();
        let json: Value = response.json();
        assert_eq!(json["status"]["state"], "error");
        assert_eq!(json["status"]["data"]["message"], DETAIL_ERROR_MESSAGE);
        assert!(json["category"].is_null());
    }

    #[tokio::test]
    async fn test_site_info_counts_requests() {
        let (server, _api) = server_with(stub());

        server.get("/").await.assert_status_ok();
        let json: Value = server.get("/api/site/info").await.json();

        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["site_title"], "Nominee Categories");
        // The info request itself is recorded after its body is built
        assert_eq!(json["total_requests"], 1);
    }

    #[tokio::test]
    async fn test_static_stylesheet() {
        let (server, _api) = server_with(stub());

        let response = server.get("/static/style.css").await;

        response.assert_status_ok();
        assert_eq!(response.header(header::CONTENT_TYPE), "text/css");
        assert!(response.text().contains(".rank-gold"));
    }

    #[tokio::test]
    async fn test_static_missing_asset() {
        let (server, _api) = server_with(stub());

        let response = server.get("/static/missing.js").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let json: Value = response.json();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_unknown_route_renders_not_found() {
        let (server, _api) = server_with(stub());

        let response = server.get("/nowhere").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("Page not found"));
    }
}
