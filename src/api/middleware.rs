//! API middleware
//!
//! Contains:
//! - Shared application state
//! - JSON error responses
//! - Request statistics
//! - Cache-Control helpers for rendered views

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::client::NomineeApi;
use crate::config::Config;
use crate::render::PageRenderer;
use crate::views::ViewStatus;

// ============================================================================
// Request Statistics
// ============================================================================

/// Lightweight request statistics using atomic operations (no locks)
pub struct RequestStats {
    /// Total number of requests processed
    total_requests: AtomicU64,
    /// Total response time in microseconds (for calculating average)
    total_response_time_us: AtomicU64,
    start_time: Instant,
}

impl RequestStats {
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_response_time_us: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a request with its response time
    pub fn record(&self, duration_us: u64) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_response_time_us.fetch_add(duration_us, Ordering::Relaxed);
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Average response time in microseconds; zero before the first request
    pub fn avg_response_time_us(&self) -> f64 {
        let total = self.total_requests.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        let total_time = self.total_response_time_us.load(Ordering::Relaxed);
        total_time as f64 / total as f64
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn NomineeApi>,
    pub renderer: Arc<PageRenderer>,
    pub config: Arc<Config>,
    pub request_stats: Arc<RequestStats>,
}

impl AppState {
    pub fn new(api: Arc<dyn NomineeApi>, renderer: PageRenderer, config: Config) -> Self {
        Self {
            api,
            renderer: Arc::new(renderer),
            config: Arc::new(config),
            request_stats: Arc::new(RequestStats::new()),
        }
    }
}

/// Error response for the web layer
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    /// Log a render failure and hide its detail from the client
    pub fn render_failed(template: &str, e: &anyhow::Error) -> Self {
        tracing::error!("Failed to render {}: {:#}", template, e);
        Self::internal_error("Failed to render page")
    }

    pub fn status(&self) -> StatusCode {
        match self.error.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Request statistics middleware
///
/// Records request count and response time for `/api/site/info`.
pub async fn request_stats_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_us = start.elapsed().as_micros() as u64;
    state.request_stats.record(duration_us);

    response
}

// ============================================================================
// Cache-Control
// ============================================================================

/// Build Cache-Control header for static assets
pub fn cache_control_static(max_age: u32, immutable: bool) -> String {
    if immutable {
        format!("public, max-age={}, immutable", max_age)
    } else {
        format!("public, max-age={}", max_age)
    }
}

/// Build Cache-Control header for a revalidated view
pub fn cache_control_revalidate(max_age: u32) -> String {
    format!("public, max-age={}, stale-while-revalidate={}", max_age, max_age)
}

pub fn cache_control_no_cache() -> String {
    "no-cache".to_string()
}

/// Cache-Control for a rendered view.
///
/// Settled views (content or empty) may be reused for `revalidate_secs`;
/// failures and unsettled views must be refetched.
pub fn cache_control_for_view<T>(status: &ViewStatus<T>, revalidate_secs: u32) -> String {
    match status {
        ViewStatus::Content(_) | ViewStatus::Empty => cache_control_revalidate(revalidate_secs),
        ViewStatus::Loading | ViewStatus::Error { .. } => cache_control_no_cache(),
    }
}
