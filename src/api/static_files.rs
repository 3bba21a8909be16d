//! Static file serving
//!
//! Stylesheets and other assets are embedded in the binary and served
//! under `/static/`.

use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

use crate::api::middleware::{cache_control_static, ApiError};

#[derive(RustEmbed)]
#[folder = "assets/"]
#[include = "*"]
struct StaticAssets;

/// GET /static/{*path}
pub async fn serve_asset(Path(path): Path<String>) -> Result<Response, ApiError> {
    let asset_path = path.trim_start_matches('/');

    match StaticAssets::get(asset_path) {
        Some(content) => Ok(build_response(asset_path, content.data.into_owned())),
        None => {
            tracing::debug!("Static asset not found: {}", asset_path);
            Err(ApiError::not_found(format!("Asset not found: {}", asset_path)))
        }
    }
}

fn build_response(path: &str, data: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, get_content_type(path).to_string()),
            (header::CACHE_CONTROL, cache_control_static(3600, false)),
        ],
        Body::from(data),
    )
        .into_response()
}

/// Get content type from file extension
fn get_content_type(path: &str) -> &'static str {
    match path.rsplit('.').next().unwrap_or("") {
        "css" => "text/css",
        "js" => "application/javascript",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}
