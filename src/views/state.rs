//! Render state shared by both views

use serde::Serialize;

use crate::client::FetchError;

/// User-facing message for a failed category listing
pub const LIST_ERROR_MESSAGE: &str = "Failed to load categories. Please try again later.";

/// User-facing message for a failed nominee listing
pub const DETAIL_ERROR_MESSAGE: &str = "Failed to load nominees. Please try again later.";

/// What a view shows; exactly one variant holds at a time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewStatus<T> {
    /// Fetch pending, nothing to show yet
    Loading,
    /// Fetch failed
    Error { message: String },
    /// Fetch succeeded but the derived projection is empty
    Empty,
    /// Populated projection
    Content(T),
}

impl<T> ViewStatus<T> {
    /// Resolve the status from raw view state.
    ///
    /// Loading wins over error, error over data. `content` is `None` when
    /// the derived projection is empty.
    pub fn resolve(loading: bool, error: Option<&str>, content: Option<T>) -> Self {
        if loading {
            return ViewStatus::Loading;
        }
        if let Some(message) = error {
            return ViewStatus::Error {
                message: message.to_string(),
            };
        }
        match content {
            Some(data) => ViewStatus::Content(data),
            None => ViewStatus::Empty,
        }
    }

    /// Template discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            ViewStatus::Loading => "loading",
            ViewStatus::Error { .. } => "error",
            ViewStatus::Empty => "empty",
            ViewStatus::Content(_) => "content",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ViewStatus::Error { .. })
    }

    pub fn content(&self) -> Option<&T> {
        match self {
            ViewStatus::Content(data) => Some(data),
            _ => None,
        }
    }
}

/// Log a fetch failure with the detail the user does not see
pub(crate) fn log_fetch_failure(view: &'static str, error: &FetchError) {
    match error.status() {
        Some(status) => tracing::error!(view, status, error = %error, "Upstream fetch failed"),
        None => tracing::error!(view, network = error.is_network(), error = %error, "Upstream fetch failed"),
    }
}
