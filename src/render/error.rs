//! Page renderer error types

use thiserror::Error;

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template missing from the embedded set
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template rendering error
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Embedded template is not valid UTF-8
    #[error("Template is not valid UTF-8: {0}")]
    InvalidEncoding(String),
}
