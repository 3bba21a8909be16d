//! Upstream nominee API client
//!
//! The remote category/nominee API is treated as an opaque collaborator.
//! This module owns the typed boundary to it:
//! - `NomineeApi`, the seam views fetch through
//! - `HttpNomineeApi`, the reqwest-backed implementation
//! - `FetchError`, the failure taxonomy every fetch maps into
//! - response decoding, lenient for the listing and strict for details

mod decode;
mod http;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Category, CategoryKey, CategoryNomineesResponse};

pub use decode::{decode_category_list, decode_category_nominees, ListDecode};
pub use http::HttpNomineeApi;

/// Path of the category listing endpoint
pub const CATEGORIES_PATH: &str = "/api/nominee-categories";

/// Path prefix of the per-category endpoint
pub const CATEGORY_NOMINEES_PATH: &str = "/api/category-nominees";

/// Failure of a single upstream fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request could not complete (DNS, connection, body transfer)
    #[error("Network failure: {0}")]
    Network(String),

    /// Request exceeded its client-side deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Upstream answered with a non-2xx status
    #[error("Upstream returned HTTP {status}")]
    Http { status: u16 },

    /// Body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Whether the request never produced a response
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Timeout(_))
    }

    /// Upstream status code, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status } => Some(*status),
            _ => None,
        }
    }
}

/// Read-only access to the remote category/nominee API
#[async_trait]
pub trait NomineeApi: Send + Sync {
    /// `GET /api/nominee-categories`
    ///
    /// A 2xx body that is not a list of categories yields an empty list.
    async fn list_categories(&self) -> Result<Vec<Category>, FetchError>;

    /// `GET /api/category-nominees/{id}`
    async fn category_nominees(
        &self,
        id: &CategoryKey,
    ) -> Result<CategoryNomineesResponse, FetchError>;
}
