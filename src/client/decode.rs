//! Response body decoding
//!
//! The listing endpoint is decoded leniently: anything that is not a JSON
//! array of categories becomes an empty listing. The per-category endpoint
//! is decoded strictly and reports a `FetchError::Decode`.

use crate::models::{Category, CategoryNomineesResponse};

use super::FetchError;

/// Outcome of decoding a category listing body
#[derive(Debug, Clone, PartialEq)]
pub enum ListDecode {
    /// Body was a well-formed list of categories
    Valid(Vec<Category>),
    /// Body had another shape; the listing is treated as empty
    Fallback { reason: String },
}

impl ListDecode {
    /// Categories to display, empty for a fallback
    pub fn into_categories(self) -> Vec<Category> {
        match self {
            ListDecode::Valid(categories) => categories,
            ListDecode::Fallback { .. } => Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn is_fallback(&self) -> bool {
        matches!(self, ListDecode::Fallback { .. })
    }
}

/// Decode a category listing body, defaulting to empty on shape mismatch
pub fn decode_category_list(body: &[u8]) -> ListDecode {
    let value: serde_json::Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            return ListDecode::Fallback {
                reason: format!("body is not JSON: {}", e),
            }
        }
    };

    if !value.is_array() {
        return ListDecode::Fallback {
            reason: format!("expected an array, got {}", json_kind(&value)),
        };
    }

    match serde_json::from_value::<Vec<Category>>(value) {
        Ok(categories) => ListDecode::Valid(categories),
        Err(e) => ListDecode::Fallback {
            reason: format!("array entries are not categories: {}", e),
        },
    }
}

/// Decode a per-category body
pub fn decode_category_nominees(body: &[u8]) -> Result<CategoryNomineesResponse, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
