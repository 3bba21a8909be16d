//! Category model
//!
//! An award grouping with its eligibility criteria, as returned by
//! `GET /api/nominee-categories`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Award category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique identifier, also the routing key for the detail page
    pub id: i64,
    /// Display name
    pub name: String,
    /// Short description; some categories omit it
    #[serde(default)]
    pub description: Option<String>,
    /// Long-form text
    #[serde(default)]
    pub about: Option<String>,
    /// Upstream status flag
    #[serde(default)]
    pub status: i32,
    /// Upstream display order (carried, not applied)
    #[serde(default)]
    pub order: i32,
    /// Image URL
    #[serde(default)]
    pub image: String,
    /// Whether the upstream session already voted here
    #[serde(default)]
    pub has_voted: bool,
    /// Eligibility criteria in upstream order
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

impl Category {
    /// Description text, with an absent description read as empty.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Check that every criterion points back at this category.
    pub fn criteria_consistent(&self) -> bool {
        self.criteria.iter().all(|c| c.category_id == self.id)
    }

    /// Routing key for this category.
    pub fn key(&self) -> CategoryKey {
        CategoryKey::from(self.id)
    }
}

/// One eligibility rule of a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Criterion {
    pub id: i64,
    pub category_id: i64,
    pub title: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Category identifier as it arrives from a route.
///
/// Routes hand us text; listings hand us integers. Both forms address the
/// same upstream resource, so the key keeps the textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form, safe to splice into a URL path.
    pub fn path_segment(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl From<i64> for CategoryKey {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for CategoryKey {
    fn from(id: &str) -> Self {
        Self(id.trim().to_string())
    }
}

impl From<String> for CategoryKey {
    fn from(id: String) -> Self {
        Self::from(id.as_str())
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
