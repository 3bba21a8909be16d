//! Nominee model
//!
//! Candidates of one category, as returned by
//! `GET /api/category-nominees/{id}`.

use serde::{Deserialize, Deserializer, Serialize};

use super::Category;

/// A candidate within a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Nominee {
    /// Unique identifier
    pub nominee_id: String,
    /// Display name
    pub name: String,
    /// Social handle, without the leading `@`
    #[serde(default)]
    pub username: String,
    /// Avatar URL
    #[serde(default)]
    pub image: String,
    /// Follower count, kept as display text
    #[serde(default, deserialize_with = "text_or_number")]
    pub number_of_followers: String,
    /// Owning category
    #[serde(default)]
    pub category_id: i64,
    /// Votes received so far
    #[serde(default)]
    pub total_vote_count: u64,
}

/// A category together with its nominees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryNomineesResponse {
    pub category: Category,
    #[serde(default)]
    pub nominees: Vec<Nominee>,
}

/// Follower counts are documented as strings but some records carry numbers.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Number(n) => n.to_string(),
        TextOrNumber::Null(()) => String::new(),
    })
}
