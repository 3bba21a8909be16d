//! Vote handoff
//!
//! Voting happens on a third-party site. The only thing this crate does is
//! compute where to send the browser.

use serde::Serialize;

use crate::models::CategoryKey;

/// Navigation target for voting in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteHandoff {
    pub category: CategoryKey,
    pub url: String,
}

impl VoteHandoff {
    pub fn new(site_url: &str, category: CategoryKey) -> Self {
        let url = vote_url(site_url, &category);
        Self { category, url }
    }
}

/// `{site_url}/category/{id}`
pub fn vote_url(site_url: &str, category: &CategoryKey) -> String {
    format!(
        "{}/category/{}",
        site_url.trim_end_matches('/'),
        category.path_segment()
    )
}

/// Local route that redirects to the vote site for `category`
pub fn vote_path(category: &CategoryKey) -> String {
    format!("/tca/category/{}/vote", category.path_segment())
}
