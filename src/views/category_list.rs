//! Category listing view
//!
//! Fetches the category collection once per activation and exposes a
//! search-filtered projection of it. Changing the search term only
//! re-derives; it never re-fetches.

use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::client::{FetchError, NomineeApi};
use crate::models::Category;

use super::fetch::{FetchSlot, FetchToken};
use super::state::{log_fetch_failure, ViewStatus, LIST_ERROR_MESSAGE};

/// Normalize a search term: trimmed and lower-cased
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Whether a category matches an already normalized term
fn matches_term(category: &Category, normalized: &str) -> bool {
    category.name.to_lowercase().contains(normalized)
        || category.description_text().to_lowercase().contains(normalized)
}

/// Categories whose name or description contains `term`, case-insensitively.
///
/// A blank term keeps every category. Order is preserved.
pub fn filter_categories(categories: &[Category], term: &str) -> Vec<Category> {
    let normalized = normalize_term(term);
    if normalized.is_empty() {
        return categories.to_vec();
    }
    categories
        .iter()
        .filter(|c| matches_term(c, &normalized))
        .cloned()
        .collect()
}

/// One grid card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCard {
    pub id: i64,
    /// Route segment for the category page
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub image: String,
    pub criteria_count: usize,
}

impl From<&Category> for CategoryCard {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            key: category.key().path_segment(),
            name: category.name.clone(),
            description: category.description.clone(),
            image: category.image.clone(),
            criteria_count: category.criteria.len(),
        }
    }
}

/// Render-ready state of a listing view
#[derive(Debug, Clone, Serialize)]
pub struct CategoryListSnapshot {
    pub status: ViewStatus<Vec<CategoryCard>>,
    /// Search term as typed
    pub search_term: String,
    /// Categories after filtering
    pub shown: usize,
    /// Categories before filtering
    pub total: usize,
}

#[derive(Debug)]
struct ListState {
    categories: Vec<Category>,
    loading: bool,
    error: Option<String>,
    search_term: String,
}

/// Category listing view
pub struct CategoryListView {
    api: Arc<dyn NomineeApi>,
    slot: FetchSlot,
    state: RwLock<ListState>,
}

impl CategoryListView {
    /// Create an inactive view; it reports `Loading` until its first fetch lands
    pub fn new(api: Arc<dyn NomineeApi>) -> Self {
        Self {
            api,
            slot: FetchSlot::new(),
            state: RwLock::new(ListState {
                categories: Vec::new(),
                loading: true,
                error: None,
                search_term: String::new(),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ListState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ListState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the category collection and commit the result
    pub async fn activate(&self) {
        let token = self.begin_fetch();
        let result = self.api.list_categories().await;
        self.complete_fetch(&token, result);
    }

    /// Enter the loading state and issue the token for a new fetch
    pub fn begin_fetch(&self) -> FetchToken {
        let mut state = self.write();
        let token = self.slot.issue();
        state.loading = true;
        state.error = None;
        tracing::debug!(seq = token.seq(), "Category listing fetch issued");
        token
    }

    /// Commit a fetch result unless its token was cancelled.
    ///
    /// Returns whether the result was committed.
    pub fn complete_fetch(
        &self,
        token: &FetchToken,
        result: Result<Vec<Category>, FetchError>,
    ) -> bool {
        let mut state = self.write();
        if token.is_cancelled() {
            tracing::debug!(seq = token.seq(), "Discarding category listing for cancelled fetch");
            return false;
        }

        match result {
            Ok(categories) => {
                tracing::debug!(seq = token.seq(), count = categories.len(), "Category listing loaded");
                state.categories = categories;
            }
            Err(e) => {
                log_fetch_failure("category_list", &e);
                state.error = Some(LIST_ERROR_MESSAGE.to_string());
            }
        }
        state.loading = false;
        true
    }

    /// Stop accepting results for in-flight fetches
    pub fn deactivate(&self) {
        self.slot.cancel();
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        self.write().search_term = term.into();
    }

    pub fn search_term(&self) -> String {
        self.read().search_term.clone()
    }

    /// Last committed collection
    pub fn categories(&self) -> Vec<Category> {
        self.read().categories.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    /// Current collection filtered by the current search term
    pub fn filtered(&self) -> Vec<Category> {
        let state = self.read();
        filter_categories(&state.categories, &state.search_term)
    }

    pub fn status(&self) -> ViewStatus<Vec<Category>> {
        let state = self.read();
        let filtered = filter_categories(&state.categories, &state.search_term);
        let content = (!filtered.is_empty()).then_some(filtered);
        ViewStatus::resolve(state.loading, state.error.as_deref(), content)
    }

    pub fn snapshot(&self) -> CategoryListSnapshot {
        let state = self.read();
        let filtered = filter_categories(&state.categories, &state.search_term);
        let shown = filtered.len();
        let cards: Vec<CategoryCard> = filtered.iter().map(CategoryCard::from).collect();
        let content = (!cards.is_empty()).then_some(cards);

        CategoryListSnapshot {
            status: ViewStatus::resolve(state.loading, state.error.as_deref(), content),
            search_term: state.search_term.clone(),
            shown,
            total: state.categories.len(),
        }
    }
}

impl Drop for CategoryListView {
    fn drop(&mut self) {
        self.slot.cancel();
    }
}
