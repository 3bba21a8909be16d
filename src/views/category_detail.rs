//! Category detail view
//!
//! Fetches one category's nominees by identifier and ranks them by vote
//! count. Loading another identifier restarts from `Loading`; a response
//! for a superseded identifier is dropped.

use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::client::{FetchError, NomineeApi};
use crate::models::{Category, CategoryKey, CategoryNomineesResponse, Nominee};

use super::fetch::{FetchSlot, FetchToken};
use super::state::{log_fetch_failure, ViewStatus, DETAIL_ERROR_MESSAGE};
use super::vote::{vote_path, VoteHandoff};

/// Nominees ordered by `total_vote_count`, highest first.
///
/// The sort is stable: equal counts keep their response order.
pub fn rank_nominees(nominees: &[Nominee]) -> Vec<Nominee> {
    let mut ranked = nominees.to_vec();
    ranked.sort_by(|a, b| b.total_vote_count.cmp(&a.total_vote_count));
    ranked
}

/// Podium styling for the top three ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankTier {
    Gold,
    Silver,
    Bronze,
    Standard,
}

impl RankTier {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => RankTier::Gold,
            2 => RankTier::Silver,
            3 => RankTier::Bronze,
            _ => RankTier::Standard,
        }
    }
}

/// Group digits in threes: `1234567` → `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One row of the ranked table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNominee {
    /// 1-based position after ranking
    pub rank: usize,
    pub tier: RankTier,
    pub nominee_id: String,
    pub name: String,
    pub username: String,
    pub image: String,
    /// Follower count as received
    pub followers: String,
    pub votes: u64,
    /// Vote count with digit grouping
    pub votes_display: String,
}

impl RankedNominee {
    fn new(rank: usize, nominee: Nominee) -> Self {
        Self {
            rank,
            tier: RankTier::for_rank(rank),
            votes_display: group_thousands(nominee.total_vote_count),
            votes: nominee.total_vote_count,
            nominee_id: nominee.nominee_id,
            name: nominee.name,
            username: nominee.username,
            image: nominee.image,
            followers: nominee.number_of_followers,
        }
    }
}

/// Rank and label a nominee collection
pub fn ranked_rows(nominees: &[Nominee]) -> Vec<RankedNominee> {
    rank_nominees(nominees)
        .into_iter()
        .enumerate()
        .map(|(i, nominee)| RankedNominee::new(i + 1, nominee))
        .collect()
}

/// Category header shown above the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryHeader {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image: String,
    pub criteria: Vec<String>,
}

impl From<&Category> for CategoryHeader {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
            image: category.image.clone(),
            criteria: category.criteria.iter().map(|c| c.title.clone()).collect(),
        }
    }
}

/// Render-ready state of a detail view
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDetailSnapshot {
    /// Identifier being shown, once one was loaded
    pub category_id: Option<CategoryKey>,
    /// Present once the response arrived
    pub category: Option<CategoryHeader>,
    pub status: ViewStatus<Vec<RankedNominee>>,
    pub nominee_count: usize,
    pub vote: Option<VoteHandoff>,
    /// Percent-encoded local vote route for the loaded identifier
    pub vote_path: Option<String>,
}

#[derive(Debug, Default)]
struct DetailState {
    key: Option<CategoryKey>,
    data: Option<CategoryNomineesResponse>,
    error: Option<String>,
}

/// Category detail view
pub struct CategoryDetailView {
    api: Arc<dyn NomineeApi>,
    vote_site_url: String,
    slot: FetchSlot,
    state: RwLock<DetailState>,
}

impl CategoryDetailView {
    pub fn new(api: Arc<dyn NomineeApi>, vote_site_url: impl Into<String>) -> Self {
        Self {
            api,
            vote_site_url: vote_site_url.into(),
            slot: FetchSlot::new(),
            state: RwLock::new(DetailState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, DetailState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DetailState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch nominees for `key` and commit the result if still current
    pub async fn load(&self, key: impl Into<CategoryKey>) {
        let key = key.into();
        let token = self.begin_fetch(key.clone());
        let result = self.api.category_nominees(&key).await;
        self.complete_fetch(&token, result);
    }

    /// Switch to `key`, reset to loading, and issue the token for its fetch
    pub fn begin_fetch(&self, key: CategoryKey) -> FetchToken {
        let mut state = self.write();
        let token = self.slot.issue();
        tracing::debug!(seq = token.seq(), category = %key, "Category nominees fetch issued");
        state.key = Some(key);
        state.data = None;
        state.error = None;
        token
    }

    /// Commit a fetch result unless its token was cancelled.
    ///
    /// Returns whether the result was committed.
    pub fn complete_fetch(
        &self,
        token: &FetchToken,
        result: Result<CategoryNomineesResponse, FetchError>,
    ) -> bool {
        let mut state = self.write();
        if token.is_cancelled() {
            tracing::debug!(seq = token.seq(), "Discarding category nominees for superseded fetch");
            return false;
        }

        match result {
            Ok(response) => {
                tracing::debug!(
                    seq = token.seq(),
                    category = response.category.id,
                    nominees = response.nominees.len(),
                    "Category nominees loaded"
                );
                state.data = Some(response);
            }
            Err(e) => {
                log_fetch_failure("category_detail", &e);
                state.error = Some(DETAIL_ERROR_MESSAGE.to_string());
            }
        }
        true
    }

    /// Stop accepting results for in-flight fetches
    pub fn deactivate(&self) {
        self.slot.cancel();
    }

    /// Identifier currently shown
    pub fn category_key(&self) -> Option<CategoryKey> {
        self.read().key.clone()
    }

    pub fn category(&self) -> Option<Category> {
        self.read().data.as_ref().map(|d| d.category.clone())
    }

    pub fn is_loading(&self) -> bool {
        let state = self.read();
        state.data.is_none() && state.error.is_none()
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    /// Nominees of the loaded category, ranked
    pub fn ranked(&self) -> Vec<RankedNominee> {
        self.read()
            .data
            .as_ref()
            .map(|d| ranked_rows(&d.nominees))
            .unwrap_or_default()
    }

    pub fn status(&self) -> ViewStatus<Vec<RankedNominee>> {
        let state = self.read();
        Self::status_of(&state)
    }

    fn status_of(state: &DetailState) -> ViewStatus<Vec<RankedNominee>> {
        let loading = state.data.is_none() && state.error.is_none();
        let rows = state
            .data
            .as_ref()
            .map(|d| ranked_rows(&d.nominees))
            .filter(|rows| !rows.is_empty());
        ViewStatus::resolve(loading, state.error.as_deref(), rows)
    }

    /// Where to send the browser to vote in the current category.
    ///
    /// Does not touch view state.
    pub fn initiate_vote(&self) -> Option<VoteHandoff> {
        self.read()
            .key
            .clone()
            .map(|key| VoteHandoff::new(&self.vote_site_url, key))
    }

    pub fn snapshot(&self) -> CategoryDetailSnapshot {
        let state = self.read();
        CategoryDetailSnapshot {
            category_id: state.key.clone(),
            category: state.data.as_ref().map(|d| CategoryHeader::from(&d.category)),
            status: Self::status_of(&state),
            nominee_count: state.data.as_ref().map_or(0, |d| d.nominees.len()),
            vote: state
                .key
                .clone()
                .map(|key| VoteHandoff::new(&self.vote_site_url, key)),
            vote_path: state.key.as_ref().map(vote_path),
        }
    }
}

impl Drop for CategoryDetailView {
    fn drop(&mut self) {
        self.slot.cancel();
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::client::testing::nominee;
    use proptest::prelude::*;

    fn nominees_strategy() -> impl Strategy<Value = Vec<Nominee>> {
        proptest::collection::vec(0u64..5, 0..20).prop_map(|votes| {
            votes
                .into_iter()
                .enumerate()
                .map(|(i, v)| nominee(&format!("n{}", i), v))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Vote counts never increase down the ranking.
        #[test]
        fn rank_is_non_increasing(nominees in nominees_strategy()) {
            let ranked = rank_nominees(&nominees);
            prop_assert_eq!(ranked.len(), nominees.len());
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].total_vote_count >= pair[1].total_vote_count);
            }
        }

        /// Nominees with equal counts keep their response order.
        #[test]
        fn rank_ties_are_stable(nominees in nominees_strategy()) {
            let ranked = rank_nominees(&nominees);
            let position = |id: &str| nominees.iter().position(|n| n.nominee_id == id).unwrap();

            for pair in ranked.windows(2) {
                if pair[0].total_vote_count == pair[1].total_vote_count {
                    prop_assert!(position(&pair[0].nominee_id) < position(&pair[1].nominee_id));
                }
            }
        }

        /// Rank labels are 1..=n in order.
        #[test]
        fn rank_labels_are_positions(nominees in nominees_strategy()) {
            let rows = ranked_rows(&nominees);
            for (i, row) in rows.iter().enumerate() {
                prop_assert_eq!(row.rank, i + 1);
            }
        }
    }
}
