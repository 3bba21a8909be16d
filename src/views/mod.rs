//! View layer
//!
//! Each view owns one fetch pipeline: fetch → decode → derive → render state.
//! - `CategoryListView`: category grid with live search
//! - `CategoryDetailView`: ranked nominee table with the vote handoff
//!
//! Views hold isolated state. A fetch result commits only if the token it
//! was issued with is still live, so deactivated views and superseded
//! fetches never write.

mod category_detail;
mod category_list;
mod fetch;
mod state;
mod vote;

pub use category_detail::{
    group_thousands, rank_nominees, ranked_rows, CategoryDetailSnapshot, CategoryDetailView,
    CategoryHeader, RankTier, RankedNominee,
};
pub use category_list::{
    filter_categories, normalize_term, CategoryCard, CategoryListSnapshot, CategoryListView,
};
pub use fetch::{FetchSlot, FetchToken};
pub use state::{ViewStatus, DETAIL_ERROR_MESSAGE, LIST_ERROR_MESSAGE};
pub use vote::{vote_path, vote_url, VoteHandoff};
