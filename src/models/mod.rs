//! Data models
//!
//! Value records decoded from the upstream nominee API:
//! - Category and its eligibility Criterion list
//! - Nominee with vote and follower counts
//! - CategoryNomineesResponse, the per-category composite
//!
//! Records are never mutated after decoding; views only re-derive over them.

mod category;
mod nominee;

pub use category::{Category, CategoryKey, Criterion};
pub use nominee::{CategoryNomineesResponse, Nominee};
