//! Place-name matching and ranking against GADM-style reference tables.
//!
//! - [`score`]: pluggable string similarity ([`TokenSetScorer`] by default).
//! - [`matcher`]: scan one (version, level) table for one query.
//! - [`engine`]: run a query batch over every table and rank the results.

pub mod engine;
pub mod matcher;
pub mod score;

pub use engine::{BatchMatchEngine, rank, run, run_with_budget};
pub use matcher::{TableMatcher, find_matches};
pub use score::{SimilarityScorer, TokenSetScorer, token_set_ratio};
