//! Search infrastructure over the item store.
//!
//! This module provides tokenization, index construction, scoring, query
//! classification and result ranking.

// Module declarations
pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod ranking;
pub(crate) mod scoring;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use index::{IndexStats, SearchIndex};
pub use query::{ParsedQuery, QueryPath, SearchHit, SearchOptions, classify, parse_item_path};
pub use ranking::{Candidate, rank};
pub use scoring::{MatchTier, PolicyError, RankingPolicy};

// Internal re-exports
pub(crate) use query::QueryEngine;
