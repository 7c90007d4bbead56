//! A loaded, queryable set of packages.
//!
//! [`Corpus`] bundles an item store, its search index and the ranking policy.
//! It is immutable once built; [`CorpusHandle`] swaps whole corpora in and out.

mod handle;
mod report;

pub use handle::CorpusHandle;
pub use report::{LoadReport, PackageOutcome, PackageReport};

use crate::item::{ItemStore, Package, path::resolve_in_place};
use crate::payload::PackagePayload;
use crate::search::{QueryEngine, RankingPolicy, SearchHit, SearchIndex, SearchOptions};

/// Default cap on results returned by one query.
pub const MAX_RESULTS: usize = 100;

#[derive(Debug)]
pub struct Corpus {
    generation: u64,
    store: ItemStore,
    index: SearchIndex,
    policy: RankingPolicy,
    max_results: usize,
}

impl Corpus {
    /// Build a corpus from decoded payloads.
    ///
    /// A malformed package is rejected as a whole and reported; the remaining
    /// packages still load. Dangling path references only produce warnings.
    pub fn load(payloads: &[PackagePayload], policy: RankingPolicy) -> (Self, LoadReport) {
        let mut store = ItemStore::default();
        let mut report = LoadReport::default();

        for payload in payloads {
            match store.add_package(payload) {
                Ok(items) => {
                    tracing::debug!("Loaded package '{}' ({} items)", payload.name, items);
                    report.loaded(&payload.name, items);
                }
                Err(e) => {
                    tracing::warn!("Rejected package '{}': {}", payload.name, e);
                    report.rejected(&payload.name, e);
                }
            }
        }

        report.extend_errors(resolve_in_place(&mut store));
        let index = SearchIndex::build(&store);

        let corpus = Self {
            generation: 0,
            store,
            index,
            policy,
            max_results: MAX_RESULTS,
        };
        (corpus, report)
    }

    #[must_use]
    pub const fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub(crate) const fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub const fn store(&self) -> &ItemStore {
        &self.store
    }

    pub const fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub const fn policy(&self) -> &RankingPolicy {
        &self.policy
    }

    pub fn packages(&self) -> &[Package] {
        self.store.packages()
    }

    /// Ranked results for `text`, at most `limit` of them.
    pub fn query(&self, text: &str, limit: usize) -> Vec<SearchHit> {
        self.search(&SearchOptions::new(text, limit))
    }

    /// Ranked results with package and kind filters applied.
    pub fn search(&self, options: &SearchOptions<'_>) -> Vec<SearchHit> {
        let options = SearchOptions {
            limit: options.limit.min(self.max_results),
            ..*options
        };
        QueryEngine {
            store: &self.store,
            index: &self.index,
            policy: &self.policy,
        }
        .search(&options)
    }
}
