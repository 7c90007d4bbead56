use super::{Corpus, LoadReport, MAX_RESULTS};
use crate::error::{LoadError, QueryError};
use crate::payload::{Decoded, PackagePayload};
use crate::search::{RankingPolicy, SearchHit, SearchOptions};
use arc_swap::ArcSwapOption;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

/// The process-wide "current corpus".
///
/// Loads build a complete corpus off to the side and publish it with one atomic
/// store. Readers take a single snapshot per call, so a query never sees two
/// generations, and a reader holding an older snapshot keeps it alive until done.
pub struct CorpusHandle {
    current: ArcSwapOption<Corpus>,
    last_report: ArcSwapOption<LoadReport>,
    generation: AtomicU64,
    /// Serializes writers so generations are published in order.
    publishing: Mutex<()>,
    policy: RankingPolicy,
    max_results: usize,
}

impl Default for CorpusHandle {
    fn default() -> Self {
        Self::new(RankingPolicy::default(), MAX_RESULTS)
    }
}

impl CorpusHandle {
    pub fn new(policy: RankingPolicy, max_results: usize) -> Self {
        Self {
            current: ArcSwapOption::empty(),
            last_report: ArcSwapOption::empty(),
            generation: AtomicU64::new(0),
            publishing: Mutex::new(()),
            policy,
            max_results,
        }
    }

    /// Build and publish the first corpus.
    pub fn load(&self, payloads: &[PackagePayload]) -> LoadReport {
        self.publish(payloads, vec![])
    }

    /// Replace the current corpus. Queries already running finish on the old one.
    pub fn reload(&self, payloads: &[PackagePayload]) -> LoadReport {
        let previous = self.current.load_full().map(|c| c.generation());
        let report = self.publish(payloads, vec![]);
        tracing::info!(
            "Reloaded corpus: generation {:?} → {}",
            previous,
            report.generation
        );
        report
    }

    /// Publish the output of the file loader, keeping its decode failures in the report.
    pub fn load_decoded(&self, decoded: Decoded) -> LoadReport {
        self.publish(&decoded.packages, decoded.errors)
    }

    fn publish(&self, payloads: &[PackagePayload], errors: Vec<LoadError>) -> LoadReport {
        let _guard = self
            .publishing
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (corpus, mut report) = Corpus::load(payloads, self.policy.clone());
        let corpus = corpus
            .with_generation(generation)
            .with_max_results(self.max_results);

        report.generation = generation;
        report.extend_errors(errors);

        self.current.store(Some(Arc::new(corpus)));
        self.last_report.store(Some(Arc::new(report.clone())));
        report
    }

    /// Snapshot of the current corpus.
    pub fn current(&self) -> Result<Arc<Corpus>, QueryError> {
        self.current.load_full().ok_or(QueryError::CorpusNotLoaded)
    }

    /// Report of the most recent load, if any.
    pub fn last_report(&self) -> Option<Arc<LoadReport>> {
        self.last_report.load_full()
    }

    pub fn query(&self, text: &str, limit: usize) -> Result<Vec<SearchHit>, QueryError> {
        Ok(self.current()?.query(text, limit))
    }

    pub fn search(&self, options: &SearchOptions<'_>) -> Result<Vec<SearchHit>, QueryError> {
        Ok(self.current()?.search(options))
    }
}
