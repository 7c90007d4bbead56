//! Shared state of a running search session.

use crate::config::EngineConfig;
use crate::corpus::{CorpusHandle, LoadReport};
use crate::payload::read_payloads;
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The current corpus plus where it was loaded from.
pub struct SearchState {
    handle: Arc<CorpusHandle>,
    config: EngineConfig,
    /// Payload files of the published corpus; locked for the whole of each load
    sources: Mutex<Vec<PathBuf>>,
}

impl std::fmt::Debug for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchState")
            .field(
                "generation",
                &self.handle.current().ok().map(|c| c.generation()),
            )
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SearchState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            handle: Arc::new(config.handle()),
            config,
            sources: Mutex::new(vec![]),
        }
    }

    pub fn handle(&self) -> &CorpusHandle {
        &self.handle
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn sources(&self) -> Vec<PathBuf> {
        self.sources.lock().await.clone()
    }

    /// Read `paths` and publish a corpus built from them.
    ///
    /// Unreadable files are reported, not fatal. Index building runs on the
    /// blocking pool.
    pub async fn load(&self, paths: Vec<PathBuf>) -> anyhow::Result<LoadReport> {
        let mut sources = self.sources.lock().await;
        self.load_locked(&mut sources, paths).await
    }

    /// Reload from the most recent sources.
    pub async fn reload(&self) -> anyhow::Result<LoadReport> {
        let mut sources = self.sources.lock().await;
        let paths = sources.clone();
        self.load_locked(&mut sources, paths).await
    }

    async fn load_locked(
        &self,
        sources: &mut Vec<PathBuf>,
        paths: Vec<PathBuf>,
    ) -> anyhow::Result<LoadReport> {
        let decoded = read_payloads(&paths).await;
        let handle = Arc::clone(&self.handle);
        let report = tokio::task::spawn_blocking(move || handle.load_decoded(decoded))
            .await
            .context("Corpus build task failed")?;

        tracing::info!(
            "Published corpus generation {} from {} source(s)",
            report.generation,
            paths.len()
        );
        *sources = paths;
        Ok(report)
    }
}
