//! Engine configuration loaded from TOML.
//!
//! ```toml
//! payloads = ["docs/search-index.js"]
//!
//! [search]
//! default_limit = 10
//! max_results = 100
//!
//! [ranking]
//! exact_weight = 1000.0
//! kind_weights = { struct = 12.0, function = 6.0 }
//! ```

use crate::corpus::{CorpusHandle, MAX_RESULTS};
use crate::error::Result;
use crate::search::RankingPolicy;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
const CONFIG_DIR: &str = "docsearch";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSettings {
    /// Results returned when a caller gives no limit.
    pub default_limit: usize,
    /// Hard cap on results per query.
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_results: MAX_RESULTS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Payload files loaded when none are given on the command line.
    pub payloads: Vec<PathBuf>,
    pub search: SearchSettings,
    pub ranking: RankingPolicy,
}

impl EngineConfig {
    /// Default config file location, e.g. `~/.config/docsearch/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location if it exists, or use defaults.
    ///
    /// An explicit path must exist. Relative payload paths are resolved against the
    /// config file's directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => path,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config = Self::parse(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;

        if let Some(base) = path.parent() {
            for payload in &mut config.payloads {
                if payload.is_relative() {
                    *payload = base.join(&*payload);
                }
            }
        }

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.ranking
            .validate()
            .context("Invalid [ranking] weights")?;
        anyhow::ensure!(
            self.search.max_results > 0,
            "[search] max_results must be at least 1"
        );
        Ok(())
    }

    /// A fresh handle using this configuration's policy and result cap.
    pub fn handle(&self) -> CorpusHandle {
        CorpusHandle::new(self.ranking.clone(), self.search.max_results)
    }

    /// Requested limit, or the default, capped at `max_results`.
    pub fn limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.search.default_limit)
            .min(self.search.max_results)
    }
}
