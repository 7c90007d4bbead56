use crate::server::expand_tilde;
use crate::state::SearchState;
use rmcp::schemars;
use serde::Deserialize;
use std::path::PathBuf;

/// Parameters for reload tool
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReloadRequest {
    /// Payload files to load instead of the current ones (`~` is expanded)
    #[serde(default)]
    pub paths: Option<Vec<String>>,
}

/// Rebuild the corpus and publish it atomically.
///
/// Queries running during the rebuild finish against the previous corpus.
pub async fn handle_reload(state: &SearchState, request: ReloadRequest) -> Result<String, String> {
    let report = match request.paths {
        Some(paths) => {
            let paths: Vec<PathBuf> = paths
                .iter()
                .map(|p| PathBuf::from(expand_tilde(p).as_ref()))
                .collect();
            state.load(paths).await
        }
        None => state.reload().await,
    }
    .map_err(|e| format!("Reload failed: {:#}", e))?;

    Ok(report.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use assert2::check;

    #[tokio::test]
    async fn test_reload_from_new_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        std::fs::write(
            &path,
            r#"{"name": "p", "items": [{"kind": "struct", "name": "Packet"}]}"#,
        )
        .unwrap();

        let state = SearchState::new(EngineConfig::default());
        let output = handle_reload(
            &state,
            ReloadRequest {
                paths: Some(vec![path.display().to_string()]),
            },
        )
        .await
        .unwrap();

        check!(output.starts_with("Generation 1: loaded 1 package(s) with 1 item(s)"));
        check!(state.sources().await == [path]);

        let output = handle_reload(&state, ReloadRequest { paths: None })
            .await
            .unwrap();
        check!(output.starts_with("Generation 2:"));
    }

    #[tokio::test]
    async fn test_reload_reports_unreadable_files() {
        let state = SearchState::new(EngineConfig::default());
        let output = handle_reload(
            &state,
            ReloadRequest {
                paths: Some(vec!["/nonexistent/index.js".to_string()]),
            },
        )
        .await
        .unwrap();

        check!(output.contains("loaded 0 package(s)"));
        check!(output.contains("error: failed to decode payload '/nonexistent/index.js'"));
    }
}
