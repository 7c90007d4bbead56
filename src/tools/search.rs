//! Ranked search across loaded packages.

use crate::corpus::Corpus;
use crate::item::ItemKind;
use crate::search::{SearchHit, SearchOptions};
use crate::state::SearchState;
use rapidfuzz::distance::jaro_winkler;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Name, partial name, `path::Name` or type signature such as `(&[u8]) -> Packet`
    pub query: String,
    /// Only search this package
    #[serde(default)]
    pub package: Option<String>,
    /// Only return items of this kind
    #[serde(default)]
    pub kind: Option<ItemKind>,
    /// Maximum number of results to return (default from config, usually 10)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Minimum Jaro-Winkler similarity for a package suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;
const MAX_SUGGESTIONS: usize = 5;

/// Loaded package names similar to `name`, best first.
pub(crate) fn suggest_packages(corpus: &Corpus, name: &str) -> Vec<(String, f64)> {
    let mut suggestions: Vec<(String, f64)> = corpus
        .packages()
        .iter()
        .map(|p| {
            let score = jaro_winkler::similarity(name.chars(), p.name.chars());
            (p.name.to_string(), score)
        })
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .collect();
    suggestions.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

/// Execute the search tool.
pub fn handle_search(state: &SearchState, request: SearchRequest) -> Result<String, String> {
    let corpus = state.handle().current().map_err(|e| e.to_string())?;

    if let Some(package) = &request.package
        && corpus.store().package(package).is_none()
    {
        let suggestions = suggest_packages(&corpus, package);
        if suggestions.is_empty() {
            let loaded: Vec<&str> = corpus.packages().iter().map(|p| &*p.name).collect();
            return Err(format!(
                "Package '{}' not found. Loaded packages: {}",
                package,
                loaded.join(", ")
            ));
        }

        let mut result = format!("Package '{}' not found. Did you mean one of these?\n\n", package);
        for (name, _) in suggestions {
            let _ = writeln!(result, "• `{}`", name);
        }
        return Ok(result);
    }

    let kinds: Vec<ItemKind> = request.kind.into_iter().collect();
    let mut options = SearchOptions::new(&request.query, state.config().limit(request.limit))
        .of_kinds(&kinds);
    if let Some(package) = &request.package {
        options = options.in_package(package);
    }

    let hits = corpus.search(&options);
    if hits.is_empty() {
        return Ok(no_results(&request));
    }
    Ok(format_search_results(
        &hits,
        &request.query,
        request.package.as_deref(),
    ))
}

fn no_results(request: &SearchRequest) -> String {
    let mut msg = format!("No results found for '{}'", request.query);
    if let Some(package) = &request.package {
        let _ = write!(msg, " in package '{}'", package);
    }
    msg.push_str(".\n\nSearch tips:\n");
    msg.push_str("• Try a shorter prefix: 'seq' matches 'sequence_id'\n");
    msg.push_str("• Search words inside names: 'id' matches 'last_sent_sequence_id'\n");
    msg.push_str("• Search by signature: '(&[u8]) -> Packet'\n");
    msg.push_str("• Descriptions are stemmed: 'transferring' matches 'transfer'\n");
    if request.kind.is_some() {
        msg.push_str("• Drop the kind filter to widen the search\n");
    }
    msg
}

/// Format hits into a readable listing with relative relevance.
pub fn format_search_results(hits: &[SearchHit], query: &str, package: Option<&str>) -> String {
    let mut output = format!("Search results for '{}'", query);
    if let Some(package) = package {
        let _ = write!(output, " in '{}'", package);
    }
    output.push_str(":\n\n");

    let max_score = hits.first().map_or(1.0, |h| h.score.max(f32::EPSILON));
    for (idx, hit) in hits.iter().enumerate() {
        let relevance = ((hit.score / max_score) * 100.0).round() as u8;
        let _ = writeln!(
            output,
            "{}. `{}` ({}) - relevance: {}%",
            idx + 1,
            hit.qualified_path(),
            hit.kind,
            relevance
        );

        if let Some(first_line) = hit.summary.lines().find(|line| !line.trim().is_empty()) {
            let _ = writeln!(output, "   {}", first_line.trim());
        }
        output.push('\n');
    }

    output
}
