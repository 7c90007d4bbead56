use crate::corpus::PackageOutcome;
use crate::state::SearchState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

/// Parameters for list_packages tool
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListPackagesRequest {
    /// Also list rejected packages and load warnings
    #[serde(default)]
    pub include_problems: bool,
}

/// List loaded packages with item counts.
pub fn handle_list_packages(
    state: &SearchState,
    request: ListPackagesRequest,
) -> Result<String, String> {
    let corpus = state.handle().current().map_err(|e| e.to_string())?;

    let mut output = format!(
        "Packages ({}), generation {}:\n",
        corpus.packages().len(),
        corpus.generation()
    );
    for package in corpus.packages() {
        let _ = writeln!(output, "  • {} ({} items)", package.name, package.item_count());
    }

    if request.include_problems
        && let Some(report) = state.handle().last_report()
    {
        for entry in report.packages() {
            if let PackageOutcome::Rejected(error) = &entry.outcome {
                let _ = writeln!(output, "  ✗ {}: {}", entry.package, error);
            }
        }
        if !report.warnings().is_empty() {
            let _ = writeln!(output, "\nWarnings ({}):", report.warnings().len());
            for warning in report.warnings() {
                let _ = writeln!(output, "  - {}", warning);
            }
        }
    }

    Ok(output)
}
