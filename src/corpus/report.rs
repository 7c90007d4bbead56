use crate::error::LoadError;
use std::fmt;

/// What happened to one package during a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    Loaded { items: usize },
    Rejected(LoadError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    pub package: String,
    pub outcome: PackageOutcome,
}

/// Outcome of building one corpus.
///
/// Lists every package with its outcome, plus source-level decode failures and
/// warnings. A report with rejections still comes with a usable corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub generation: u64,
    packages: Vec<PackageReport>,
    failures: Vec<LoadError>,
    warnings: Vec<LoadError>,
}

impl LoadReport {
    pub(crate) fn loaded(&mut self, package: &str, items: usize) {
        self.packages.push(PackageReport {
            package: package.to_string(),
            outcome: PackageOutcome::Loaded { items },
        });
    }

    pub(crate) fn rejected(&mut self, package: &str, error: LoadError) {
        self.packages.push(PackageReport {
            package: package.to_string(),
            outcome: PackageOutcome::Rejected(error),
        });
    }

    /// Record errors that belong to no single package, sorted by severity.
    pub fn extend_errors(&mut self, errors: impl IntoIterator<Item = LoadError>) {
        for error in errors {
            if error.is_warning() {
                self.warnings.push(error);
            } else {
                self.failures.push(error);
            }
        }
    }

    pub fn packages(&self) -> &[PackageReport] {
        &self.packages
    }

    /// Number of items across loaded packages.
    pub fn item_count(&self) -> usize {
        self.packages
            .iter()
            .map(|p| match p.outcome {
                PackageOutcome::Loaded { items } => items,
                PackageOutcome::Rejected(_) => 0,
            })
            .sum()
    }

    /// Package rejections followed by source decode failures.
    pub fn errors(&self) -> impl Iterator<Item = &LoadError> {
        self.packages
            .iter()
            .filter_map(|p| match &p.outcome {
                PackageOutcome::Rejected(error) => Some(error),
                PackageOutcome::Loaded { .. } => None,
            })
            .chain(&self.failures)
    }

    /// Names of rejected packages.
    pub fn rejected_packages(&self) -> impl Iterator<Item = &str> {
        self.packages
            .iter()
            .filter(|p| matches!(p.outcome, PackageOutcome::Rejected(_)))
            .map(|p| p.package.as_str())
    }

    pub fn warnings(&self) -> &[LoadError] {
        &self.warnings
    }

    /// True when nothing was rejected and nothing warned.
    pub fn is_clean(&self) -> bool {
        self.errors().next().is_none() && self.warnings.is_empty()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded = self
            .packages
            .iter()
            .filter(|p| matches!(p.outcome, PackageOutcome::Loaded { .. }))
            .count();
        writeln!(
            f,
            "Generation {}: loaded {} package(s) with {} item(s)",
            self.generation,
            loaded,
            self.item_count()
        )?;

        for error in self.errors() {
            writeln!(f, "  error: {error}")?;
        }
        for warning in &self.warnings {
            writeln!(f, "  warning: {warning}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn test_report_accessors() {
        let mut report = LoadReport::default();
        report.loaded("r", 3);
        report.rejected("q", LoadError::malformed("q", 1, "unknown kind code 7"));
        report.extend_errors([
            LoadError::decode("broken.json", "expected value"),
            LoadError::DanglingPathReference {
                package: "r".to_string(),
                offset: 2,
                index: 9,
            },
        ]);

        check!(!report.is_clean());
        check!(report.item_count() == 3);
        check!(report.errors().count() == 2);
        check!(report.warnings().len() == 1);
        check!(report.rejected_packages().collect::<Vec<_>>() == ["q"]);

        let text = report.to_string();
        check!(text.starts_with("Generation 0: loaded 1 package(s) with 3 item(s)"));
        check!(text.contains("error: malformed item in package 'q' at record 1"));
        check!(text.contains("warning: dangling path reference"));
    }

    #[test]
    fn test_empty_report_is_clean() {
        check!(LoadReport::default().is_clean());
    }
}
