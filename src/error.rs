//! Error handling types and utilities.

/// A specialized Result type for docsearch application code.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods in configuration loading and the binary.
pub type Result<T> = anyhow::Result<T>;

/// Structural problem found while loading payloads.
///
/// `MalformedItem`, `MalformedPathEntry` and `Decode` reject a whole package
/// or source;
/// `DanglingPathReference` is only a warning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// A record with an unknown kind, a missing name, a parent cycle or a duplicate package.
    #[error("malformed item in package '{package}' at record {offset}: {reason}")]
    MalformedItem {
        package: String,
        offset: usize,
        reason: String,
    },
    /// A path-table entry with a missing or unknown kind.
    #[error("malformed path entry {index} in package '{package}': {reason}")]
    MalformedPathEntry {
        package: String,
        index: usize,
        reason: String,
    },
    /// A path-table reference that points at a nonexistent local index.
    #[error(
        "dangling path reference in package '{package}': record {offset} refers to missing path entry {index}"
    )]
    DanglingPathReference {
        package: String,
        offset: usize,
        index: usize,
    },
    /// A payload source that could not be read or decoded at all.
    #[error("failed to decode payload '{source_name}': {error}")]
    Decode { source_name: String, error: String },
}

impl LoadError {
    pub(crate) fn malformed(package: &str, offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedItem {
            package: package.to_string(),
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(source_name: impl Into<String>, error: impl ToString) -> Self {
        Self::Decode {
            source_name: source_name.into(),
            error: error.to_string(),
        }
    }

    /// Whether this error only degrades output instead of rejecting a package.
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::DanglingPathReference { .. })
    }
}

/// Error returned by query entry points that need a published corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("no corpus loaded: load payloads before querying")]
    CorpusNotLoaded,
}
