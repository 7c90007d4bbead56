//! Raw package payloads and the decoders that produce them.
//!
//! Payloads are the boundary between a documentation generator and the engine. The
//! engine never sees the wire encoding: the legacy `search-index.js` script and the
//! named-field JSON form both decode into [`PackagePayload`].

mod script;

pub use script::decode_script;

use crate::error::LoadError;
use crate::item::ItemKind;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};

/// Kind tag of a raw record: a legacy integer code or a kind name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawKind {
    Code(u64),
    Name(String),
}

impl RawKind {
    pub fn resolve(&self) -> Option<ItemKind> {
        match self {
            Self::Code(code) => ItemKind::from_code(*code),
            Self::Name(name) => name.parse().ok(),
        }
    }
}

impl From<ItemKind> for RawKind {
    fn from(kind: ItemKind) -> Self {
        Self::Name(kind.as_str().to_string())
    }
}

impl fmt::Display for RawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{}", code),
            Self::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// One item record as emitted by the documentation generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub kind: Option<RawKind>,
    #[serde(default)]
    pub name: String,
    /// Textual module path; empty means "same as the previous record".
    #[serde(default)]
    pub path: String,
    #[serde(default, alias = "desc")]
    pub summary: String,
    /// Local index into the package's path table.
    #[serde(default)]
    pub parent: Option<usize>,
    /// Type-like text such as `fn(&[u8]) -> Packet`.
    #[serde(default)]
    pub signature: Option<String>,
}

impl RawItem {
    pub fn new(kind: impl Into<RawKind>, name: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            name: name.into(),
            path: String::new(),
            summary: String::new(),
            parent: None,
            signature: None,
        }
    }

    #[must_use]
    pub fn in_module(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    #[must_use]
    pub const fn with_parent(mut self, path_index: usize) -> Self {
        self.parent = Some(path_index);
        self
    }

    #[must_use]
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }
}

/// A path-table entry: the short reference items use to name their parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPath {
    #[serde(default)]
    pub kind: Option<RawKind>,
    pub name: String,
    /// Local index of the enclosing path entry, if any.
    #[serde(default)]
    pub parent: Option<usize>,
}

impl RawPath {
    pub fn new(kind: impl Into<RawKind>, name: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            name: name.into(),
            parent: None,
        }
    }

    #[must_use]
    pub const fn with_parent(mut self, path_index: usize) -> Self {
        self.parent = Some(path_index);
        self
    }
}

/// Everything a generator emits for one package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagePayload {
    #[serde(alias = "package")]
    pub name: String,
    #[serde(default)]
    pub items: Vec<RawItem>,
    #[serde(default)]
    pub paths: Vec<RawPath>,
}

impl PackagePayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn item(mut self, item: RawItem) -> Self {
        self.items.push(item);
        self
    }

    #[must_use]
    pub fn path(mut self, path: RawPath) -> Self {
        self.paths.push(path);
        self
    }
}

/// Result of decoding one or more payload sources.
///
/// A source that fails to decode contributes an error but never prevents the other
/// sources from contributing packages.
#[derive(Debug, Default)]
pub struct Decoded {
    pub packages: Vec<PackagePayload>,
    pub errors: Vec<LoadError>,
}

impl Decoded {
    fn failed(error: LoadError) -> Self {
        Self {
            packages: vec![],
            errors: vec![error],
        }
    }

    pub fn merge(&mut self, other: Self) {
        self.packages.extend(other.packages);
        self.errors.extend(other.errors);
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    Many(Vec<PackagePayload>),
    One(PackagePayload),
}

/// Decode the named-field JSON form: a single package object or an array of them.
pub fn decode_json(source_name: &str, text: &str) -> Decoded {
    match serde_json::from_str::<JsonDocument>(text) {
        Ok(JsonDocument::Many(packages)) => Decoded {
            packages,
            errors: vec![],
        },
        Ok(JsonDocument::One(package)) => Decoded {
            packages: vec![package],
            errors: vec![],
        },
        Err(e) => Decoded::failed(LoadError::decode(source_name, e)),
    }
}

/// Decode `text` with the decoder matching the source's extension.
pub fn decode_source(source_name: &str, text: &str) -> Decoded {
    if source_name.ends_with(".js") {
        decode_script(source_name, text)
    } else {
        decode_json(source_name, text)
    }
}

/// Read and decode payload files concurrently.
pub async fn read_payloads(paths: &[PathBuf]) -> Decoded {
    let reads = paths.iter().map(|path| async move {
        let source_name = path.display().to_string();
        match tokio::fs::read_to_string(path).await {
            Ok(text) => decode_source(&source_name, &text),
            Err(e) => {
                tracing::warn!("Failed to read payload {}: {}", source_name, e);
                Decoded::failed(LoadError::decode(source_name, e))
            }
        }
    });

    let mut decoded = Decoded::default();
    for source in join_all(reads).await {
        decoded.merge(source);
    }

    tracing::debug!(
        "Decoded {} packages from {} sources ({} failures)",
        decoded.packages.len(),
        paths.len(),
        decoded.errors.len()
    );
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case(RawKind::Code(1), Some(ItemKind::Struct))]
    #[case(RawKind::Code(7), None)]
    #[case(RawKind::Name("fn".to_string()), Some(ItemKind::Function))]
    #[case(RawKind::Name("gizmo".to_string()), None)]
    fn test_raw_kind_resolve(#[case] raw: RawKind, #[case] expected: Option<ItemKind>) {
        check!(raw.resolve() == expected);
    }

    #[test]
    fn test_decode_json_single_package() {
        let text = r#"{
            "name": "gcc",
            "items": [
                {"kind": "module", "name": "", "path": "gcc"},
                {"kind": 1, "name": "Config", "desc": "Extra configuration to pass to gcc."},
                {"kind": "field", "name": "objects", "parent": 0, "signature": "Vec<PathBuf>"}
            ],
            "paths": [{"kind": "struct", "name": "Config"}]
        }"#;

        let decoded = decode_json("gcc.json", text);
        check!(decoded.errors.is_empty());
        check!(decoded.packages.len() == 1);

        let package = &decoded.packages[0];
        check!(package.name == "gcc");
        check!(package.items.len() == 3);
        check!(package.items[1].kind == Some(RawKind::Code(1)));
        check!(package.items[1].summary == "Extra configuration to pass to gcc.");
        check!(package.items[2].parent == Some(0));
        check!(package.paths[0].name == "Config");
    }

    #[test]
    fn test_decode_json_array_and_missing_kind() {
        let text = r#"[{"name": "a", "items": [{"name": "x"}]}, {"package": "b"}]"#;
        let decoded = decode_json("many.json", text);
        check!(decoded.packages.len() == 2);
        check!(decoded.packages[0].items[0].kind.is_none());
        check!(decoded.packages[1].name == "b");
    }

    #[test]
    fn test_decode_json_garbage() {
        let decoded = decode_json("broken.json", "{not json");
        check!(decoded.packages.is_empty());
        check!(matches!(
            decoded.errors.as_slice(),
            [LoadError::Decode { source_name, .. }] if source_name == "broken.json"
        ));
    }

    #[tokio::test]
    async fn test_read_payloads_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{"name": "good"}"#).unwrap();
        let missing = dir.path().join("missing.json");

        let decoded = read_payloads(&[good, missing]).await;
        check!(decoded.packages.len() == 1);
        check!(decoded.errors.len() == 1);
    }
}
