//! The normalized item model shared by the store, the resolver and the search index.

pub(crate) mod kind;
pub(crate) mod path;
pub(crate) mod store;

pub use kind::{ALL_KINDS, ItemKind, UnknownKind};
pub use store::{ItemStore, Package, PathEntry};

use serde::{Serialize, Serializer};
use std::{fmt, sync::Arc};

/// Dense identifier of an item, assigned at load time.
///
/// An id indexes directly into the [`ItemStore`] of the corpus that produced it and is
/// meaningless against any other corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl ItemId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Module segments locating an item inside its package, root to leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModulePath(Vec<String>);

impl ModulePath {
    pub const fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Parse textual `a::b::c` paths, skipping empty segments.
    pub fn parse(text: &str) -> Self {
        Self(
            text.split("::")
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// This path extended by one segment. Empty names (the package root) add nothing.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        if !name.is_empty() {
            segments.push(name.to_string());
        }
        Self(segments)
    }

    pub(crate) fn extend<I: IntoIterator<Item = String>>(&mut self, segments: I) {
        self.0.extend(segments);
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("::"))
    }
}

impl Serialize for ModulePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One documented entity.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    /// Empty only for a package root module.
    pub name: String,
    pub package: Arc<str>,
    pub module_path: ModulePath,
    pub summary: String,
    pub parent_id: Option<ItemId>,
    /// Sorted, deduplicated lowercase tokens from the item's type-like text.
    pub signature_tokens: Vec<String>,
}

impl Item {
    /// Whether this item is the root module of its package.
    pub fn is_package_root(&self) -> bool {
        self.parent_id.is_none() && self.name.is_empty()
    }

    /// Fully qualified display path: `package::module::name`.
    pub fn qualified_path(&self) -> String {
        let mut path = self.package.to_string();
        for segment in self.module_path.segments() {
            path.push_str("::");
            path.push_str(segment);
        }
        if !self.name.is_empty() {
            path.push_str("::");
            path.push_str(&self.name);
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("string_telephone::packet", &["string_telephone", "packet"])]
    #[case("", &[])]
    #[case("::a:: ::b", &["a", "b"])]
    fn test_parse(#[case] input: &str, #[case] expected: &[&str]) {
        let path = ModulePath::parse(input);
        check!(path.segments() == expected);
    }

    #[test]
    fn test_child_skips_empty_root_name() {
        let root = ModulePath::default();
        check!(root.child("").is_empty());
        check!(root.child("Packet").to_string() == "Packet");
        check!(root.child("packet").child("Packet").to_string() == "packet::Packet");
    }

    #[test]
    fn test_qualified_path() {
        let item = Item {
            id: ItemId(3),
            kind: ItemKind::Field,
            name: "sequence_id".to_string(),
            package: Arc::from("string_telephone"),
            module_path: ModulePath::parse("packet::Packet"),
            summary: String::new(),
            parent_id: Some(ItemId(2)),
            signature_tokens: vec![],
        };
        check!(item.qualified_path() == "string_telephone::packet::Packet::sequence_id");
        check!(!item.is_package_root());
    }
}
