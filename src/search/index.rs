//! Lookup tables derived from the item store.

use crate::item::{ItemId, ItemStore};
use ahash::AHashMap;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeMap;

use super::tokenize::{name_tokens, tokenize_and_stem};

/// Sizes of the built tables, for logging and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub names: usize,
    pub name_tokens: usize,
    pub signature_tokens: usize,
    pub description_terms: usize,
}

/// Immutable lookup tables over one [`ItemStore`].
///
/// Every posting list is sorted by id and free of duplicates, because items are
/// visited in id order and each item contributes a token at most once.
#[derive(Debug, Default)]
pub struct SearchIndex {
    /// Case-preserved name → ids sharing it
    exact: AHashMap<String, Vec<ItemId>>,
    /// Lowercase name → distinct case-preserved spellings
    folded: AHashMap<String, Vec<String>>,
    /// Lowercase name token → ids; ordered so prefix lookup is a range scan
    tokens: BTreeMap<String, Vec<ItemId>>,
    /// Signature token → ids
    signatures: AHashMap<String, Vec<ItemId>>,
    /// Stemmed description term → ids
    descriptions: AHashMap<String, Vec<ItemId>>,
}

impl SearchIndex {
    /// Build all tables in one pass over the store.
    pub fn build(store: &ItemStore) -> Self {
        let start = std::time::Instant::now();
        let stemmer = Stemmer::create(Algorithm::English);
        let mut index = Self::default();

        for item in store.items() {
            let id = item.id;

            if !item.name.is_empty() {
                index.exact.entry(item.name.clone()).or_default().push(id);

                let spellings = index.folded.entry(item.name.to_lowercase()).or_default();
                if !spellings.contains(&item.name) {
                    spellings.push(item.name.clone());
                }

                for token in name_tokens(&item.name) {
                    index.tokens.entry(token).or_default().push(id);
                }
            }

            for token in &item.signature_tokens {
                index.signatures.entry(token.clone()).or_default().push(id);
            }

            if !item.summary.is_empty() {
                let mut terms = tokenize_and_stem(&item.summary, &stemmer);
                terms.sort_unstable();
                terms.dedup();
                for term in terms {
                    index.descriptions.entry(term).or_default().push(id);
                }
            }
        }

        let stats = index.stats();
        tracing::info!(
            "Built search index: {} items, {} names, {} name tokens, {} signature tokens, {} description terms in {:?}",
            store.len(),
            stats.names,
            stats.name_tokens,
            stats.signature_tokens,
            stats.description_terms,
            start.elapsed()
        );

        index
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            names: self.exact.len(),
            name_tokens: self.tokens.len(),
            signature_tokens: self.signatures.len(),
            description_terms: self.descriptions.len(),
        }
    }

    /// Ids whose name equals `name` exactly, casing included.
    pub fn exact(&self, name: &str) -> &[ItemId] {
        self.exact.get(name).map_or(&[], Vec::as_slice)
    }

    /// Ids whose name equals `query_lower` ignoring case.
    pub fn exact_ignore_case<'a>(&'a self, query_lower: &str) -> impl Iterator<Item = ItemId> + 'a {
        self.folded
            .get(query_lower)
            .into_iter()
            .flatten()
            .flat_map(|spelling| self.exact(spelling).iter().copied())
    }

    /// Ids having a name token that starts with `prefix` (lowercase).
    ///
    /// An id appears once per matching token; callers deduplicate.
    pub fn token_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = ItemId> + 'a {
        self.tokens
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .take_while(move |(token, _)| token.starts_with(prefix))
            .flat_map(|(_, ids)| ids.iter().copied())
    }

    /// Ids whose signature contains every token.
    pub fn signature_matches(&self, tokens: &[String]) -> Vec<ItemId> {
        intersect_all(tokens.iter().map(|t| self.signatures.get(t).map(Vec::as_slice)))
    }

    /// Ids whose summary contains every stemmed term.
    pub fn description_matches(&self, terms: &[String]) -> Vec<ItemId> {
        intersect_all(terms.iter().map(|t| self.descriptions.get(t).map(Vec::as_slice)))
    }
}

/// Intersection of sorted posting lists; empty when any list is missing or none given.
fn intersect_all<'a>(lists: impl Iterator<Item = Option<&'a [ItemId]>>) -> Vec<ItemId> {
    let Some(mut lists) = lists.collect::<Option<Vec<_>>>() else {
        return vec![];
    };
    if lists.is_empty() {
        return vec![];
    }

    // Start from the rarest list so the working set only shrinks
    lists.sort_by_key(|list| list.len());
    let mut result = lists[0].to_vec();
    for list in &lists[1..] {
        result.retain(|id| list.binary_search(id).is_ok());
        if result.is_empty() {
            break;
        }
    }
    result
}
