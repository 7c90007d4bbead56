//! Query classification, candidate gathering and scoring.
//!
//! A query moves through `Received → Classified → Candidates-Gathered → Scored →
//! Ranked → Returned`. Classification never fails: anything that does not look
//! like a usable signature is treated as a name query.

use crate::item::{Item, ItemId, ItemKind, ItemStore, ModulePath};
use ahash::{AHashMap, AHashSet};
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::Serialize;
use std::sync::LazyLock;

use super::index::SearchIndex;
use super::ranking::{Candidate, rank};
use super::scoring::{
    MatchTier, RankingPolicy, calculate_path_relevance, classify_name_match, length_closeness,
};
use super::tokenize::{name_tokens, signature_tokens, tokenize_and_stem};

/// Punctuation that only shows up in type-like text.
static SIGNATURE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"->|[()\[\]<>&]").expect("signature pattern is valid"));

/// Represents a parsed item path like `shared::SequenceManager` or `Packet`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPath {
    /// Path components (containers and item name)
    pub path_components: Vec<String>,
}

impl QueryPath {
    /// Get the final item name (last component)
    pub fn item_name(&self) -> &str {
        self.path_components.last().map_or("", String::as_str)
    }

    /// Lowercase container components, without the item name
    pub fn qualifier(&self) -> Vec<String> {
        match self.path_components.split_last() {
            Some((_, containers)) => containers.iter().map(|c| c.to_lowercase()).collect(),
            None => vec![],
        }
    }
}

/// Parse an item path query into components
///
/// Examples:
/// - `Packet` → path_components=["Packet"]
/// - `string_telephone::packet::Packet` → path_components=["string_telephone", "packet", "Packet"]
pub fn parse_item_path(query: &str) -> QueryPath {
    QueryPath {
        path_components: query
            .split("::")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

/// A classified query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedQuery {
    /// Nothing to search for.
    Empty,
    /// Match names; `qualifier` holds lowercase container components that must end
    /// the item's `package::module_path`.
    Name {
        words: Vec<String>,
        qualifier: Vec<String>,
    },
    /// Match signature tokens; every token must be present.
    Signature(Vec<String>),
}

/// Strip punctuation around a word, keeping identifier characters.
fn clean_word(word: &str) -> Option<String> {
    let trimmed = word.trim_matches(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'));
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_name_query(text: &str) -> ParsedQuery {
    let (words, qualifier) = if text.contains("::") {
        let path = parse_item_path(text);
        let words: Vec<String> = path
            .item_name()
            .split_whitespace()
            .filter_map(clean_word)
            .collect();
        (words, path.qualifier())
    } else {
        (text.split_whitespace().filter_map(clean_word).collect(), vec![])
    };

    if words.is_empty() {
        ParsedQuery::Empty
    } else {
        ParsedQuery::Name { words, qualifier }
    }
}

/// Classify a raw query string.
pub fn classify(text: &str) -> ParsedQuery {
    let text = text.trim();
    if text.is_empty() {
        return ParsedQuery::Empty;
    }

    if SIGNATURE_PUNCTUATION.is_match(text) {
        let tokens = signature_tokens(text);
        if !tokens.is_empty() {
            return ParsedQuery::Signature(tokens);
        }
        // Punctuation without usable tokens: fall back to plain words
        let words: String = text
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
            .collect();
        return parse_name_query(&words);
    }

    parse_name_query(text)
}

/// Parameters of one search.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions<'a> {
    pub query: &'a str,
    pub limit: usize,
    /// Only return items of this package.
    pub package: Option<&'a str>,
    /// Only return items of these kinds; empty admits every kind.
    pub kinds: &'a [ItemKind],
}

impl<'a> SearchOptions<'a> {
    pub const fn new(query: &'a str, limit: usize) -> Self {
        Self {
            query,
            limit,
            package: None,
            kinds: &[],
        }
    }

    #[must_use]
    pub const fn in_package(mut self, package: &'a str) -> Self {
        self.package = Some(package);
        self
    }

    #[must_use]
    pub const fn of_kinds(mut self, kinds: &'a [ItemKind]) -> Self {
        self.kinds = kinds;
        self
    }

    fn admits(&self, item: &Item) -> bool {
        self.package.is_none_or(|package| &*item.package == package)
            && (self.kinds.is_empty() || self.kinds.contains(&item.kind))
    }
}

/// One ranked result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: ItemId,
    pub kind: ItemKind,
    pub name: String,
    pub package: String,
    pub module_path: ModulePath,
    pub summary: String,
    pub score: f32,
}

impl SearchHit {
    fn from_item(item: &Item, score: f32) -> Self {
        Self {
            id: item.id,
            kind: item.kind,
            name: item.name.clone(),
            package: item.package.to_string(),
            module_path: item.module_path.clone(),
            summary: item.summary.clone(),
            score,
        }
    }

    /// Fully qualified display path: `package::module::name`.
    pub fn qualified_path(&self) -> String {
        let mut path = self.package.clone();
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

/// Borrowed view of everything a query reads.
pub(crate) struct QueryEngine<'a> {
    pub store: &'a ItemStore,
    pub index: &'a SearchIndex,
    pub policy: &'a RankingPolicy,
}

impl QueryEngine<'_> {
    /// Run one query end to end.
    pub(crate) fn search(&self, options: &SearchOptions<'_>) -> Vec<SearchHit> {
        let start = std::time::Instant::now();
        if options.limit == 0 {
            return vec![];
        }

        let parsed = classify(options.query);
        let candidates = match &parsed {
            ParsedQuery::Empty => vec![],
            ParsedQuery::Name { words, qualifier } => self.gather_names(words, qualifier, options),
            ParsedQuery::Signature(tokens) => self.gather_signature(tokens, options),
        };
        let gathered = candidates.len();

        let hits: Vec<SearchHit> = rank(candidates, self.store, options.limit)
            .into_iter()
            .filter_map(|c| self.store.get(c.id).map(|item| SearchHit::from_item(item, c.score)))
            .collect();

        tracing::debug!(
            "Query {:?} ({:?}): {} candidates, {} hits in {:?}",
            options.query,
            parsed,
            gathered,
            hits.len(),
            start.elapsed()
        );
        hits
    }

    /// Best tier per id for one query word, from the exact and token tables.
    ///
    /// A compound word (`sequence_id`, `SequenceManager`) also matches names that
    /// contain all of its subwords, at the token tier.
    fn word_tiers(&self, word: &str) -> AHashMap<ItemId, MatchTier> {
        let lower = word.to_lowercase();
        let mut tiers = AHashMap::new();

        for id in self.index.exact_ignore_case(&lower) {
            tiers.insert(id, MatchTier::Exact);
        }
        for id in self.index.token_prefix(&lower) {
            let Some(item) = self.store.get(id) else {
                continue;
            };
            let tier = classify_name_match(&item.name.to_lowercase(), &lower);
            tiers
                .entry(id)
                .and_modify(|best: &mut MatchTier| *best = (*best).max(tier))
                .or_insert(tier);
        }

        let subwords: Vec<String> = name_tokens(word)
            .into_iter()
            .filter(|token| *token != lower)
            .collect();
        if subwords.len() > 1 {
            for id in self.subword_matches(&subwords) {
                tiers.entry(id).or_insert(MatchTier::Token);
            }
        }
        tiers
    }

    /// Ids having a name token starting with each of `subwords`.
    fn subword_matches(&self, subwords: &[String]) -> AHashSet<ItemId> {
        let mut shared: Option<AHashSet<ItemId>> = None;
        for subword in subwords {
            let ids: AHashSet<ItemId> = self.index.token_prefix(subword).collect();
            shared = Some(match shared {
                None => ids,
                Some(previous) => previous.intersection(&ids).copied().collect(),
            });
            if shared.as_ref().is_some_and(|ids| ids.is_empty()) {
                break;
            }
        }
        shared.unwrap_or_default()
    }

    fn gather_names(
        &self,
        words: &[String],
        qualifier: &[String],
        options: &SearchOptions<'_>,
    ) -> Vec<Candidate> {
        // Every word must match; an item's tier is its weakest word's tier
        let mut matched: Option<AHashMap<ItemId, MatchTier>> = None;
        for word in words {
            let tiers = self.word_tiers(word);
            matched = Some(match matched {
                None => tiers,
                Some(previous) => previous
                    .into_iter()
                    .filter_map(|(id, tier)| tiers.get(&id).map(|other| (id, tier.min(*other))))
                    .collect(),
            });
        }
        let matched = matched.unwrap_or_default();

        let query_len: usize = words.iter().map(|w| w.chars().count()).sum();
        let exact_case_word = match words {
            [single] => Some(single.as_str()),
            _ => None,
        };

        let mut candidates = Vec::with_capacity(matched.len());
        for (id, tier) in &matched {
            let Some(item) = self.store.get(*id) else {
                continue;
            };
            if !options.admits(item) || !qualifier_matches(item, qualifier) {
                continue;
            }
            let closeness = length_closeness(query_len, item.name.chars().count());
            let exact_case = exact_case_word == Some(item.name.as_str());
            candidates.push(Candidate {
                id: *id,
                score: self.policy.score(*tier, closeness, item.kind, exact_case),
            });
        }

        // Summaries are the weakest signal and never qualify path queries
        if qualifier.is_empty() {
            let stemmer = Stemmer::create(Algorithm::English);
            let mut terms = tokenize_and_stem(&words.join(" "), &stemmer);
            terms.sort_unstable();
            terms.dedup();

            if !terms.is_empty() {
                for id in self.index.description_matches(&terms) {
                    if matched.contains_key(&id) {
                        continue;
                    }
                    let Some(item) = self.store.get(id) else {
                        continue;
                    };
                    if options.admits(item) {
                        candidates.push(Candidate {
                            id,
                            score: self.policy.score(MatchTier::Description, 0.0, item.kind, false),
                        });
                    }
                }
            }
        }

        candidates
    }

    fn gather_signature(&self, tokens: &[String], options: &SearchOptions<'_>) -> Vec<Candidate> {
        self.index
            .signature_matches(tokens)
            .into_iter()
            .filter_map(|id| self.store.get(id))
            .filter(|item| options.admits(item))
            .map(|item| {
                let closeness = length_closeness(tokens.len(), item.signature_tokens.len());
                Candidate {
                    id: item.id,
                    score: self
                        .policy
                        .score(MatchTier::Signature, closeness, item.kind, false),
                }
            })
            .collect()
    }
}

/// Whether `package::module_path` ends with the qualifier components.
fn qualifier_matches(item: &Item, qualifier: &[String]) -> bool {
    if qualifier.is_empty() {
        return true;
    }
    let container: Vec<&str> = std::iter::once(&*item.package)
        .chain(item.module_path.segments().iter().map(String::as_str))
        .collect();
    calculate_path_relevance(&container, qualifier).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn name(words: &[&str], qualifier: &[&str]) -> ParsedQuery {
        ParsedQuery::Name {
            words: words.iter().map(|s| s.to_string()).collect(),
            qualifier: qualifier.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn signature(tokens: &[&str]) -> ParsedQuery {
        ParsedQuery::Signature(tokens.iter().map(|s| s.to_string()).collect())
    }

    #[rstest]
    #[case("", ParsedQuery::Empty)]
    #[case("   ", ParsedQuery::Empty)]
    #[case("Packet", name(&["Packet"], &[]))]
    #[case("  packet type ", name(&["packet", "type"], &[]))]
    #[case("println!", name(&["println"], &[]))]
    #[case("shared::SequenceManager", name(&["SequenceManager"], &["shared"]))]
    #[case("string_telephone::Shared::x", name(&["x"], &["string_telephone", "shared"]))]
    #[case("(&[u8]) -> Packet", signature(&["packet", "u8"]))]
    #[case("Vec<u8>", signature(&["u8", "vec"]))]
    #[case("fn() -> bool", signature(&["bool"]))]
    fn test_classify(#[case] input: &str, #[case] expected: ParsedQuery) {
        check!(classify(input) == expected);
    }

    #[rstest]
    #[case("()")]
    #[case("-> &")]
    #[case("::")]
    fn test_classify_degenerate_punctuation_is_empty(#[case] input: &str) {
        check!(classify(input) == ParsedQuery::Empty);
    }

    #[test]
    fn test_punctuation_without_tokens_degrades_to_name_query() {
        // "fn" is dropped as a signature keyword, leaving no signature tokens
        check!(classify("fn()") == name(&["fn"], &[]));
    }

    #[rstest]
    #[case("Vec", &["Vec"], "Vec")]
    #[case("std::vec::Vec", &["std", "vec", "Vec"], "Vec")]
    #[case("", &[], "")]
    fn test_parse_item_path(
        #[case] input: &str,
        #[case] expected_components: &[&str],
        #[case] expected_item: &str,
    ) {
        let path = parse_item_path(input);
        check!(path.path_components == expected_components);
        check!(path.item_name() == expected_item);
    }
}
