//! Search relevance and ranking weights.
//!
//! This module classifies how a name matches a query, scores candidates and holds
//! the tunable [`RankingPolicy`] used to do so.

use crate::item::{ALL_KINDS, ItemKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a candidate matched the query, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    /// Only the documentation summary matched.
    Description,
    /// Every signature token of the query appears in the item's signature.
    Signature,
    /// A token of the name starts with the query.
    Token,
    /// The whole name starts with the query.
    Prefix,
    /// Case-insensitive equality.
    Exact,
}

/// Classify how `name` matches `query`.
///
/// Both sides are compared lowercase. Returns:
/// - `Exact`: name equals query
/// - `Prefix`: name starts with query
/// - `Token`: anything else found through the token table
pub fn classify_name_match(name_lower: &str, query_lower: &str) -> MatchTier {
    if name_lower == query_lower {
        MatchTier::Exact
    } else if name_lower.starts_with(query_lower) {
        MatchTier::Prefix
    } else {
        MatchTier::Token
    }
}

/// Calculate relevance for path-qualified queries.
///
/// Matches items whose qualified container path ends with the query components.
/// For example, query ["shared"] matches containers like:
/// - ["string_telephone", "shared"] (suffix match)
/// - ["shared"] (exact length match)
///
/// Returns:
/// - 100: Exact length match (path length == query length)
/// - 90: Suffix match (path is longer than query)
/// - None: No match
pub fn calculate_path_relevance(item_path: &[&str], query_components: &[String]) -> Option<u32> {
    if query_components.is_empty() || item_path.len() < query_components.len() {
        return None;
    }

    let suffix = &item_path[item_path.len() - query_components.len()..];
    let exact_match = suffix
        .iter()
        .zip(query_components)
        .all(|(item_seg, query_seg)| item_seg.to_lowercase() == *query_seg);

    if !exact_match {
        None
    } else if item_path.len() == query_components.len() {
        Some(100)
    } else {
        Some(90)
    }
}

/// Closeness of lengths in `(0, 1]`: 1 when query and name are equally long.
pub fn length_closeness(query_len: usize, name_len: usize) -> f32 {
    let (short, long) = if query_len <= name_len {
        (query_len, name_len)
    } else {
        (name_len, query_len)
    };
    if long == 0 {
        return 0.0;
    }
    short as f32 / long as f32
}

/// Error produced when a ranking policy cannot keep tiers apart.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("tier weights must strictly decrease from exact to description")]
    TiersOutOfOrder,
    #[error("gap between {upper:?} and {lower:?} ({gap}) must exceed the largest bonus ({bonus})")]
    GapTooSmall {
        upper: MatchTier,
        lower: MatchTier,
        gap: f32,
        bonus: f32,
    },
    #[error("weights must be finite and non-negative")]
    NegativeWeight,
}

/// Tunable ranking weights.
///
/// A score is `tier weight + closeness × length_weight + kind weight`, plus
/// `exact_case_bonus` when the name matches the query with identical casing. Tier
/// gaps are validated to exceed every bonus, so tiers never interleave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingPolicy {
    pub exact_weight: f32,
    pub prefix_weight: f32,
    pub token_weight: f32,
    pub signature_weight: f32,
    pub description_weight: f32,
    pub length_weight: f32,
    pub exact_case_bonus: f32,
    /// Kind weights keyed by kind name; kinds left out weigh 0.
    pub kind_weights: BTreeMap<ItemKind, f32>,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        let kind_weights = ALL_KINDS
            .into_iter()
            .map(|kind| (kind, default_kind_weight(kind)))
            .collect();

        Self {
            exact_weight: 1000.0,
            prefix_weight: 600.0,
            token_weight: 400.0,
            signature_weight: 300.0,
            description_weight: 100.0,
            length_weight: 50.0,
            exact_case_bonus: 5.0,
            kind_weights,
        }
    }
}

/// Types first, then namespaces and free items, then members.
const fn default_kind_weight(kind: ItemKind) -> f32 {
    match kind {
        ItemKind::Struct
        | ItemKind::Enum
        | ItemKind::Trait
        | ItemKind::TypeAlias
        | ItemKind::Primitive => 10.0,
        ItemKind::Module => 8.0,
        ItemKind::Macro => 7.0,
        ItemKind::Function => 6.0,
        ItemKind::Constant | ItemKind::Static => 5.0,
        ItemKind::Method => 4.0,
        ItemKind::Variant => 3.0,
        ItemKind::Field => 2.0,
    }
}

impl RankingPolicy {
    pub fn tier_weight(&self, tier: MatchTier) -> f32 {
        match tier {
            MatchTier::Exact => self.exact_weight,
            MatchTier::Prefix => self.prefix_weight,
            MatchTier::Token => self.token_weight,
            MatchTier::Signature => self.signature_weight,
            MatchTier::Description => self.description_weight,
        }
    }

    pub fn kind_weight(&self, kind: ItemKind) -> f32 {
        self.kind_weights.get(&kind).copied().unwrap_or(0.0)
    }

    /// Largest amount a candidate can gain on top of its tier weight.
    fn max_bonus(&self) -> f32 {
        let max_kind = self.kind_weights.values().copied().fold(0.0, f32::max);
        self.length_weight + self.exact_case_bonus + max_kind
    }

    /// Score one candidate.
    pub fn score(&self, tier: MatchTier, closeness: f32, kind: ItemKind, exact_case: bool) -> f32 {
        let mut score = self.tier_weight(tier)
            + closeness.clamp(0.0, 1.0) * self.length_weight
            + self.kind_weight(kind);
        if exact_case {
            score += self.exact_case_bonus;
        }
        score
    }

    /// Check that no bonus can lift a candidate into the tier above.
    pub fn validate(&self) -> Result<(), PolicyError> {
        let weights = [
            self.exact_weight,
            self.prefix_weight,
            self.token_weight,
            self.signature_weight,
            self.description_weight,
            self.length_weight,
            self.exact_case_bonus,
        ];
        if weights
            .iter()
            .chain(self.kind_weights.values())
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(PolicyError::NegativeWeight);
        }

        let tiers = [
            MatchTier::Exact,
            MatchTier::Prefix,
            MatchTier::Token,
            MatchTier::Signature,
            MatchTier::Description,
        ];
        let bonus = self.max_bonus();
        for pair in tiers.windows(2) {
            let (upper, lower) = (pair[0], pair[1]);
            let gap = self.tier_weight(upper) - self.tier_weight(lower);
            if gap <= 0.0 {
                return Err(PolicyError::TiersOutOfOrder);
            }
            if gap <= bonus {
                return Err(PolicyError::GapTooSmall {
                    upper,
                    lower,
                    gap,
                    bonus,
                });
            }
        }
        Ok(())
    }
}
