//! Result ordering shared by every query path.
//!
//! Ranking is a pure function of the scored candidates and the store they point
//! into, so the policy can change without touching candidate gathering.

use crate::item::{ItemId, ItemStore};
use ahash::AHashMap;
use std::cmp::Ordering;

/// A scored candidate before ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: ItemId,
    pub score: f32,
}

/// Deduplicate, order and cap candidates.
///
/// An id keeps its best score. Order is descending score, then package name, then
/// module path, then id, which makes output deterministic for equal scores.
pub fn rank(
    candidates: impl IntoIterator<Item = Candidate>,
    store: &ItemStore,
    limit: usize,
) -> Vec<Candidate> {
    if limit == 0 {
        return vec![];
    }

    let mut best: AHashMap<ItemId, f32> = AHashMap::new();
    for candidate in candidates {
        best.entry(candidate.id)
            .and_modify(|score| *score = score.max(candidate.score))
            .or_insert(candidate.score);
    }

    let mut ranked: Vec<Candidate> = best
        .into_iter()
        .map(|(id, score)| Candidate { id, score })
        .collect();
    ranked.sort_by(|a, b| compare(a, b, store));
    ranked.truncate(limit);
    ranked
}

fn compare(a: &Candidate, b: &Candidate, store: &ItemStore) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| {
        let location = match (store.get(a.id), store.get(b.id)) {
            (Some(x), Some(y)) => x
                .package
                .cmp(&y.package)
                .then_with(|| x.module_path.cmp(&y.module_path)),
            _ => Ordering::Equal,
        };
        location.then_with(|| a.id.cmp(&b.id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;
    use crate::item::path::resolve_in_place;
    use crate::payload::{PackagePayload, RawItem};
    use assert2::check;

    fn store() -> ItemStore {
        let mut store = ItemStore::default();
        for package in ["zeta", "alpha"] {
            store
                .add_package(
                    &PackagePayload::new(package)
                        .item(RawItem::new(ItemKind::Struct, "Config").in_module("b"))
                        .item(RawItem::new(ItemKind::Struct, "Config").in_module("a")),
                )
                .unwrap();
        }
        resolve_in_place(&mut store);
        store
    }

    fn candidate(id: u32, score: f32) -> Candidate {
        Candidate {
            id: ItemId(id),
            score,
        }
    }

    #[test]
    fn test_orders_by_score_descending() {
        let store = store();
        let ranked = rank([candidate(0, 1.0), candidate(1, 3.0), candidate(2, 2.0)], &store, 10);
        let ids: Vec<_> = ranked.iter().map(|c| c.id.0).collect();
        check!(ids == [1, 2, 0]);
    }

    #[test]
    fn test_ties_break_by_package_then_path_then_id() {
        let store = store();
        // ids 0,1 are zeta::{b,a}::Config; ids 2,3 are alpha::{b,a}::Config
        let ranked = rank((0..4).map(|id| candidate(id, 5.0)), &store, 10);
        let ids: Vec<_> = ranked.iter().map(|c| c.id.0).collect();
        check!(ids == [3, 2, 1, 0]);
    }

    #[test]
    fn test_deduplicates_keeping_best_score() {
        let store = store();
        let ranked = rank(
            [candidate(1, 1.0), candidate(1, 4.0), candidate(0, 2.0), candidate(1, 3.0)],
            &store,
            10,
        );
        check!(ranked == [candidate(1, 4.0), candidate(0, 2.0)]);
    }

    #[test]
    fn test_limit() {
        let store = store();
        let all = (0..4).map(|id| candidate(id, id as f32));
        check!(rank(all.clone(), &store, 2).len() == 2);
        check!(rank(all, &store, 0).is_empty());
    }
}
