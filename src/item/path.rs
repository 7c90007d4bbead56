//! Module path resolution.
//!
//! An item's module path is its parent's module path followed by the parent's name.
//! Items without an item parent use the module text they declared, extended by the
//! path-table chain of a virtual parent when the payload names one that is not
//! itself an item.

use super::{ItemStore, ModulePath, PathEntry, store::PathSeed};
use crate::error::LoadError;

/// Output of one resolution pass: a path per item plus warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolution {
    pub paths: Vec<ModulePath>,
    pub warnings: Vec<LoadError>,
}

/// Compute module paths for every item in the store.
///
/// Pure: reads only the store, so running it twice on the same store yields
/// identical output. Items are visited in id order, which puts every parent
/// before its children.
pub(crate) fn resolve(store: &ItemStore) -> Resolution {
    let mut paths: Vec<ModulePath> = Vec::with_capacity(store.len());
    let mut warnings = vec![];

    for (item, seed) in store.items().iter().zip(store.seeds()) {
        let path = match store.parent(item) {
            Some(parent) => paths[parent.id.index()].child(&parent.name),
            None => match seed.via {
                Some(index) => {
                    let package = &store.packages()[seed.package];
                    match path_chain(&package.paths, index) {
                        Some(chain) => {
                            let mut path = ModulePath::new(seed.declared.clone());
                            path.extend(chain);
                            path
                        }
                        None => {
                            warnings.push(dangling(store, seed, index));
                            ModulePath::default()
                        }
                    }
                }
                None => ModulePath::new(seed.declared.clone()),
            },
        };
        paths.push(path);
    }

    Resolution { paths, warnings }
}

/// Resolve the store's paths in place, returning warnings.
pub(crate) fn resolve_in_place(store: &mut ItemStore) -> Vec<LoadError> {
    let Resolution { paths, warnings } = resolve(store);
    store.assign_paths(paths);
    warnings
}

/// Names along a path-table chain, root to leaf, ending at `index`.
///
/// Returns `None` when the chain references a missing entry or loops.
fn path_chain(entries: &[PathEntry], index: usize) -> Option<Vec<String>> {
    let mut names = vec![];
    let mut cursor = Some(index);

    while let Some(current) = cursor {
        // A chain longer than the table must revisit an entry
        if names.len() >= entries.len() {
            return None;
        }
        let entry = entries.get(current)?;
        names.push(entry.name.clone());
        cursor = entry.parent;
    }

    names.reverse();
    Some(names)
}

fn dangling(store: &ItemStore, seed: &PathSeed, index: usize) -> LoadError {
    let package = &store.packages()[seed.package];
    tracing::warn!(
        "Dangling path reference in '{}': record {} refers to path entry {}",
        package.name,
        seed.offset,
        index
    );
    LoadError::DanglingPathReference {
        package: package.name.to_string(),
        offset: seed.offset,
        index,
    }
}
