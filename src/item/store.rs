//! Arena storage for all items of a corpus.
//!
//! Items of every package live in one vector indexed by [`ItemId`]. Parents are
//! referenced by id, never by pointer, and are always stored before their children.

use super::{Item, ItemId, ItemKind, ModulePath};
use crate::error::LoadError;
use crate::payload::{PackagePayload, RawKind};
use crate::search::tokenize::signature_tokens;
use ahash::AHashMap;
use std::{ops::Range, sync::Arc};

/// A resolved path-table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub kind: ItemKind,
    pub name: String,
    /// Local index of the enclosing entry.
    pub parent: Option<usize>,
}

/// A loaded package: its id range in the store plus its path table.
#[derive(Debug, Clone)]
pub struct Package {
    pub name: Arc<str>,
    ids: Range<u32>,
    pub paths: Vec<PathEntry>,
}

impl Package {
    pub fn item_count(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.ids.clone().map(ItemId)
    }
}

/// Inputs the path resolver needs besides the item itself.
#[derive(Debug, Clone)]
pub(crate) struct PathSeed {
    /// Index into [`ItemStore::packages`].
    pub package: usize,
    /// Offset of the raw record inside its payload.
    pub offset: usize,
    /// Module segments declared by the record, package name stripped.
    pub declared: Vec<String>,
    /// Path-table index of a parent that is not itself an item.
    pub via: Option<usize>,
}

/// Normalized, read-only collection of all items across all packages.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: Vec<Item>,
    packages: Vec<Package>,
    seeds: Vec<PathSeed>,
}

impl ItemStore {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.index())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| &*p.name == name)
    }

    pub fn parent(&self, item: &Item) -> Option<&Item> {
        item.parent_id.and_then(|id| self.get(id))
    }

    pub(crate) fn seeds(&self) -> &[PathSeed] {
        &self.seeds
    }

    /// Install resolved module paths. Called once during the load phase.
    pub(crate) fn assign_paths(&mut self, paths: Vec<ModulePath>) {
        debug_assert_eq!(paths.len(), self.items.len());
        for (item, path) in self.items.iter_mut().zip(paths) {
            item.module_path = path;
        }
    }

    /// Validate one payload and append its items.
    ///
    /// On error nothing is appended: a package is loaded completely or not at all.
    pub(crate) fn add_package(&mut self, payload: &PackagePayload) -> Result<usize, LoadError> {
        if self.package(&payload.name).is_some() {
            return Err(LoadError::malformed(&payload.name, 0, "duplicate package name"));
        }

        let staged = stage_package(payload)?;
        let package_index = self.packages.len();
        let first = u32::try_from(self.items.len())
            .map_err(|_| LoadError::malformed(&payload.name, 0, "corpus exceeds id space"))?;
        let count = u32::try_from(staged.order.len())
            .map_err(|_| LoadError::malformed(&payload.name, 0, "package exceeds id space"))?;

        let name: Arc<str> = Arc::from(payload.name.as_str());

        // Raw offset → assigned id
        let mut id_of = vec![ItemId(0); payload.items.len()];
        for (position, &offset) in staged.order.iter().enumerate() {
            id_of[offset] = ItemId(first + position as u32);
        }

        for &offset in &staged.order {
            let raw = &payload.items[offset];
            let record = &staged.records[offset];
            self.items.push(Item {
                id: id_of[offset],
                kind: record.kind,
                name: raw.name.clone(),
                package: Arc::clone(&name),
                module_path: ModulePath::default(),
                summary: raw.summary.trim().to_string(),
                parent_id: record.parent.map(|p| id_of[p]),
                signature_tokens: raw
                    .signature
                    .as_deref()
                    .map(signature_tokens)
                    .unwrap_or_default(),
            });
            self.seeds.push(PathSeed {
                package: package_index,
                offset,
                declared: record.declared.clone(),
                via: if record.parent.is_none() {
                    raw.parent
                } else {
                    None
                },
            });
        }

        self.packages.push(Package {
            name,
            ids: first..first + count,
            paths: staged.paths,
        });

        Ok(staged.order.len())
    }
}

/// A raw record after kind validation and parent matching.
struct StagedRecord {
    kind: ItemKind,
    declared: Vec<String>,
    /// Raw offset of the parent record.
    parent: Option<usize>,
}

struct StagedPackage {
    records: Vec<StagedRecord>,
    paths: Vec<PathEntry>,
    /// Raw offsets in emission order (parents first).
    order: Vec<usize>,
}

/// The kind of a record or path entry, or why it has none.
fn resolve_kind(kind: Option<&RawKind>) -> Result<ItemKind, String> {
    let raw = kind.ok_or_else(|| "no kind".to_string())?;
    raw.resolve().ok_or_else(|| format!("unknown kind {raw}"))
}

/// Declared module segments for a textual path, without the leading package name.
fn declared_segments(package: &str, path: &str) -> Vec<String> {
    let mut segments = ModulePath::parse(path).segments().to_vec();
    if segments.first().is_some_and(|first| first == package) {
        segments.remove(0);
    }
    segments
}

fn stage_package(payload: &PackagePayload) -> Result<StagedPackage, LoadError> {
    let package = payload.name.as_str();

    let paths = payload
        .paths
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            Ok(PathEntry {
                kind: resolve_kind(raw.kind.as_ref()).map_err(|reason| {
                    LoadError::MalformedPathEntry {
                        package: package.to_string(),
                        index,
                        reason,
                    }
                })?,
                name: raw.name.clone(),
                parent: raw.parent,
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    // Kinds, names and inherited module text
    let mut records = Vec::with_capacity(payload.items.len());
    let mut current_path = "";
    for (offset, raw) in payload.items.iter().enumerate() {
        let kind = resolve_kind(raw.kind.as_ref())
            .map_err(|reason| LoadError::malformed(package, offset, format!("record has {reason}")))?;
        if raw.name.is_empty() && kind != ItemKind::Module {
            return Err(LoadError::malformed(package, offset, "record has no name"));
        }
        if !raw.path.is_empty() {
            current_path = &raw.path;
        }
        records.push(StagedRecord {
            kind,
            declared: declared_segments(package, current_path),
            parent: None,
        });
    }

    // Match parent path entries to the records they describe
    let mut by_name: AHashMap<(ItemKind, &str), Vec<usize>> = AHashMap::new();
    for (offset, raw) in payload.items.iter().enumerate() {
        by_name
            .entry((records[offset].kind, raw.name.as_str()))
            .or_default()
            .push(offset);
    }

    for (offset, raw) in payload.items.iter().enumerate() {
        let Some(entry) = raw.parent.and_then(|index| paths.get(index)) else {
            continue;
        };
        let Some(candidates) = by_name.get(&(entry.kind, entry.name.as_str())) else {
            continue;
        };
        records[offset].parent = candidates
            .iter()
            .copied()
            .filter(|&candidate| candidate != offset)
            .max_by_key(|&candidate| {
                let same_module = records[candidate].declared == records[offset].declared;
                let same_parent = payload.items[candidate].parent == entry.parent;
                // Earlier candidates win ties
                (same_module, same_parent, std::cmp::Reverse(candidate))
            });
    }

    let order = parents_first(package, &records)?;

    Ok(StagedPackage {
        records,
        paths,
        order,
    })
}

/// Emission order where every parent precedes its children; payload order otherwise.
fn parents_first(package: &str, records: &[StagedRecord]) -> Result<Vec<usize>, LoadError> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Pending,
        Walking,
        Done,
    }

    let mut marks = vec![Mark::Pending; records.len()];
    let mut order = Vec::with_capacity(records.len());
    let mut chain = vec![];

    for start in 0..records.len() {
        // Walk up until an already-emitted ancestor (or the top)
        let mut cursor = Some(start);
        while let Some(offset) = cursor {
            match marks[offset] {
                Mark::Done => break,
                Mark::Walking => {
                    return Err(LoadError::malformed(package, offset, "parent cycle"));
                }
                Mark::Pending => {
                    marks[offset] = Mark::Walking;
                    chain.push(offset);
                    cursor = records[offset].parent;
                }
            }
        }

        for offset in chain.drain(..).rev() {
            marks[offset] = Mark::Done;
            order.push(offset);
        }
    }

    Ok(order)
}
