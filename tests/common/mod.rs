//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `telephone`: a hand-built payload for a small networking package
//! - `corpus`: a [`Corpus`] loaded from `telephone` plus a small sibling package
//! - `handle`: a [`CorpusHandle`] with the same packages published
//!
//! [`TempWorkspace`] provides a temp directory for tests that read payload files.

use docsearch::{
    Corpus, CorpusHandle, ItemKind, PackagePayload, RankingPolicy, RawItem, RawKind, RawPath,
    SearchHit,
};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A legacy `search-index.js` with two packages, as a documentation generator emits it.
#[allow(dead_code)]
pub const LEGACY_SCRIPT: &str = r#"var searchIndex = {};
searchIndex['gcc'] = {"items":[[0,"","gcc",""],[1,"Config","","Extra configuration to pass to gcc."],[11,"objects","","Additional object files",0],[3,"compile_library","","Compile a library from the given set of input C files."],[10,"new","","Construct a new instance of a blank set of configuration.",0],[10,"file","","Add a file which will be compiled",0]],"paths":[[1,"Config"]]};
searchIndex['demo_client'] = {"items":[[0,"","demo_client",""],[3,"main","",""]],"paths":[]};

initSearch(searchIndex);
"#;

/// A temporary directory that is removed when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes a file relative to the workspace root and returns its full path.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&full, content).expect("Failed to write file");
        full
    }
}

/// `string_telephone`: packets, sequence numbers and a connection manager.
///
/// Path table: 0 = `Packet`, 1 = `SequenceManager`, 2 = `PacketType`.
#[fixture]
pub fn telephone() -> PackagePayload {
    PackagePayload::new("string_telephone")
        .item(RawItem::new(RawKind::Code(0), "").in_module("string_telephone"))
        .item(RawItem::new(ItemKind::Module, "packet").in_module("string_telephone"))
        .item(RawItem::new(ItemKind::Module, "shared").in_module("string_telephone"))
        .item(
            RawItem::new(ItemKind::Struct, "Packet")
                .in_module("string_telephone::packet")
                .with_summary("The underlying shape for transferring data."),
        )
        .item(
            RawItem::new(ItemKind::Field, "sequence_id")
                .with_parent(0)
                .with_summary("The current id of the packet"),
        )
        .item(
            RawItem::new(ItemKind::Field, "packet_type")
                .with_parent(0)
                .with_summary("The type of packet being sent"),
        )
        .item(
            RawItem::new(ItemKind::Method, "deserialize")
                .with_parent(0)
                .with_summary("Parses bytes into a packet")
                .with_signature("fn(&[u8]) -> IoResult<Packet>"),
        )
        .item(
            RawItem::new(ItemKind::Function, "packet_checksum")
                .in_module("string_telephone::packet")
                .with_signature("fn(&Packet) -> u32"),
        )
        .item(
            RawItem::new(ItemKind::Struct, "SequenceManager")
                .in_module("string_telephone::shared")
                .with_summary("Tracks sequence numbers for connections"),
        )
        .item(
            RawItem::new(ItemKind::Method, "next_sequence_id")
                .with_parent(1)
                .with_signature("fn(&mut self) -> u32"),
        )
        .item(RawItem::new(ItemKind::Enum, "PacketType").in_module("string_telephone::packet"))
        .item(RawItem::new(ItemKind::Variant, "Data").with_parent(2))
        .path(RawPath::new(ItemKind::Struct, "Packet"))
        .path(RawPath::new(ItemKind::Struct, "SequenceManager"))
        .path(RawPath::new(ItemKind::Enum, "PacketType"))
}

/// A sibling package that shares some names with `string_telephone`.
#[fixture]
pub fn relay() -> PackagePayload {
    PackagePayload::new("relay")
        .item(RawItem::new(ItemKind::Struct, "Packet").in_module("relay::wire"))
        .item(RawItem::new(ItemKind::Function, "forward").in_module("relay"))
}

#[allow(dead_code)]
#[fixture]
pub fn corpus(telephone: PackagePayload, relay: PackagePayload) -> Corpus {
    let (corpus, report) = Corpus::load(&[telephone, relay], RankingPolicy::default());
    assert!(report.is_clean(), "fixture corpus should load cleanly: {report}");
    corpus
}

#[allow(dead_code)]
#[fixture]
pub fn handle(telephone: PackagePayload, relay: PackagePayload) -> CorpusHandle {
    let handle = CorpusHandle::default();
    handle.load(&[telephone, relay]);
    handle
}

/// `package::module::name` of each hit, in order.
#[allow(dead_code)]
pub fn paths(hits: &[SearchHit]) -> Vec<String> {
    hits.iter().map(SearchHit::qualified_path).collect()
}
