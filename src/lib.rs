pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod item;
pub mod payload;
pub mod search;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;

pub use corpus::{Corpus, CorpusHandle, LoadReport, PackageOutcome};
pub use error::{LoadError, QueryError};
pub use item::{Item, ItemId, ItemKind, ItemStore, ModulePath};
pub use payload::{PackagePayload, RawItem, RawKind, RawPath, decode_json, decode_script, read_payloads};
pub use search::{RankingPolicy, SearchHit, SearchOptions};
