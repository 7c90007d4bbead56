//! Decoder for the legacy `search-index.js` script encoding.
//!
//! Each package occupies one line of the form
//! `searchIndex['name'] = {"items":[...],"paths":[...]};`. Items are positional tuples
//! `[kind, name, path, desc, parent?]` and path entries are `[kind, name, parent?]`.

use super::{Decoded, PackagePayload, RawItem, RawKind, RawPath};
use crate::error::LoadError;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*searchIndex\s*\[\s*['"]([^'"]+)['"]\s*\]\s*=\s*(\{.*\})\s*;?\s*$"#)
        .expect("search index assignment pattern is valid")
});

#[derive(Deserialize)]
struct ScriptPackage {
    #[serde(default)]
    items: Vec<Vec<Value>>,
    #[serde(default)]
    paths: Vec<Vec<Value>>,
}

/// Decode every `searchIndex[...] = {...};` assignment in a legacy script.
///
/// Lines that are not assignments (`var searchIndex = {};`, `initSearch(...)`) are
/// skipped. A package whose body is not valid JSON is reported as a decode error
/// without affecting its siblings.
pub fn decode_script(source_name: &str, text: &str) -> Decoded {
    let mut decoded = Decoded::default();

    for line in text.lines() {
        let Some(captures) = ASSIGNMENT.captures(line) else {
            continue;
        };
        let name = &captures[1];

        match serde_json::from_str::<ScriptPackage>(&captures[2]) {
            Ok(body) => decoded.packages.push(PackagePayload {
                name: name.to_string(),
                items: body.items.iter().map(|tuple| item_from_tuple(tuple)).collect(),
                paths: body.paths.iter().map(|tuple| path_from_tuple(tuple)).collect(),
            }),
            Err(e) => {
                tracing::warn!("Skipping package '{}' in {}: {}", name, source_name, e);
                decoded
                    .errors
                    .push(LoadError::decode(format!("{}#{}", source_name, name), e));
            }
        }
    }

    if decoded.packages.is_empty() && decoded.errors.is_empty() && !text.trim().is_empty() {
        decoded.errors.push(LoadError::decode(
            source_name,
            "no searchIndex assignments found",
        ));
    }

    decoded
}

fn kind_at(tuple: &[Value], index: usize) -> Option<RawKind> {
    match tuple.get(index)? {
        Value::Number(n) => n.as_u64().map(RawKind::Code),
        Value::String(s) => Some(RawKind::Name(s.clone())),
        _ => None,
    }
}

fn str_at(tuple: &[Value], index: usize) -> String {
    tuple
        .get(index)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn index_at(tuple: &[Value], index: usize) -> Option<usize> {
    tuple
        .get(index)
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
}

fn item_from_tuple(tuple: &[Value]) -> RawItem {
    RawItem {
        kind: kind_at(tuple, 0),
        name: str_at(tuple, 1),
        path: str_at(tuple, 2),
        summary: str_at(tuple, 3),
        parent: index_at(tuple, 4),
        signature: None,
    }
}

fn path_from_tuple(tuple: &[Value]) -> RawPath {
    RawPath {
        kind: kind_at(tuple, 0),
        name: str_at(tuple, 1),
        parent: index_at(tuple, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    const SCRIPT: &str = r#"var searchIndex = {};
searchIndex['demo_client'] = {"items":[],"paths":[]};
searchIndex['gcc'] = {"items":[[0,"","gcc",""],[1,"Config","","Extra configuration to pass to gcc."],[11,"objects","","Additional object files",0],[3,"compile_library","","Compile a library."],[10,"default","","",0]],"paths":[[1,"Config"]]};

initSearch(searchIndex);
"#;

    #[test]
    fn test_decode_packages() {
        let decoded = decode_script("search-index.js", SCRIPT);
        check!(decoded.errors.is_empty());

        let names: Vec<_> = decoded.packages.iter().map(|p| p.name.as_str()).collect();
        check!(names == ["demo_client", "gcc"]);

        let gcc = &decoded.packages[1];
        check!(gcc.items.len() == 5);
        check!(gcc.items[0].path == "gcc");
        check!(gcc.items[2].kind == Some(RawKind::Code(11)));
        check!(gcc.items[2].parent == Some(0));
        check!(gcc.items[3].parent.is_none());
        check!(gcc.paths == vec![RawPath::new(RawKind::Code(1), "Config")]);
    }

    #[test]
    fn test_bad_package_does_not_hide_siblings() {
        let script = "searchIndex['ok'] = {\"items\":[],\"paths\":[]};\n\
                      searchIndex['bad'] = {\"items\":[oops]};\n";
        let decoded = decode_script("mixed.js", script);
        check!(decoded.packages.len() == 1);
        check!(decoded.packages[0].name == "ok");
        check!(matches!(
            decoded.errors.as_slice(),
            [LoadError::Decode { source_name, .. }] if source_name == "mixed.js#bad"
        ));
    }

    #[test]
    fn test_short_tuples_decode_without_kind() {
        let script = r#"searchIndex['p'] = {"items":[[],["x"]],"paths":[]};"#;
        let decoded = decode_script("short.js", script);
        let items = &decoded.packages[0].items;
        check!(items[0].kind.is_none());
        check!(items[1].kind == Some(RawKind::Name("x".to_string())));
        check!(items[1].name.is_empty());
    }

    #[test]
    fn test_not_a_script() {
        let decoded = decode_script("readme.js", "console.log('hi');");
        check!(decoded.packages.is_empty());
        check!(decoded.errors.len() == 1);
    }
}
