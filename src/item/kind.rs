//! Item kinds and their legacy integer codes.

use rmcp::schemars;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// DO NOT add doc comments to individual variants - this causes schemars to generate
/// `oneOf` schemas instead of simple `enum` arrays, breaking MCP client enum handling.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Module,
    Struct,
    Enum,
    Trait,
    Variant,
    Function,
    Method,
    Field,
    TypeAlias,
    Constant,
    Static,
    Macro,
    Primitive,
}

/// Every kind, in declaration order.
pub const ALL_KINDS: [ItemKind; 13] = [
    ItemKind::Module,
    ItemKind::Struct,
    ItemKind::Enum,
    ItemKind::Trait,
    ItemKind::Variant,
    ItemKind::Function,
    ItemKind::Method,
    ItemKind::Field,
    ItemKind::TypeAlias,
    ItemKind::Constant,
    ItemKind::Static,
    ItemKind::Macro,
    ItemKind::Primitive,
];

impl ItemKind {
    /// Map a legacy search-index type code to a kind.
    ///
    /// Codes 7 (impl) and 8 (use) never describe a searchable item and are rejected
    /// along with anything out of range.
    pub const fn from_code(code: u64) -> Option<Self> {
        Some(match code {
            0 => Self::Module,
            1 => Self::Struct,
            2 => Self::Enum,
            3 | 13 => Self::Function,
            4 | 17 => Self::TypeAlias,
            5 | 14 => Self::Static,
            6 => Self::Trait,
            9 | 10 => Self::Method,
            11 => Self::Field,
            12 => Self::Variant,
            15 => Self::Macro,
            16 => Self::Primitive,
            18 => Self::Constant,
            _ => return None,
        })
    }

    /// Short label used in rendered output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Trait => "trait",
            Self::Variant => "variant",
            Self::Function => "fn",
            Self::Method => "method",
            Self::Field => "field",
            Self::TypeAlias => "type",
            Self::Constant => "const",
            Self::Static => "static",
            Self::Macro => "macro",
            Self::Primitive => "primitive",
        }
    }

    /// Whether this kind names a type (as opposed to a member or a namespace).
    pub const fn is_type(self) -> bool {
        matches!(
            self,
            Self::Struct | Self::Enum | Self::Trait | Self::TypeAlias | Self::Primitive
        )
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a kind name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown item kind '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for ItemKind {
    type Err = UnknownKind;

    /// Accepts the serialized names plus the short labels and common aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "module" | "mod" => Self::Module,
            "struct" => Self::Struct,
            "enum" => Self::Enum,
            "trait" | "interface" => Self::Trait,
            "variant" | "enumvariant" => Self::Variant,
            "function" | "fn" | "ffi" => Self::Function,
            "method" | "tymethod" => Self::Method,
            "field" | "structfield" => Self::Field,
            "typealias" | "typedef" | "type" | "associatedtype" => Self::TypeAlias,
            "constant" | "const" => Self::Constant,
            "static" => Self::Static,
            "macro" => Self::Macro,
            "primitive" => Self::Primitive,
            _ => return Err(UnknownKind(s.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case(0, Some(ItemKind::Module))]
    #[case(1, Some(ItemKind::Struct))]
    #[case(10, Some(ItemKind::Method))]
    #[case(11, Some(ItemKind::Field))]
    #[case(12, Some(ItemKind::Variant))]
    #[case(7, None)]
    #[case(8, None)]
    #[case(99, None)]
    fn test_from_code(#[case] code: u64, #[case] expected: Option<ItemKind>) {
        check!(ItemKind::from_code(code) == expected);
    }

    #[test]
    fn test_labels_parse_back() {
        for kind in ALL_KINDS {
            check!(kind.as_str().parse::<ItemKind>() == Ok(kind));
        }
    }

    #[test]
    fn test_unknown_name() {
        check!("impl".parse::<ItemKind>() == Err(UnknownKind("impl".to_string())));
    }
}
