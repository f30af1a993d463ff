//! Symbol records emitted by the symbol extractor.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Class,
    Constant,
    Enum,
    EnumMember,
    Field,
    Function,
    Implementation,
    Interface,
    Macro,
    Method,
    Module,
    Struct,
    Trait,
    Type,
    Union,
    Variable,
    Reference,
    Import,
    Wildcard,
    Alias,
}

/// Capture tag for modules that run to the end of the file (e.g. C# `namespace X;`).
pub const FILE_SCOPED_MODULE_TAG: &str = "definition.module.filescoped";

/// Capture tag → kind. Anything not listed degrades to [`SymbolKind::Variable`].
const KIND_TABLE: &[(&str, SymbolKind)] = &[
    ("definition.class", SymbolKind::Class),
    ("definition.constant", SymbolKind::Constant),
    ("definition.enum", SymbolKind::Enum),
    ("definition.enum_variant", SymbolKind::EnumMember),
    ("definition.field", SymbolKind::Field),
    ("definition.function", SymbolKind::Function),
    ("definition.implementation", SymbolKind::Implementation),
    ("definition.interface", SymbolKind::Interface),
    ("definition.macro", SymbolKind::Macro),
    ("definition.method", SymbolKind::Method),
    ("definition.module", SymbolKind::Module),
    (FILE_SCOPED_MODULE_TAG, SymbolKind::Module),
    ("definition.struct", SymbolKind::Struct),
    ("definition.trait", SymbolKind::Trait),
    ("definition.type", SymbolKind::Type),
    ("definition.union", SymbolKind::Union),
    ("definition.variable", SymbolKind::Variable),
    ("reference", SymbolKind::Reference),
    ("import", SymbolKind::Import),
    ("wildcard", SymbolKind::Wildcard),
    ("alias", SymbolKind::Alias),
];

impl SymbolKind {
    /// Look up a capture tag, returning `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        KIND_TABLE
            .iter()
            .find(|(known, _)| *known == tag)
            .map(|(_, kind)| *kind)
    }

    /// Lenient lookup: unknown tags log a warning and become `Variable`.
    pub fn from_tag_or_variable(tag: &str) -> Self {
        Self::from_tag(tag).unwrap_or_else(|| {
            tracing::warn!("Unknown symbol kind tag '{}', treating as variable", tag);
            SymbolKind::Variable
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Constant => "constant",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumMember => "enumMember",
            SymbolKind::Field => "field",
            SymbolKind::Function => "function",
            SymbolKind::Implementation => "implementation",
            SymbolKind::Interface => "interface",
            SymbolKind::Macro => "macro",
            SymbolKind::Method => "method",
            SymbolKind::Module => "module",
            SymbolKind::Struct => "struct",
            SymbolKind::Trait => "trait",
            SymbolKind::Type => "type",
            SymbolKind::Union => "union",
            SymbolKind::Variable => "variable",
            SymbolKind::Reference => "reference",
            SymbolKind::Import => "import",
            SymbolKind::Wildcard => "wildcard",
            SymbolKind::Alias => "alias",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named declaration, qualified by its lexical nesting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSymbol {
    pub uri: String,
    /// Dotted chain of enclosing symbol names, optionally prefixed by a receiver.
    pub qualified_name: String,
    pub name: String,
    pub comment: String,
    pub comment_range: Option<Range>,
    pub name_range: Range,
    pub body_range: Option<Range>,
    /// Span whose containment defines nesting.
    pub extent_range: Range,
    pub kind: SymbolKind,
    pub depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags() {
        assert_eq!(
            SymbolKind::from_tag("definition.class"),
            Some(SymbolKind::Class)
        );
        assert_eq!(
            SymbolKind::from_tag("definition.enum_variant"),
            Some(SymbolKind::EnumMember)
        );
        assert_eq!(
            SymbolKind::from_tag(FILE_SCOPED_MODULE_TAG),
            Some(SymbolKind::Module)
        );
        assert_eq!(SymbolKind::from_tag("alias"), Some(SymbolKind::Alias));
    }

    #[test]
    fn test_unknown_tag_defaults_to_variable() {
        assert_eq!(SymbolKind::from_tag("definition.bogus"), None);
        assert_eq!(
            SymbolKind::from_tag_or_variable("definition.bogus"),
            SymbolKind::Variable
        );
    }

    #[test]
    fn test_every_kind_has_a_tag() {
        let kinds = [
            SymbolKind::Class,
            SymbolKind::Constant,
            SymbolKind::Enum,
            SymbolKind::EnumMember,
            SymbolKind::Field,
            SymbolKind::Function,
            SymbolKind::Implementation,
            SymbolKind::Interface,
            SymbolKind::Macro,
            SymbolKind::Method,
            SymbolKind::Module,
            SymbolKind::Struct,
            SymbolKind::Trait,
            SymbolKind::Type,
            SymbolKind::Union,
            SymbolKind::Variable,
            SymbolKind::Reference,
            SymbolKind::Import,
            SymbolKind::Wildcard,
            SymbolKind::Alias,
        ];
        for kind in kinds {
            assert!(
                KIND_TABLE.iter().any(|(_, k)| *k == kind),
                "{} missing from table",
                kind
            );
        }
    }
}
