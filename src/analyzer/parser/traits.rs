use std::path::{Component, Path};

use super::Language;
use crate::types::{CodeFile, Position, Result, WeaveError};

/// Turns one source file into the canonical `CodeFile` model.
pub trait Structurer: Send + Sync {
    fn language(&self) -> Language;

    fn is_applicable(&self, language: Language) -> bool {
        language == self.language()
    }

    fn parse_file(&self, source: &str, file_path: &str) -> Result<CodeFile>;
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
pub fn get_node_text<'a>(node: tree_sitter::Node, content: &'a [u8]) -> &'a str {
    node.utf8_text(content).unwrap_or_else(|e| {
        tracing::debug!(
            "UTF-8 extraction failed at {}:{}-{}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            node.end_position().row + 1,
            node.end_position().column,
            e
        );
        ""
    })
}

/// Text of the named field child, if present.
pub fn field_text<'a>(node: tree_sitter::Node, field: &str, content: &'a [u8]) -> Option<&'a str> {
    node.child_by_field_name(field)
        .map(|child| get_node_text(child, content))
}

/// Named children collected eagerly so callers can recurse freely.
pub fn named_children(node: tree_sitter::Node) -> Vec<tree_sitter::Node> {
    let mut cursor = node.walk();
    let children = node.named_children(&mut cursor).collect();
    children
}

/// First direct child (named or not) of the given kind.
pub fn find_child<'t>(
    node: tree_sitter::Node<'t>,
    kind: &str,
) -> Option<tree_sitter::Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

pub fn start_end(node: tree_sitter::Node) -> (Position, Position) {
    (node.start_position().into(), node.end_position().into())
}

/// Create a tree-sitter parser for the given language.
/// This helper reduces boilerplate in language-specific parsers.
pub fn create_ts_parser<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.into())
        .map_err(|e| WeaveError::Parse {
            message: format!("Failed to set {} language: {}", lang_name, e),
            path: String::new(),
        })?;
    Ok(parser)
}

/// Parse `source` with the grammar of `language`.
pub fn parse_tree(language: Language, source: &str, path: &str) -> Result<tree_sitter::Tree> {
    let grammar = language
        .grammar()
        .ok_or_else(|| WeaveError::UnsupportedLanguage(language.to_string()))?;
    let mut parser = create_ts_parser(grammar, language.as_str()).map_err(|e| match e {
        WeaveError::Parse { message, .. } => WeaveError::parse(path, message),
        other => other,
    })?;
    parser
        .parse(source, None)
        .ok_or_else(|| WeaveError::parse(path, format!("Failed to parse {} file", language)))
}

/// Dotted module path for languages whose package follows the file layout.
///
/// Everything up to and including the last `src` directory is dropped, as are index-like
/// file stems: `src/app/models/user.py` → `app.models.user`, `src/net/mod.rs` → `net`,
/// `lib.rs` → ``.
pub fn module_path_from_file(path: &str) -> String {
    let path = Path::new(path);
    let mut segments: Vec<&str> = path
        .parent()
        .map(|dir| {
            dir.components()
                .filter_map(|c| match c {
                    Component::Normal(s) => s.to_str(),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if let Some(idx) = segments.iter().rposition(|s| *s == "src") {
        segments.drain(..=idx);
    }

    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        // `foo.d.ts` → `foo`
        let stem = stem.split('.').next().unwrap_or(stem);
        if !matches!(stem, "mod" | "lib" | "main" | "index" | "__init__") {
            segments.push(stem);
        }
    }

    segments.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_path_from_file() {
        assert_eq!(module_path_from_file("src/app/models/user.py"), "app.models.user");
        assert_eq!(module_path_from_file("app/models/__init__.py"), "app.models");
        assert_eq!(module_path_from_file("src/net/mod.rs"), "net");
        assert_eq!(module_path_from_file("src/lib.rs"), "");
        assert_eq!(module_path_from_file("crates/core/src/graph.rs"), "graph");
        assert_eq!(
            module_path_from_file("./web/src/components/Button.tsx"),
            "components.Button"
        );
        assert_eq!(module_path_from_file("types/api.d.ts"), "types.api");
    }

    #[test]
    fn test_parse_tree_unsupported() {
        let err = parse_tree(Language::Kotlin, "class A", "A.kt").unwrap_err();
        assert!(matches!(err, WeaveError::UnsupportedLanguage(_)));
    }

    #[test]
    fn test_parse_tree_java() {
        let tree = parse_tree(Language::Java, "class A {}", "A.java").unwrap();
        assert_eq!(tree.root_node().kind(), "program");
    }

    #[test]
    fn test_field_text() {
        let source = "class Greeter {}";
        let tree = parse_tree(Language::Java, source, "Greeter.java").unwrap();
        let class = tree.root_node().named_child(0).unwrap();
        assert_eq!(field_text(class, "name", source.as_bytes()), Some("Greeter"));
        assert_eq!(field_text(class, "superclass", source.as_bytes()), None);
    }
}
