//! Language Detection Module
//!
//! **Single source of truth** for language detection and grammar lookup.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use codeweave::analyzer::parser::language::Language;
//!
//! let lang = Language::from_path("src/Main.java");
//! assert_eq!(lang, Language::Java);
//! assert_eq!(lang.id(), "java");
//! assert!(lang.has_structurer());
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Language Metadata Table - Single Source of Truth
// =============================================================================

/// Language metadata entry containing all language-specific information
struct LanguageMeta {
    /// Display name (human-readable)
    display_name: &'static str,
    /// Stable lowercase identifier, used in `CodeFile::language` and config
    id: &'static str,
    /// File extensions that map to this language
    extensions: &'static [&'static str],
    /// Alternative names for parsing from string
    aliases: &'static [&'static str],
    /// Whether a Structurer and symbol query exist for this language
    has_structurer: bool,
}

/// Macro to define language metadata concisely
macro_rules! lang_meta {
    ($display:literal, $id:literal, [$($ext:literal),*], [$($alias:literal),*], $structurer:literal) => {
        LanguageMeta {
            display_name: $display,
            id: $id,
            extensions: &[$($ext),*],
            aliases: &[$($alias),*],
            has_structurer: $structurer,
        }
    };
}

impl Language {
    /// Get metadata for this language variant
    fn meta(&self) -> LanguageMeta {
        match self {
            Language::Java => lang_meta!("Java", "java", ["java"], ["java"], true),
            Language::TypeScript => lang_meta!("TypeScript", "typescript", ["ts", "mts", "cts"], ["typescript", "ts"], true),
            Language::JavaScript => lang_meta!("JavaScript", "javascript", ["js", "mjs", "cjs"], ["javascript", "js"], true),
            Language::Tsx => lang_meta!("TSX", "tsx", ["tsx"], ["tsx"], true),
            Language::Jsx => lang_meta!("JSX", "jsx", ["jsx"], ["jsx"], true),
            Language::Python => lang_meta!("Python", "python", ["py", "pyi"], ["python", "py"], true),
            Language::Go => lang_meta!("Go", "go", ["go"], ["go", "golang"], true),
            Language::Rust => lang_meta!("Rust", "rust", ["rs"], ["rust", "rs"], true),

            // Recognized, no Structurer
            Language::Kotlin => lang_meta!("Kotlin", "kotlin", ["kt", "kts"], ["kotlin", "kt"], false),
            Language::Scala => lang_meta!("Scala", "scala", ["scala", "sc"], ["scala"], false),
            Language::C => lang_meta!("C", "c", ["c", "h"], ["c"], false),
            Language::Cpp => lang_meta!("C++", "cpp", ["cpp", "cc", "cxx", "hpp", "hh", "hxx"], ["cpp", "c++", "cxx"], false),
            Language::CSharp => lang_meta!("C#", "csharp", ["cs"], ["csharp", "c#", "cs"], false),
            Language::Ruby => lang_meta!("Ruby", "ruby", ["rb"], ["ruby", "rb"], false),
            Language::Php => lang_meta!("PHP", "php", ["php"], ["php"], false),
            Language::Swift => lang_meta!("Swift", "swift", ["swift"], ["swift"], false),

            Language::Unknown => lang_meta!("Unknown", "unknown", [], ["unknown", ""], false),
        }
    }
}

// =============================================================================
// Language Enum Definition
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    Java,
    TypeScript,
    JavaScript,
    Tsx,
    Jsx,
    Python,
    Go,
    Rust,

    Kotlin,
    Scala,
    C,
    Cpp,
    CSharp,
    Ruby,
    Php,
    Swift,

    #[default]
    Unknown,
}

// =============================================================================
// Language Methods (using metadata table)
// =============================================================================

impl Language {
    /// Display name (human-readable)
    pub fn as_str(&self) -> &'static str {
        self.meta().display_name
    }

    /// Lowercase identifier
    pub fn id(&self) -> &'static str {
        self.meta().id
    }

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        let ext_lower = ext.to_lowercase();

        for lang in Self::all_variants() {
            if lang.meta().extensions.iter().any(|e| *e == ext_lower) {
                return *lang;
            }
        }

        Language::Unknown
    }

    /// Detect language from file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Language::Unknown)
    }

    /// Check if this language has a Structurer and a built-in symbol query
    pub fn has_structurer(&self) -> bool {
        self.meta().has_structurer
    }

    /// Compiled tree-sitter grammar. JavaScript is read with the TypeScript grammar and JSX
    /// with the TSX grammar.
    pub fn grammar(&self) -> Option<tree_sitter::Language> {
        match self {
            Language::Java => Some(tree_sitter_java::LANGUAGE.into()),
            Language::TypeScript | Language::JavaScript => {
                Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            }
            Language::Tsx | Language::Jsx => Some(tree_sitter_typescript::LANGUAGE_TSX.into()),
            Language::Python => Some(tree_sitter_python::LANGUAGE.into()),
            Language::Go => Some(tree_sitter_go::LANGUAGE.into()),
            Language::Rust => Some(tree_sitter_rust::LANGUAGE.into()),
            _ => None,
        }
    }

    /// Get all language variants for iteration
    pub fn all_variants() -> &'static [Language] {
        &[
            Language::Java, Language::TypeScript, Language::JavaScript, Language::Tsx,
            Language::Jsx, Language::Python, Language::Go, Language::Rust,
            Language::Kotlin, Language::Scala, Language::C, Language::Cpp,
            Language::CSharp, Language::Ruby, Language::Php, Language::Swift,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s_lower = s.to_lowercase();

        for lang in Self::all_variants() {
            if lang.meta().aliases.iter().any(|a| *a == s_lower) {
                return Ok(*lang);
            }
        }

        if s_lower.is_empty() || s_lower == "unknown" {
            return Ok(Language::Unknown);
        }

        Err(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("java"), Language::Java);
        assert_eq!(Language::from_extension("RS"), Language::Rust);
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("tsx"), Language::Tsx);
        assert_eq!(Language::from_extension("mjs"), Language::JavaScript);
        assert_eq!(Language::from_extension("kt"), Language::Kotlin);
        assert_eq!(Language::from_extension("unknown"), Language::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("src/main.rs"), Language::Rust);
        assert_eq!(Language::from_path("cmd/server/main.go"), Language::Go);
        assert_eq!(Language::from_path("no_extension"), Language::Unknown);
        assert_eq!(Language::from_path("Component.tsx"), Language::Tsx);
    }

    #[test]
    fn test_has_structurer() {
        assert!(Language::Java.has_structurer());
        assert!(Language::JavaScript.has_structurer());
        assert!(!Language::Kotlin.has_structurer());
        assert!(!Language::Unknown.has_structurer());
    }

    #[test]
    fn test_grammar_matches_structurer_support() {
        for lang in Language::all_variants() {
            assert_eq!(lang.grammar().is_some(), lang.has_structurer(), "{:?}", lang);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("java".parse::<Language>(), Ok(Language::Java));
        assert_eq!("GoLang".parse::<Language>(), Ok(Language::Go));
        assert_eq!("c++".parse::<Language>(), Ok(Language::Cpp));
        assert_eq!("invalid_lang_xyz".parse::<Language>(), Err(()));
    }

    #[test]
    fn test_display_and_id() {
        assert_eq!(Language::Cpp.to_string(), "C++");
        assert_eq!(Language::TypeScript.id(), "typescript");
    }

    #[test]
    fn test_metadata_consistency() {
        for lang in Language::all_variants() {
            let meta = lang.meta();
            assert!(!meta.display_name.is_empty(), "Empty display name for {:?}", lang);
            assert!(!meta.extensions.is_empty(), "No extensions for {:?}", lang);
        }
    }
}
