//! Language Structurers
//!
//! Tree-sitter based Structurers that turn source files into the canonical `CodeFile` model.
//!
//! ## Structurer Factory
//!
//! Use `create_structurer` to create a Structurer for a given language:
//!
//! ```rust,ignore
//! use codeweave::analyzer::parser::{Language, create_structurer};
//!
//! let structurer = create_structurer(Language::Java)?;
//! let file = structurer.parse_file(source, "src/Greeter.java")?;
//! ```

pub mod go;
pub mod java;
pub mod language;
pub mod python;
pub mod rust_lang;
pub mod traits;
pub mod typescript;

pub use go::GoStructurer;
pub use java::JavaStructurer;
pub use language::Language;
pub use python::PythonStructurer;
pub use rust_lang::RustStructurer;
pub use traits::{
    Structurer, create_ts_parser, field_text, find_child, get_node_text, module_path_from_file,
    named_children, parse_tree, start_end,
};
pub use typescript::TypeScriptStructurer;

use crate::types::{Result, WeaveError};

/// Create a Structurer for the given language.
///
/// JavaScript, TSX and JSX share the TypeScript Structurer.
/// Returns `UnsupportedLanguage` for languages without one.
pub fn create_structurer(language: Language) -> Result<Box<dyn Structurer>> {
    match language {
        Language::Java => Ok(Box::new(JavaStructurer::new()?)),
        Language::TypeScript | Language::JavaScript | Language::Tsx | Language::Jsx => {
            Ok(Box::new(TypeScriptStructurer::new(language)?))
        }
        Language::Python => Ok(Box::new(PythonStructurer::new()?)),
        Language::Go => Ok(Box::new(GoStructurer::new()?)),
        Language::Rust => Ok(Box::new(RustStructurer::new()?)),
        _ => Err(WeaveError::UnsupportedLanguage(language.to_string())),
    }
}
