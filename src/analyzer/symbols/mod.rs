//! Symbol Extraction
//!
//! Hierarchically qualified symbols from tree-sitter tag queries.

pub mod extractor;
pub mod queries;

pub use extractor::{SymbolExtractor, extract_symbols};
pub use queries::symbol_query;
