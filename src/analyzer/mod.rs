//! Code Analyzer Module
//!
//! Provides language-agnostic code analysis capabilities:
//! - Multi-language structuring (tree-sitter into the canonical code model)
//! - File scanning with gitignore support
//! - Scope-aware symbol extraction from tags queries

pub mod parser;
pub mod scanner;
pub mod symbols;
