//! codeweave - Structural Analysis for Multi-Language Codebases
//!
//! Reads source files with tree-sitter and answers structural questions about them:
//! which symbols a file declares and how they nest, which classes implement which
//! interfaces, and how deep the inheritance hierarchy goes.
//!
//! ## Core Features
//!
//! - **Symbol Extraction**: scope-qualified names from tags-style queries
//! - **Structurers**: Java, TypeScript/JavaScript, Python, Go and Rust into one code model
//! - **Relationship Resolution**: exact, same-package and unique-suffix name matching
//! - **Hierarchy Analysis**: depth, deepest classes and cycle detection
//!
//! ## Quick Start
//!
//! ```ignore
//! use codeweave::{AnalysisPipeline, Config};
//!
//! let report = AnalysisPipeline::new(Config::default()).run("./my-project").await?;
//! println!("max depth: {}", report.extension_analysis.hierarchy.max_depth);
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: Language detection, Structurers, file scanning, symbol extraction
//! - [`relations`]: Structural collector, resolver, interface and hierarchy analyzers
//! - [`pipeline`]: Scan, structure and analyze a directory
//! - [`config`]: Layered configuration

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod pipeline;
pub mod relations;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, OutputFormat};

// Error Types
pub use types::error::{Result, WeaveError};

// Model
pub use types::{AnalysisReport, CodeFile, CodeStructure, CodeSymbol, StructureType, SymbolKind};

// =============================================================================
// Analyzer Re-exports
// =============================================================================

pub use analyzer::{
    parser::{Language, Structurer, create_structurer},
    scanner::FileScanner,
    symbols::{SymbolExtractor, extract_symbols},
};

// =============================================================================
// Relations Re-exports
// =============================================================================

pub use pipeline::{AnalysisPipeline, analyze_code_files};
pub use relations::{
    ClassHierarchyAnalyzer, HierarchyError, InterfaceAnalyzer, StructureCollector,
};
