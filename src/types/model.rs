//! Canonical Code Model
//!
//! Language-neutral structural data produced by every Structurer and consumed by the
//! relationship resolver. Collections are always present (possibly empty) so callers never
//! have to distinguish "missing" from "empty".

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Positions
// =============================================================================

/// Zero-based `(row, column)` location in a source file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl From<tree_sitter::Point> for Position {
    fn from(point: tree_sitter::Point) -> Self {
        Self {
            row: point.row,
            column: point.column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.column)
    }
}

/// Half-open source span between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span of a syntax node.
    pub fn of_node(node: tree_sitter::Node) -> Self {
        Self {
            start: node.start_position().into(),
            end: node.end_position().into(),
        }
    }

    /// `self.start <= inner.start && self.end >= inner.end`
    pub fn contains(&self, inner: &Range) -> bool {
        self.start <= inner.start && self.end >= inner.end
    }
}

// =============================================================================
// Structures
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StructureType {
    #[default]
    Class,
    Interface,
    Struct,
    Trait,
    Enum,
}

impl StructureType {
    /// Interfaces and traits are implemented; everything else is extended.
    pub fn is_interface_like(&self) -> bool {
        matches!(self, StructureType::Interface | StructureType::Trait)
    }

    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            StructureType::Class | StructureType::Struct | StructureType::Enum
        )
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureType::Class => write!(f, "class"),
            StructureType::Interface => write!(f, "interface"),
            StructureType::Struct => write!(f, "struct"),
            StructureType::Trait => write!(f, "trait"),
            StructureType::Enum => write!(f, "enum"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAnnotation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

impl CodeAnnotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub annotations: Vec<CodeAnnotation>,
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFunction {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<CodeParameter>,
    #[serde(default)]
    pub annotations: Vec<CodeAnnotation>,
    pub start: Position,
    pub end: Position,
}

/// A class, interface, struct, trait or enum.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeStructure {
    #[serde(rename = "type")]
    pub structure_type: StructureType,
    pub name: String,
    /// Explicit canonical name; empty means "derive from package and name".
    #[serde(default)]
    pub canonical_name: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub methods: Vec<CodeFunction>,
    #[serde(default)]
    pub fields: Vec<CodeField>,
    #[serde(default)]
    pub constants: Vec<CodeField>,
    #[serde(default)]
    pub annotations: Vec<CodeAnnotation>,
    pub start: Position,
    pub end: Position,
}

impl CodeStructure {
    pub fn new(
        structure_type: StructureType,
        name: impl Into<String>,
        package: impl Into<String>,
    ) -> Self {
        Self {
            structure_type,
            name: name.into(),
            package: package.into(),
            ..Default::default()
        }
    }

    /// Map key for this structure: the explicit canonical name, else `package.name`.
    pub fn canonical_key(&self) -> String {
        if !self.canonical_name.is_empty() {
            return self.canonical_name.clone();
        }
        qualify(&self.package, &self.name)
    }

    pub fn range(&self) -> Range {
        Range::new(self.start, self.end)
    }
}

/// Join a package and a name with `.`, skipping the separator for an empty package.
pub fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}

// =============================================================================
// Files
// =============================================================================

/// Structural summary of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFile {
    pub name: String,
    pub filepath: String,
    pub language: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub functions: Vec<CodeFunction>,
    /// Every structure kind, interfaces and structs included.
    #[serde(default)]
    pub classes: Vec<CodeStructure>,
}

impl CodeFile {
    pub fn new(filepath: &str, language: impl Into<String>) -> Self {
        let name = std::path::Path::new(filepath)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(filepath)
            .to_string();
        Self {
            name,
            filepath: filepath.to_string(),
            language: language.into(),
            ..Default::default()
        }
    }

    pub fn find_structure_mut(&mut self, name: &str) -> Option<&mut CodeStructure> {
        self.classes.iter_mut().find(|s| s.name == name)
    }
}
