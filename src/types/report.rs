//! Relationship Reports
//!
//! Pure output of the interface and class-hierarchy analyzers. Rebuilt on every run and
//! serialized as camelCase JSON.

use serde::{Deserialize, Serialize};

use super::Range;

// =============================================================================
// Interface Analysis
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationRef {
    pub class_name: String,
    pub class_file: String,
    pub position: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceImplementation {
    pub interface_name: String,
    pub interface_file: String,
    pub method_count: usize,
    pub package: String,
    pub position: Range,
    pub implementations: Vec<ImplementationRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceRef {
    pub interface_name: String,
    pub interface_file: String,
    pub position: Range,
}

/// A class implementing more than one distinct interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiImplementation {
    pub class_name: String,
    pub class_file: String,
    pub position: Range,
    pub interface_count: usize,
    pub interfaces: Vec<InterfaceRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceStats {
    pub total_interfaces: usize,
    pub implemented_interfaces: usize,
    pub unimplemented_interfaces: usize,
    pub multi_implementer_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceAnalysis {
    pub interfaces: Vec<InterfaceImplementation>,
    pub multi_implementers: Vec<MultiImplementation>,
    pub stats: InterfaceStats,
}

// =============================================================================
// Extension Analysis
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRef {
    pub class_name: String,
    pub class_file: String,
    pub position: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassExtension {
    pub parent_name: String,
    pub parent_file: String,
    pub package: String,
    pub position: Range,
    pub children: Vec<ChildRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentRef {
    pub parent_name: String,
    pub parent_file: String,
    pub position: Range,
}

/// A class extending more than one distinct parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiExtension {
    pub class_name: String,
    pub class_file: String,
    pub position: Range,
    pub parent_count: usize,
    pub parents: Vec<ParentRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepestClass {
    pub class_name: String,
    /// Empty when the class could not be located.
    pub class_file: String,
    pub position: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InheritanceHierarchy {
    pub max_depth: usize,
    pub deepest_classes: Vec<DeepestClass>,
    /// Set when depth analysis stopped on an inheritance cycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionStats {
    pub extended_class_count: usize,
    pub total_extension_relations: usize,
    pub multi_extended_class_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionAnalysis {
    pub extensions: Vec<ClassExtension>,
    pub multi_extensions: Vec<MultiExtension>,
    pub hierarchy: InheritanceHierarchy,
    pub stats: ExtensionStats,
}

// =============================================================================
// Combined
// =============================================================================

/// Full result of one pipeline run over a directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub root: String,
    pub files_scanned: usize,
    pub files_structured: usize,
    pub files_skipped: usize,
    pub interface_analysis: InterfaceAnalysis,
    pub extension_analysis: ExtensionAnalysis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_analysis_schema() {
        let json = serde_json::to_value(InterfaceAnalysis::default()).unwrap();
        assert!(json.get("interfaces").is_some());
        assert!(json.get("multiImplementers").is_some());
        assert_eq!(json["stats"]["totalInterfaces"], 0);
    }

    #[test]
    fn test_hierarchy_omits_cycle_when_absent() {
        let json = serde_json::to_value(InheritanceHierarchy::default()).unwrap();
        assert_eq!(json["maxDepth"], 0);
        assert!(json.get("cycle").is_none());
    }
}
