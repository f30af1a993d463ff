//! Cross-file structural relationships: collection, name resolution, interface and
//! inheritance analysis.

pub mod collector;
pub mod hierarchy;
pub mod interface;
pub mod resolver;

pub use collector::{Implementor, RelationMap, StructureCollector, StructureEntry, StructureMap};
pub use hierarchy::{
    ClassHierarchyAnalyzer, HierarchyChild, HierarchyError, HierarchyGraph, build_hierarchy,
    compute_inheritance_depth,
};
pub use interface::InterfaceAnalyzer;
pub use resolver::{ResolutionTier, resolve, resolve_with_tier};
