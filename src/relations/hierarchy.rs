//! Class Hierarchy Analyzer
//!
//! Builds parent → child reports from the collector's extension edges, detects classes
//! with more than one parent and computes inheritance depth over the resulting graph.
//!
//! Depth is the length of the longest parent → child chain below a root (a class that is
//! never anybody's child). The walk colors nodes white/gray/black so a malformed graph
//! (`A extends B extends A`) stops with [`HierarchyError::CycleDetected`] instead of
//! recursing forever.

use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;
use tracing::{debug, warn};

use super::collector::{RelationMap, StructureCollector, StructureMap};
use super::interface::{dedup_implementors, find_class, sorted_by_package_and_name};
use crate::types::{
    ChildRef, ClassExtension, DeepestClass, ExtensionAnalysis, ExtensionStats,
    InheritanceHierarchy, MultiExtension, ParentRef, Range,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("Inheritance cycle detected: {}", .cycle.join(" -> "))]
    CycleDetected { cycle: Vec<String> },
}

// ===== Graph =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyChild {
    pub child_key: String,
    pub child_info: ChildRef,
}

/// Deduplicated extension graph, keyed by canonical class name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyGraph {
    /// parent → direct children
    pub children: IndexMap<String, Vec<HierarchyChild>>,
    /// child → distinct parents
    pub parents: IndexMap<String, IndexSet<String>>,
}

impl HierarchyGraph {
    /// Classes that have children but never appear as a child.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.children
            .keys()
            .filter(|key| !self.parents.contains_key(key.as_str()))
            .map(String::as_str)
    }

    fn child_info(&self, child_key: &str) -> Option<&ChildRef> {
        self.children
            .values()
            .flatten()
            .find(|child| child.child_key == child_key)
            .map(|child| &child.child_info)
    }
}

/// Group extension edges by parent.
///
/// Parents are visited in `(package, name)` order and each child bucket is deduplicated by
/// `(class_name, class_file)`. Parents left without children are omitted.
pub fn build_hierarchy(
    class_map: &StructureMap,
    extension_map: &RelationMap,
) -> (Vec<ClassExtension>, HierarchyGraph) {
    let mut extensions = Vec::new();
    let mut graph = HierarchyGraph::default();

    for (parent_key, entry) in sorted_by_package_and_name(class_map) {
        let Some(bucket) = extension_map.get(parent_key) else {
            continue;
        };
        let children = dedup_implementors(bucket);
        if children.is_empty() {
            continue;
        }

        let mut child_refs = Vec::with_capacity(children.len());
        for child in children {
            let child_ref = ChildRef {
                class_name: child.class_name.clone(),
                class_file: child.class_file.clone(),
                position: child.class.range(),
            };
            let child_key = child.class.canonical_key();

            graph
                .parents
                .entry(child_key.clone())
                .or_default()
                .insert(parent_key.clone());
            graph
                .children
                .entry(parent_key.clone())
                .or_default()
                .push(HierarchyChild {
                    child_key,
                    child_info: child_ref.clone(),
                });
            child_refs.push(child_ref);
        }

        extensions.push(ClassExtension {
            parent_name: entry.structure.name.clone(),
            parent_file: entry.file.clone(),
            package: entry.structure.package.clone(),
            position: entry.structure.range(),
            children: child_refs,
        });
    }

    (extensions, graph)
}

// ===== Depth =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, Default)]
struct Depth<'g> {
    height: usize,
    deepest: Option<&'g HierarchyChild>,
}

struct DepthWalk<'g> {
    graph: &'g HierarchyGraph,
    marks: HashMap<&'g str, Mark>,
    memo: HashMap<&'g str, Depth<'g>>,
    path: Vec<&'g str>,
}

impl<'g> DepthWalk<'g> {
    fn new(graph: &'g HierarchyGraph) -> Self {
        Self {
            graph,
            marks: HashMap::new(),
            memo: HashMap::new(),
            path: Vec::new(),
        }
    }

    fn is_visited(&self, key: &str) -> bool {
        self.marks.contains_key(key)
    }

    fn visit(&mut self, key: &'g str) -> Result<Depth<'g>, HierarchyError> {
        match self.marks.get(key) {
            Some(Mark::Done) => return Ok(self.memo.get(key).copied().unwrap_or_default()),
            Some(Mark::InProgress) => {
                let start = self.path.iter().position(|k| *k == key).unwrap_or(0);
                let mut cycle: Vec<String> =
                    self.path[start..].iter().map(|k| k.to_string()).collect();
                cycle.push(key.to_string());
                return Err(HierarchyError::CycleDetected { cycle });
            }
            None => {}
        }

        self.marks.insert(key, Mark::InProgress);
        self.path.push(key);

        let graph = self.graph;
        let mut best = Depth::default();
        for child in graph.children.get(key).into_iter().flatten() {
            let below = self.visit(&child.child_key)?;
            let height = below.height + 1;
            // Strictly greater: the first child reaching the maximum is kept.
            if height > best.height {
                best = Depth {
                    height,
                    deepest: Some(below.deepest.unwrap_or(child)),
                };
            }
        }

        self.path.pop();
        self.marks.insert(key, Mark::Done);
        self.memo.insert(key, best);
        Ok(best)
    }
}

/// Compute `{max_depth, deepest_classes}` over the graph.
///
/// `deepest_classes` holds one entry per root tied at `max_depth`, naming the leaf at the
/// end of that root's longest chain. Fails on the first cycle found.
pub fn compute_inheritance_depth(
    graph: &HierarchyGraph,
    class_map: &StructureMap,
) -> Result<InheritanceHierarchy, HierarchyError> {
    let mut walk = DepthWalk::new(graph);

    let mut root_depths = Vec::new();
    for root in graph.roots() {
        let depth = walk.visit(root)?;
        root_depths.push((root, depth));
    }

    // Anything still unvisited sits on or below a cycle with no root above it.
    for key in graph.children.keys() {
        if !walk.is_visited(key) {
            walk.visit(key)?;
        }
    }

    let max_depth = root_depths.iter().map(|(_, d)| d.height).max().unwrap_or(0);

    let mut deepest_classes = Vec::new();
    if max_depth > 0 {
        let mut seen = HashSet::new();
        for (root, depth) in &root_depths {
            if depth.height != max_depth {
                continue;
            }
            let class = resolve_deepest(root, depth.deepest, class_map);
            if seen.insert((class.class_name.clone(), class.class_file.clone())) {
                deepest_classes.push(class);
            }
        }
    }

    debug!(
        "Inheritance depth {} over {} roots",
        max_depth,
        root_depths.len()
    );

    Ok(InheritanceHierarchy {
        max_depth,
        deepest_classes,
        cycle: None,
    })
}

fn resolve_deepest(
    root: &str,
    deepest: Option<&HierarchyChild>,
    class_map: &StructureMap,
) -> DeepestClass {
    if let Some(child) = deepest {
        return DeepestClass {
            class_name: child.child_info.class_name.clone(),
            class_file: child.child_info.class_file.clone(),
            position: child.child_info.position,
        };
    }
    match find_class(class_map, root) {
        Some(entry) => DeepestClass {
            class_name: entry.structure.name.clone(),
            class_file: entry.file.clone(),
            position: entry.structure.range(),
        },
        None => DeepestClass {
            class_name: root.to_string(),
            class_file: String::new(),
            position: Range::default(),
        },
    }
}

// ===== Analyzer =====

pub struct ClassHierarchyAnalyzer<'a> {
    collector: &'a StructureCollector,
}

impl<'a> ClassHierarchyAnalyzer<'a> {
    pub fn new(collector: &'a StructureCollector) -> Self {
        Self { collector }
    }

    pub fn analyze(&self) -> ExtensionAnalysis {
        let class_map = self.collector.class_map();
        let (extensions, graph) = build_hierarchy(class_map, self.collector.extension_map());

        let multi_extensions = self.multi_extensions(&graph);

        let hierarchy = match compute_inheritance_depth(&graph, class_map) {
            Ok(hierarchy) => hierarchy,
            Err(HierarchyError::CycleDetected { cycle }) => {
                warn!("Inheritance cycle detected: {}", cycle.join(" -> "));
                InheritanceHierarchy {
                    cycle: Some(cycle),
                    ..Default::default()
                }
            }
        };

        let stats = ExtensionStats {
            extended_class_count: extensions.len(),
            total_extension_relations: extensions.iter().map(|e| e.children.len()).sum(),
            multi_extended_class_count: multi_extensions.len(),
        };

        ExtensionAnalysis {
            extensions,
            multi_extensions,
            hierarchy,
            stats,
        }
    }

    fn multi_extensions(&self, graph: &HierarchyGraph) -> Vec<MultiExtension> {
        let class_map = self.collector.class_map();

        let mut multi: Vec<_> = graph
            .parents
            .iter()
            .filter(|(_, parents)| parents.len() > 1)
            .collect();
        multi.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

        multi
            .into_iter()
            .map(|(child_key, parents)| {
                let (class_name, class_file, position) = match find_class(class_map, child_key) {
                    Some(e) => (e.structure.name.clone(), e.file.clone(), e.structure.range()),
                    None => match graph.child_info(child_key) {
                        Some(info) => {
                            (info.class_name.clone(), info.class_file.clone(), info.position)
                        }
                        None => (child_key.clone(), String::new(), Range::default()),
                    },
                };
                MultiExtension {
                    class_name,
                    class_file,
                    position,
                    parent_count: parents.len(),
                    parents: parents
                        .iter()
                        .filter_map(|key| class_map.get(key))
                        .map(|parent| ParentRef {
                            parent_name: parent.structure.name.clone(),
                            parent_file: parent.file.clone(),
                            position: parent.structure.range(),
                        })
                        .collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::collector::tests::{file_with, structure};
    use crate::types::{CodeStructure, StructureType};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn class(name: &str, parents: &[&str]) -> CodeStructure {
        let mut s = structure(StructureType::Class, "p", name, 0);
        s.extends = parents.iter().map(|p| p.to_string()).collect();
        s
    }

    fn collect(classes: Vec<CodeStructure>) -> StructureCollector {
        let mut collector = StructureCollector::new();
        for class in classes {
            let path = format!("p/{}.java", class.name);
            collector.add_code_file(&path, &file_with(&path, vec![class]));
        }
        collector
    }

    #[test]
    fn test_chain_depth() {
        let collector = collect(vec![
            class("D", &["C"]),
            class("C", &["B"]),
            class("B", &["A"]),
            class("A", &[]),
        ]);
        let report = ClassHierarchyAnalyzer::new(&collector).analyze();

        assert_eq!(report.hierarchy.max_depth, 3);
        assert_eq!(report.hierarchy.deepest_classes.len(), 1);
        assert_eq!(report.hierarchy.deepest_classes[0].class_name, "D");
        assert_eq!(report.hierarchy.deepest_classes[0].class_file, "p/D.java");
        assert!(report.hierarchy.cycle.is_none());

        let parents: Vec<_> = report.extensions.iter().map(|e| e.parent_name.as_str()).collect();
        assert_eq!(parents, vec!["A", "B", "C"]);
        assert_eq!(report.stats.extended_class_count, 3);
        assert_eq!(report.stats.total_extension_relations, 3);
        assert_eq!(report.stats.multi_extended_class_count, 0);
    }

    #[test]
    fn test_two_node_cycle() {
        let collector = collect(vec![class("A", &["B"]), class("B", &["A"])]);

        let (_, graph) = build_hierarchy(collector.class_map(), collector.extension_map());
        let err = compute_inheritance_depth(&graph, collector.class_map()).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::CycleDetected {
                cycle: vec!["p.A".to_string(), "p.B".to_string(), "p.A".to_string()],
            }
        );

        let report = ClassHierarchyAnalyzer::new(&collector).analyze();
        assert_eq!(report.hierarchy.max_depth, 0);
        assert!(report.hierarchy.deepest_classes.is_empty());
        assert_eq!(report.hierarchy.cycle.as_ref().map(Vec::len), Some(3));
        // Extension reports survive the failed depth walk
        assert_eq!(report.extensions.len(), 2);
    }

    #[test]
    fn test_cycle_below_root() {
        let collector = collect(vec![
            class("Root", &[]),
            class("A", &["Root", "B"]),
            class("B", &["A"]),
        ]);
        let (_, graph) = build_hierarchy(collector.class_map(), collector.extension_map());
        assert!(compute_inheritance_depth(&graph, collector.class_map()).is_err());
    }

    #[test]
    fn test_self_extension_is_cycle() {
        let collector = collect(vec![class("Loop", &["Loop"])]);
        let report = ClassHierarchyAnalyzer::new(&collector).analyze();
        assert_eq!(
            report.hierarchy.cycle,
            Some(vec!["p.Loop".to_string(), "p.Loop".to_string()])
        );
    }

    #[test]
    fn test_unresolved_parent() {
        let collector = collect(vec![class("Orphan", &["UnknownBase"])]);
        let report = ClassHierarchyAnalyzer::new(&collector).analyze();
        assert!(report.extensions.is_empty());
        assert_eq!(report.hierarchy, InheritanceHierarchy::default());
        assert_eq!(report.stats, ExtensionStats::default());
    }

    #[test]
    fn test_multi_extension() {
        let collector = collect(vec![
            class("A", &[]),
            class("B", &[]),
            class("C", &["A", "B"]),
        ]);
        let report = ClassHierarchyAnalyzer::new(&collector).analyze();

        assert_eq!(report.multi_extensions.len(), 1);
        let c = &report.multi_extensions[0];
        assert_eq!(c.class_name, "C");
        assert_eq!(c.class_file, "p/C.java");
        assert_eq!(c.parent_count, 2);
        let names: Vec<_> = c.parents.iter().map(|p| p.parent_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);

        // Both roots reach C at depth 1; C is reported once.
        assert_eq!(report.hierarchy.max_depth, 1);
        assert_eq!(report.hierarchy.deepest_classes.len(), 1);
        assert_eq!(report.hierarchy.deepest_classes[0].class_name, "C");
    }

    #[test]
    fn test_tied_roots() {
        let collector = collect(vec![
            class("A", &[]),
            class("B", &["A"]),
            class("X", &[]),
            class("Y", &["X"]),
            class("M", &[]),
            class("N", &["M"]),
            class("O", &["N"]),
        ]);
        let report = ClassHierarchyAnalyzer::new(&collector).analyze();
        assert_eq!(report.hierarchy.max_depth, 2);
        let names: Vec<_> = report
            .hierarchy
            .deepest_classes
            .iter()
            .map(|d| d.class_name.as_str())
            .collect();
        assert_eq!(names, vec!["O"]);

        let collector = collect(vec![
            class("A", &[]),
            class("B", &["A"]),
            class("X", &[]),
            class("Y", &["X"]),
        ]);
        let report = ClassHierarchyAnalyzer::new(&collector).analyze();
        let names: Vec<_> = report
            .hierarchy
            .deepest_classes
            .iter()
            .map(|d| d.class_name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "Y"]);
    }

    #[test]
    fn test_first_deepest_child_wins() {
        // A has two children with equal subtrees; the first one in bucket order is reported.
        let collector = collect(vec![
            class("A", &[]),
            class("B", &["A"]),
            class("C", &["A"]),
        ]);
        let report = ClassHierarchyAnalyzer::new(&collector).analyze();
        assert_eq!(report.hierarchy.max_depth, 1);
        assert_eq!(report.hierarchy.deepest_classes[0].class_name, "B");
        assert_eq!(report.extensions[0].children.len(), 2);
    }

    #[test]
    fn test_shared_subtree_memoized() {
        // Diamond: D below both B and C, both below A.
        let collector = collect(vec![
            class("A", &[]),
            class("B", &["A"]),
            class("C", &["A"]),
            class("D", &["B", "C"]),
        ]);
        let report = ClassHierarchyAnalyzer::new(&collector).analyze();
        assert_eq!(report.hierarchy.max_depth, 2);
        assert_eq!(report.hierarchy.deepest_classes[0].class_name, "D");
        assert_eq!(report.stats.total_extension_relations, 4);
    }

    proptest! {
        #[test]
        fn prop_chain_depth_equals_length(len in 1usize..24) {
            // C0 <- C1 <- ... <- C{len}
            let classes: Vec<_> = (0..=len)
                .map(|i| {
                    let name = format!("C{}", i);
                    if i == 0 {
                        class(&name, &[])
                    } else {
                        let parent = format!("C{}", i - 1);
                        class(&name, &[parent.as_str()])
                    }
                })
                .collect();
            let collector = collect(classes);
            let report = ClassHierarchyAnalyzer::new(&collector).analyze();
            prop_assert_eq!(report.hierarchy.max_depth, len);
            prop_assert_eq!(
                report.hierarchy.deepest_classes[0].class_name.clone(),
                format!("C{}", len)
            );
        }

        #[test]
        fn prop_analysis_is_deterministic(
            edges in prop::collection::vec((0usize..6, 0usize..6), 0..12)
        ) {
            let mut classes: Vec<CodeStructure> =
                (0..6).map(|i| class(&format!("K{}", i), &[])).collect();
            for (child, parent) in edges {
                classes[child].extends.push(format!("K{}", parent));
            }

            let first = ClassHierarchyAnalyzer::new(&collect(classes.clone())).analyze();
            let second = ClassHierarchyAnalyzer::new(&collect(classes)).analyze();
            prop_assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
            prop_assert_eq!(
                first.stats.total_extension_relations,
                first.extensions.iter().map(|e| e.children.len()).sum::<usize>()
            );
        }

        #[test]
        fn prop_no_bucket_repeats_a_class(
            parents in prop::collection::vec(prop::collection::vec(0usize..4, 0..6), 6),
        ) {
            let classes: Vec<CodeStructure> = parents
                .iter()
                .enumerate()
                .map(|(i, ps)| {
                    let names: Vec<String> = ps.iter().map(|p| format!("K{}", p)).collect();
                    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                    class(&format!("K{}", i), &refs)
                })
                .collect();
            let report = ClassHierarchyAnalyzer::new(&collect(classes)).analyze();

            for extension in &report.extensions {
                let mut seen = HashSet::new();
                for child in &extension.children {
                    prop_assert!(seen.insert((child.class_name.clone(), child.class_file.clone())));
                }
            }
            for multi in &report.multi_extensions {
                let mut seen = HashSet::new();
                for parent in &multi.parents {
                    prop_assert!(
                        seen.insert((parent.parent_name.clone(), parent.parent_file.clone()))
                    );
                }
                prop_assert_eq!(multi.parent_count, multi.parents.len());
            }
        }
    }
}
