//! Structural Collector
//!
//! Owns the four relationship maps and keeps them consistent as `CodeFile`s arrive:
//!
//! - `interface_map`: canonical name → interface (or trait) definition
//! - `class_map`: canonical name → class, struct or enum definition
//! - `implementation_map`: interface key → implementing classes
//! - `extension_map`: parent key → extending classes
//!
//! The two edge maps are rebuilt from scratch after every ingestion. Buckets may hold
//! duplicates; the analyzers deduplicate by `(class_name, class_file)`.

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::resolver::resolve_with_tier;
use crate::types::{CodeFile, CodeStructure};

/// A structure plus the file it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureEntry {
    pub file: String,
    pub structure: CodeStructure,
}

/// One side of an implements/extends edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Implementor {
    pub class_name: String,
    pub class_file: String,
    pub class: CodeStructure,
}

/// Insertion-ordered structure map keyed by canonical name.
pub type StructureMap = IndexMap<String, StructureEntry>;

/// Insertion-ordered edge map: target key → sources.
pub type RelationMap = IndexMap<String, Vec<Implementor>>;

#[derive(Debug, Clone, Default)]
pub struct StructureCollector {
    interface_map: StructureMap,
    class_map: StructureMap,
    implementation_map: RelationMap,
    extension_map: RelationMap,
}

impl StructureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one file and rebuild the edge maps.
    pub fn add_code_file(&mut self, file_path: &str, code_file: &CodeFile) {
        self.ingest(file_path, code_file);
        self.rebuild_relationships();
    }

    /// Ingest many files, rebuilding once at the end.
    ///
    /// Produces the same maps as calling [`add_code_file`](Self::add_code_file) for each
    /// file in order, since the rebuild only depends on the final structure maps.
    pub fn add_code_files<'a, I>(&mut self, files: I)
    where
        I: IntoIterator<Item = &'a CodeFile>,
    {
        for file in files {
            self.ingest(&file.filepath, file);
        }
        self.rebuild_relationships();
    }

    fn ingest(&mut self, file_path: &str, code_file: &CodeFile) {
        for structure in &code_file.classes {
            let key = structure.canonical_key();

            if structure.structure_type.is_interface_like() {
                let replace = match self.interface_map.get(&key) {
                    // A richer redefinition wins; equal or poorer ones are ignored.
                    Some(existing) => structure.methods.len() > existing.structure.methods.len(),
                    None => true,
                };
                if replace {
                    self.interface_map.insert(
                        key,
                        StructureEntry {
                            file: file_path.to_string(),
                            structure: structure.clone(),
                        },
                    );
                }
            } else if structure.structure_type.is_class_like() {
                self.class_map.insert(
                    key,
                    StructureEntry {
                        file: file_path.to_string(),
                        structure: structure.clone(),
                    },
                );
            }
        }
    }

    /// Recompute `implementation_map` and `extension_map` from the current `class_map`.
    pub fn rebuild_relationships(&mut self) {
        self.implementation_map.clear();
        self.extension_map.clear();

        for entry in self.class_map.values() {
            let class = &entry.structure;

            for target in &class.implements {
                match resolve_with_tier(target, &class.package, &self.interface_map) {
                    Some((key, tier)) => {
                        trace!("{} implements {} via {:?} match", class.name, key, tier);
                        self.implementation_map
                            .entry(key)
                            .or_default()
                            .push(implementor_of(entry));
                    }
                    None => debug!("Unresolved interface '{}' on {}", target, class.name),
                }
            }

            for target in &class.extends {
                match resolve_with_tier(target, &class.package, &self.class_map) {
                    Some((key, tier)) => {
                        trace!("{} extends {} via {:?} match", class.name, key, tier);
                        self.extension_map
                            .entry(key)
                            .or_default()
                            .push(implementor_of(entry));
                    }
                    None => debug!("Unresolved parent '{}' on {}", target, class.name),
                }
            }
        }
    }

    /// Drop all maps.
    pub fn clear(&mut self) {
        self.interface_map.clear();
        self.class_map.clear();
        self.implementation_map.clear();
        self.extension_map.clear();
    }

    pub fn interface_map(&self) -> &StructureMap {
        &self.interface_map
    }

    pub fn class_map(&self) -> &StructureMap {
        &self.class_map
    }

    pub fn implementation_map(&self) -> &RelationMap {
        &self.implementation_map
    }

    pub fn extension_map(&self) -> &RelationMap {
        &self.extension_map
    }
}

fn implementor_of(entry: &StructureEntry) -> Implementor {
    Implementor {
        class_name: entry.structure.name.clone(),
        class_file: entry.file.clone(),
        class: entry.structure.clone(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{CodeFunction, StructureType};

    pub(crate) fn structure(
        structure_type: StructureType,
        package: &str,
        name: &str,
        methods: usize,
    ) -> CodeStructure {
        let mut s = CodeStructure::new(structure_type, name, package);
        s.methods = (0..methods)
            .map(|i| CodeFunction {
                name: format!("m{}", i),
                ..Default::default()
            })
            .collect();
        s
    }

    pub(crate) fn file_with(path: &str, classes: Vec<CodeStructure>) -> CodeFile {
        let mut file = CodeFile::new(path, "java");
        file.classes = classes;
        file
    }

    #[test]
    fn test_partition_by_type() {
        let mut collector = StructureCollector::new();
        collector.add_code_file(
            "A.java",
            &file_with(
                "A.java",
                vec![
                    structure(StructureType::Interface, "p", "Shape", 1),
                    structure(StructureType::Trait, "p", "Draw", 1),
                    structure(StructureType::Class, "p", "Circle", 0),
                    structure(StructureType::Struct, "p", "Point", 0),
                    structure(StructureType::Enum, "p", "Color", 0),
                ],
            ),
        );

        let interfaces: Vec<_> = collector.interface_map().keys().cloned().collect();
        let classes: Vec<_> = collector.class_map().keys().cloned().collect();
        assert_eq!(interfaces, vec!["p.Shape", "p.Draw"]);
        assert_eq!(classes, vec!["p.Circle", "p.Point", "p.Color"]);
    }

    #[test]
    fn test_interface_upsert_keeps_richer_definition() {
        let mut collector = StructureCollector::new();
        collector.add_code_file(
            "a/Shape.java",
            &file_with(
                "a/Shape.java",
                vec![structure(StructureType::Interface, "p", "Shape", 2)],
            ),
        );
        collector.add_code_file(
            "b/Shape.java",
            &file_with(
                "b/Shape.java",
                vec![structure(StructureType::Interface, "p", "Shape", 2)],
            ),
        );
        assert_eq!(collector.interface_map()["p.Shape"].file, "a/Shape.java");

        collector.add_code_file(
            "c/Shape.java",
            &file_with(
                "c/Shape.java",
                vec![structure(StructureType::Interface, "p", "Shape", 3)],
            ),
        );
        assert_eq!(collector.interface_map()["p.Shape"].file, "c/Shape.java");
    }

    #[test]
    fn test_class_upsert_is_last_write_wins() {
        let mut collector = StructureCollector::new();
        collector.add_code_file(
            "a/Base.java",
            &file_with(
                "a/Base.java",
                vec![structure(StructureType::Class, "p", "Base", 5)],
            ),
        );
        collector.add_code_file(
            "b/Base.java",
            &file_with(
                "b/Base.java",
                vec![structure(StructureType::Class, "p", "Base", 0)],
            ),
        );
        let entry = &collector.class_map()["p.Base"];
        assert_eq!(entry.file, "b/Base.java");
        assert!(entry.structure.methods.is_empty());
    }

    #[test]
    fn test_edges_resolve_across_files() {
        let mut collector = StructureCollector::new();

        let mut task = structure(StructureType::Class, "app", "Task", 1);
        task.implements = vec!["Runnable".to_string()];
        task.extends = vec!["BaseTask".to_string()];
        collector.add_code_file("app/Task.java", &file_with("app/Task.java", vec![task]));

        // Targets arrive after the class that references them.
        collector.add_code_file(
            "lang/Runnable.java",
            &file_with(
                "lang/Runnable.java",
                vec![structure(StructureType::Interface, "java.lang", "Runnable", 1)],
            ),
        );
        collector.add_code_file(
            "app/BaseTask.java",
            &file_with(
                "app/BaseTask.java",
                vec![structure(StructureType::Class, "app", "BaseTask", 0)],
            ),
        );

        let implementors = &collector.implementation_map()["java.lang.Runnable"];
        assert_eq!(implementors.len(), 1);
        assert_eq!(implementors[0].class_name, "Task");
        assert_eq!(implementors[0].class_file, "app/Task.java");

        let children = &collector.extension_map()["app.BaseTask"];
        assert_eq!(children[0].class_name, "Task");
    }

    #[test]
    fn test_unresolved_reference_creates_no_edge() {
        let mut collector = StructureCollector::new();
        let mut orphan = structure(StructureType::Class, "p", "Orphan", 0);
        orphan.extends = vec!["UnknownBase".to_string()];
        collector.add_code_file("Orphan.java", &file_with("Orphan.java", vec![orphan]));

        assert!(collector.extension_map().is_empty());
        assert!(collector.implementation_map().is_empty());
    }

    #[test]
    fn test_duplicate_references_kept_until_analysis() {
        let mut collector = StructureCollector::new();
        let mut task = structure(StructureType::Class, "p", "Task", 0);
        task.implements = vec!["Runnable".to_string(), "Runnable".to_string()];
        collector.add_code_file(
            "Task.java",
            &file_with(
                "Task.java",
                vec![task, structure(StructureType::Interface, "p", "Runnable", 1)],
            ),
        );
        assert_eq!(collector.implementation_map()["p.Runnable"].len(), 2);
    }

    #[test]
    fn test_batch_matches_incremental() {
        let mut base = structure(StructureType::Class, "p", "Child", 0);
        base.extends = vec!["Parent".to_string()];
        let files = vec![
            file_with("Child.java", vec![base]),
            file_with(
                "Parent.java",
                vec![structure(StructureType::Class, "p", "Parent", 0)],
            ),
        ];

        let mut incremental = StructureCollector::new();
        for file in &files {
            incremental.add_code_file(&file.filepath, file);
        }
        let mut batch = StructureCollector::new();
        batch.add_code_files(&files);

        assert_eq!(incremental.extension_map(), batch.extension_map());
        assert_eq!(incremental.class_map(), batch.class_map());
    }

    #[test]
    fn test_clear() {
        let mut collector = StructureCollector::new();
        collector.add_code_file(
            "A.java",
            &file_with("A.java", vec![structure(StructureType::Class, "p", "A", 0)]),
        );
        collector.clear();
        assert!(collector.class_map().is_empty());
    }
}
