//! Interface Relationship Analyzer
//!
//! Produces interface → implementor reports and detects classes implementing more than
//! one interface.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use super::collector::{Implementor, StructureCollector, StructureEntry, StructureMap};
use crate::types::{
    ImplementationRef, InterfaceAnalysis, InterfaceImplementation, InterfaceRef, InterfaceStats,
    MultiImplementation,
};

pub struct InterfaceAnalyzer<'a> {
    collector: &'a StructureCollector,
}

impl<'a> InterfaceAnalyzer<'a> {
    pub fn new(collector: &'a StructureCollector) -> Self {
        Self { collector }
    }

    pub fn analyze(&self) -> InterfaceAnalysis {
        let interface_map = self.collector.interface_map();
        let implementation_map = self.collector.implementation_map();

        let mut interfaces = Vec::with_capacity(interface_map.len());
        // class key → (first implementor seen, interface keys)
        let mut class_interfaces: IndexMap<String, (&Implementor, IndexSet<&str>)> =
            IndexMap::new();

        for (key, entry) in sorted_by_package_and_name(interface_map) {
            let implementors = implementation_map
                .get(key)
                .map(|list| dedup_implementors(list))
                .unwrap_or_default();

            for &implementor in &implementors {
                class_interfaces
                    .entry(implementor.class.canonical_key())
                    .or_insert_with(|| (implementor, IndexSet::new()))
                    .1
                    .insert(key.as_str());
            }

            interfaces.push(InterfaceImplementation {
                interface_name: entry.structure.name.clone(),
                interface_file: entry.file.clone(),
                method_count: entry.structure.methods.len(),
                package: entry.structure.package.clone(),
                position: entry.structure.range(),
                implementations: implementors
                    .iter()
                    .map(|&imp| ImplementationRef {
                        class_name: imp.class_name.clone(),
                        class_file: imp.class_file.clone(),
                        position: imp.class.range(),
                    })
                    .collect(),
            });
        }

        let mut multi: Vec<_> = class_interfaces
            .iter()
            .filter(|(_, (_, set))| set.len() > 1)
            .collect();
        multi.sort_by(|a, b| b.1.1.len().cmp(&a.1.1.len()));

        let multi_implementers: Vec<MultiImplementation> = multi
            .into_iter()
            .map(|(class_key, (implementor, keys))| {
                let (class_name, class_file, position) =
                    match find_class(self.collector.class_map(), class_key) {
                        Some(e) => (e.structure.name.clone(), e.file.clone(), e.structure.range()),
                        None => (
                            implementor.class_name.clone(),
                            implementor.class_file.clone(),
                            implementor.class.range(),
                        ),
                    };
                MultiImplementation {
                    class_name,
                    class_file,
                    position,
                    interface_count: keys.len(),
                    interfaces: keys
                        .iter()
                        .filter_map(|key| interface_map.get(*key))
                        .map(|iface| InterfaceRef {
                            interface_name: iface.structure.name.clone(),
                            interface_file: iface.file.clone(),
                            position: iface.structure.range(),
                        })
                        .collect(),
                }
            })
            .collect();

        let implemented = interfaces
            .iter()
            .filter(|i| !i.implementations.is_empty())
            .count();
        let stats = InterfaceStats {
            total_interfaces: interfaces.len(),
            implemented_interfaces: implemented,
            unimplemented_interfaces: interfaces.len() - implemented,
            multi_implementer_count: multi_implementers.len(),
        };

        InterfaceAnalysis {
            interfaces,
            multi_implementers,
            stats,
        }
    }
}

/// Entries ordered by `(package, name)`, ties keeping insertion order.
pub(crate) fn sorted_by_package_and_name(map: &StructureMap) -> Vec<(&String, &StructureEntry)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|(_, a), (_, b)| {
        (&a.structure.package, &a.structure.name).cmp(&(&b.structure.package, &b.structure.name))
    });
    entries
}

/// Keep the first occurrence of every `(class_name, class_file)` pair.
pub(crate) fn dedup_implementors(list: &[Implementor]) -> Vec<&Implementor> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    list.iter()
        .filter(|imp| seen.insert((imp.class_name.as_str(), imp.class_file.as_str())))
        .collect()
}

/// Find a class by simple or canonical name.
pub(crate) fn find_class<'m>(
    class_map: &'m StructureMap,
    class_key: &str,
) -> Option<&'m StructureEntry> {
    class_map
        .values()
        .find(|e| e.structure.name == class_key || e.structure.canonical_key() == class_key)
}
