//! Fuzzy cross-file name resolution.
//!
//! A textual `implements`/`extends` reference is matched against a structure map in three
//! tiers; the first tier that hits wins:
//!
//! 1. **Exact**: the reference already is a map key.
//! 2. **Package**: `owner_package + "." + reference` is a map key.
//! 3. **Scan**: the first entry (insertion order) whose key ends with `"." + reference`, or
//!    whose structure's simple name equals the reference.

use super::collector::StructureMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionTier {
    Exact,
    Package,
    Scan,
}

/// Resolve `target` to a key of `map`, or `None` when every tier misses.
pub fn resolve(target: &str, owner_package: &str, map: &StructureMap) -> Option<String> {
    resolve_with_tier(target, owner_package, map).map(|(key, _)| key)
}

/// Like [`resolve`], also reporting which tier produced the match.
pub fn resolve_with_tier(
    target: &str,
    owner_package: &str,
    map: &StructureMap,
) -> Option<(String, ResolutionTier)> {
    if target.is_empty() {
        return None;
    }

    if map.contains_key(target) {
        return Some((target.to_string(), ResolutionTier::Exact));
    }

    if !owner_package.is_empty() {
        let qualified = format!("{}.{}", owner_package, target);
        if map.contains_key(&qualified) {
            return Some((qualified, ResolutionTier::Package));
        }
    }

    let suffix = format!(".{}", target);
    map.iter()
        .find(|(key, entry)| key.ends_with(&suffix) || entry.structure.name == target)
        .map(|(key, _)| (key.clone(), ResolutionTier::Scan))
}
