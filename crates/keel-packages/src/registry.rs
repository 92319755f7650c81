//! Package registry
//!
//! Owns the map of all known packages, keyed by kind and id. Kinds iterate
//! in first-seen order; packages within a kind iterate in insertion order,
//! which is the order bulk loading walks them in.

use indexmap::IndexMap;
use keel_core::{Package, PackageUid};

/// Two-level package map: kind → id → package
#[derive(Default)]
pub struct PackageRegistry {
    packages: IndexMap<String, IndexMap<String, Box<dyn Package>>>,
}

impl std::fmt::Debug for PackageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageRegistry")
            .field("uids", &self.uids().iter().map(ToString::to_string).collect::<Vec<_>>())
            .finish()
    }
}

impl PackageRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a package at its `(kind, id)` slot.
    ///
    /// A package already registered under the same key is silently
    /// replaced; last write wins.
    pub fn add(&mut self, package: Box<dyn Package>) -> &mut Self {
        let uid = package.uid();

        tracing::debug!(package = %uid, "Package registered");

        self.packages
            .entry(uid.kind)
            .or_default()
            .insert(uid.id, package);
        self
    }

    /// Look up a package. `None` for a missing entry, never an error.
    pub fn get(&self, uid: &PackageUid) -> Option<&dyn Package> {
        self.packages
            .get(&uid.kind)
            .and_then(|of_kind| of_kind.get(&uid.id))
            .map(|package| package.as_ref())
    }

    /// Mutable lookup
    pub fn get_mut(&mut self, uid: &PackageUid) -> Option<&mut (dyn Package + 'static)> {
        self.packages
            .get_mut(&uid.kind)
            .and_then(|of_kind| of_kind.get_mut(&uid.id))
            .map(|package| package.as_mut())
    }

    /// Whether a package is registered under the uid
    pub fn exists(&self, uid: &PackageUid) -> bool {
        self.get(uid).is_some()
    }

    /// Delete the registry entry if present; no-op otherwise.
    ///
    /// Removal does not undo side effects a prior load already performed.
    pub fn remove(&mut self, uid: &PackageUid) -> Option<Box<dyn Package>> {
        let removed = self
            .packages
            .get_mut(&uid.kind)
            .and_then(|of_kind| of_kind.shift_remove(&uid.id));

        if removed.is_some() {
            tracing::debug!(package = %uid, "Package removed");
        }

        removed
    }

    /// All packages of a kind, in insertion order
    pub fn all_of_kind(&self, kind: &str) -> Vec<&dyn Package> {
        self.packages
            .get(kind)
            .map(|of_kind| of_kind.values().map(|package| package.as_ref()).collect())
            .unwrap_or_default()
    }

    /// Ids of a kind, in insertion order
    pub fn ids_of_kind(&self, kind: &str) -> Vec<String> {
        self.packages
            .get(kind)
            .map(|of_kind| of_kind.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// All registered uids, kinds in first-seen order
    pub fn uids(&self) -> Vec<PackageUid> {
        self.packages
            .values()
            .flat_map(|of_kind| of_kind.values().map(|package| package.uid()))
            .collect()
    }

    /// Registered kind tags, in first-seen order
    pub fn kinds(&self) -> Vec<&str> {
        self.packages.keys().map(String::as_str).collect()
    }

    /// Total number of registered packages
    pub fn count(&self) -> usize {
        self.packages.values().map(IndexMap::len).sum()
    }
}
