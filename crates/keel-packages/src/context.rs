//! Ambient services for resource loading
//!
//! Route and schema scripts need framework services ("the router", "the
//! database") in scope while they run. Instead of resolving process-wide
//! singletons by name, the embedder bundles those services into a
//! [`LoadContext`] handed to the manager at construction; the loader pushes
//! them into the matching script scopes.

use keel_fs::{FileGroups, DEFAULT_SCAN_DEPTH};
use parking_lot::Mutex;
use rhai::Dynamic;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Shared handle to the filesystem groups collaborator
pub type SharedFileGroups = Arc<Mutex<FileGroups>>;

/// Service name a routes script sees in scope
pub const SERVICE_ROUTER: &str = "router";

/// Service name a schema script sees in scope
pub const SERVICE_DATABASE: &str = "database";

/// Ambient context for one registry's package loads.
///
/// Carries the shared [`FileGroups`] handle that view/asset directories are
/// registered on, the scan depth those registrations use, and the named
/// service values exposed to scripts.
pub struct LoadContext {
    files: SharedFileGroups,
    services: BTreeMap<String, Dynamic>,
    scan_depth: usize,
}

impl std::fmt::Debug for LoadContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadContext")
            .field("services", &self.services.keys().collect::<Vec<_>>())
            .field("scan_depth", &self.scan_depth)
            .finish()
    }
}

impl LoadContext {
    /// Create a context around a shared file-groups handle
    pub fn new(files: SharedFileGroups) -> Self {
        Self {
            files,
            services: BTreeMap::new(),
            scan_depth: DEFAULT_SCAN_DEPTH,
        }
    }

    /// Expose a named service to package scripts (builder style)
    pub fn with_service(mut self, name: impl Into<String>, value: Dynamic) -> Self {
        self.services.insert(name.into(), value);
        self
    }

    /// Scan depth for registered view/asset directories (builder style)
    pub fn with_scan_depth(mut self, depth: usize) -> Self {
        self.scan_depth = depth;
        self
    }

    /// Look up a service value by name
    pub fn service(&self, name: &str) -> Option<Dynamic> {
        self.services.get(name).cloned()
    }

    /// The shared file-groups handle
    pub fn files(&self) -> &SharedFileGroups {
        &self.files
    }

    /// Scan depth for registered directories
    pub fn scan_depth(&self) -> usize {
        self.scan_depth
    }
}
