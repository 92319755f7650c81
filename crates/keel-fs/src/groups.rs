//! Named directory groups with depth-limited scanning

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Scan depth applied when callers have no better value
pub const DEFAULT_SCAN_DEPTH: usize = 10;

/// Named groups of root directories.
///
/// Each group (e.g. `"views"`, `"assets"`) collects root directories with a
/// per-root maximum scan depth. Scans flatten every root's tree into one
/// file list and are cached per group; [`FileGroups::locate`] finds single
/// files inside a group and memoizes hits.
#[derive(Debug, Default)]
pub struct FileGroups {
    groups: IndexMap<String, IndexMap<PathBuf, usize>>,
    scans: HashMap<String, Vec<PathBuf>>,
    found: HashMap<(String, String), PathBuf>,
}

impl FileGroups {
    /// Create an empty set of groups
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root directory under a group.
    ///
    /// The path is normalized; re-adding a root updates its scan depth. The
    /// group's scan cache is invalidated.
    pub fn add(
        &mut self,
        path: impl AsRef<Path>,
        group: impl Into<String>,
        depth: usize,
    ) -> &mut Self {
        let group = group.into();
        let path = normalize(path.as_ref());

        tracing::debug!(group = %group, path = %path.display(), depth, "Directory registered");

        self.groups.entry(group.clone()).or_default().insert(path, depth);
        self.scans.remove(&group);
        self
    }

    /// Registered group names, in insertion order
    pub fn groups(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Root directories of a group with their scan depths, in insertion
    /// order
    pub fn roots(&self, group: &str) -> Option<Vec<(&Path, usize)>> {
        self.groups
            .get(group)
            .map(|roots| roots.iter().map(|(p, d)| (p.as_path(), *d)).collect())
    }

    /// Flattened file list across a group's roots, cached per group
    pub fn scan(&mut self, group: &str) -> Result<&[PathBuf]> {
        if !self.scans.contains_key(group) {
            let files = self.scan_uncached(group)?;
            self.scans.insert(group.to_string(), files);
        }

        Ok(self.scans[group].as_slice())
    }

    /// Discard the group's scan cache and scan again
    pub fn rescan(&mut self, group: &str) -> Result<&[PathBuf]> {
        self.scans.remove(group);
        self.scan(group)
    }

    /// Find the first scanned path in a group containing the given needle.
    ///
    /// Hits are memoized per (group, needle) pair.
    pub fn locate(&mut self, file: &str, group: &str) -> Result<Option<PathBuf>> {
        let key = (group.to_string(), file.to_string());

        if let Some(path) = self.found.get(&key) {
            return Ok(Some(path.clone()));
        }

        let hit = self
            .scan(group)?
            .iter()
            .find(|path| path.to_string_lossy().contains(file))
            .cloned();

        if let Some(ref path) = hit {
            self.found.insert(key, path.clone());
        }

        Ok(hit)
    }

    fn scan_uncached(&self, group: &str) -> Result<Vec<PathBuf>> {
        let roots = self
            .groups
            .get(group)
            .ok_or_else(|| Error::UnknownGroup(group.to_string()))?;

        let mut files = Vec::new();

        for (root, depth) in roots {
            for entry in WalkDir::new(root)
                .max_depth(*depth)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        }

        tracing::trace!(group = %group, files = files.len(), "Group scanned");

        Ok(files)
    }
}

/// Lexically normalize a path: strip `.` components and resolve `..`
/// against their parent where possible.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component.as_os_str());
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("Views");
        fs::create_dir_all(root.join("partials")).unwrap();
        fs::write(root.join("home.html"), "<html>").unwrap();
        fs::write(root.join("partials/nav.html"), "<nav>").unwrap();
        (dir, root)
    }

    #[test]
    fn test_scan_flattens_tree() {
        let (_dir, root) = fixture();
        let mut groups = FileGroups::new();
        groups.add(&root, "views", DEFAULT_SCAN_DEPTH);

        let files = groups.scan("views").unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_scan_respects_depth() {
        let (_dir, root) = fixture();
        let mut groups = FileGroups::new();
        groups.add(&root, "views", 1);

        let files = groups.scan("views").unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("home.html"));
    }

    #[test]
    fn test_scan_unknown_group() {
        let mut groups = FileGroups::new();
        assert!(matches!(
            groups.scan("nope"),
            Err(Error::UnknownGroup(_))
        ));
    }

    #[test]
    fn test_scan_is_cached_until_rescan() {
        let (_dir, root) = fixture();
        let mut groups = FileGroups::new();
        groups.add(&root, "views", DEFAULT_SCAN_DEPTH);

        assert_eq!(groups.scan("views").unwrap().len(), 2);

        fs::write(root.join("about.html"), "<html>").unwrap();
        assert_eq!(groups.scan("views").unwrap().len(), 2);
        assert_eq!(groups.rescan("views").unwrap().len(), 3);
    }

    #[test]
    fn test_locate() {
        let (_dir, root) = fixture();
        let mut groups = FileGroups::new();
        groups.add(&root, "views", DEFAULT_SCAN_DEPTH);

        let hit = groups.locate("nav.html", "views").unwrap().unwrap();
        assert!(hit.ends_with("partials/nav.html"));
        assert!(groups.locate("missing.html", "views").unwrap().is_none());
    }

    #[test]
    fn test_adding_root_invalidates_cache() {
        let (_dir, root) = fixture();
        let other = TempDir::new().unwrap();
        fs::write(other.path().join("extra.html"), "<html>").unwrap();

        let mut groups = FileGroups::new();
        groups.add(&root, "views", DEFAULT_SCAN_DEPTH);
        assert_eq!(groups.scan("views").unwrap().len(), 2);

        groups.add(other.path(), "views", DEFAULT_SCAN_DEPTH);
        assert_eq!(groups.scan("views").unwrap().len(), 3);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(Path::new("/srv/app/./modules/../library")),
            PathBuf::from("/srv/app/library")
        );
    }
}
