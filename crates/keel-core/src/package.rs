//! Package trait and descriptors

use crate::uid::PackageUid;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A loadable package: a reusable library or an application module.
///
/// Implementations carry identity (kind + id), a filesystem root for the
/// package's resources, and the load state. The loaded flag is monotonic:
/// once set it is never reset, and re-loading a loaded package is a hard
/// precondition failure at the registry level.
pub trait Package: Send + Sync {
    /// Package kind tag (e.g. `"library"`, `"module"`)
    fn kind(&self) -> &str;

    /// Package id, unique within its kind
    fn id(&self) -> &str;

    /// Absolute filesystem root for this package's resources
    fn path(&self) -> &Path;

    /// Whether the package has been loaded
    fn is_loaded(&self) -> bool;

    /// Set the loaded flag. Monotonic false → true.
    fn mark_loaded(&mut self);

    /// Canonical composite key
    fn uid(&self) -> PackageUid {
        PackageUid::new(self.kind(), self.id())
    }

    /// Cloneable snapshot of the descriptor
    fn info(&self) -> PackageInfo {
        PackageInfo {
            kind: self.kind().to_string(),
            id: self.id().to_string(),
            path: self.path().to_path_buf(),
            loaded: self.is_loaded(),
        }
    }
}

/// Plain snapshot of a package descriptor.
///
/// Used as the lifecycle event payload and as the query result surface, so
/// callers never hold references into the registry's map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Package kind tag
    pub kind: String,

    /// Package id
    pub id: String,

    /// Filesystem root
    pub path: PathBuf,

    /// Load state at snapshot time
    pub loaded: bool,
}

impl PackageInfo {
    /// Canonical composite key
    pub fn uid(&self) -> PackageUid {
        PackageUid::new(&self.kind, &self.id)
    }
}

/// Constructor function for building a package of a given kind from its id
/// and resource root.
///
/// The registry keeps a table of these keyed by kind instead of
/// instantiating configured type names, so new kinds can be registered at
/// runtime without reflection.
pub type PackageBuilder = fn(&str, PathBuf) -> Box<dyn Package>;

/// A reusable library package
#[derive(Debug, Clone)]
pub struct Library {
    id: String,
    path: PathBuf,
    loaded: bool,
}

impl Library {
    /// Kind tag for library packages
    pub const KIND: &'static str = "library";

    /// Create a library descriptor
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            loaded: false,
        }
    }
}

impl Package for Library {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn mark_loaded(&mut self) {
        self.loaded = true;
    }
}

/// An application module package
#[derive(Debug, Clone)]
pub struct Module {
    id: String,
    path: PathBuf,
    loaded: bool,
}

impl Module {
    /// Kind tag for module packages
    pub const KIND: &'static str = "module";

    /// Create a module descriptor
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            loaded: false,
        }
    }
}

impl Package for Module {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn mark_loaded(&mut self) {
        self.loaded = true;
    }
}
