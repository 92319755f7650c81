//! Package manager
//!
//! The manager wraps the registry with the full lifecycle contract:
//! registration (direct, by bare name, or from declarative config lists),
//! conditional activation, one-time loading through the resource loader,
//! and lifecycle event publication.

use crate::activation;
use crate::context::LoadContext;
use crate::loader::PackageLoader;
use crate::registry::PackageRegistry;
use indexmap::IndexMap;
use keel_config::PackagesConfig;
use keel_core::{
    Environment, Error, Library, Module, Package, PackageBuilder, PackageInfo, PackageUid,
    Result, UidSpec,
};
use keel_events::EventBus;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared handle to the lifecycle event bus
pub type SharedEvents = Arc<Mutex<EventBus<PackageInfo>>>;

/// Package manager.
///
/// Owns the package map exclusively; the event bus and the file groups
/// (inside the [`LoadContext`]) are shared references injected at
/// construction that outlive the manager. Not safe for concurrent use —
/// the whole load sequence is a synchronous, single-threaded startup
/// operation.
pub struct PackageManager {
    registry: PackageRegistry,
    loader: PackageLoader,
    events: SharedEvents,
    context: LoadContext,
    builders: HashMap<String, PackageBuilder>,
    roots: IndexMap<String, PathBuf>,
}

impl std::fmt::Debug for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageManager")
            .field("registry", &self.registry)
            .field("kinds", &self.builders.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn build_library(id: &str, path: PathBuf) -> Box<dyn Package> {
    Box::new(Library::new(id, path))
}

fn build_module(id: &str, path: PathBuf) -> Box<dyn Package> {
    Box::new(Module::new(id, path))
}

impl PackageManager {
    /// Create an empty manager with the built-in library/module builders
    pub fn new(events: SharedEvents, context: LoadContext) -> Self {
        let mut builders: HashMap<String, PackageBuilder> = HashMap::new();
        builders.insert(Library::KIND.to_string(), build_library);
        builders.insert(Module::KIND.to_string(), build_module);

        Self {
            registry: PackageRegistry::new(),
            loader: PackageLoader::new(),
            events,
            context,
            builders,
            roots: IndexMap::new(),
        }
    }

    /// Create a manager from the declarative packages config.
    ///
    /// Consumes the three lists exactly once: `preload` entries are
    /// registered and loaded immediately, `ondemand` entries are only
    /// registered, and each `conditional` block is registered-and-loaded
    /// when its condition holds against the environment snapshot. List
    /// order is preserved throughout.
    pub fn from_config(
        config: &PackagesConfig,
        env: &Environment,
        events: SharedEvents,
        context: LoadContext,
    ) -> Result<Self> {
        let mut manager = Self::new(events, context);
        manager.roots = config.roots.clone();

        manager.add_many(&config.preload, true)?;
        manager.add_many(&config.ondemand, false)?;

        for (condition, packages) in &config.conditional {
            if activation::evaluate(condition, env) {
                tracing::debug!(condition = %condition, "Condition holds, activating packages");
                manager.add_many(packages, true)?;
            }
        }

        Ok(manager)
    }

    /// Register a constructor for a package kind
    pub fn set_builder(&mut self, kind: impl Into<String>, builder: PackageBuilder) -> &mut Self {
        self.builders.insert(kind.into(), builder);
        self
    }

    /// Register the base directory packages of a kind live under
    pub fn set_root(&mut self, kind: impl Into<String>, root: impl Into<PathBuf>) -> &mut Self {
        self.roots.insert(kind.into(), root.into());
        self
    }

    /// The underlying registry
    pub fn registry(&self) -> &PackageRegistry {
        &self.registry
    }

    /// Add a package object. Overwrites silently on a duplicate
    /// `(kind, id)`; last write wins.
    pub fn add(&mut self, package: Box<dyn Package>) -> &mut Self {
        self.registry.add(package);
        self
    }

    /// Add a library by bare name
    pub fn add_library(&mut self, id: &str) -> Result<()> {
        self.add_by_name(Library::KIND, id)
    }

    /// Add a module by bare name
    pub fn add_module(&mut self, id: &str) -> Result<()> {
        self.add_by_name(Module::KIND, id)
    }

    /// Add a package by kind and bare name.
    ///
    /// Uses the kind's registered builder and root directory; the package
    /// path is `<root>/<Name>` with the name's first letter capitalized.
    pub fn add_by_name(&mut self, kind: &str, id: &str) -> Result<()> {
        let builder = self
            .builders
            .get(kind)
            .ok_or_else(|| Error::Config(format!("No builder registered for kind '{kind}'")))?;

        let root = self
            .roots
            .get(kind)
            .ok_or_else(|| Error::Config(format!("No root directory configured for kind '{kind}'")))?;

        let path = root.join(capitalize(id));
        self.registry.add(builder(id, path));

        Ok(())
    }

    /// Register a batch of dotted package references; optionally load each
    /// one as it is registered.
    ///
    /// Entries that do not parse, or whose kind has no builder or root,
    /// are skipped with a warning. Load failures propagate immediately.
    pub fn add_many(&mut self, packages: &[String], load: bool) -> Result<()> {
        for reference in packages {
            let uid = match PackageUid::parse(reference) {
                Ok(uid) => uid,
                Err(_) => {
                    tracing::warn!(package = %reference, "Skipping malformed package reference");
                    continue;
                }
            };

            if !self.builders.contains_key(&uid.kind) || !self.roots.contains_key(&uid.kind) {
                tracing::warn!(package = %reference, "Skipping package of unconfigured kind");
                continue;
            }

            self.add_by_name(&uid.kind, &uid.id)?;

            if load {
                self.load(&uid)?;
            }
        }

        Ok(())
    }

    /// Look up a package snapshot. `Ok(None)` for a missing entry.
    pub fn get(&self, spec: impl UidSpec) -> Result<Option<PackageInfo>> {
        let uid = spec.resolve()?;
        Ok(self.registry.get(&uid).map(|package| package.info()))
    }

    /// Whether a package is registered
    pub fn exists(&self, spec: impl UidSpec) -> Result<bool> {
        let uid = spec.resolve()?;
        Ok(self.registry.exists(&uid))
    }

    /// Delete the registry entry if present; no-op otherwise.
    ///
    /// Does not undo side effects of a load already performed.
    pub fn remove(&mut self, spec: impl UidSpec) -> Result<()> {
        let uid = spec.resolve()?;
        self.registry.remove(&uid);
        Ok(())
    }

    /// Whether a package is loaded; `false` for unknown packages
    pub fn is_loaded(&self, spec: impl UidSpec) -> Result<bool> {
        let uid = spec.resolve()?;
        Ok(self
            .registry
            .get(&uid)
            .map(|package| package.is_loaded())
            .unwrap_or(false))
    }

    /// Load a package.
    ///
    /// Resolves the target, checks the descriptor, enforces the one-time
    /// guard, runs the resource loader, marks the package loaded, and
    /// publishes `"<uid>.load"` with the package snapshot as payload.
    /// Nobody listening is not an error.
    pub fn load(&mut self, spec: impl UidSpec) -> Result<()> {
        let uid = spec.resolve()?;

        {
            let package = self
                .registry
                .get(&uid)
                .ok_or_else(|| Error::UnknownPackage(uid.to_string()))?;

            validate_descriptor(package)?;

            if package.is_loaded() {
                return Err(Error::AlreadyLoaded {
                    kind: package.kind().to_string(),
                    id: package.id().to_string(),
                });
            }

            self.loader.load(package, &self.context)?;
        }

        let info = match self.registry.get_mut(&uid) {
            Some(package) => {
                package.mark_loaded();
                package.info()
            }
            None => return Err(Error::UnknownPackage(uid.to_string())),
        };

        tracing::info!(package = %uid, "Package loaded");

        self.events.lock().trigger(&format!("{uid}.load"), &info);

        Ok(())
    }

    /// Load every registered package of a kind, in registration order.
    ///
    /// Fail fast: the first failure propagates and the remaining packages
    /// of the kind stay unloaded.
    pub fn load_all_of_kind(&mut self, kind: &str) -> Result<()> {
        for id in self.registry.ids_of_kind(kind) {
            self.load((kind, id.as_str()))?;
        }

        Ok(())
    }

    /// Snapshots of every package of a kind, in registration order
    pub fn all_of_kind(&self, kind: &str) -> Vec<PackageInfo> {
        self.registry
            .all_of_kind(kind)
            .into_iter()
            .map(|package| package.info())
            .collect()
    }

    /// All registered uids, kinds in first-seen order
    pub fn uids(&self) -> Vec<PackageUid> {
        self.registry.uids()
    }

    /// Registered kind tags, in first-seen order
    pub fn kinds(&self) -> Vec<String> {
        self.registry.kinds().into_iter().map(String::from).collect()
    }
}

/// Descriptor validity gate run before any resource work
fn validate_descriptor(package: &dyn Package) -> Result<()> {
    if package.kind().is_empty() || package.id().is_empty() {
        return Err(Error::invalid(
            package.uid().to_string(),
            "kind and id must be non-empty",
        ));
    }

    if package.path() == Path::new("") {
        return Err(Error::invalid(
            package.uid().to_string(),
            "package path is empty",
        ));
    }

    Ok(())
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
