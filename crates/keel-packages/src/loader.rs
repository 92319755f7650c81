//! Package resource loading
//!
//! Loading a package composes a fixed sequence of optional sub-resources
//! rooted at the package's directory. Each step is presence-checked and
//! silently skipped when the resource is absent; a script that fails to
//! read or run aborts the whole load.

use crate::context::{LoadContext, SERVICE_DATABASE, SERVICE_ROUTER};
use keel_core::{Error, Package, PackageUid, Result};
use rhai::{Engine, Scope};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Bootstrap/route/schema script extension
const SCRIPT_EXT: &str = "rhai";

/// Routes declaration script, relative to the package root
const ROUTES_FILE: &str = "config/routes.rhai";

/// Schema declaration script, relative to the package root
const TABLES_FILE: &str = "config/tables.rhai";

/// View templates directory, relative to the package root
const VIEWS_DIR: &str = "Views";

/// Public assets directory, relative to the package root
const ASSETS_DIR: &str = "Public";

/// Loads one package's resources.
///
/// In order:
/// 1. Runs `<root>/<basename>.rhai` if present (package bootstrap, no
///    ambient bindings).
/// 2. Runs `<root>/config/routes.rhai` if present, with the context's
///    `router` service in scope.
/// 3. Runs `<root>/config/tables.rhai` if present, with the context's
///    `database` service in scope.
/// 4. Registers `<root>/Views` under the `"views"` file group if the
///    directory exists.
/// 5. Registers `<root>/Public` under the `"assets"` file group if the
///    directory exists.
///
/// The loader only reports success or failure; the registry flips the
/// package's loaded flag on success.
pub struct PackageLoader {
    engine: Engine,
}

impl std::fmt::Debug for PackageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageLoader").finish()
    }
}

impl PackageLoader {
    /// Create a loader with a configured script engine
    pub fn new() -> Self {
        let mut engine = Engine::new();

        // Keep runaway bootstrap scripts in check
        engine.set_max_expr_depths(25, 10);
        engine.set_max_operations(100_000);
        engine.set_max_string_size(1024 * 1024);
        engine.set_max_array_size(10_000);
        engine.set_max_map_size(10_000);

        Self::register_functions(&mut engine);

        Self { engine }
    }

    /// Logging hooks available to package scripts
    fn register_functions(engine: &mut Engine) {
        engine.register_fn("log_debug", |msg: &str| {
            debug!(script_log = msg);
        });

        engine.register_fn("log_info", |msg: &str| {
            tracing::info!(script_log = msg);
        });

        engine.register_fn("log_warn", |msg: &str| {
            warn!(script_log = msg);
        });
    }

    /// Load the package's resources in the fixed order
    pub fn load(&self, package: &dyn Package, ctx: &LoadContext) -> Result<()> {
        let uid = package.uid();
        let root = package.path();

        if let Some(bootstrap) = self.bootstrap_file(root) {
            self.run_script(&uid, &bootstrap, Scope::new())?;
        }

        let routes = root.join(ROUTES_FILE);
        if routes.is_file() {
            let mut scope = Scope::new();
            if let Some(router) = ctx.service(SERVICE_ROUTER) {
                scope.push_dynamic(SERVICE_ROUTER, router);
            }
            self.run_script(&uid, &routes, scope)?;
        }

        let tables = root.join(TABLES_FILE);
        if tables.is_file() {
            let mut scope = Scope::new();
            if let Some(database) = ctx.service(SERVICE_DATABASE) {
                scope.push_dynamic(SERVICE_DATABASE, database);
            }
            self.run_script(&uid, &tables, scope)?;
        }

        let views = root.join(VIEWS_DIR);
        if views.is_dir() {
            ctx.files().lock().add(&views, "views", ctx.scan_depth());
        }

        let assets = root.join(ASSETS_DIR);
        if assets.is_dir() {
            ctx.files().lock().add(&assets, "assets", ctx.scan_depth());
        }

        Ok(())
    }

    /// Whether the package has a routes declaration script
    pub fn has_routes(&self, package: &dyn Package) -> bool {
        package.path().join(ROUTES_FILE).is_file()
    }

    /// Whether the package has a schema declaration script
    pub fn has_tables(&self, package: &dyn Package) -> bool {
        package.path().join(TABLES_FILE).is_file()
    }

    /// Whether the package has a view templates directory
    pub fn has_views(&self, package: &dyn Package) -> bool {
        package.path().join(VIEWS_DIR).is_dir()
    }

    /// Whether the package has a public assets directory
    pub fn has_assets(&self, package: &dyn Package) -> bool {
        package.path().join(ASSETS_DIR).is_dir()
    }

    /// Bootstrap script path: a script in the package root with the same
    /// name as the root directory
    fn bootstrap_file(&self, root: &Path) -> Option<std::path::PathBuf> {
        let basename = root.file_name()?.to_str()?;
        let file = root.join(format!("{basename}.{SCRIPT_EXT}"));
        file.is_file().then_some(file)
    }

    fn run_script(&self, uid: &PackageUid, file: &Path, mut scope: Scope<'_>) -> Result<()> {
        let source = fs::read_to_string(file).map_err(|e| {
            Error::load_failed(uid.to_string(), format!("{}: {e}", file.display()))
        })?;

        self.engine
            .run_with_scope(&mut scope, &source)
            .map_err(|e| {
                Error::load_failed(uid.to_string(), format!("{}: {e}", file.display()))
            })?;

        debug!(package = %uid, script = %file.display(), "Script executed");

        Ok(())
    }
}

impl Default for PackageLoader {
    fn default() -> Self {
        Self::new()
    }
}
