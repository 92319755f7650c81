//! End-to-end package lifecycle tests over real package directories

use keel_core::{Environment, Error, Module, PackageInfo};
use keel_events::EventBus;
use keel_fs::FileGroups;
use keel_packages::{LoadContext, PackageManager, SERVICE_DATABASE, SERVICE_ROUTER};
use parking_lot::Mutex;
use rhai::Dynamic;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn shared_events() -> Arc<Mutex<EventBus<PackageInfo>>> {
    Arc::new(Mutex::new(EventBus::new()))
}

fn shared_files() -> Arc<Mutex<FileGroups>> {
    Arc::new(Mutex::new(FileGroups::new()))
}

/// Build a module directory with the full resource set
fn full_module(root: &Path, name: &str) {
    let dir = root.join(name);
    fs::create_dir_all(dir.join("config")).unwrap();
    fs::create_dir_all(dir.join("Views")).unwrap();
    fs::create_dir_all(dir.join("Public")).unwrap();

    fs::write(
        dir.join(format!("{name}.rhai")),
        r#"log_info("bootstrap running");"#,
    )
    .unwrap();
    fs::write(
        dir.join("config/routes.rhai"),
        r#"if router != "router-service" { throw "router binding missing" }"#,
    )
    .unwrap();
    fs::write(
        dir.join("config/tables.rhai"),
        r#"if database != "database-service" { throw "database binding missing" }"#,
    )
    .unwrap();
}

#[test]
fn full_resource_sequence_loads_and_registers_directories() {
    let tmp = TempDir::new().unwrap();
    full_module(tmp.path(), "Blog");

    let files = shared_files();
    let ctx = LoadContext::new(files.clone())
        .with_service(SERVICE_ROUTER, Dynamic::from("router-service"))
        .with_service(SERVICE_DATABASE, Dynamic::from("database-service"));

    let mut manager = PackageManager::new(shared_events(), ctx);
    manager.add(Box::new(Module::new("blog", tmp.path().join("Blog"))));
    manager.load("module.blog").unwrap();

    assert!(manager.is_loaded("module.blog").unwrap());

    let groups = files.lock();
    let views = groups.roots("views").unwrap();
    assert_eq!(views.len(), 1);
    assert!(views[0].0.ends_with("Blog/Views"));

    let assets = groups.roots("assets").unwrap();
    assert_eq!(assets.len(), 1);
    assert!(assets[0].0.ends_with("Blog/Public"));
}

#[test]
fn missing_directories_register_nothing() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("Bare");
    fs::create_dir(&dir).unwrap();

    let files = shared_files();
    let mut manager =
        PackageManager::new(shared_events(), LoadContext::new(files.clone()));
    manager.add(Box::new(Module::new("bare", &dir)));
    manager.load("module.bare").unwrap();

    let groups = files.lock();
    assert!(groups.roots("views").is_none());
    assert!(groups.roots("assets").is_none());
}

#[test]
fn bootstrap_error_aborts_load_and_leaves_package_unloaded() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("Broken");
    fs::create_dir_all(dir.join("Views")).unwrap();
    fs::write(dir.join("Broken.rhai"), "let x = ;").unwrap();

    let files = shared_files();
    let mut manager =
        PackageManager::new(shared_events(), LoadContext::new(files.clone()));
    manager.add(Box::new(Module::new("broken", &dir)));

    let err = manager.load("module.broken").unwrap_err();
    assert!(matches!(err, Error::LoadFailed { .. }));
    assert!(!manager.is_loaded("module.broken").unwrap());

    // The bootstrap failed before the directory steps ran
    assert!(files.lock().roots("views").is_none());

    // The guard only trips once the loaded flag is set, so a retry is
    // another ordinary load attempt, not an AlreadyLoaded failure.
    assert!(matches!(
        manager.load("module.broken").unwrap_err(),
        Error::LoadFailed { .. }
    ));
}

#[test]
fn route_script_requires_provided_service() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("Shop");
    fs::create_dir_all(dir.join("config")).unwrap();
    fs::write(dir.join("config/routes.rhai"), "let r = router;").unwrap();

    // No router service in the context: the script's binding is undefined
    let mut manager =
        PackageManager::new(shared_events(), LoadContext::new(shared_files()));
    manager.add(Box::new(Module::new("shop", &dir)));

    assert!(matches!(
        manager.load("module.shop").unwrap_err(),
        Error::LoadFailed { .. }
    ));
}

#[test]
fn load_publishes_lifecycle_event_with_snapshot() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("Blog");
    fs::create_dir(&dir).unwrap();

    let events = shared_events();
    events.lock().on("module.blog.load", |_, info: &PackageInfo| {
        Some(json!({ "uid": info.uid().to_string(), "loaded": info.loaded }))
    });

    let mut manager =
        PackageManager::new(events.clone(), LoadContext::new(shared_files()));
    manager.add(Box::new(Module::new("blog", &dir)));
    manager.load("module.blog").unwrap();

    let bus = events.lock();
    assert_eq!(
        bus.result("module.blog.load").unwrap(),
        &[json!({ "uid": "module.blog", "loaded": true })]
    );
}

#[test]
fn from_config_loads_preload_on_disk() {
    let tmp = TempDir::new().unwrap();
    let modules = tmp.path().join("modules");
    full_module(&modules, "Blog");

    let config: keel_config::PackagesConfig = serde_yaml::from_str(&format!(
        r#"
preload: ["module.blog"]
roots:
  module: "{}"
"#,
        modules.display()
    ))
    .unwrap();

    let events = shared_events();
    events
        .lock()
        .on("module.blog.load", |_, info: &PackageInfo| Some(json!(info.loaded)));

    let files = shared_files();
    let ctx = LoadContext::new(files.clone())
        .with_service(SERVICE_ROUTER, Dynamic::from("router-service"))
        .with_service(SERVICE_DATABASE, Dynamic::from("database-service"));

    let env = Environment::from_version("1.0").unwrap();
    let manager =
        PackageManager::from_config(&config, &env, events.clone(), ctx).unwrap();

    assert!(manager.is_loaded("module.blog").unwrap());
    assert_eq!(
        events.lock().result("module.blog.load").unwrap(),
        &[json!(true)]
    );
    assert!(files.lock().roots("views").is_some());
}

#[test]
fn preload_failure_propagates_out_of_construction() {
    let tmp = TempDir::new().unwrap();
    let modules = tmp.path().join("modules");
    let dir = modules.join("Broken");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("Broken.rhai"), "let x = ;").unwrap();

    let config: keel_config::PackagesConfig = serde_yaml::from_str(&format!(
        r#"
preload: ["module.broken"]
roots:
  module: "{}"
"#,
        modules.display()
    ))
    .unwrap();

    let env = Environment::from_version("1.0").unwrap();
    let result = PackageManager::from_config(
        &config,
        &env,
        shared_events(),
        LoadContext::new(shared_files()),
    );

    assert!(matches!(result.unwrap_err(), Error::LoadFailed { .. }));
}
