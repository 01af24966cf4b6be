//! End-to-end discovery tests over catalog manifests and settings files

use super::test_utils::*;
use dispatch_scan::{
    DeclaredMarkers, DiscoveryPipeline, Lifetime, ModuleRef, ScanError, ScanOptions,
    ScanSettings, ServiceCollection, TypeCatalog, TypeDescriptor,
};

fn registered(options: &ScanOptions<ServiceCollection>) -> Vec<String> {
    options
        .services()
        .descriptors()
        .iter()
        .map(|d| d.service.full_name())
        .collect()
}

#[test]
fn test_pipeline_over_manifest_file() {
    let dir = TestDir::new();
    let path = dir.write("catalog.toml", CATALOG_MANIFEST);
    let catalog = TypeCatalog::from_manifest_file(&path).unwrap();
    assert_eq!(catalog.modules(), vec![ModuleRef::new("app"), ModuleRef::new("logging")]);

    let mut options = ScanOptions::new(ServiceCollection::new());
    options.add_scan_targets(Some(ModuleRef::new("app")), []).unwrap();

    let report = DiscoveryPipeline::new(catalog, DeclaredMarkers)
        .run(&mut options)
        .unwrap();

    assert_eq!(report.effects.len(), 1);
    assert_eq!(report.effects[0].implementing_type.name, "FetchWeatherEffect");
    assert_eq!(report.reducers.len(), 3);
    assert_eq!(report.reducers_for_action("FetchWeather").count(), 1);
    assert_eq!(
        registered(&options),
        vec!["app::effects::FetchWeatherEffect", "app::store::weather::WeatherReducers"]
    );
}

#[test]
fn test_namespace_filter_narrows_scan() {
    let catalog = TypeCatalog::from_manifest_str(CATALOG_MANIFEST).unwrap();
    let mut options = ScanOptions::new(ServiceCollection::new());
    options.add_scan_namespace("app", "app::store").unwrap();

    let report = DiscoveryPipeline::new(catalog, DeclaredMarkers)
        .run(&mut options)
        .unwrap();

    assert!(report.effects.is_empty());
    assert_eq!(report.reducers.len(), 3);
    let hosts: Vec<_> = report.reducer_hosts().iter().map(|h| h.name.clone()).collect();
    assert_eq!(hosts, vec!["WeatherReducers"]);
}

#[test]
fn test_overlapping_targets_enumerate_each_type_once() {
    let catalog = TypeCatalog::from_manifest_str(CATALOG_MANIFEST).unwrap();
    let mut options = ScanOptions::new(ServiceCollection::strict());
    options
        .add_scan_targets(Some(ModuleRef::new("app")), [ModuleRef::new("app")])
        .unwrap();
    options.add_scan_namespace("app", "app::effects").unwrap();

    let report = DiscoveryPipeline::new(catalog, DeclaredMarkers)
        .run(&mut options)
        .unwrap();

    assert_eq!(report.effects.len(), 1);
    assert_eq!(options.services().len(), 2);
}

#[test]
fn test_middleware_target_is_scanned() {
    let catalog = TypeCatalog::from_manifest_str(CATALOG_MANIFEST).unwrap();
    let mut options = ScanOptions::new(ServiceCollection::new());
    options.add_scan_targets(Some(ModuleRef::new("app")), []).unwrap();
    options
        .add_middleware_type(TypeDescriptor::new("logging", "logging", "LoggingMiddleware"))
        .unwrap();

    let report = DiscoveryPipeline::new(catalog, DeclaredMarkers)
        .run(&mut options)
        .unwrap();

    let effects: Vec<_> = report
        .effects
        .iter()
        .map(|e| e.implementing_type.name.as_str())
        .collect();
    assert_eq!(effects, vec!["FetchWeatherEffect", "LogEffect"]);
    assert_eq!(registered(&options)[0], "logging::LoggingMiddleware");
}

#[test]
fn test_unknown_module_yields_empty_report() {
    let catalog = TypeCatalog::from_manifest_str(CATALOG_MANIFEST).unwrap();
    let mut options = ScanOptions::new(ServiceCollection::new());
    options.add_scan_targets(Some(ModuleRef::new("apps")), []).unwrap();

    let report = DiscoveryPipeline::new(catalog, DeclaredMarkers)
        .run(&mut options)
        .unwrap();

    assert!(report.is_empty());
    assert!(options.services().is_empty());
}

#[test]
fn test_invalid_manifest() {
    let result = TypeCatalog::from_manifest_str("[[modules]]\nname = \"\"\n");
    assert!(matches!(result, Err(ScanError::InvalidManifest(_))));

    let result = TypeCatalog::from_manifest_str("modules = 3");
    assert!(matches!(result, Err(ScanError::InvalidManifest(_))));

    let result = TypeCatalog::from_manifest_str(
        "[[modules]]\nname = \"app\"\n\n[[modules.types]]\nname = \"Audit\"\nmarkers = [\"middleware\"]\n",
    );
    assert!(matches!(result, Err(ScanError::InvalidManifest(_))));

    let missing = TestDir::new().temp_dir.path().join("missing.toml");
    assert!(TypeCatalog::from_manifest_file(missing).is_err());
}

#[test]
fn test_settings_file_drives_scan() {
    let dir = TestDir::new();
    let path = dir.write(
        "scan.toml",
        r#"
lifetime = "singleton"

[[targets]]
module = "logging"

[[targets]]
module = "app"
namespace = "app::effects"
"#,
    );
    let settings = ScanSettings::from_file(&path).unwrap();
    let catalog = TypeCatalog::from_manifest_str(CATALOG_MANIFEST).unwrap();
    let mut options = ScanOptions::new(ServiceCollection::new());
    settings.apply(&mut options).unwrap();

    let report = DiscoveryPipeline::new(catalog, DeclaredMarkers)
        .run(&mut options)
        .unwrap();

    // Last listed target scans first
    let effects: Vec<_> = report
        .effects
        .iter()
        .map(|e| e.implementing_type.name.as_str())
        .collect();
    assert_eq!(effects, vec!["FetchWeatherEffect", "LogEffect"]);
    assert!(options
        .services()
        .descriptors()
        .iter()
        .all(|d| d.lifetime == Lifetime::Singleton));
}

#[test]
fn test_settings_json_round_trip() {
    let dir = TestDir::new();
    let path = dir.temp_dir.path().join("scan.json");
    let settings: ScanSettings = toml::from_str(
        r#"
[[targets]]
module = "app"
"#,
    )
    .unwrap();

    settings.to_json_file(&path).unwrap();
    let loaded = ScanSettings::from_file(&path).unwrap();

    assert_eq!(loaded.lifetime, Lifetime::Scoped);
    assert_eq!(loaded.targets, settings.targets);
}

#[test]
fn test_settings_file_errors() {
    let dir = TestDir::new();
    let path = dir.write("broken.toml", "lifetime = \"forever\"");
    assert!(ScanSettings::from_file(&path).is_err());

    let path = dir.temp_dir.path().join("absent.toml");
    assert!(ScanSettings::from_file(&path).is_err());
}
