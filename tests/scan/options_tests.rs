//! Scan options tests: targets, middleware and registration strategies

use super::test_utils::*;
use dispatch_scan::{
    Lifetime, Middleware, ModuleRef, ScanError, ScanOptions, ScanTarget, ServiceCollection,
    TypeDescriptor,
};

struct AuditMiddleware;
impl Middleware for AuditMiddleware {}

struct TimingMiddleware;
impl Middleware for TimingMiddleware {}

struct RetryMiddleware<T>(std::marker::PhantomData<T>);
impl<T: 'static> Middleware for RetryMiddleware<T> {}

fn modules(names: &[&str]) -> Vec<ModuleRef> {
    names.iter().map(|n| ModuleRef::new(*n)).collect()
}

#[test]
fn test_missing_primary_leaves_targets_unchanged() {
    let mut options = ScanOptions::new(RecordingContainer::new());
    options.add_scan_targets(Some(ModuleRef::new("app")), []).unwrap();

    let result = options.add_scan_targets(None, modules(&["lib"]));

    assert!(matches!(result, Err(ScanError::InvalidArgument(_))));
    assert_eq!(options.scan_targets(), &[ScanTarget::module("app")]);
}

#[test]
fn test_blank_additional_module_rejected() {
    let mut options = ScanOptions::new(RecordingContainer::new());

    let result = options.add_scan_targets(Some(ModuleRef::new("app")), modules(&["lib", "  "]));

    assert!(result.is_err());
    assert!(options.scan_targets().is_empty());
}

#[test]
fn test_latest_targets_come_first() {
    let mut options = ScanOptions::new(RecordingContainer::new());
    options
        .add_scan_targets(Some(ModuleRef::new("core")), [])
        .unwrap()
        .add_scan_targets(Some(ModuleRef::new("app")), modules(&["plugins"]))
        .unwrap();

    assert_eq!(
        options.scan_targets(),
        &[
            ScanTarget::module("app"),
            ScanTarget::module("plugins"),
            ScanTarget::module("core"),
        ]
    );
}

#[test]
fn test_duplicate_targets_are_kept() {
    let mut options = ScanOptions::new(RecordingContainer::new());
    options.add_scan_targets(Some(ModuleRef::new("app")), []).unwrap();
    options.add_scan_targets(Some(ModuleRef::new("app")), []).unwrap();

    assert_eq!(options.scan_targets().len(), 2);
}

#[test]
fn test_namespace_target() {
    let mut options = ScanOptions::new(RecordingContainer::new());
    options.add_scan_targets(Some(ModuleRef::new("app")), []).unwrap();
    options.add_scan_namespace("lib", "lib::store").unwrap();

    assert_eq!(options.scan_targets()[0], ScanTarget::namespace("lib", "lib::store"));
    assert!(options.add_scan_namespace("", "lib::store").is_err());
}

#[test]
fn test_middleware_registered_once_and_widens_scan() {
    let mut options = ScanOptions::new(RecordingContainer::new());
    options.add_scan_targets(Some(ModuleRef::new("app")), []).unwrap();

    options.add_middleware::<AuditMiddleware>().unwrap();
    options.add_middleware::<AuditMiddleware>().unwrap();
    options.add_middleware::<TimingMiddleware>().unwrap();

    let audit = TypeDescriptor::of::<AuditMiddleware>();
    assert_eq!(audit.name, "AuditMiddleware");
    assert_eq!(
        options.middleware_types(),
        &[audit.clone(), TypeDescriptor::of::<TimingMiddleware>()]
    );
    assert_eq!(
        options.services().services(),
        vec!["AuditMiddleware", "TimingMiddleware"]
    );

    // Both middleware live in this namespace, so the target is appended twice
    let targets = options.scan_targets();
    assert_eq!(targets.len(), 3);
    assert_eq!(targets[0], ScanTarget::module("app"));
    assert_eq!(targets[1], audit.scan_target());
    assert_eq!(targets[2], audit.scan_target());
}

#[test]
fn test_each_generic_middleware_instantiation_is_registered() {
    let mut options = ScanOptions::new(RecordingContainer::new());

    options.add_middleware::<RetryMiddleware<u8>>().unwrap();
    options.add_middleware::<RetryMiddleware<u16>>().unwrap();

    assert_eq!(options.middleware_types().len(), 2);
    assert_eq!(
        options.services().services(),
        vec!["RetryMiddleware<u8>", "RetryMiddleware<u16>"]
    );
}

#[test]
fn test_middleware_without_module_is_rejected() {
    let mut options = ScanOptions::new(RecordingContainer::new());

    let result = options.add_middleware_type(TypeDescriptor::from_type_path("u8"));

    assert!(matches!(result, Err(ScanError::InvalidArgument(_))));
    assert!(options.services().calls.is_empty());
    assert!(options.scan_targets().is_empty());
}

#[test]
fn test_failed_middleware_registration_changes_nothing() {
    let mut options = ScanOptions::new(RecordingContainer::failing_on("AuditMiddleware"));

    assert!(options.add_middleware::<AuditMiddleware>().is_err());
    assert!(options.middleware_types().is_empty());
    assert!(options.scan_targets().is_empty());
}

#[test]
fn test_middleware_by_descriptor() {
    let mut options = ScanOptions::new(ServiceCollection::new());
    let logging = TypeDescriptor::new("logging", "logging::middleware", "LoggingMiddleware");

    options.add_middleware_type(logging.clone()).unwrap();

    assert!(options.services().contains(&logging));
    assert_eq!(
        options.scan_targets(),
        &[ScanTarget::namespace("logging", "logging::middleware")]
    );
}

#[test]
fn test_strategy_switch_rebinds_every_entry_point() {
    let mut options = ScanOptions::new(RecordingContainer::new());
    let service = plain("Service");
    let implementation = plain("ServiceImpl");

    options.use_singleton_registration();
    options.register_service(&service).unwrap();
    options.register_service_with(&service, &implementation).unwrap();
    options
        .register_service_factory(
            &service,
            std::sync::Arc::new(|_: &dyn dispatch_scan::ServiceProvider| {
                std::sync::Arc::new(1u32) as std::sync::Arc<dyn std::any::Any + Send + Sync>
            }),
        )
        .unwrap();

    options.use_scoped_registration();
    options.register_service(&service).unwrap();

    let lifetimes: Vec<_> = options.services().calls.iter().map(|c| c.lifetime).collect();
    assert_eq!(
        lifetimes,
        vec![
            Lifetime::Singleton,
            Lifetime::Singleton,
            Lifetime::Singleton,
            Lifetime::Scoped,
        ]
    );
    let primitives: Vec<_> = options.services().calls.iter().map(|c| c.primitive).collect();
    assert_eq!(
        primitives,
        vec![
            Primitive::ByType,
            Primitive::ByImplementation,
            Primitive::ByFactory,
            Primitive::ByType,
        ]
    );
}

#[test]
fn test_custom_strategy() {
    let mut options = ScanOptions::new(RecordingContainer::new());
    options.use_registration(FactoryOnlySink);

    options.register_service(&plain("Service")).unwrap();
    options.add_middleware::<AuditMiddleware>().unwrap();

    assert_eq!(options.lifetime(), Lifetime::Singleton);
    assert!(options
        .services()
        .calls
        .iter()
        .all(|c| c.primitive == Primitive::ByFactory && c.lifetime == Lifetime::Singleton));
}

#[test]
fn test_last_strategy_wins() {
    let mut options = ScanOptions::new(RecordingContainer::new());
    options
        .use_singleton_registration()
        .use_registration(FactoryOnlySink)
        .use_lifetime(Lifetime::Scoped);

    options.register_service(&plain("Service")).unwrap();

    assert_eq!(options.lifetime(), Lifetime::Scoped);
    assert_eq!(options.services().calls[0].primitive, Primitive::ByType);
}
