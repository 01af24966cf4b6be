//! Scan configuration
//!
//! [`ScanOptions`] accumulates what to scan, which middleware is already known
//! and how discovered services are registered. It owns the service container
//! until the host takes it back with [`ScanOptions::into_services`].

use tracing::{debug, info};

use crate::scan::container::{Lifetime, ServiceCollection, ServiceContainer, ServiceFactory};
use crate::scan::registration::{RegistrationSink, ScopedRegistration, SingletonRegistration};
use crate::scan::traits::{ModuleRef, ScanError, ScanTarget, TypeDescriptor};

/// Capability implemented by store middleware
pub trait Middleware: 'static {}

/// Scan and registration configuration
#[derive(Debug)]
pub struct ScanOptions<C = ServiceCollection> {
    /// Active targets, highest precedence first
    scan_targets: Vec<ScanTarget>,
    /// Middleware registered so far, in registration order
    middleware_types: Vec<TypeDescriptor>,
    /// Active registration strategy
    sink: Box<dyn RegistrationSink>,
    /// Container receiving registrations
    services: C,
}

impl Default for ScanOptions<ServiceCollection> {
    fn default() -> Self {
        Self::new(ServiceCollection::new())
    }
}

impl<C: ServiceContainer> ScanOptions<C> {
    /// Create options registering into `services` with scoped lifetime
    pub fn new(services: C) -> Self {
        Self {
            scan_targets: Vec::new(),
            middleware_types: Vec::new(),
            sink: Box::new(ScopedRegistration),
            services,
        }
    }

    /// Add modules to scan
    ///
    /// The primary module is required. New targets are placed ahead of the
    /// existing ones, primary first.
    pub fn add_scan_targets<I>(
        &mut self,
        primary: Option<ModuleRef>,
        additional: I,
    ) -> Result<&mut Self, ScanError>
    where
        I: IntoIterator<Item = ModuleRef>,
    {
        let primary = primary
            .filter(|module| !module.is_blank())
            .ok_or_else(|| ScanError::InvalidArgument("primary scan module is required".to_string()))?;

        let mut targets: Vec<ScanTarget> = std::iter::once(primary)
            .chain(additional)
            .map(ScanTarget::module)
            .collect();
        if targets.iter().any(|t| t.module.is_blank()) {
            return Err(ScanError::InvalidArgument(
                "scan module name cannot be blank".to_string(),
            ));
        }

        debug!("Adding scan targets: {:?}", targets);
        targets.append(&mut self.scan_targets);
        self.scan_targets = targets;
        Ok(self)
    }

    /// Add a namespace-filtered target ahead of the existing ones
    pub fn add_scan_namespace(
        &mut self,
        module: impl Into<ModuleRef>,
        namespace: impl Into<String>,
    ) -> Result<&mut Self, ScanError> {
        let target = ScanTarget::namespace(module, namespace);
        if target.module.is_blank() {
            return Err(ScanError::InvalidArgument(
                "scan module name cannot be blank".to_string(),
            ));
        }
        debug!("Adding scan target: {}", target);
        self.scan_targets.insert(0, target);
        Ok(self)
    }

    /// Register a type as its own implementation
    pub fn register_service(&mut self, service: &TypeDescriptor) -> Result<(), ScanError> {
        self.sink.register_type(&mut self.services, service)
    }

    /// Register a service implemented by another type
    pub fn register_service_with(
        &mut self,
        service: &TypeDescriptor,
        implementation: &TypeDescriptor,
    ) -> Result<(), ScanError> {
        self.sink
            .register_implementation(&mut self.services, service, implementation)
    }

    /// Register a service built by a factory
    pub fn register_service_factory(
        &mut self,
        service: &TypeDescriptor,
        factory: ServiceFactory,
    ) -> Result<(), ScanError> {
        self.sink.register_factory(&mut self.services, service, factory)
    }

    /// Register middleware and scan its namespace
    pub fn add_middleware<T: Middleware>(&mut self) -> Result<&mut Self, ScanError> {
        self.add_middleware_type(TypeDescriptor::of::<T>())
    }

    /// Register a middleware type and scan its namespace
    ///
    /// Known middleware is left alone. Otherwise the type is registered under
    /// the active strategy, its module and namespace are appended to the scan
    /// targets, and it is recorded as known. A middleware without a module, or
    /// a failed registration, leaves the options unchanged.
    pub fn add_middleware_type(&mut self, middleware: TypeDescriptor) -> Result<&mut Self, ScanError> {
        if middleware.module.is_blank() {
            return Err(ScanError::InvalidArgument(format!(
                "middleware {} has no module to scan",
                middleware
            )));
        }
        if self.middleware_types.contains(&middleware) {
            debug!("Middleware {} already registered", middleware);
            return Ok(self);
        }

        self.register_service(&middleware)?;
        self.scan_targets.push(middleware.scan_target());
        info!("Registered middleware {}", middleware);
        self.middleware_types.push(middleware);
        Ok(self)
    }

    /// Register discovered services per resolution scope
    pub fn use_scoped_registration(&mut self) -> &mut Self {
        self.use_registration(ScopedRegistration)
    }

    /// Register discovered services once per process
    pub fn use_singleton_registration(&mut self) -> &mut Self {
        self.use_registration(SingletonRegistration)
    }

    /// Register discovered services through a custom sink
    pub fn use_registration(&mut self, sink: impl RegistrationSink + 'static) -> &mut Self {
        debug!("Switching registration strategy to {:?}", sink);
        self.sink = Box::new(sink);
        self
    }

    /// Use the built-in sink for a lifetime
    pub fn use_lifetime(&mut self, lifetime: Lifetime) -> &mut Self {
        match lifetime {
            Lifetime::Scoped => self.use_scoped_registration(),
            Lifetime::Singleton => self.use_singleton_registration(),
        }
    }

    /// Lifetime of the active strategy
    pub fn lifetime(&self) -> Lifetime {
        self.sink.lifetime()
    }

    /// Active targets, highest precedence first
    pub fn scan_targets(&self) -> &[ScanTarget] {
        &self.scan_targets
    }

    /// Middleware registered so far
    pub fn middleware_types(&self) -> &[TypeDescriptor] {
        &self.middleware_types
    }

    /// The container being filled
    pub fn services(&self) -> &C {
        &self.services
    }

    /// Direct access to the container, bypassing the registration strategy
    pub fn services_mut(&mut self) -> &mut C {
        &mut self.services
    }

    /// Hand the container back to the host
    pub fn into_services(self) -> C {
        self.services
    }
}
