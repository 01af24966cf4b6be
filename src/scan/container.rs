//! Service container boundary
//!
//! The scanner only registers services; resolving them is the host
//! container's job. [`ServiceContainer`] is the seam, [`ServiceCollection`]
//! an in-memory implementation that records what was registered.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::scan::traits::{ScanError, TypeDescriptor};

/// Lifetime a service is registered under
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// One instance per resolution scope (e.g. per request)
    #[default]
    Scoped,
    /// One instance for the whole process
    Singleton,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Scoped => f.write_str("scoped"),
            Lifetime::Singleton => f.write_str("singleton"),
        }
    }
}

/// Resolves services while a factory builds an instance
pub trait ServiceProvider {
    /// Resolve a registered service
    fn resolve(&self, service: &TypeDescriptor) -> Option<Arc<dyn Any + Send + Sync>>;
}

/// Factory producing a service instance
pub type ServiceFactory =
    Arc<dyn Fn(&dyn ServiceProvider) -> Arc<dyn Any + Send + Sync> + Send + Sync>;

/// Dependency-injection container primitives
///
/// Failures (duplicate registrations, rejected types) are returned to the
/// caller unchanged; the scanner does not catch or wrap them.
pub trait ServiceContainer {
    /// Register a type as its own implementation
    fn add_type(&mut self, service: &TypeDescriptor, lifetime: Lifetime) -> Result<(), ScanError>;

    /// Register a service implemented by another type
    fn add_implementation(
        &mut self,
        service: &TypeDescriptor,
        implementation: &TypeDescriptor,
        lifetime: Lifetime,
    ) -> Result<(), ScanError>;

    /// Register a service built by a factory
    fn add_factory(
        &mut self,
        service: &TypeDescriptor,
        factory: ServiceFactory,
        lifetime: Lifetime,
    ) -> Result<(), ScanError>;
}

/// How a registered service is implemented
#[derive(Clone)]
pub enum Implementation {
    /// The service type itself
    SelfType,
    /// Another type
    Type(TypeDescriptor),
    /// A factory
    Factory(ServiceFactory),
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Implementation::SelfType => f.write_str("SelfType"),
            Implementation::Type(ty) => f.debug_tuple("Type").field(ty).finish(),
            Implementation::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// One registration
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    pub service: TypeDescriptor,
    pub implementation: Implementation,
    pub lifetime: Lifetime,
}

/// In-memory service container
///
/// Registrations are kept in call order. The default collection accepts
/// repeated registrations of a service; [`ServiceCollection::strict`] rejects
/// them with [`ScanError::DuplicateRegistration`].
#[derive(Debug, Clone, Default)]
pub struct ServiceCollection {
    descriptors: Vec<ServiceDescriptor>,
    reject_duplicates: bool,
}

impl ServiceCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection that refuses to register a service twice
    pub fn strict() -> Self {
        Self {
            descriptors: Vec::new(),
            reject_duplicates: true,
        }
    }

    /// All registrations in call order
    pub fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Whether the service has at least one registration
    pub fn contains(&self, service: &TypeDescriptor) -> bool {
        self.descriptors.iter().any(|d| &d.service == service)
    }

    /// Registrations of one service, in call order
    pub fn registrations_of<'a>(
        &'a self,
        service: &'a TypeDescriptor,
    ) -> impl Iterator<Item = &'a ServiceDescriptor> + 'a {
        self.descriptors.iter().filter(move |d| &d.service == service)
    }

    fn push(
        &mut self,
        service: &TypeDescriptor,
        implementation: Implementation,
        lifetime: Lifetime,
    ) -> Result<(), ScanError> {
        if self.reject_duplicates && self.contains(service) {
            return Err(ScanError::DuplicateRegistration(service.full_name()));
        }
        debug!("Registering {} service {} ({:?})", lifetime, service, implementation);
        self.descriptors.push(ServiceDescriptor {
            service: service.clone(),
            implementation,
            lifetime,
        });
        Ok(())
    }
}

impl ServiceContainer for ServiceCollection {
    fn add_type(&mut self, service: &TypeDescriptor, lifetime: Lifetime) -> Result<(), ScanError> {
        self.push(service, Implementation::SelfType, lifetime)
    }

    fn add_implementation(
        &mut self,
        service: &TypeDescriptor,
        implementation: &TypeDescriptor,
        lifetime: Lifetime,
    ) -> Result<(), ScanError> {
        self.push(service, Implementation::Type(implementation.clone()), lifetime)
    }

    fn add_factory(
        &mut self,
        service: &TypeDescriptor,
        factory: ServiceFactory,
        lifetime: Lifetime,
    ) -> Result<(), ScanError> {
        self.push(service, Implementation::Factory(factory), lifetime)
    }
}
