//! Registration strategies
//!
//! A [`RegistrationSink`] decides how "register this type" reaches the
//! container. [`ScanOptions`](crate::scan::options::ScanOptions) holds exactly
//! one sink and swaps the whole object when the strategy changes, so the three
//! entry points can never disagree about the lifetime.

use std::fmt::Debug;

use crate::scan::container::{Lifetime, ServiceContainer, ServiceFactory};
use crate::scan::traits::{ScanError, TypeDescriptor};

/// Routes registrations into a container
pub trait RegistrationSink: Debug + Send + Sync {
    /// Lifetime this sink registers under
    fn lifetime(&self) -> Lifetime;

    /// Register a type as its own implementation
    fn register_type(
        &self,
        services: &mut dyn ServiceContainer,
        service: &TypeDescriptor,
    ) -> Result<(), ScanError> {
        services.add_type(service, self.lifetime())
    }

    /// Register a service implemented by another type
    fn register_implementation(
        &self,
        services: &mut dyn ServiceContainer,
        service: &TypeDescriptor,
        implementation: &TypeDescriptor,
    ) -> Result<(), ScanError> {
        services.add_implementation(service, implementation, self.lifetime())
    }

    /// Register a service built by a factory
    fn register_factory(
        &self,
        services: &mut dyn ServiceContainer,
        service: &TypeDescriptor,
        factory: ServiceFactory,
    ) -> Result<(), ScanError> {
        services.add_factory(service, factory, self.lifetime())
    }
}

/// Registers every service per resolution scope
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopedRegistration;

impl RegistrationSink for ScopedRegistration {
    fn lifetime(&self) -> Lifetime {
        Lifetime::Scoped
    }
}

/// Registers every service once per process
#[derive(Debug, Clone, Copy, Default)]
pub struct SingletonRegistration;

impl RegistrationSink for SingletonRegistration {
    fn lifetime(&self) -> Lifetime {
        Lifetime::Singleton
    }
}

/// Sink for a lifetime value
pub fn sink_for(lifetime: Lifetime) -> Box<dyn RegistrationSink> {
    match lifetime {
        Lifetime::Scoped => Box::new(ScopedRegistration),
        Lifetime::Singleton => Box::new(SingletonRegistration),
    }
}
