//! Effect and reducer discovery
//!
//! Scans configured modules for effect types and reducer methods and
//! registers them into a dependency-injection container.
//!
//! ## Architecture
//!
//! - **Options**: scan targets, known middleware and the active registration strategy
//! - **Candidate sources**: enumerate types and methods visible under the targets
//! - **Marker inspectors**: decide what counts as an effect or a reducer
//! - **Discoverers**: filter candidates and register what they find
//! - **Registration sinks**: map "register this type" onto container lifetimes
//!
//! A scan pointed at the wrong module or namespace finds nothing. That shows
//! up as an empty [`DiscoveryReport`], not as an error.

pub mod container;
pub mod markers;
pub mod options;
pub mod pipeline;
pub mod registration;
pub mod registry;
pub mod traits;

pub use container::{
    Implementation, Lifetime, ServiceCollection, ServiceContainer, ServiceDescriptor,
    ServiceFactory, ServiceProvider,
};
pub use markers::{DeclaredMarkers, MarkerInspector};
pub use options::{Middleware, ScanOptions};
pub use pipeline::{DiscoveryPipeline, DiscoveryReport};
pub use registration::{RegistrationSink, ScopedRegistration, SingletonRegistration};
pub use registry::{
    CandidateSource, DiscoveredEffect, DiscoveredReducer, EffectDiscovery, ReducerDiscovery,
    TypeCatalog,
};
pub use traits::{
    MethodAttribute, MethodDescriptor, ModuleRef, ReducerMarker, ScanError, ScanTarget,
    TypeDescriptor, TypeMarker, TypeMethod,
};
