//! Dispatch Scan - effect and reducer discovery for dependency injection
//!
//! Scans configured modules for effect handlers and reducer methods and
//! registers them into a dependency-injection container, so a state store can
//! later resolve and invoke them.
//!
//! ## Pipeline
//!
//! 1. Configure [`ScanOptions`]: modules to scan, middleware, registration lifetime
//! 2. Enumerate candidates from a [`CandidateSource`]
//! 3. Discover and register effects ([`EffectDiscovery`]) and reducers ([`ReducerDiscovery`])
//! 4. Hand the discovered units and the filled container to the host
//!
//! ```rust
//! use dispatch_scan::{
//!     DeclaredMarkers, DiscoveryPipeline, MethodDescriptor, ModuleRef, ReducerMarker,
//!     ScanOptions, ServiceCollection, TypeCatalog, TypeDescriptor, TypeMarker,
//! };
//!
//! let catalog = TypeCatalog::new()
//!     .with_type(
//!         TypeDescriptor::new("app", "app::effects", "FetchData").with_marker(TypeMarker::Effect),
//!         Vec::new(),
//!     )
//!     .with_type(
//!         TypeDescriptor::new("app", "app::store", "CounterReducers"),
//!         vec![MethodDescriptor::reducer("increment", ReducerMarker::for_action("Increment"))],
//!     );
//!
//! let mut options = ScanOptions::new(ServiceCollection::new());
//! options.add_scan_targets(Some(ModuleRef::new("app")), [])?;
//!
//! let report = DiscoveryPipeline::new(catalog, DeclaredMarkers).run(&mut options)?;
//! assert_eq!(report.effects.len(), 1);
//! assert_eq!(report.reducers.len(), 1);
//! assert_eq!(options.services().len(), 2);
//! # Ok::<(), dispatch_scan::ScanError>(())
//! ```

pub mod config;
pub mod scan;
pub mod utils;

pub use config::{LoggingConfig, ScanSettings};
pub use scan::*;
