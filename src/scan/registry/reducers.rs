//! Reducer discovery
//!
//! Finds reducer methods among the candidate (type, method) pairs and
//! registers each concrete host type once.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::scan::container::ServiceContainer;
use crate::scan::markers::MarkerInspector;
use crate::scan::options::ScanOptions;
use crate::scan::traits::{MethodDescriptor, ReducerMarker, ScanError, TypeDescriptor, TypeMethod};

/// Discovered reducer method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredReducer {
    /// Type declaring the method
    pub host_type: TypeDescriptor,
    /// Marker metadata found on the method
    pub marker: ReducerMarker,
    /// The reducer method
    pub method: MethodDescriptor,
}

/// Distinct concrete host types, in first-occurrence order
pub fn host_types(reducers: &[DiscoveredReducer]) -> Vec<&TypeDescriptor> {
    let mut seen = HashSet::new();
    reducers
        .iter()
        .map(|r| &r.host_type)
        .filter(|host| !host.is_abstract)
        .filter(|host| seen.insert(*host))
        .collect()
}

/// Reducer discovery scanner
pub struct ReducerDiscovery<M> {
    inspector: M,
}

impl<M: MarkerInspector> ReducerDiscovery<M> {
    /// Create a reducer scanner using the given marker lookup
    pub fn new(inspector: M) -> Self {
        Self { inspector }
    }

    /// Discover reducer methods and register their host types
    ///
    /// Every marked method is reported, including methods declared on
    /// abstract hosts. Abstract hosts are never registered (their concrete
    /// subtypes are candidates of their own); every other host is registered
    /// once however many reducers it declares.
    pub fn discover<C, I>(
        &self,
        options: &mut ScanOptions<C>,
        candidates: I,
    ) -> Result<Vec<DiscoveredReducer>, ScanError>
    where
        C: ServiceContainer,
        I: IntoIterator<Item = TypeMethod>,
    {
        let reducers: Vec<DiscoveredReducer> = candidates
            .into_iter()
            .filter_map(|TypeMethod { host, method }| {
                self.inspector
                    .reducer_marker(&method)
                    .map(|marker| DiscoveredReducer {
                        host_type: host,
                        marker,
                        method,
                    })
            })
            .collect();

        let hosts = host_types(&reducers);
        for host in &hosts {
            debug!("Registering reducer host {}", host);
            options.register_service(host)?;
        }

        info!(
            "Discovered {} reducer methods on {} host types",
            reducers.len(),
            hosts.len()
        );
        Ok(reducers)
    }
}

impl<M: std::fmt::Debug> std::fmt::Debug for ReducerDiscovery<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReducerDiscovery")
            .field("inspector", &self.inspector)
            .finish()
    }
}
