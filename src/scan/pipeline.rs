//! Discovery pipeline
//!
//! Runs one full scan: enumerate candidates under the configured targets,
//! discover and register effects, then reducers.

use serde::Serialize;
use tracing::{info, warn};

use crate::scan::container::ServiceContainer;
use crate::scan::markers::MarkerInspector;
use crate::scan::options::ScanOptions;
use crate::scan::registry::reducers::host_types;
use crate::scan::registry::{
    CandidateSource, DiscoveredEffect, DiscoveredReducer, EffectDiscovery, ReducerDiscovery,
};
use crate::scan::traits::{ScanError, TypeDescriptor};

/// Result of one discovery pass
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    pub effects: Vec<DiscoveredEffect>,
    pub reducers: Vec<DiscoveredReducer>,
}

impl DiscoveryReport {
    /// Nothing was discovered
    ///
    /// Usually a sign the scan targets point at the wrong module or namespace.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.reducers.is_empty()
    }

    /// Reducers whose marker names the action type
    pub fn reducers_for_action<'a>(
        &'a self,
        action_type: &'a str,
    ) -> impl Iterator<Item = &'a DiscoveredReducer> + 'a {
        self.reducers
            .iter()
            .filter(move |r| r.marker.action_type.as_deref() == Some(action_type))
    }

    /// Concrete reducer hosts, as registered
    pub fn reducer_hosts(&self) -> Vec<&TypeDescriptor> {
        host_types(&self.reducers)
    }

    /// Flat summary suitable for printing or serializing
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            effects: self
                .effects
                .iter()
                .map(|e| e.implementing_type.full_name())
                .collect(),
            reducers: self
                .reducers
                .iter()
                .map(|r| ReducerSummary {
                    host: r.host_type.full_name(),
                    method: r.method.name.clone(),
                    action_type: r.marker.action_type.clone(),
                    registered: !r.host_type.is_abstract,
                })
                .collect(),
        }
    }
}

/// Serializable view of a [`DiscoveryReport`]
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub effects: Vec<String>,
    pub reducers: Vec<ReducerSummary>,
}

/// One reducer line of a [`ReportSummary`]
#[derive(Debug, Clone, Serialize)]
pub struct ReducerSummary {
    pub host: String,
    pub method: String,
    pub action_type: Option<String>,
    /// Whether the host type was registered with the container
    pub registered: bool,
}

/// Enumerates candidates and runs both discoverers
pub struct DiscoveryPipeline<S, M> {
    source: S,
    effects: EffectDiscovery<M>,
    reducers: ReducerDiscovery<M>,
}

impl<S, M> DiscoveryPipeline<S, M>
where
    S: CandidateSource,
    M: MarkerInspector + Clone,
{
    /// Create a pipeline over a candidate source, sharing one marker lookup
    pub fn new(source: S, inspector: M) -> Self {
        Self {
            source,
            effects: EffectDiscovery::new(inspector.clone()),
            reducers: ReducerDiscovery::new(inspector),
        }
    }

    /// Scan the configured targets and register everything found
    pub fn run<C: ServiceContainer>(
        &self,
        options: &mut ScanOptions<C>,
    ) -> Result<DiscoveryReport, ScanError> {
        let targets = options.scan_targets().to_vec();
        info!("Scanning {} targets", targets.len());

        let types = self.source.candidate_types(&targets);
        let methods = self.source.candidate_methods(&targets);

        let effects = self.effects.discover(options, types)?;
        let reducers = self.reducers.discover(options, methods)?;
        let report = DiscoveryReport { effects, reducers };

        if report.is_empty() {
            warn!(
                "Scan of {:?} found no effects or reducers; check the scanned modules and namespaces",
                targets
            );
        }
        Ok(report)
    }
}
