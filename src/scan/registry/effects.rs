//! Effect discovery
//!
//! Picks the effect types out of the candidates and registers each one.

use tracing::{debug, info};

use crate::scan::container::ServiceContainer;
use crate::scan::markers::MarkerInspector;
use crate::scan::options::ScanOptions;
use crate::scan::traits::{ScanError, TypeDescriptor};

/// Discovered effect type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredEffect {
    /// Type implementing the effect capability
    pub implementing_type: TypeDescriptor,
}

/// Effect discovery scanner
pub struct EffectDiscovery<M> {
    inspector: M,
}

impl<M: MarkerInspector> EffectDiscovery<M> {
    /// Create an effect scanner using the given marker lookup
    pub fn new(inspector: M) -> Self {
        Self { inspector }
    }

    /// Whether a candidate type is a user effect
    pub fn is_effect(&self, ty: &TypeDescriptor) -> bool {
        self.inspector.is_effect(ty) && !self.inspector.is_effect_adapter(ty)
    }

    /// Discover effects among the candidates and register them
    ///
    /// Candidates keep their input order and duplicates are reported as many
    /// times as they appear. Each discovered effect is registered under the
    /// active strategy; the first container error aborts discovery.
    pub fn discover<C, I>(
        &self,
        options: &mut ScanOptions<C>,
        candidates: I,
    ) -> Result<Vec<DiscoveredEffect>, ScanError>
    where
        C: ServiceContainer,
        I: IntoIterator<Item = TypeDescriptor>,
    {
        let effects: Vec<DiscoveredEffect> = candidates
            .into_iter()
            .filter(|ty| self.is_effect(ty))
            .map(|implementing_type| DiscoveredEffect { implementing_type })
            .collect();

        for effect in &effects {
            debug!("Registering effect {}", effect.implementing_type);
            options.register_service(&effect.implementing_type)?;
        }

        info!("Discovered {} effects", effects.len());
        Ok(effects)
    }
}

impl<M: std::fmt::Debug> std::fmt::Debug for EffectDiscovery<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectDiscovery")
            .field("inspector", &self.inspector)
            .finish()
    }
}
