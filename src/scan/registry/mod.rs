//! Candidate enumeration and discovery
//!
//! Handles candidate listing, effect discovery and reducer discovery.

pub mod candidates;
pub mod effects;
pub mod reducers;

pub use candidates::{CandidateSource, TypeCatalog};
pub use effects::{DiscoveredEffect, EffectDiscovery};
pub use reducers::{DiscoveredReducer, ReducerDiscovery};
