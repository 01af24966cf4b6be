//! Marker lookup
//!
//! The discoverers never inspect descriptors directly. They ask a
//! [`MarkerInspector`], so hosts with their own metadata facility (generated
//! tables, build scripts, inventory-style registries) can plug it in.

use crate::scan::traits::{MethodAttribute, MethodDescriptor, ReducerMarker, TypeDescriptor, TypeMarker};

/// Answers marker questions about candidate descriptors
pub trait MarkerInspector {
    /// Whether the type satisfies the effect capability
    fn is_effect(&self, ty: &TypeDescriptor) -> bool;

    /// Whether the type is the generic effect adapter
    ///
    /// The adapter satisfies the effect capability itself but is wiring, so
    /// effect discovery skips it.
    fn is_effect_adapter(&self, ty: &TypeDescriptor) -> bool;

    /// Reducer marker declared on the method, if any
    fn reducer_marker(&self, method: &MethodDescriptor) -> Option<ReducerMarker>;
}

/// Reads the markers declared on the descriptors themselves
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredMarkers;

impl MarkerInspector for DeclaredMarkers {
    fn is_effect(&self, ty: &TypeDescriptor) -> bool {
        ty.has_marker(&TypeMarker::Effect)
    }

    fn is_effect_adapter(&self, ty: &TypeDescriptor) -> bool {
        ty.has_marker(&TypeMarker::EffectAdapter)
    }

    fn reducer_marker(&self, method: &MethodDescriptor) -> Option<ReducerMarker> {
        method.attributes.iter().find_map(|attribute| match attribute {
            MethodAttribute::Reducer(marker) => Some(marker.clone()),
            MethodAttribute::Other { .. } => None,
        })
    }
}

impl<T: MarkerInspector + ?Sized> MarkerInspector for &T {
    fn is_effect(&self, ty: &TypeDescriptor) -> bool {
        (**self).is_effect(ty)
    }

    fn is_effect_adapter(&self, ty: &TypeDescriptor) -> bool {
        (**self).is_effect_adapter(ty)
    }

    fn reducer_marker(&self, method: &MethodDescriptor) -> Option<ReducerMarker> {
        (**self).reducer_marker(method)
    }
}
