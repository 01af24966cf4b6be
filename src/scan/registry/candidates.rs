//! Candidate enumeration
//!
//! A [`CandidateSource`] lists every type and (type, method) pair visible
//! under a set of scan targets. [`TypeCatalog`] is the in-memory source; it can
//! be filled from code or parsed from a `catalog.toml` manifest.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::scan::traits::{
    MethodDescriptor, ModuleRef, ScanError, ScanTarget, TypeDescriptor, TypeMarker, TypeMethod,
};

/// Enumerates candidates under a set of scan targets
pub trait CandidateSource {
    /// All types visible under the targets
    fn candidate_types(&self, targets: &[ScanTarget]) -> Vec<TypeDescriptor>;

    /// All (host type, method) pairs visible under the targets
    fn candidate_methods(&self, targets: &[ScanTarget]) -> Vec<TypeMethod>;
}

/// A type and the methods it declares
#[derive(Debug, Clone)]
pub struct CatalogType {
    pub descriptor: TypeDescriptor,
    pub methods: Vec<MethodDescriptor>,
}

/// In-memory catalog of modules and their types
///
/// Types are enumerated target by target, in target order. A type covered by
/// several targets is listed once, at its first match.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: Vec<CatalogType>,
}

impl TypeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type with its methods
    pub fn add_type(&mut self, descriptor: TypeDescriptor, methods: Vec<MethodDescriptor>) -> &mut Self {
        self.types.push(CatalogType { descriptor, methods });
        self
    }

    /// Builder form of [`TypeCatalog::add_type`]
    pub fn with_type(mut self, descriptor: TypeDescriptor, methods: Vec<MethodDescriptor>) -> Self {
        self.add_type(descriptor, methods);
        self
    }

    /// Number of catalogued types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Distinct modules in declaration order
    pub fn modules(&self) -> Vec<ModuleRef> {
        let mut seen = HashSet::new();
        self.types
            .iter()
            .map(|t| &t.descriptor.module)
            .filter(|m| seen.insert(*m))
            .cloned()
            .collect()
    }

    /// Load a catalog from a manifest file
    pub fn from_manifest_file<P: AsRef<Path>>(path: P) -> Result<Self, ScanError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ScanError::InvalidManifest(format!("Failed to read catalog manifest: {}", e))
        })?;
        Self::from_manifest_str(&contents)
    }

    /// Parse a catalog manifest
    pub fn from_manifest_str(contents: &str) -> Result<Self, ScanError> {
        let manifest: CatalogManifest = toml::from_str(contents)?;
        let mut catalog = Self::new();

        for module in manifest.modules {
            if module.name.is_blank() {
                return Err(ScanError::InvalidManifest(
                    "Module name cannot be empty".to_string(),
                ));
            }
            for entry in module.types {
                if entry.name.trim().is_empty() {
                    return Err(ScanError::InvalidManifest(format!(
                        "Type name cannot be empty in module {}",
                        module.name
                    )));
                }
                let namespace = entry.namespace.unwrap_or_else(|| module.name.to_string());
                let descriptor = TypeDescriptor {
                    module: module.name.clone(),
                    namespace,
                    name: entry.name,
                    is_abstract: entry.is_abstract,
                    markers: entry.markers.into_iter().collect(),
                };
                catalog.add_type(descriptor, entry.methods);
            }
        }

        info!("Loaded catalog with {} types", catalog.len());
        Ok(catalog)
    }

    /// Types visible under the targets, with their methods
    fn visible<'a>(&'a self, targets: &[ScanTarget]) -> Vec<&'a CatalogType> {
        let mut seen: HashSet<&TypeDescriptor> = HashSet::new();
        let mut visible = Vec::new();

        for target in targets {
            for entry in &self.types {
                let ty = &entry.descriptor;
                if target.covers(&ty.module, &ty.namespace) && seen.insert(ty) {
                    visible.push(entry);
                }
            }
        }

        debug!(
            "{} of {} catalogued types visible under {} targets",
            visible.len(),
            self.types.len(),
            targets.len()
        );
        visible
    }
}

impl CandidateSource for TypeCatalog {
    fn candidate_types(&self, targets: &[ScanTarget]) -> Vec<TypeDescriptor> {
        self.visible(targets)
            .into_iter()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    fn candidate_methods(&self, targets: &[ScanTarget]) -> Vec<TypeMethod> {
        self.visible(targets)
            .into_iter()
            .flat_map(|entry| {
                entry
                    .methods
                    .iter()
                    .map(move |method| TypeMethod::new(entry.descriptor.clone(), method.clone()))
            })
            .collect()
    }
}

/// Catalog manifest (catalog.toml structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogManifest {
    #[serde(default)]
    pub modules: Vec<ModuleManifest>,
}

/// One module of a catalog manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Module name
    pub name: ModuleRef,
    #[serde(default)]
    pub types: Vec<TypeManifest>,
}

/// One type of a catalog manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeManifest {
    /// Type name
    pub name: String,
    /// Namespace (defaults to the module name)
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub markers: Vec<TypeMarker>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}
