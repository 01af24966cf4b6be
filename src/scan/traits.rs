//! Scan system types and errors
//!
//! Defines the descriptors the discoverers operate on. Descriptors are opaque
//! to the discovery algorithms: whether a type is an effect or a method is a
//! reducer is answered by a [`MarkerInspector`](crate::scan::markers::MarkerInspector).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Path separator used in namespaces and Rust type paths
pub const PATH_SEPARATOR: &str = "::";

/// Reference to a scannable module (a crate or any other unit of types)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleRef(String);

impl ModuleRef {
    /// Create a module reference
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.0
    }

    /// A module reference with a blank name does not identify anything
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ModuleRef {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A module to scan, optionally narrowed to a namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanTarget {
    /// Module to enumerate
    pub module: ModuleRef,
    /// Namespace filter (`None` = whole module)
    #[serde(default)]
    pub namespace: Option<String>,
}

impl ScanTarget {
    /// Scan a whole module
    pub fn module(module: impl Into<ModuleRef>) -> Self {
        Self {
            module: module.into(),
            namespace: None,
        }
    }

    /// Scan one namespace (and its children) of a module
    pub fn namespace(module: impl Into<ModuleRef>, namespace: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            namespace: Some(namespace.into()),
        }
    }

    /// Whether a type declared in `module`/`namespace` falls under this target
    pub fn covers(&self, module: &ModuleRef, namespace: &str) -> bool {
        if &self.module != module {
            return false;
        }
        match &self.namespace {
            None => true,
            Some(filter) => {
                namespace == filter
                    || namespace
                        .strip_prefix(filter.as_str())
                        .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
            }
        }
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{} ({})", self.module, ns),
            None => write!(f, "{}", self.module),
        }
    }
}

/// Markers a type may declare
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeMarker {
    /// Implements the effect capability
    Effect,
    /// Generic adapter that wraps effect methods; infrastructure, never a user effect
    EffectAdapter,
}

/// Descriptor of a candidate type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Declaring module
    pub module: ModuleRef,
    /// Namespace within the module (`::`-separated, may be empty)
    #[serde(default)]
    pub namespace: String,
    /// Type name
    pub name: String,
    /// Abstract types cannot be instantiated by the container
    #[serde(default)]
    pub is_abstract: bool,
    /// Declared markers
    #[serde(default)]
    pub markers: BTreeSet<TypeMarker>,
}

impl TypeDescriptor {
    /// Create a concrete type descriptor with no markers
    pub fn new(
        module: impl Into<ModuleRef>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            namespace: namespace.into(),
            name: name.into(),
            is_abstract: false,
            markers: BTreeSet::new(),
        }
    }

    /// Describe a Rust type from its path
    ///
    /// `my_app::store::Logging<u8>` becomes module `my_app`, namespace
    /// `my_app::store`, name `Logging<u8>`. Each instantiation of a generic
    /// type is a distinct descriptor.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_type_path(std::any::type_name::<T>())
    }

    /// Describe a type from a `::`-separated path
    ///
    /// Leading `&` and `&mut` are dropped. Tuples, arrays and slices have no
    /// module or namespace; their whole path becomes the name.
    pub fn from_type_path(path: &str) -> Self {
        let path = path
            .trim_start_matches('&')
            .trim_start_matches("mut ")
            .trim_start();
        if path.starts_with(|c: char| c == '(' || c == '[') {
            return Self::new("", "", path);
        }

        // Generic arguments carry their own paths; only the outer path is split
        let (outer, generics) = path.split_at(path.find('<').unwrap_or(path.len()));
        let (namespace, name) = outer.rsplit_once(PATH_SEPARATOR).unwrap_or(("", outer));
        let module = namespace.split(PATH_SEPARATOR).next().unwrap_or_default();
        Self::new(module, namespace, format!("{}{}", name, generics))
    }

    /// Mark the type as abstract
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Declare a marker
    pub fn with_marker(mut self, marker: TypeMarker) -> Self {
        self.markers.insert(marker);
        self
    }

    /// Whether the marker is declared
    pub fn has_marker(&self, marker: &TypeMarker) -> bool {
        self.markers.contains(marker)
    }

    /// Fully qualified name (`namespace::name`)
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}{}{}", self.namespace, PATH_SEPARATOR, self.name)
        }
    }

    /// Scan target covering exactly this type's module and namespace
    pub fn scan_target(&self) -> ScanTarget {
        if self.namespace.is_empty() {
            ScanTarget::module(self.module.clone())
        } else {
            ScanTarget::namespace(self.module.clone(), self.namespace.clone())
        }
    }
}

// Identity is (module, namespace, name); flags and markers are metadata
impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.module == other.module && self.namespace == other.namespace && self.name == other.name
    }
}

impl Eq for TypeDescriptor {}

impl std::hash::Hash for TypeDescriptor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.module.hash(state);
        self.namespace.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// Metadata carried by a reducer method marker
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReducerMarker {
    /// Action type the reducer handles when it is not implied by the signature
    #[serde(default)]
    pub action_type: Option<String>,
}

impl ReducerMarker {
    /// Marker handling the given action type
    pub fn for_action(action_type: impl Into<String>) -> Self {
        Self {
            action_type: Some(action_type.into()),
        }
    }
}

/// Attributes a method may declare
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MethodAttribute {
    /// Reducer method marker
    Reducer(ReducerMarker),
    /// Any attribute the scanner does not interpret
    Other { name: String },
}

/// Descriptor of a candidate method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method name
    pub name: String,
    /// Attributes declared directly on the method
    #[serde(default)]
    pub attributes: Vec<MethodAttribute>,
}

impl MethodDescriptor {
    /// Method without attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Method tagged as a reducer
    pub fn reducer(name: impl Into<String>, marker: ReducerMarker) -> Self {
        Self::new(name).with_attribute(MethodAttribute::Reducer(marker))
    }

    /// Declare an attribute
    pub fn with_attribute(mut self, attribute: MethodAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// A method together with the type it is declared on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMethod {
    /// Host type
    pub host: TypeDescriptor,
    /// Method
    pub method: MethodDescriptor,
}

impl TypeMethod {
    /// Pair a method with its host type
    pub fn new(host: TypeDescriptor, method: MethodDescriptor) -> Self {
        Self { host, method }
    }
}

/// Scan system errors
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Service already registered: {0}")]
    DuplicateRegistration(String),

    #[error("Service registration failed: {0}")]
    Registration(String),

    #[error("Invalid catalog manifest: {0}")]
    InvalidManifest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for ScanError {
    fn from(e: toml::de::Error) -> Self {
        ScanError::InvalidManifest(e.to_string())
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(e: serde_json::Error) -> Self {
        ScanError::Config(e.to_string())
    }
}
