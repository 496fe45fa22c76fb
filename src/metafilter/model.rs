//! The reflected type model that filters query.
//!
//! A [`TypeGraph`] is built once from already-parsed metadata (usually JSON produced by a
//! source scanner) and is read-only afterwards. Declarations refer to other types by name;
//! [`TypeGraph::resolve`] turns such a name back into the [`Type`] it designates.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Relationship map: related type name to the name as it was declared.
pub type Relations = BTreeMap<String, String>;

/// Annotations attached to a declaration, keyed by annotation name.
pub type Annotations = BTreeMap<String, AnnotationValue>;

/// The kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Struct,
    Enum,
    Protocol,
    Extension,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
            TypeKind::Protocol => "protocol",
            TypeKind::Extension => "extension",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An annotation value as found in source comments.
///
/// Its string representation is what `annotated("key=value")` compares against: strings
/// render raw, everything else renders as JSON text (`true`, `3`, `["a","b"]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationValue(pub serde_json::Value);

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        Self(serde_json::Value::String(value.to_string()))
    }
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        Self(serde_json::Value::Bool(value))
    }
}

/// A class, struct, enum, protocol or extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type {
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub module: Option<String>,
    /// Every name listed in the declaration's inheritance clause.
    #[serde(default)]
    pub based: Relations,
    /// Superclasses, transitively.
    #[serde(default)]
    pub inherits: Relations,
    /// Protocols, transitively.
    #[serde(default)]
    pub implements: Relations,
    #[serde(default)]
    pub variables: Vec<Arc<Variable>>,
    #[serde(default)]
    pub methods: Vec<Arc<Method>>,
    #[serde(default)]
    pub annotations: Annotations,
}

impl Type {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            module: None,
            based: Relations::new(),
            inherits: Relations::new(),
            implements: Relations::new(),
            variables: Vec::new(),
            methods: Vec::new(),
            annotations: Annotations::new(),
        }
    }

    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }
}

/// A property declared on a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub is_computed: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub annotations: Annotations,
}

impl Variable {
    /// Whether the declared type is a tuple, `(Int, Int)` or `(x: Int, y: Int)?`. The empty
    /// tuple `()` is `Void` and does not count.
    pub fn is_tuple(&self) -> bool {
        let type_name = self.type_name.trim();
        type_name.starts_with('(') && type_name != "()"
    }

    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_computed: false,
            is_static: false,
            annotations: Annotations::new(),
        }
    }
}

/// A method, initializer or function requirement declared on a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub selector_name: Option<String>,
    #[serde(default = "default_return_type")]
    pub return_type_name: String,
    #[serde(default)]
    pub parameters: Vec<Arc<MethodParameter>>,
    #[serde(default)]
    pub is_initializer: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_class: bool,
    #[serde(default)]
    pub annotations: Annotations,
}

fn default_return_type() -> String {
    "Void".to_string()
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector_name: None,
            return_type_name: default_return_type(),
            parameters: Vec::new(),
            is_initializer: false,
            is_static: false,
            is_class: false,
            annotations: Annotations::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodParameter {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub annotations: Annotations,
}

impl MethodParameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            annotations: Annotations::new(),
        }
    }
}

/// Accepted JSON layouts: a bare array of types, or `{ "types": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum GraphDocument {
    Bare(Vec<Type>),
    Wrapped { types: Vec<Type> },
}

/// All known types, in declaration order, indexed by name.
#[derive(Debug, Default)]
pub struct TypeGraph {
    types: Vec<Arc<Type>>,
    by_name: HashMap<String, usize>,
}

impl TypeGraph {
    /// Builds a graph. When two types share a name the later one wins lookups.
    pub fn new(types: Vec<Type>) -> Self {
        let types: Vec<Arc<Type>> = types.into_iter().map(Arc::new).collect();
        let by_name = types
            .iter()
            .enumerate()
            .map(|(idx, ty)| (ty.name.clone(), idx))
            .collect();
        Self { types, by_name }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let types = match serde_json::from_str(json)? {
            GraphDocument::Bare(types) => types,
            GraphDocument::Wrapped { types } => types,
        };
        Ok(Self::new(types))
    }

    pub fn types(&self) -> &[Arc<Type>] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Type>> {
        self.by_name.get(name).map(|idx| &self.types[*idx])
    }

    /// Resolves a declared type name, looking through optional markers (`Foo?`, `Foo!`).
    pub fn resolve(&self, type_name: &str) -> Option<&Arc<Type>> {
        let unwrapped = type_name.trim().trim_end_matches(['?', '!']);
        self.get(unwrapped)
    }
}
