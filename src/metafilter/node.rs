//! Metadata as template values.
//!
//! Every declaration a template can see is wrapped in a [`Node`]: a closed tagged union of
//! the metadata kinds plus a handle on the [`TypeGraph`] it came from, so typed declarations
//! can resolve their type lazily. Nodes are minijinja objects; templates read their
//! attributes (`{{ variable.type_name }}`) and they render as their name.
//!
//! Filters do not work on `Value`s directly. They name the kind they expect through the
//! [`Operand`] trait, and the adapters extract that kind from each value they see.

use crate::model::{Annotations, Method, MethodParameter, Type, TypeGraph, Variable};
use minijinja::value::{Enumerator, Object, ObjectRepr, Value, ValueKind};
use std::fmt;
use std::sync::Arc;

/// The metadata kinds a [`Node`] can hold.
#[derive(Debug, Clone)]
pub enum Item {
    Type(Arc<Type>),
    Variable(Arc<Variable>),
    Method(Arc<Method>),
    Parameter(Arc<MethodParameter>),
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Type(ty) => &ty.name,
            Item::Variable(var) => &var.name,
            Item::Method(method) => &method.name,
            Item::Parameter(param) => &param.name,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Item::Type(ty) => ty.kind.as_str(),
            Item::Variable(_) => "variable",
            Item::Method(_) => "method",
            Item::Parameter(_) => "parameter",
        }
    }

    pub fn annotations(&self) -> &Annotations {
        match self {
            Item::Type(ty) => &ty.annotations,
            Item::Variable(var) => &var.annotations,
            Item::Method(method) => &method.annotations,
            Item::Parameter(param) => &param.annotations,
        }
    }
}

/// A metadata declaration bound to the graph it belongs to.
#[derive(Clone)]
pub struct Node {
    graph: Arc<TypeGraph>,
    item: Item,
}

const TYPE_KEYS: &[&str] = &[
    "name",
    "kind",
    "module",
    "based",
    "inherits",
    "implements",
    "variables",
    "methods",
    "annotations",
];
const VARIABLE_KEYS: &[&str] = &[
    "name",
    "kind",
    "type_name",
    "type",
    "is_computed",
    "is_static",
    "is_tuple",
    "annotations",
];
const METHOD_KEYS: &[&str] = &[
    "name",
    "kind",
    "selector_name",
    "return_type_name",
    "return_type",
    "parameters",
    "is_initializer",
    "is_static",
    "is_class",
    "annotations",
];
const PARAMETER_KEYS: &[&str] = &["name", "kind", "type_name", "type", "annotations"];

impl Node {
    pub fn new(graph: Arc<TypeGraph>, item: Item) -> Self {
        Self { graph, item }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn graph(&self) -> &Arc<TypeGraph> {
        &self.graph
    }

    pub fn name(&self) -> &str {
        self.item.name()
    }

    /// Wraps this node into a template value.
    pub fn into_value(self) -> Value {
        Value::from_object(self)
    }

    /// Every type of the graph, in declaration order, as template values.
    pub fn types(graph: &Arc<TypeGraph>) -> Vec<Value> {
        graph
            .types()
            .iter()
            .map(|ty| Self::ty(graph, ty))
            .collect()
    }

    pub fn ty(graph: &Arc<TypeGraph>, ty: &Arc<Type>) -> Value {
        Node::new(graph.clone(), Item::Type(ty.clone())).into_value()
    }

    fn child(&self, item: Item) -> Value {
        Node::new(self.graph.clone(), item).into_value()
    }

    fn resolved(&self, type_name: &str) -> Value {
        match self.graph.resolve(type_name) {
            Some(ty) => Self::ty(&self.graph, ty),
            None => Value::from(()),
        }
    }

    fn attribute(&self, key: &str) -> Option<Value> {
        if key == "name" {
            return Some(Value::from(self.name()));
        }
        if key == "kind" {
            return Some(Value::from(self.item.kind_name()));
        }
        if key == "annotations" {
            return Some(Value::from_serialize(self.item.annotations()));
        }
        match &self.item {
            Item::Type(ty) => match key {
                "module" => Some(Value::from(ty.module.clone())),
                "based" => Some(Value::from_serialize(&ty.based)),
                "inherits" => Some(Value::from_serialize(&ty.inherits)),
                "implements" => Some(Value::from_serialize(&ty.implements)),
                "variables" => Some(Value::from(
                    ty.variables
                        .iter()
                        .map(|var| self.child(Item::Variable(var.clone())))
                        .collect::<Vec<_>>(),
                )),
                "methods" => Some(Value::from(
                    ty.methods
                        .iter()
                        .map(|method| self.child(Item::Method(method.clone())))
                        .collect::<Vec<_>>(),
                )),
                _ => None,
            },
            Item::Variable(var) => match key {
                "type_name" => Some(Value::from(var.type_name.as_str())),
                "type" => Some(self.resolved(&var.type_name)),
                "is_computed" => Some(Value::from(var.is_computed)),
                "is_static" => Some(Value::from(var.is_static)),
                "is_tuple" => Some(Value::from(var.is_tuple())),
                _ => None,
            },
            Item::Method(method) => match key {
                "selector_name" => Some(Value::from(method.selector_name.clone())),
                "return_type_name" => Some(Value::from(method.return_type_name.as_str())),
                "return_type" => Some(self.resolved(&method.return_type_name)),
                "parameters" => Some(Value::from(
                    method
                        .parameters
                        .iter()
                        .map(|param| self.child(Item::Parameter(param.clone())))
                        .collect::<Vec<_>>(),
                )),
                "is_initializer" => Some(Value::from(method.is_initializer)),
                "is_static" => Some(Value::from(method.is_static)),
                "is_class" => Some(Value::from(method.is_class)),
                _ => None,
            },
            Item::Parameter(param) => match key {
                "type_name" => Some(Value::from(param.type_name.as_str())),
                "type" => Some(self.resolved(&param.type_name)),
                _ => None,
            },
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.item.kind_name(), self.name())
    }
}

impl Object for Node {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Map
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        self.attribute(key.as_str()?)
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Str(match self.item {
            Item::Type(_) => TYPE_KEYS,
            Item::Variable(_) => VARIABLE_KEYS,
            Item::Method(_) => METHOD_KEYS,
            Item::Parameter(_) => PARAMETER_KEYS,
        })
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the elements of a collection value, or `None` when the value is not a collection.
///
/// Strings and metadata nodes are never collections here, even though minijinja can iterate
/// over both.
pub fn elements(value: &Value) -> Option<Vec<Value>> {
    match value.kind() {
        ValueKind::Seq | ValueKind::Iterable => value.try_iter().ok().map(Iterator::collect),
        _ => None,
    }
}

/// A concrete kind a filter can operate on.
///
/// `from_value` returns `None` for values of any other kind; adapters use that to pass
/// scalars through unchanged and to drop collection elements.
pub trait Operand: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

fn node_item(value: &Value) -> Option<&Item> {
    value.downcast_object_ref::<Node>().map(Node::item)
}

impl Operand for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl Operand for Arc<Type> {
    fn from_value(value: &Value) -> Option<Self> {
        match node_item(value)? {
            Item::Type(ty) => Some(ty.clone()),
            _ => None,
        }
    }
}

impl Operand for Arc<Variable> {
    fn from_value(value: &Value) -> Option<Self> {
        match node_item(value)? {
            Item::Variable(var) => Some(var.clone()),
            _ => None,
        }
    }
}

impl Operand for Arc<Method> {
    fn from_value(value: &Value) -> Option<Self> {
        match node_item(value)? {
            Item::Method(method) => Some(method.clone()),
            _ => None,
        }
    }
}

impl Operand for Arc<MethodParameter> {
    fn from_value(value: &Value) -> Option<Self> {
        match node_item(value)? {
            Item::Parameter(param) => Some(param.clone()),
            _ => None,
        }
    }
}

/// A declaration that has a type: a variable or a method parameter.
#[derive(Debug, Clone)]
pub struct Typed {
    pub type_name: String,
    /// The declared type, when the graph knows it.
    pub resolved: Option<Arc<Type>>,
}

impl Typed {
    pub fn ty(&self) -> Option<&Type> {
        self.resolved.as_deref()
    }
}

impl Operand for Typed {
    fn from_value(value: &Value) -> Option<Self> {
        let node = value.downcast_object_ref::<Node>()?;
        let type_name = match node.item() {
            Item::Variable(var) => &var.type_name,
            Item::Parameter(param) => &param.type_name,
            Item::Type(_) | Item::Method(_) => return None,
        };
        Some(Typed {
            type_name: type_name.clone(),
            resolved: node.graph().resolve(type_name).cloned(),
        })
    }
}

/// Any declaration that can carry annotations. Every metadata kind qualifies.
#[derive(Debug, Clone)]
pub struct Annotated(Node);

impl Annotated {
    pub fn annotations(&self) -> &Annotations {
        self.0.item().annotations()
    }
}

impl Operand for Annotated {
    fn from_value(value: &Value) -> Option<Self> {
        value.downcast_object_ref::<Node>().cloned().map(Annotated)
    }
}
