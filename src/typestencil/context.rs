//! The values a template is rendered with.
//!
//! Three names are visible at the top level of every template:
//!
//! - `types`: the [`Types`] view (`types.all`, `types.classes`, `types.implementing.Codable`, ...)
//! - `type`: every type by name (`type.User`)
//! - `argument`: user-supplied values from config and command line

use metafilter::model::{Type, TypeGraph, TypeKind};
use metafilter::node::Node;
use metafilter::predicates::Relation;
use minijinja::value::{Enumerator, Object, ObjectRepr, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Named values passed through to templates as `argument`.
pub type Arguments = BTreeMap<String, serde_json::Value>;

const TYPES_KEYS: &[&str] = &[
    "all",
    "classes",
    "structs",
    "enums",
    "protocols",
    "based",
    "implementing",
    "inheriting",
];

/// Views over every type of a graph, grouped by kind and by relationship.
#[derive(Debug)]
pub struct Types {
    graph: Arc<TypeGraph>,
}

impl Types {
    pub fn new(graph: Arc<TypeGraph>) -> Self {
        Self { graph }
    }

    fn of_kind(&self, kind: TypeKind) -> Value {
        self.collect(|ty| ty.kind == kind)
    }

    fn collect(&self, keep: impl Fn(&Type) -> bool) -> Value {
        Value::from(
            self.graph
                .types()
                .iter()
                .filter(|ty| keep(ty))
                .map(|ty| Node::ty(&self.graph, ty))
                .collect::<Vec<_>>(),
        )
    }

    /// Maps each related name to the types that hold it, in declaration order.
    fn grouped(&self, relation: Relation) -> Value {
        let mut groups: BTreeMap<&str, Vec<Value>> = BTreeMap::new();
        for ty in self.graph.types() {
            for name in relation.of(ty).keys() {
                groups
                    .entry(name.as_str())
                    .or_default()
                    .push(Node::ty(&self.graph, ty));
            }
        }
        Value::from_iter(
            groups
                .into_iter()
                .map(|(name, types)| (name.to_string(), Value::from(types))),
        )
    }
}

impl Object for Types {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Map
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        Some(match key.as_str()? {
            "all" => self.collect(|_| true),
            "classes" => self.of_kind(TypeKind::Class),
            "structs" => self.of_kind(TypeKind::Struct),
            "enums" => self.of_kind(TypeKind::Enum),
            "protocols" => self.of_kind(TypeKind::Protocol),
            "based" => self.grouped(Relation::Based),
            "implementing" => self.grouped(Relation::Implements),
            "inheriting" => self.grouped(Relation::Inherits),
            _ => return None,
        })
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Str(TYPES_KEYS)
    }
}

/// Builds the top-level template context for a graph.
pub fn build_context(graph: &Arc<TypeGraph>, arguments: &Arguments) -> Value {
    let by_name = Value::from_iter(
        graph
            .types()
            .iter()
            .map(|ty| (ty.name.clone(), Node::ty(graph, ty))),
    );
    Value::from_iter([
        ("types", Value::from_object(Types::new(graph.clone()))),
        ("type", by_name),
        ("argument", Value::from_serialize(arguments)),
    ])
}
