//! Capability predicates over metadata.
//!
//! Plain functions, one question each. The registry lifts them into filters.

use crate::model::{Annotations, Method, Relations, Type, TypeKind, Variable};
use crate::node::Typed;

pub fn is_computed(var: &Variable) -> bool {
    var.is_computed && !var.is_static
}

pub fn is_stored(var: &Variable) -> bool {
    !var.is_computed && !var.is_static
}

pub fn is_tuple(var: &Variable) -> bool {
    var.is_tuple()
}

pub fn is_initializer(method: &Method) -> bool {
    method.is_initializer
}

pub fn type_is_class(ty: &Type) -> bool {
    ty.kind == TypeKind::Class
}

pub fn method_is_class(method: &Method) -> bool {
    method.is_class
}

pub fn variable_is_static(var: &Variable) -> bool {
    var.is_static
}

pub fn method_is_static(method: &Method) -> bool {
    method.is_static
}

pub fn variable_is_instance(var: &Variable) -> bool {
    !var.is_static
}

/// Class-scoped methods are not instance methods either.
pub fn method_is_instance(method: &Method) -> bool {
    !(method.is_static || method.is_class)
}

pub fn is_enum(ty: &Type) -> bool {
    ty.kind == TypeKind::Enum
}

pub fn is_struct(ty: &Type) -> bool {
    ty.kind == TypeKind::Struct
}

pub fn is_protocol(ty: &Type) -> bool {
    ty.kind == TypeKind::Protocol
}

/// Which relationship map of a type to look into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Based,
    Implements,
    Inherits,
}

impl Relation {
    pub fn of(self, ty: &Type) -> &Relations {
        match self {
            Relation::Based => &ty.based,
            Relation::Implements => &ty.implements,
            Relation::Inherits => &ty.inherits,
        }
    }

    pub fn holds(self, ty: &Type, name: &str) -> bool {
        self.of(ty).contains_key(name)
    }

    /// Looks through a typed declaration to its type. Unresolved types relate to nothing.
    pub fn holds_for_typed(self, typed: &Typed, name: &str) -> bool {
        typed.ty().is_some_and(|ty| self.holds(ty, name))
    }
}

/// Tests an annotation query against a declaration's annotations.
///
/// `"key"` checks that the key is present. `"key=value"` splits on the first `=`, trims
/// both sides, and checks that the annotation renders exactly as `value`.
pub fn is_annotated_with(annotations: &Annotations, query: &str) -> bool {
    match query.split_once('=') {
        Some((key, expected)) => annotations
            .get(key.trim())
            .is_some_and(|value| value.to_string() == expected.trim()),
        None => annotations.contains_key(query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationValue, TypeGraph};

    fn var(computed: bool, is_static: bool) -> Variable {
        let mut var = Variable::new("v", "Int");
        var.is_computed = computed;
        var.is_static = is_static;
        var
    }

    #[test]
    fn test_computed_and_stored_exclude_static() {
        assert!(is_computed(&var(true, false)));
        assert!(!is_computed(&var(true, true)));
        assert!(is_stored(&var(false, false)));
        assert!(!is_stored(&var(false, true)));
        assert!(!is_stored(&var(true, false)));
    }

    #[test]
    fn test_tuple_follows_declared_type() {
        assert!(is_tuple(&Variable::new("pair", "(Int, String)")));
        assert!(is_tuple(&Variable::new("named", "(x: Int, y: Int)?")));
        assert!(!is_tuple(&Variable::new("count", "Int")));
        assert!(!is_tuple(&Variable::new("nothing", "()")));
    }

    #[test]
    fn test_method_scope() {
        let mut method = Method::new("make()");
        assert!(method_is_instance(&method));

        method.is_class = true;
        assert!(method_is_class(&method));
        assert!(!method_is_instance(&method));
        assert!(!method_is_static(&method));

        method.is_class = false;
        method.is_static = true;
        assert!(!method_is_instance(&method));
    }

    #[test]
    fn test_relations() {
        let mut ty = Type::new("Dog", TypeKind::Class);
        ty.based.insert("Animal".into(), "Animal".into());
        ty.inherits.insert("Animal".into(), "Animal".into());
        ty.implements.insert("Codable".into(), "Codable".into());

        assert!(Relation::Based.holds(&ty, "Animal"));
        assert!(Relation::Inherits.holds(&ty, "Animal"));
        assert!(!Relation::Implements.holds(&ty, "Animal"));
        assert!(Relation::Implements.holds(&ty, "Codable"));
    }

    #[test]
    fn test_relations_through_typed() {
        let mut dog = Type::new("Dog", TypeKind::Class);
        dog.implements.insert("Codable".into(), "Codable".into());
        let graph = TypeGraph::new(vec![dog]);

        let resolved = Typed {
            type_name: "Dog?".into(),
            resolved: graph.resolve("Dog?").cloned(),
        };
        let unresolved = Typed {
            type_name: "Cat".into(),
            resolved: None,
        };
        assert!(Relation::Implements.holds_for_typed(&resolved, "Codable"));
        assert!(!Relation::Implements.holds_for_typed(&unresolved, "Codable"));
    }

    #[test]
    fn test_annotated_key_presence() {
        let mut annotations = Annotations::new();
        annotations.insert("skip".into(), AnnotationValue::from(true));
        assert!(is_annotated_with(&annotations, "skip"));
        assert!(!is_annotated_with(&annotations, "role"));
    }

    #[test]
    fn test_annotated_key_value() {
        let mut annotations = Annotations::new();
        annotations.insert("role".into(), AnnotationValue::from("admin"));

        assert!(is_annotated_with(&annotations, "role=admin"));
        assert!(is_annotated_with(&annotations, " role = admin "));
        assert!(!is_annotated_with(&annotations, "role=user"));
        assert!(!is_annotated_with(&annotations, "role=admins"));
        assert!(!is_annotated_with(&annotations, "owner=admin"));
    }

    #[test]
    fn test_annotated_splits_on_first_equals_only() {
        let mut annotations = Annotations::new();
        annotations.insert("default".into(), AnnotationValue::from("a=b"));

        assert!(is_annotated_with(&annotations, "default=a=b"));
        assert!(!is_annotated_with(&annotations, "default=a"));
    }

    #[test]
    fn test_annotated_non_string_values() {
        let mut annotations = Annotations::new();
        annotations.insert("skip".into(), AnnotationValue::from(true));
        annotations.insert("limit".into(), AnnotationValue(serde_json::json!(3)));

        assert!(is_annotated_with(&annotations, "skip=true"));
        assert!(is_annotated_with(&annotations, "limit=3"));
    }
}
