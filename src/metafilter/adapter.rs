//! Lifting typed predicates and transforms into filters.
//!
//! A filter receives whatever value is in scope. The adapters here let the function behind
//! it be written against one concrete [`Operand`] kind and take care of the rest:
//!
//! - the value is of that kind: the function is applied to it;
//! - the value is a collection: the function is applied to every element of that kind,
//!   keeping (for tests) or mapping (for transforms) them in order. Elements of other
//!   kinds are dropped;
//! - anything else passes through unchanged.
//!
//! [`either`] and [`either_with_arg`] do the same for two unrelated kinds. Each collection
//! element is classified on its own, so a sequence mixing both kinds is filtered correctly
//! and an empty sequence stays empty.

use crate::node::{elements, Operand};
use minijinja::Value;
use std::fmt;
use std::sync::Arc;

/// Result of testing one value: `None` when the value is not of the kind the test expects.
type CheckFn = dyn Fn(&Value, Option<&str>) -> Option<bool> + Send + Sync;

/// Result of transforming one value: `None` when the value is not of the expected kind,
/// `Some(None)` when the transform yields nothing for it.
type MapFn = dyn Fn(&Value) -> Option<Option<Value>> + Send + Sync;

/// How many template arguments a filter takes besides the value in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    None,
    /// Exactly one string argument.
    One,
}

/// Which side of a boolean test a filter reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Affirm,
    Negate,
}

impl Polarity {
    pub fn resolve(self, hit: bool) -> bool {
        match self {
            Polarity::Affirm => hit,
            Polarity::Negate => !hit,
        }
    }
}

/// A boolean predicate lifted over single values and collections.
#[derive(Clone)]
pub struct Test {
    arity: Arity,
    check: Arc<CheckFn>,
}

impl Test {
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Tests one value. `None` means the value is not of a kind this test understands.
    pub fn check(&self, value: &Value, arg: Option<&str>) -> Option<bool> {
        (self.check)(value, arg)
    }

    /// Applies the test to the value in scope.
    ///
    /// Scalars of a matching kind give a boolean. Collections give the elements of a
    /// matching kind for which the test, seen through `polarity`, holds.
    pub fn apply(&self, value: &Value, arg: Option<&str>, polarity: Polarity) -> Value {
        if let Some(hit) = self.check(value, arg) {
            return Value::from(polarity.resolve(hit));
        }
        match elements(value) {
            Some(items) => Value::from(
                items
                    .into_iter()
                    .filter(|item| {
                        self.check(item, arg)
                            .is_some_and(|hit| polarity.resolve(hit))
                    })
                    .collect::<Vec<_>>(),
            ),
            None => value.clone(),
        }
    }
}

impl fmt::Debug for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Test").field("arity", &self.arity).finish()
    }
}

/// A value transform lifted over single values and collections.
#[derive(Clone)]
pub struct Transform {
    map: Arc<MapFn>,
}

impl Transform {
    /// Applies the transform to the value in scope.
    ///
    /// A scalar for which the transform yields nothing becomes `none`; inside a collection
    /// such elements are dropped.
    pub fn apply(&self, value: &Value) -> Value {
        if let Some(mapped) = (self.map)(value) {
            return mapped.unwrap_or_else(|| Value::from(()));
        }
        match elements(value) {
            Some(items) => Value::from(
                items
                    .iter()
                    .filter_map(|item| (self.map)(item).flatten())
                    .collect::<Vec<_>>(),
            ),
            None => value.clone(),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform")
    }
}

/// Lifts a predicate over one kind.
pub fn test<T, F>(predicate: F) -> Test
where
    T: Operand,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    Test {
        arity: Arity::None,
        check: Arc::new(move |value: &Value, _: Option<&str>| {
            T::from_value(value).map(|operand| predicate(&operand))
        }),
    }
}

/// Lifts a predicate over one kind that takes a string argument from the call site.
pub fn test_with_arg<T, F>(predicate: F) -> Test
where
    T: Operand,
    F: Fn(&T, &str) -> bool + Send + Sync + 'static,
{
    Test {
        arity: Arity::One,
        check: Arc::new(move |value: &Value, arg: Option<&str>| {
            T::from_value(value).map(|operand| predicate(&operand, arg.unwrap_or_default()))
        }),
    }
}

/// Lifts a pair of predicates over two unrelated kinds into one test.
pub fn either<A, B, FA, FB>(first: FA, second: FB) -> Test
where
    A: Operand,
    B: Operand,
    FA: Fn(&A) -> bool + Send + Sync + 'static,
    FB: Fn(&B) -> bool + Send + Sync + 'static,
{
    Test {
        arity: Arity::None,
        check: Arc::new(move |value: &Value, _: Option<&str>| {
            A::from_value(value)
                .map(|a| first(&a))
                .or_else(|| B::from_value(value).map(|b| second(&b)))
        }),
    }
}

/// Argument-taking form of [`either`]; both predicates receive the same argument.
pub fn either_with_arg<A, B, FA, FB>(first: FA, second: FB) -> Test
where
    A: Operand,
    B: Operand,
    FA: Fn(&A, &str) -> bool + Send + Sync + 'static,
    FB: Fn(&B, &str) -> bool + Send + Sync + 'static,
{
    Test {
        arity: Arity::One,
        check: Arc::new(move |value: &Value, arg: Option<&str>| {
            let arg = arg.unwrap_or_default();
            A::from_value(value)
                .map(|a| first(&a, arg))
                .or_else(|| B::from_value(value).map(|b| second(&b, arg)))
        }),
    }
}

/// Lifts a transform over one kind. Returning `None` drops the element from collections.
pub fn transform<T, U, F>(map: F) -> Transform
where
    T: Operand,
    U: Into<Value>,
    F: Fn(&T) -> Option<U> + Send + Sync + 'static,
{
    Transform {
        map: Arc::new(move |value: &Value| -> Option<Option<Value>> {
            T::from_value(value).map(|operand| map(&operand).map(Into::into))
        }),
    }
}

/// Number of elements of a collection; any other value is returned as is.
pub fn count(value: &Value) -> Value {
    match elements(value) {
        Some(items) => Value::from(items.len()),
        None => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Type, TypeGraph, TypeKind, Variable};
    use crate::node::{Item, Node};

    fn graph() -> Arc<TypeGraph> {
        Arc::new(TypeGraph::new(vec![
            Type::new("Car", TypeKind::Class),
            Type::new("Point", TypeKind::Struct),
            Type::new("Color", TypeKind::Enum),
        ]))
    }

    fn variable(graph: &Arc<TypeGraph>, name: &str, is_static: bool) -> Value {
        let mut var = Variable::new(name, "Int");
        var.is_static = is_static;
        Node::new(graph.clone(), Item::Variable(Arc::new(var))).into_value()
    }

    fn names(value: &Value) -> Vec<String> {
        value.try_iter().unwrap().map(|v| v.to_string()).collect()
    }

    fn is_struct() -> Test {
        test(|ty: &Arc<Type>| ty.kind == TypeKind::Struct)
    }

    #[test]
    fn test_scalar_of_kind_gives_bool() {
        let graph = graph();
        let point = Node::ty(&graph, &graph.types()[1]);
        assert_eq!(is_struct().apply(&point, None, Polarity::Affirm), Value::from(true));
        assert_eq!(is_struct().apply(&point, None, Polarity::Negate), Value::from(false));
    }

    #[test]
    fn test_scalar_of_other_kind_passes_through() {
        let value = Value::from(42);
        assert_eq!(is_struct().apply(&value, None, Polarity::Affirm), value);
        let text = Value::from("Point");
        assert_eq!(is_struct().apply(&text, None, Polarity::Negate), text);
    }

    #[test]
    fn test_collection_keeps_matching_elements_in_order() {
        let graph = graph();
        let all = Value::from(Node::types(&graph));
        assert_eq!(names(&is_struct().apply(&all, None, Polarity::Affirm)), ["Point"]);
        assert_eq!(
            names(&is_struct().apply(&all, None, Polarity::Negate)),
            ["Car", "Color"]
        );
    }

    #[test]
    fn test_collection_drops_other_kinds() {
        let graph = graph();
        let mixed = Value::from(vec![
            Value::from("Point"),
            Node::ty(&graph, &graph.types()[1]),
            variable(&graph, "x", false),
            Value::from(1),
        ]);
        assert_eq!(names(&is_struct().apply(&mixed, None, Polarity::Affirm)), ["Point"]);
        assert!(names(&is_struct().apply(&mixed, None, Polarity::Negate)).is_empty());
    }

    #[test]
    fn test_either_classifies_each_element() {
        let graph = graph();
        let stat = either(
            |ty: &Arc<Type>| ty.is_class(),
            |var: &Arc<Variable>| var.is_static,
        );
        // First element is a variable; types further on must still be tested as types.
        let mixed = Value::from(vec![
            variable(&graph, "shared", true),
            Node::ty(&graph, &graph.types()[0]),
            variable(&graph, "local", false),
            Node::ty(&graph, &graph.types()[1]),
            Value::from("noise"),
        ]);
        assert_eq!(
            names(&stat.apply(&mixed, None, Polarity::Affirm)),
            ["shared", "Car"]
        );
        assert_eq!(
            names(&stat.apply(&mixed, None, Polarity::Negate)),
            ["local", "Point"]
        );
    }

    #[test]
    fn test_either_on_empty_collection() {
        let stat = either(|ty: &Arc<Type>| ty.is_class(), |var: &Arc<Variable>| var.is_static);
        let empty = Value::from(Vec::<Value>::new());
        assert_eq!(stat.apply(&empty, None, Polarity::Affirm).len(), Some(0));
    }

    #[test]
    fn test_with_arg_receives_argument() {
        let prefixed = test_with_arg(|s: &String, prefix: &str| s.starts_with(prefix));
        assert_eq!(prefixed.arity(), Arity::One);
        let words = Value::from(vec!["apple", "banana", "avocado"]);
        assert_eq!(
            names(&prefixed.apply(&words, Some("a"), Polarity::Affirm)),
            ["apple", "avocado"]
        );
    }

    #[test]
    fn test_transform_maps_and_drops() {
        let shout = transform(|s: &String| {
            if s.is_empty() {
                None
            } else {
                Some(s.to_uppercase())
            }
        });
        let mixed = Value::from(vec![Value::from("a"), Value::from(""), Value::from(3), Value::from("b")]);
        assert_eq!(names(&shout.apply(&mixed)), ["A", "B"]);
        assert_eq!(shout.apply(&Value::from("x")), Value::from("X"));
        assert!(shout.apply(&Value::from("")).is_none());
        assert_eq!(shout.apply(&Value::from(7)), Value::from(7));
    }

    #[test]
    fn test_count() {
        assert_eq!(count(&Value::from(vec![1, 2, 3])), Value::from(3));
        assert_eq!(count(&Value::from(Vec::<Value>::new())), Value::from(0));
        assert_eq!(count(&Value::from("abc")), Value::from("abc"));
        assert_eq!(count(&Value::from(9)), Value::from(9));
    }
}
