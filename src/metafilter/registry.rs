//! The named filter table.
//!
//! A [`FilterTable`] is built once through [`FilterTableBuilder`] and never changes
//! afterwards. Boolean filters are stored as a single record; the negated filter `!name`
//! is served from that same record with [`Polarity::Negate`], so a filter and its negation
//! cannot disagree about which values they understand.
//!
//! Installing a table into a minijinja environment registers every name, plus a `not_name`
//! alias for each negation since `!` cannot appear in a template filter identifier.

use crate::adapter::{self, Arity, Polarity, Test, Transform};
use crate::casing;
use crate::model::{Method, Type, Variable};
use crate::node::{Annotated, Typed};
use crate::predicates::{self, Relation};
use minijinja::value::{Rest, Value};
use minijinja::{Environment, Error, ErrorKind};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Prefix under which the negation of a boolean filter is looked up.
pub const NEGATION_PREFIX: &str = "!";

/// Prefix of the negation aliases installed into template environments.
pub const NEGATION_ALIAS_PREFIX: &str = "not_";

#[derive(Debug, Clone)]
enum Entry {
    Map(Transform),
    Test(Test),
    Count,
}

#[derive(Debug, Clone)]
enum Body {
    Map(Transform),
    Test(Test, Polarity),
    Count,
}

/// A callable filter resolved from a [`FilterTable`].
#[derive(Debug, Clone)]
pub struct Filter {
    name: String,
    body: Body,
}

impl Filter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        match &self.body {
            Body::Test(test, _) => test.arity(),
            Body::Map(_) | Body::Count => Arity::None,
        }
    }

    pub fn is_negation(&self) -> bool {
        matches!(self.body, Body::Test(_, Polarity::Negate))
    }

    /// Calls the filter with the value in scope and the arguments from the call site.
    ///
    /// # Errors
    ///
    /// Argument-taking filters fail with [`ErrorKind::SyntaxError`] unless given exactly
    /// one string argument. Other filters fail with [`ErrorKind::TooManyArguments`] when
    /// given any argument. Values of an unexpected kind are never an error.
    pub fn apply(&self, value: &Value, args: &[Value]) -> Result<Value, Error> {
        let arg = self.argument(args)?;
        Ok(match &self.body {
            Body::Map(transform) => transform.apply(value),
            Body::Test(test, polarity) => test.apply(value, arg, *polarity),
            Body::Count => adapter::count(value),
        })
    }

    fn argument<'a>(&self, args: &'a [Value]) -> Result<Option<&'a str>, Error> {
        match self.arity() {
            Arity::None if args.is_empty() => Ok(None),
            Arity::None => Err(Error::new(
                ErrorKind::TooManyArguments,
                format!("'{}' filter takes no arguments", self.name),
            )),
            Arity::One => match args {
                [arg] => arg.as_str().map(Some).ok_or_else(|| self.argument_error()),
                _ => Err(self.argument_error()),
            },
        }
    }

    fn argument_error(&self) -> Error {
        Error::new(
            ErrorKind::SyntaxError,
            format!("'{}' filter takes a single String argument", self.name),
        )
    }
}

/// Immutable mapping from filter names to filters.
#[derive(Debug, Clone, Default)]
pub struct FilterTable {
    entries: BTreeMap<String, Entry>,
}

impl FilterTable {
    pub fn builder() -> FilterTableBuilder {
        FilterTableBuilder::new()
    }

    /// Resolves a filter by name. `!name` resolves to the negation of boolean filter `name`.
    pub fn lookup(&self, name: &str) -> Option<Filter> {
        if let Some(base) = name.strip_prefix(NEGATION_PREFIX) {
            return match self.entries.get(base)? {
                Entry::Test(test) => Some(Filter {
                    name: name.to_string(),
                    body: Body::Test(test.clone(), Polarity::Negate),
                }),
                Entry::Map(_) | Entry::Count => None,
            };
        }
        let body = match self.entries.get(name)? {
            Entry::Map(transform) => Body::Map(transform.clone()),
            Entry::Test(test) => Body::Test(test.clone(), Polarity::Affirm),
            Entry::Count => Body::Count,
        };
        Some(Filter {
            name: name.to_string(),
            body,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Calls a filter by name.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::UnknownFilter`] for names not in the table, otherwise whatever
    /// [`Filter::apply`] reports.
    pub fn apply(&self, name: &str, value: &Value, args: &[Value]) -> Result<Value, Error> {
        let filter = self.lookup(name).ok_or_else(|| {
            Error::new(ErrorKind::UnknownFilter, format!("unknown filter '{}'", name))
        })?;
        filter.apply(value, args)
    }

    /// Every filter name, negations included, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .flat_map(|(name, entry)| {
                let negation = match entry {
                    Entry::Test(_) => Some(format!("{}{}", NEGATION_PREFIX, name)),
                    Entry::Map(_) | Entry::Count => None,
                };
                std::iter::once(name.clone()).chain(negation)
            })
            .collect();
        names.sort();
        names
    }

    /// Every filter, negations included, in name order.
    pub fn filters(&self) -> Vec<Filter> {
        self.names()
            .iter()
            .filter_map(|name| self.lookup(name))
            .collect()
    }

    /// Number of callable filters, negations included.
    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers every filter of the table on a minijinja environment.
    ///
    /// Existing filters with the same names (including minijinja's builtin `count`) are
    /// replaced.
    pub fn install(&self, env: &mut Environment<'_>) {
        for filter in self.filters() {
            if filter.is_negation() {
                let alias = format!(
                    "{}{}",
                    NEGATION_ALIAS_PREFIX,
                    &filter.name()[NEGATION_PREFIX.len()..]
                );
                register(env, alias, filter.clone());
            }
            register(env, filter.name().to_string(), filter);
        }
        tracing::debug!(filters = self.len(), "installed filter table");
    }
}

fn register(env: &mut Environment<'_>, name: String, filter: Filter) {
    env.add_filter(name, move |value: Value, args: Rest<Value>| {
        filter.apply(&value, &args.0)
    });
}

/// Collects filters and freezes them into a [`FilterTable`].
///
/// Registering a name twice replaces the earlier filter.
#[derive(Debug, Default)]
pub struct FilterTableBuilder {
    entries: BTreeMap<String, Entry>,
}

impl FilterTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value transform.
    pub fn transform(self, name: &str, transform: Transform) -> Self {
        self.insert(name, Entry::Map(transform))
    }

    /// Adds a boolean filter; its negation becomes available as `!name`.
    pub fn test(self, name: &str, test: Test) -> Self {
        self.insert(name, Entry::Test(test))
    }

    /// Adds the collection-size filter.
    pub fn count(self, name: &str) -> Self {
        self.insert(name, Entry::Count)
    }

    fn insert(mut self, name: &str, entry: Entry) -> Self {
        if name.is_empty() || name.starts_with(NEGATION_PREFIX) {
            tracing::warn!(name, "ignoring filter with reserved name");
            return self;
        }
        self.entries.insert(name.to_string(), entry);
        self
    }

    pub fn build(self) -> FilterTable {
        let table = FilterTable {
            entries: self.entries,
        };
        tracing::debug!(filters = table.len(), "built filter table");
        table
    }
}

/// Builds the standard filter set: casing, capability, structural and annotation filters.
pub fn standard() -> FilterTable {
    use adapter::{either, test, test_with_arg, transform};

    FilterTable::builder()
        // strings
        .transform("upperFirst", transform(|s: &String| Some(casing::upper_first(s))))
        .transform("camelCased", transform(|s: &String| Some(casing::camel_cased(s))))
        .transform("PascalCased", transform(|s: &String| Some(casing::pascal_cased(s))))
        .transform("snake_cased", transform(|s: &String| Some(casing::snake_cased(s))))
        .transform(
            "dottedNameToCamelCased",
            transform(|s: &String| Some(casing::dotted_name_to_camel_cased(s))),
        )
        .transform("undotted", transform(|s: &String| Some(casing::undotted(s))))
        .test("contains", test_with_arg(|s: &String, part: &str| s.contains(part)))
        .test("hasPrefix", test_with_arg(|s: &String, prefix: &str| s.starts_with(prefix)))
        .test("hasSuffix", test_with_arg(|s: &String, suffix: &str| s.ends_with(suffix)))
        .count("count")
        // variables
        .test("computed", test(|v: &Arc<Variable>| predicates::is_computed(v)))
        .test("stored", test(|v: &Arc<Variable>| predicates::is_stored(v)))
        .test("tuple", test(|v: &Arc<Variable>| predicates::is_tuple(v)))
        // methods
        .test("initializer", test(|m: &Arc<Method>| predicates::is_initializer(m)))
        // types
        .test("enum", test(|t: &Arc<Type>| predicates::is_enum(t)))
        .test("struct", test(|t: &Arc<Type>| predicates::is_struct(t)))
        .test("protocol", test(|t: &Arc<Type>| predicates::is_protocol(t)))
        // two kinds
        .test(
            "class",
            either(
                |t: &Arc<Type>| predicates::type_is_class(t),
                |m: &Arc<Method>| predicates::method_is_class(m),
            ),
        )
        .test(
            "static",
            either(
                |v: &Arc<Variable>| predicates::variable_is_static(v),
                |m: &Arc<Method>| predicates::method_is_static(m),
            ),
        )
        .test(
            "instance",
            either(
                |v: &Arc<Variable>| predicates::variable_is_instance(v),
                |m: &Arc<Method>| predicates::method_is_instance(m),
            ),
        )
        .test("based", relation(Relation::Based))
        .test("implements", relation(Relation::Implements))
        .test("inherits", relation(Relation::Inherits))
        // annotations
        .test(
            "annotated",
            test_with_arg(|a: &Annotated, query: &str| {
                predicates::is_annotated_with(a.annotations(), query)
            }),
        )
        .build()
}

/// A relationship test that applies to a type directly, or to a typed declaration through
/// its resolved type.
fn relation(relation: Relation) -> Test {
    adapter::either_with_arg(
        move |t: &Arc<Type>, name: &str| relation.holds(t, name),
        move |t: &Typed, name: &str| relation.holds_for_typed(t, name),
    )
}

static STANDARD: Lazy<FilterTable> = Lazy::new(standard);

/// The process-wide standard filter table, built on first use.
pub fn standard_filters() -> &'static FilterTable {
    &STANDARD
}
