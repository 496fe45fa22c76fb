//! # Metafilter - Template Filters over Type Metadata
//!
//! Named, composable filters for code-generation templates that query reflected type
//! metadata: classes, structs, enums, protocols and their variables, methods and
//! parameters.
//!
//! ## The Problem
//!
//! A template author writes `{{ type.variables | computed }}` in one place and
//! `{% if variable | computed %}` in another. The same filter gets a collection in the
//! first case and a single declaration in the second, and sometimes a plain string or
//! number it knows nothing about. Writing every filter three times does not scale, and
//! every boolean filter also wants a negated twin.
//!
//! ## The Solution
//!
//! - **Predicates** are plain functions over one concrete kind ([`predicates`], [`casing`])
//! - **Adapters** lift them over single values and collections, dropping elements of
//!   other kinds and passing unknown values through ([`adapter`])
//! - **The filter table** names them and derives `!name` for every boolean filter from
//!   the same record ([`registry`])
//!
//! ## Quick Example
//!
//! ```rust
//! use metafilter::model::{Type, TypeGraph, TypeKind, Variable};
//! use metafilter::node::Node;
//! use minijinja::{context, Environment};
//! use std::sync::Arc;
//!
//! let mut user = Type::new("User", TypeKind::Struct);
//! let mut age = Variable::new("age", "Int");
//! age.is_computed = true;
//! user.variables = vec![Arc::new(age), Arc::new(Variable::new("name", "String"))];
//! let graph = Arc::new(TypeGraph::new(vec![user]));
//!
//! let mut env = Environment::new();
//! metafilter::install(&mut env);
//!
//! let out = env
//!     .render_str(
//!         "{% for t in types %}{{ t.variables | not_computed | join(',') }}{% endfor %}",
//!         context! { types => Node::types(&graph) },
//!     )
//!     .unwrap();
//! assert_eq!(out, "name");
//! ```
//!
//! ## Negation
//!
//! Every boolean filter `name` has a negation `!name`, available through
//! [`FilterTable::lookup`]. Template syntax does not allow `!` inside a filter name, so
//! [`FilterTable::install`] also registers it as `not_name`.

pub mod adapter;
pub mod casing;
pub mod model;
pub mod node;
pub mod predicates;
pub mod registry;

pub use model::{Type, TypeGraph, TypeKind};
pub use node::Node;
pub use registry::{standard_filters, Filter, FilterTable, FilterTableBuilder};

use minijinja::value::{Value, ValueKind};
use minijinja::{Environment, Error, Output, State};
use std::fmt::Write;

/// Installs the standard filters into an environment, along with [`format_value`] as its
/// formatter.
pub fn install(env: &mut Environment<'_>) {
    standard_filters().install(env);
    env.set_formatter(format_value);
}

/// Writes booleans as `true`/`false`, the spelling generated source code expects, and
/// everything else the way minijinja does by default.
pub fn format_value(out: &mut Output, state: &State, value: &Value) -> Result<(), Error> {
    if value.kind() == ValueKind::Bool {
        out.write_str(if value.is_true() { "true" } else { "false" })?;
        return Ok(());
    }
    minijinja::escape_formatter(out, state, value)
}
