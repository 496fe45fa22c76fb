//! # Typestencil Architecture
//!
//! Typestencil renders code-generation templates against reflected type metadata. The
//! filter layer lives in the `metafilter` crate; this crate is the thin application around
//! it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs, wired by main.rs)                      │
//! │  - Parses arguments, merges them over typestencil.json      │
//! │  - The ONLY place that prints or sets exit codes            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Generation (generate.rs, template.rs, context.rs)          │
//! │  - Loads the type graph, compiles and renders templates     │
//! │  - Writes generated files, returns what it did              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Filters (metafilter crate)                                 │
//! │  - Type model, template values, the named filter table      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`generate`]: Generation runs and template discovery
//! - [`template`]: Compiled templates with every filter installed
//! - [`context`]: The `types`, `type` and `argument` values templates see
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `args`: Argument parsing for the binary (not part of the lib API)

pub mod config;
pub mod context;
pub mod error;
pub mod generate;
pub mod template;
