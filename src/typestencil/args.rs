use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "typestencil", version)]
#[command(about = "Render code-generation templates against reflected type metadata", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding typestencil.json
    #[arg(short, long, global = true, default_value = ".")]
    pub config: PathBuf,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render templates and write generated files
    #[command(alias = "r")]
    Render {
        /// JSON file describing the types
        #[arg(short, long)]
        types: Option<PathBuf>,

        /// Template file or directory of *.stencil files (repeatable)
        #[arg(short = 'T', long = "template")]
        templates: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Extension of generated files (e.g. swift, .kt)
        #[arg(short, long)]
        ext: Option<String>,

        /// Template argument as key=value, or a bare key for true (repeatable)
        #[arg(short, long = "arg", value_name = "KEY[=VALUE]")]
        args: Vec<String>,

        /// Print rendered output instead of writing files
        #[arg(long)]
        stdout: bool,

        /// Leave out the generated-file header
        #[arg(long)]
        no_header: bool,
    },

    /// Compile templates and report syntax errors
    Check {
        /// Template file or directory of *.stencil files (repeatable)
        #[arg(short = 'T', long = "template")]
        templates: Vec<PathBuf>,
    },

    /// List every available filter, negations included
    Filters,
}

/// Parses a `--arg` value.
///
/// The value is read as JSON when it parses (`3`, `true`, `["a"]`), and kept as a string
/// otherwise. A bare key stands for `true`.
pub fn parse_argument(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = match raw.split_once('=') {
        Some((key, value)) => (
            key.trim(),
            serde_json::from_str(value)
                .unwrap_or_else(|_| serde_json::Value::String(value.to_string())),
        ),
        None => (raw.trim(), serde_json::Value::Bool(true)),
    };
    if key.is_empty() {
        return Err(format!("missing key in '{}'", raw));
    }
    Ok((key.to_string(), value))
}
