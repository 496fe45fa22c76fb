use crate::context::Arguments;
use crate::error::{Result, StencilError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "typestencil.json";
const DEFAULT_OUTPUT_EXT: &str = "swift";

/// Configuration for a generation run, stored in typestencil.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StencilConfig {
    /// JSON file describing the type graph
    #[serde(default)]
    pub types: Option<PathBuf>,

    /// Template files, or directories scanned for `*.stencil` files
    #[serde(default)]
    pub templates: Vec<PathBuf>,

    /// Directory generated files are written to
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Extension of generated files, without the dot
    #[serde(default = "default_output_ext")]
    pub output_ext: String,

    /// Prefix generated files with a "do not edit" header
    #[serde(default = "default_header")]
    pub header: bool,

    /// Values exposed to templates as `argument`
    #[serde(default)]
    pub arguments: Arguments,
}

fn default_output_ext() -> String {
    DEFAULT_OUTPUT_EXT.to_string()
}

fn default_header() -> bool {
    true
}

impl Default for StencilConfig {
    fn default() -> Self {
        Self {
            types: None,
            templates: Vec::new(),
            output: None,
            output_ext: default_output_ext(),
            header: default_header(),
            arguments: Arguments::new(),
        }
    }
}

impl StencilConfig {
    /// Load config from the given directory, or return defaults if not found.
    ///
    /// Relative paths in the file are taken relative to that directory.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref();
        let config_path = config_dir.join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(StencilError::Io)?;
        let config: StencilConfig = serde_json::from_str(&content).map_err(|e| {
            StencilError::Config(format!("{}: {}", config_path.display(), e))
        })?;
        tracing::debug!(path = %config_path.display(), "loaded config");
        Ok(config.relative_to(config_dir))
    }

    fn relative_to(mut self, dir: &Path) -> Self {
        let anchor = |path: PathBuf| {
            if path.is_relative() {
                dir.join(path)
            } else {
                path
            }
        };
        self.types = self.types.map(anchor);
        self.output = self.output.map(anchor);
        self.templates = self.templates.into_iter().map(anchor).collect();
        self
    }

    /// Set the output extension (normalizes away a leading dot)
    pub fn set_output_ext(&mut self, ext: &str) {
        self.output_ext = ext.trim_start_matches('.').to_string();
    }
}
