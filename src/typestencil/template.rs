use crate::context::{build_context, Arguments};
use crate::error::Result;
use metafilter::model::TypeGraph;
use minijinja::Environment;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const INLINE_NAME: &str = "_inline";

/// Creates an environment with every metadata filter installed.
///
/// Trailing newlines are kept so generated files end the way their templates do.
pub fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    metafilter::install(&mut env);
    env
}

/// A compiled code-generation template.
pub struct StencilTemplate {
    env: Environment<'static>,
    name: String,
    source_path: Option<PathBuf>,
}

impl StencilTemplate {
    /// Reads and compiles a template file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let mut template = Self::compile(path.display().to_string(), source)?;
        template.source_path = Some(path.to_path_buf());
        Ok(template)
    }

    /// Compiles a template from source text.
    pub fn from_string(source: &str) -> Result<Self> {
        Self::compile(INLINE_NAME.to_string(), source.to_string())
    }

    fn compile(name: String, source: String) -> Result<Self> {
        let mut env = environment();
        env.add_template_owned(name.clone(), source)?;
        tracing::debug!(template = %name, "compiled template");
        Ok(Self {
            env,
            name,
            source_path: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file the template was read from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Renders the template against a type graph.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails, including filter argument errors and calls to
    /// unknown filters.
    pub fn render(&self, graph: &Arc<TypeGraph>, arguments: &Arguments) -> Result<String> {
        let tmpl = self.env.get_template(&self.name)?;
        Ok(tmpl.render(build_context(graph, arguments))?)
    }
}
