//! Generation runs: load the graph, render every template, write the results.
//!
//! Nothing here prints. Callers get back the list of [`Generated`] outputs and decide how
//! to report them.

use crate::config::StencilConfig;
use crate::context::Arguments;
use crate::error::{Result, StencilError};
use crate::template::StencilTemplate;
use metafilter::model::TypeGraph;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Extension of template files picked up from template directories.
pub const TEMPLATE_EXT: &str = "stencil";

/// Where rendered output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Directory(PathBuf),
    Stdout,
}

/// One rendered template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub template: PathBuf,
    /// The file written, or `None` when rendering to stdout.
    pub path: Option<PathBuf>,
    pub content: String,
}

/// Text put in front of every generated file when headers are enabled.
pub fn header() -> String {
    format!(
        "// Generated using typestencil {}\n// DO NOT EDIT\n\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Reads a type graph from a JSON file.
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<Arc<TypeGraph>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        StencilError::Config(format!("cannot read types from {}: {}", path.display(), e))
    })?;
    let graph = TypeGraph::from_json(&content)?;
    tracing::debug!(path = %path.display(), types = graph.len(), "loaded type graph");
    Ok(Arc::new(graph))
}

/// Expands template paths: files are taken as given, directories are searched recursively
/// for `*.stencil` files. The result is sorted and free of duplicates.
pub fn collect_templates(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_dir(path, &mut found)?;
        } else if path.is_file() {
            found.push(path.clone());
        } else {
            return Err(StencilError::Config(format!(
                "template not found: {}",
                path.display()
            )));
        }
    }
    found.sort();
    found.dedup();
    Ok(found)
}

fn collect_dir(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_dir(&path, found)?;
        } else if path.extension().is_some_and(|ext| ext == TEMPLATE_EXT) {
            found.push(path);
        }
    }
    Ok(())
}

/// `<output>/<stem>.generated.<ext>`
pub fn output_path(template: &Path, output_dir: &Path, ext: &str) -> PathBuf {
    let stem = template
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{}.generated.{}", stem, ext))
}

/// Renders templates against a graph without writing anything.
pub fn render_all(
    graph: &Arc<TypeGraph>,
    templates: &[PathBuf],
    arguments: &Arguments,
) -> Result<Vec<(PathBuf, String)>> {
    templates
        .iter()
        .map(|path| {
            let template = StencilTemplate::from_path(path)?;
            let content = template.render(graph, arguments)?;
            Ok((path.clone(), content))
        })
        .collect()
}

/// Runs a full generation as described by `config`.
pub fn run(config: &StencilConfig, destination: &Destination) -> Result<Vec<Generated>> {
    let types = config
        .types
        .as_ref()
        .ok_or_else(|| StencilError::Config("no types file given".to_string()))?;
    let templates = collect_templates(&config.templates)?;
    if templates.is_empty() {
        return Err(StencilError::Config("no templates found".to_string()));
    }

    let graph = load_graph(types)?;
    let rendered = render_all(&graph, &templates, &config.arguments)?;

    match destination {
        Destination::Stdout => Ok(rendered
            .into_iter()
            .map(|(template, content)| Generated {
                template,
                path: None,
                content,
            })
            .collect()),
        Destination::Directory(dir) => {
            fs::create_dir_all(dir)?;
            rendered
                .into_iter()
                .map(|(template, content)| {
                    let path = output_path(&template, dir, &config.output_ext);
                    let content = if config.header {
                        header() + &content
                    } else {
                        content
                    };
                    fs::write(&path, &content)?;
                    tracing::info!(
                        template = %template.display(),
                        output = %path.display(),
                        "generated"
                    );
                    Ok(Generated {
                        template,
                        path: Some(path),
                        content,
                    })
                })
                .collect()
        }
    }
}

/// Compiles every template without rendering. Returns the templates checked.
pub fn check(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let templates = collect_templates(paths)?;
    for path in &templates {
        StencilTemplate::from_path(path)?;
    }
    Ok(templates)
}
