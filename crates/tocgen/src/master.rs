//! Master index generation
//!
//! The live `index.rst` is rendered from a template by replacing the
//! placeholder token with one toctree line per top-level chapter. The
//! template itself is never modified, so every run starts from the same
//! input.

use crate::config::Config;
use crate::env::EnvContext;
use crate::errors::TocError;
use std::fs;
use std::path::{Path, PathBuf};

/// A top-level chapter linked from the master index
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    /// Folder name under the chapters root
    pub folder_name: String,
    pub title: String,
    pub order: u32,
}

/// Sort chapters by `(order, folder_name)`
pub fn sort_chapters(chapters: &mut [Chapter]) {
    chapters.sort_by(|a, b| (a.order, &a.folder_name).cmp(&(b.order, &b.folder_name)));
}

/// Toctree block for the chapters, as substituted into the template
///
/// The block starts and ends with a newline so it sits on lines of its own.
pub fn render_chapter_links(chapters_dir: &str, chapters: &[Chapter]) -> String {
    let lines: Vec<String> = chapters
        .iter()
        .map(|c| format!("   {}/{}/index", chapters_dir.trim_end_matches('/'), c.folder_name))
        .collect();

    format!("\n{}\n", lines.join("\n"))
}

/// Replace every occurrence of the placeholder
///
/// Returns `None` when the template does not contain it.
pub fn substitute_placeholder(template: &str, placeholder: &str, links: &str) -> Option<String> {
    if placeholder.is_empty() || !template.contains(placeholder) {
        return None;
    }
    Some(template.replace(placeholder, links))
}

/// Outcome of writing the master index
#[derive(Debug, Clone, PartialEq)]
pub struct MasterIndex {
    pub path: PathBuf,
    pub chapter_count: usize,
    /// Environment variables referenced by the template but not set
    pub missing_env: Vec<String>,
}

/// Render the template and write the live master index
///
/// `env` is applied to the template before substitution when given.
pub fn update_master_index(
    root: &Path,
    config: &Config,
    chapters: &[Chapter],
    env: Option<&EnvContext>,
) -> Result<MasterIndex, TocError> {
    let template_path = config.template_path(root);
    if !template_path.is_file() {
        return Err(TocError::MissingTemplate(template_path));
    }

    let template =
        fs::read_to_string(&template_path).map_err(|e| TocError::io(&template_path, e))?;

    let (template, missing_env) = match env {
        Some(env) => {
            let expansion = env.expand(&template);
            (expansion.text, expansion.missing)
        }
        None => (template, Vec::new()),
    };

    let links = render_chapter_links(&config.chapters_dir, chapters);
    let content = substitute_placeholder(&template, &config.placeholder, &links).ok_or_else(|| {
        TocError::MissingPlaceholder {
            placeholder: config.placeholder.clone(),
            path: template_path.clone(),
        }
    })?;

    let index_path = config.master_index_path(root);
    if let Some(parent) = index_path.parent() {
        fs::create_dir_all(parent).map_err(|e| TocError::io(parent, e))?;
    }
    fs::write(&index_path, content).map_err(|e| TocError::io(&index_path, e))?;

    Ok(MasterIndex { path: index_path, chapter_count: chapters.len(), missing_env })
}
