// Test infrastructure and utilities for tocgen tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Master index template with the default placeholder
pub const TEMPLATE: &str = "\
Project Docs
============

.. toctree::
   :maxdepth: 2
   :caption: Contents:
<<DYNAMIC_CHAPTER_LINKS>>
Indices
=======
";

/// reStructuredText document with a field list
pub fn rst_doc(order: u32, title: &str) -> String {
    format!(
        ":content_order: {}\n:content_title: {}\n\n{}\n{}\n\nBody.\n",
        order,
        title,
        title,
        "=".repeat(title.len())
    )
}

/// reStructuredText document tagged for a combined include list
pub fn rst_include_doc(order: u32, destination: &str) -> String {
    format!(":content_order: {}\n:content_destination: {}\n\nPart.\n", order, destination)
}

/// Markdown document with YAML front matter
pub fn md_doc(order: u32, title: &str) -> String {
    format!("---\ncontent_order: {}\ncontent_title: \"{}\"\n---\n\n# {}\n", order, title, title)
}

/// Documentation source tree in a temporary directory
pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    /// Empty project without a chapters folder
    pub fn new() -> std::io::Result<Self> {
        let root = TempDir::new()?;
        Ok(Self { root })
    }

    /// Project with the default template and an empty chapters folder
    pub fn with_template() -> std::io::Result<Self> {
        let project = Self::new()?;
        project.file("index_template.rst", TEMPLATE)?;
        fs::create_dir_all(project.path("chapters"))?;
        Ok(project)
    }

    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of a root-relative path
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    /// Write a root-relative file, creating its folders
    pub fn file(&self, rel: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a chapter folder with a `.chapterconf`
    pub fn chapter(&self, rel: &str, title: &str, order: u32) -> std::io::Result<PathBuf> {
        let config = format!("[Chapter]\ntitle = {}\norder = {}\n", title, order);
        self.file(&format!("{}/.chapterconf", rel), &config)?;
        Ok(self.path(rel))
    }

    /// Read a root-relative file
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", rel, e))
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }
}
