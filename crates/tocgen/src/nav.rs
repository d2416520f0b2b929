//! Navigation index generation
//!
//! Every chapter folder (one with a `.chapterconf`) gets an `index.rst` whose
//! toctree lists the folder's documents and sub-chapters. Folders without a
//! config are not navigation nodes of their own: their entries are merged
//! into the parent's toctree with the folder name prefixed to each link.

use crate::chapter::{read_chapter_config, ChapterConfig};
use crate::config::Config;
use crate::constants::INDEX_FILENAME;
use crate::errors::{print_file_error, print_warning};
use crate::metadata::{extract_metadata, filename_base, DocKind};
use anyhow::{Context, Result};
use colored::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One line of a generated toctree
#[derive(Debug, Clone, PartialEq)]
pub struct NavEntry {
    pub order: u32,
    pub title: String,
    /// Link relative to the index the entry is listed in, without extension
    pub link_path: String,
    pub valid: bool,
}

impl NavEntry {
    /// Toctree line, indented for the directive body
    ///
    /// Uses `Title <link>` unless the title is the link itself.
    pub fn toctree_line(&self) -> String {
        if self.title.is_empty() || self.title == self.link_path {
            format!("   {}", self.link_path)
        } else {
            format!("   {} <{}>", self.title, self.link_path)
        }
    }
}

/// Sort entries by `(order, link_path)`
pub fn sort_entries(entries: &mut [NavEntry]) {
    entries.sort_by(|a, b| (a.order, &a.link_path).cmp(&(b.order, &b.link_path)));
}

/// Contents of one chapter's `index.rst`
#[derive(Debug, Clone)]
pub struct ChapterIndex<'a> {
    pub title: &'a str,
    pub entries: &'a [NavEntry],
    pub maxdepth: u32,
}

impl ChapterIndex<'_> {
    pub fn render(&self) -> String {
        let underline = "=".repeat(self.title.chars().count());
        let lines: Vec<String> = self.entries.iter().map(NavEntry::toctree_line).collect();

        format!(
            "{title}\n{underline}\n\n.. toctree::\n   :maxdepth: {depth}\n   \
             :caption: {title} Content:\n\n{links}\n",
            title = self.title,
            underline = underline,
            depth = self.maxdepth,
            links = lines.join("\n"),
        )
    }
}

/// Walks chapter folders and writes their navigation indexes
pub struct NavBuilder<'a> {
    root: &'a Path,
    config: &'a Config,
    /// Include lists written by this tool, never listed as documents
    generated: BTreeSet<PathBuf>,
    written: Vec<PathBuf>,
    invalid_documents: usize,
}

impl<'a> NavBuilder<'a> {
    pub fn new(root: &'a Path, config: &'a Config) -> Self {
        Self {
            root,
            config,
            generated: BTreeSet::new(),
            written: Vec::new(),
            invalid_documents: 0,
        }
    }

    /// Skip these files when they turn up inside a chapter
    pub fn with_generated(mut self, generated: BTreeSet<PathBuf>) -> Self {
        self.generated = generated;
        self
    }

    /// Index files written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Documents that appeared in a toctree without valid metadata
    pub fn invalid_documents(&self) -> usize {
        self.invalid_documents
    }

    fn display<'p>(&self, path: &'p Path) -> std::path::Display<'p> {
        path.strip_prefix(self.root).unwrap_or(path).display()
    }

    /// Read a folder's chapter config, reporting problems
    pub fn chapter_config(&self, dir: &Path) -> Option<ChapterConfig> {
        match read_chapter_config(dir, self.config.default_order) {
            Ok(Some(config)) => {
                for issue in &config.issues {
                    print_warning(&issue.to_string());
                }
                Some(config)
            }
            Ok(None) => None,
            Err(e) => {
                print_warning(&format!(
                    "Failed to read chapter config in {}: {}. Treating it as a container.",
                    self.display(dir),
                    e
                ));
                None
            }
        }
    }

    /// Process a folder and everything below it
    ///
    /// Writes `index.rst` when `chapter` is given and returns the sorted
    /// entries, with links relative to `dir`.
    pub fn process_directory(
        &mut self,
        dir: &Path,
        chapter: Option<&ChapterConfig>,
    ) -> Result<Vec<NavEntry>> {
        println!("{} {}", "Processing".cyan(), self.display(dir));

        let mut entries = Vec::new();
        let mut issues_found = false;

        let walker = WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    print_warning(&format!("Failed to list {}: {}", self.display(dir), e));
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            let path = entry.path();

            if entry.file_type().is_dir() {
                let sub_config = self.chapter_config(path);
                let sub_entries = self.process_directory(path, sub_config.as_ref())?;

                match sub_config {
                    Some(config) => entries.push(NavEntry {
                        order: config.order,
                        title: config.display_title(&name),
                        link_path: format!("{}/index", name),
                        valid: true,
                    }),
                    None => {
                        println!("  {} {}", "Merging content from".dimmed(), self.display(path));
                        entries.extend(sub_entries.into_iter().map(|mut e| {
                            e.link_path = format!("{}/{}", name, e.link_path);
                            e
                        }));
                    }
                }
                continue;
            }

            if name == INDEX_FILENAME || self.generated.contains(path) {
                continue;
            }
            let Some(kind) = DocKind::from_path(path) else {
                continue;
            };

            let meta =
                extract_metadata(path, kind, self.config.default_order, self.config.head_limit);
            for issue in &meta.issues {
                if issue.is_error() {
                    print_file_error(&issue.to_string());
                } else {
                    print_warning(&issue.to_string());
                }
            }

            if let Some(destination) = &meta.destination {
                match kind {
                    DocKind::Rst => println!(
                        "  {} {} (included into {})",
                        "Skipping".dimmed(),
                        name,
                        destination
                    ),
                    DocKind::Markdown => print_warning(&format!(
                        "{} sets content destination '{}', but Markdown cannot be included \
                         into reStructuredText. The file is left out.",
                        self.display(path),
                        destination
                    )),
                }
                continue;
            }

            if !meta.valid {
                issues_found = true;
                self.invalid_documents += 1;
            }

            let base = filename_base(path);
            entries.push(NavEntry {
                order: meta.order,
                title: meta.title.unwrap_or_else(|| base.clone()),
                link_path: base,
                valid: meta.valid,
            });
        }

        sort_entries(&mut entries);

        match chapter {
            Some(config) => {
                let folder =
                    dir.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
                let title = config.display_title(&folder);
                let index = ChapterIndex {
                    title: &title,
                    entries: &entries,
                    maxdepth: self.config.toctree_maxdepth,
                };

                let index_path = dir.join(INDEX_FILENAME);
                fs::write(&index_path, index.render())
                    .with_context(|| format!("Failed to write {}", index_path.display()))?;

                println!(
                    "  {} Index generated: {} ({} links)",
                    "✓".green(),
                    self.display(&index_path),
                    entries.len()
                );
                self.written.push(index_path);

                if issues_found || entries.iter().any(|e| !e.valid) {
                    print_warning(&format!(
                        "REVIEW REQUIRED: Issues found in files in {}",
                        self.display(dir)
                    ));
                }
            }
            None => {
                println!(
                    "  {} index generation for container directory {}",
                    "Skipping".dimmed(),
                    self.display(dir)
                );
            }
        }

        Ok(entries)
    }
}
