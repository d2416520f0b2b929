//! Full generator run
//!
//! A run writes the chapter indexes first, then the combined include lists,
//! then the master index. Only a missing chapters root stops a run. A
//! missing template or placeholder is reported, the live master index is
//! left as it was, and everything else is still written.

use crate::chapter::ChapterConfig;
use crate::config::Config;
use crate::env::EnvContext;
use crate::errors::{print_error_with_suggestion, print_warning, suggestion_for, TocError};
use crate::includes::{collect_include_groups, include_outputs, write_include_groups};
use crate::master::{sort_chapters, update_master_index, Chapter};
use crate::nav::NavBuilder;
use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files written by a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Top-level chapters, in master index order
    pub chapters: Vec<Chapter>,
    pub chapter_indexes: Vec<PathBuf>,
    pub include_lists: Vec<PathBuf>,
    /// `None` when the template was missing or lacked its placeholder
    pub master_index: Option<PathBuf>,
    /// Documents listed without valid ordering metadata
    pub invalid_documents: usize,
}

/// Generator bound to one documentation root
pub struct Generator {
    root: PathBuf,
    config: Config,
}

impl Generator {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self { root: root.into(), config }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Top-level chapter folders with their configs, in folder name order
    ///
    /// Folders without a `.chapterconf` are reported and left out.
    pub fn discover_chapters(&self, nav: &NavBuilder) -> Result<Vec<(Chapter, ChapterConfig)>> {
        let chapters_root = self.config.chapters_root(&self.root);
        if !chapters_root.is_dir() {
            return Err(TocError::MissingChaptersRoot(chapters_root).into());
        }

        let mut found = Vec::new();
        let walker = WalkDir::new(&chapters_root).min_depth(1).max_depth(1).sort_by_file_name();

        for entry in walker {
            let entry = entry
                .with_context(|| format!("Failed to list {}", chapters_root.display()))?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let folder_name = entry.file_name().to_string_lossy().to_string();
            if folder_name.starts_with('.') {
                continue;
            }

            match nav.chapter_config(entry.path()) {
                Some(config) => {
                    let chapter = Chapter {
                        title: config.display_title(&folder_name),
                        order: config.order,
                        folder_name,
                    };
                    found.push((chapter, config));
                }
                None => println!(
                    "  {} {} (no .chapterconf)",
                    "Skipping top-level folder".dimmed(),
                    folder_name
                ),
            }
        }

        Ok(found)
    }

    /// Generate every index and include list under the root
    pub fn run(&self, env: &EnvContext) -> Result<RunSummary> {
        let groups = collect_include_groups(&self.root, &self.config);
        let mut nav = NavBuilder::new(&self.root, &self.config)
            .with_generated(include_outputs(&self.root, &groups));

        println!("{}\n", "Generating chapter indexes...".bold());
        let discovered = self.discover_chapters(&nav)?;
        let chapters_root = self.config.chapters_root(&self.root);

        let mut chapters = Vec::with_capacity(discovered.len());
        for (chapter, config) in discovered {
            nav.process_directory(&chapters_root.join(&chapter.folder_name), Some(&config))?;
            chapters.push(chapter);
        }
        sort_chapters(&mut chapters);

        println!("\n{}\n", "Generating include lists...".bold());
        let include_lists = write_include_groups(&self.root, &groups)?;

        println!("\n{}\n", "Updating master index...".bold());
        let master_index = self.update_master(&chapters, env)?;

        Ok(RunSummary {
            chapters,
            chapter_indexes: nav.written().to_vec(),
            include_lists,
            master_index,
            invalid_documents: nav.invalid_documents(),
        })
    }

    /// Write the master index, reporting a missing template or placeholder
    fn update_master(&self, chapters: &[Chapter], env: &EnvContext) -> Result<Option<PathBuf>> {
        let env = self.config.expand_env.then_some(env);

        let master = match update_master_index(&self.root, &self.config, chapters, env) {
            Ok(master) => master,
            Err(e @ (TocError::MissingTemplate(_) | TocError::MissingPlaceholder { .. })) => {
                let error = anyhow::Error::new(e);
                let suggestion = suggestion_for(&error).unwrap_or_default();
                print_error_with_suggestion("Master index not updated", &error, &suggestion);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        for name in &master.missing_env {
            print_warning(&format!(
                "Environment variable '{}' referenced by the template is not set",
                name
            ));
        }
        println!(
            "  {} Master index updated: {} ({} chapters)",
            "✓".green(),
            master.path.strip_prefix(&self.root).unwrap_or(&master.path).display(),
            master.chapter_count
        );

        Ok(Some(master.path))
    }
}
