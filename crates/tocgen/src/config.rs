//! Generator configuration with layered defaults
//!
//! Every value has a built-in default. A `tocgen.toml` in the root directory
//! may override any subset of them:
//!
//! ```toml
//! chapters_dir = "chapters"
//! template = "index_template.rst"
//! master_index = "index.rst"
//! placeholder = "<<DYNAMIC_CHAPTER_LINKS>>"
//! default_order = 9999
//! toctree_maxdepth = 2
//! head_limit = 1000
//! exclude_patterns = ["_build/**", "_static/**", "_templates/**"]
//! expand_env = true
//! ```

use crate::constants::*;
use anyhow::{Context, Result};
use glob::Pattern;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration with layered defaults
#[derive(Debug, Clone)]
pub struct Config {
    /// Sub-directory of the root holding the top-level chapters
    pub chapters_dir: String,

    /// Master index template, relative to the root
    pub template: PathBuf,

    /// Live master index written from the template, relative to the root
    pub master_index: PathBuf,

    /// Token in the template replaced by the chapter links
    pub placeholder: String,

    /// Order used when a chapter or document declares none
    pub default_order: u32,

    /// `:maxdepth:` of generated chapter toctrees
    pub toctree_maxdepth: u32,

    /// Characters of a reStructuredText file scanned for metadata
    pub head_limit: usize,

    /// Root-relative glob patterns skipped when collecting include lists
    pub exclude_patterns: Vec<String>,

    /// Whether `{{ env.NAME }}` references in the template are expanded
    pub expand_env: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chapters_dir: CHAPTERS_SUB_DIR.to_string(),
            template: PathBuf::from(TEMPLATE_FILENAME),
            master_index: PathBuf::from(INDEX_FILENAME),
            placeholder: PLACEHOLDER.to_string(),
            default_order: DEFAULT_ORDER,
            toctree_maxdepth: TOCTREE_MAXDEPTH,
            head_limit: HEAD_LIMIT,
            exclude_patterns: vec![
                "_build/**".to_string(),
                "_static/**".to_string(),
                "_templates/**".to_string(),
            ],
            expand_env: true,
        }
    }
}

impl Config {
    /// Load configuration for a root directory
    ///
    /// Starts from the defaults and merges `<root>/tocgen.toml` when present.
    pub fn load(root: &Path) -> Result<Self> {
        let mut config = Config::default();

        if let Some(file_config) = Self::load_from_file(root)? {
            config.merge(file_config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load the partial configuration from `<root>/tocgen.toml`
    fn load_from_file(root: &Path) -> Result<Option<PartialConfig>> {
        let config_path = root.join(CONFIG_FILENAME);
        if !config_path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: PartialConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Merge partial config into this one (partial takes precedence for specified fields)
    fn merge(&mut self, other: PartialConfig) {
        if let Some(val) = other.chapters_dir {
            self.chapters_dir = val;
        }
        if let Some(val) = other.template {
            self.template = val;
        }
        if let Some(val) = other.master_index {
            self.master_index = val;
        }
        if let Some(val) = other.placeholder {
            self.placeholder = val;
        }
        if let Some(val) = other.default_order {
            self.default_order = val;
        }
        if let Some(val) = other.toctree_maxdepth {
            self.toctree_maxdepth = val;
        }
        if let Some(val) = other.head_limit {
            self.head_limit = val;
        }
        if let Some(val) = other.exclude_patterns {
            self.exclude_patterns = val;
        }
        if let Some(val) = other.expand_env {
            self.expand_env = val;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.placeholder.is_empty() {
            anyhow::bail!("placeholder must not be empty");
        }
        if self.chapters_dir.is_empty() {
            anyhow::bail!("chapters_dir must not be empty");
        }
        if self.template == self.master_index {
            anyhow::bail!(
                "template and master_index must be different files (both are {})",
                self.template.display()
            );
        }
        for pattern in &self.exclude_patterns {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid exclude pattern '{}'", pattern))?;
        }
        Ok(())
    }

    /// Directory holding the top-level chapters
    pub fn chapters_root(&self, root: &Path) -> PathBuf {
        root.join(&self.chapters_dir)
    }

    /// Full path of the master index template
    pub fn template_path(&self, root: &Path) -> PathBuf {
        root.join(&self.template)
    }

    /// Full path of the live master index
    pub fn master_index_path(&self, root: &Path) -> PathBuf {
        root.join(&self.master_index)
    }

    /// Whether a root-relative path matches one of the exclude patterns
    pub fn is_excluded(&self, rel_path: &Path) -> bool {
        let rel = rel_path.to_string_lossy().replace('\\', "/");
        self.exclude_patterns
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .any(|p| p.matches(&rel))
    }
}

/// Partial configuration for deserializing from TOML with optional fields
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    chapters_dir: Option<String>,
    template: Option<PathBuf>,
    master_index: Option<PathBuf>,
    placeholder: Option<String>,
    default_order: Option<u32>,
    toctree_maxdepth: Option<u32>,
    head_limit: Option<usize>,
    exclude_patterns: Option<Vec<String>>,
    expand_env: Option<bool>,
}
