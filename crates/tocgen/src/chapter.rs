//! Chapter configuration (`.chapterconf`) parsing
//!
//! A folder becomes a chapter when it contains a `.chapterconf` file. The
//! file is plain `key = value` text, optionally wrapped in an INI section:
//!
//! ```text
//! [Chapter]
//! title = Getting Started
//! order = 10
//! ```

use crate::constants::CHAPTER_CONFIG_FILENAME;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Section whose keys are honoured when the file uses INI sections
const CHAPTER_SECTION: &str = "chapter";

/// Title and order of one chapter folder
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterConfig {
    pub title: Option<String>,
    pub order: u32,
    pub issues: Vec<ChapterIssue>,
}

/// Recoverable problems found while reading a `.chapterconf`
#[derive(Debug, Clone, PartialEq)]
pub enum ChapterIssue {
    MissingOrder { path: PathBuf, default: u32 },
    InvalidOrder { path: PathBuf, value: String, default: u32 },
    MissingTitle { path: PathBuf },
}

impl fmt::Display for ChapterIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChapterIssue::MissingOrder { path, default } => write!(
                f,
                "Missing 'order=' in config file: {}. Defaulting to {}.",
                path.display(),
                default
            ),
            ChapterIssue::InvalidOrder { path, value, default } => write!(
                f,
                "Non-integer order '{}' in config file: {}. Defaulting to {}.",
                value,
                path.display(),
                default
            ),
            ChapterIssue::MissingTitle { path } => {
                write!(f, "Missing 'title=' in config file: {}. Using folder name.", path.display())
            }
        }
    }
}

impl ChapterConfig {
    /// Parse the contents of a `.chapterconf`
    pub fn parse(content: &str, path: &Path, default_order: u32) -> Self {
        let mut order_raw: Option<String> = None;
        let mut title: Option<String> = None;
        let mut section: Option<String> = None;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                section = Some(name.trim().to_lowercase());
                continue;
            }

            if section.as_deref().is_some_and(|s| s != CHAPTER_SECTION) {
                continue;
            }

            let Some((key, value)) = split_key_value(trimmed) else {
                continue;
            };

            match key.to_lowercase().as_str() {
                "order" if order_raw.is_none() => order_raw = Some(value.to_string()),
                "title" if title.is_none() && !value.is_empty() => title = Some(value.to_string()),
                _ => {}
            }
        }

        let mut issues = Vec::new();

        let order = match order_raw {
            Some(raw) => match leading_number(&raw) {
                Some(order) => order,
                None => {
                    issues.push(ChapterIssue::InvalidOrder {
                        path: path.to_path_buf(),
                        value: raw,
                        default: default_order,
                    });
                    default_order
                }
            },
            None => {
                issues.push(ChapterIssue::MissingOrder {
                    path: path.to_path_buf(),
                    default: default_order,
                });
                default_order
            }
        };

        if title.is_none() {
            issues.push(ChapterIssue::MissingTitle { path: path.to_path_buf() });
        }

        ChapterConfig { title, order, issues }
    }

    /// Title to display, falling back to the folder name
    pub fn display_title(&self, folder_name: &str) -> String {
        self.title.clone().unwrap_or_else(|| folder_name.to_string())
    }
}

/// Split `key = value` or `key: value`, whichever separator comes first
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(['=', ':'])?;
    let key = line[..pos].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[pos + 1..].trim()))
}

/// Integer at the start of an order value
///
/// Trailing text such as an inline comment is ignored.
fn leading_number(raw: &str) -> Option<u32> {
    let end = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    raw[..end].parse().ok()
}

/// Read the chapter config of a folder
///
/// Returns `Ok(None)` when the folder has no `.chapterconf`. A file that
/// exists but cannot be read is returned as an error so the caller can
/// report it and treat the folder as a plain container.
pub fn read_chapter_config(
    dir: &Path,
    default_order: u32,
) -> std::io::Result<Option<ChapterConfig>> {
    let config_path = dir.join(CHAPTER_CONFIG_FILENAME);
    if !config_path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(&config_path)?;
    Ok(Some(ChapterConfig::parse(&content, &config_path, default_order)))
}
