//! Per-document metadata extraction
//!
//! Two document kinds carry ordering metadata:
//!
//! - reStructuredText files use a field list near the top
//!   (`:content_order: 10`, `:content_title: Intro`), or the same keys inside
//!   a `.. metadata::` directive, which wins when both are present.
//! - Markdown files use YAML front matter with `content_order`,
//!   `content_title` and `content_destination`. A metadata directive inside
//!   the file can redirect it and override its order and title.
//!
//! Extraction never fails: problems are recorded as [`MetadataIssue`]s and the
//! document falls back to the default order and is flagged invalid.

use crate::directive::{self, MetadataNode};
use regex::Regex;
use serde_yaml::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const ORDER_KEY: &str = "content_order";
pub const TITLE_KEY: &str = "content_title";
pub const DESTINATION_KEY: &str = "content_destination";

/// Kind of document, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Rst,
    Markdown,
}

impl DocKind {
    /// Content kind of a path, `None` for files that are not documents
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "rst" => Some(DocKind::Rst),
            "md" => Some(DocKind::Markdown),
            _ => None,
        }
    }
}

/// Ordering metadata of one document
#[derive(Debug, Clone, PartialEq)]
pub struct ContentMetadata {
    pub order: u32,
    pub title: Option<String>,
    /// Base name of the combined include file this document belongs to
    pub destination: Option<String>,
    /// False when the order could not be established
    pub valid: bool,
    pub issues: Vec<MetadataIssue>,
}

impl ContentMetadata {
    fn new(default_order: u32) -> Self {
        Self {
            order: default_order,
            title: None,
            destination: None,
            valid: true,
            issues: Vec::new(),
        }
    }

    fn invalidate(&mut self, issue: MetadataIssue) {
        self.valid = false;
        self.issues.push(issue);
    }
}

/// Recoverable problems found while reading a document's metadata
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataIssue {
    MissingOrder { path: PathBuf, default: u32 },
    MissingTitle { path: PathBuf, fallback: String },
    MissingFrontMatter { path: PathBuf },
    InvalidFrontMatter { path: PathBuf, message: String },
    InvalidDirective { path: PathBuf, line: usize, message: String, block: String },
    Unreadable { path: PathBuf, message: String },
}

impl MetadataIssue {
    /// Whether the issue is an error rather than a warning
    pub fn is_error(&self) -> bool {
        matches!(self, MetadataIssue::Unreadable { .. } | MetadataIssue::InvalidDirective { .. })
    }
}

impl fmt::Display for MetadataIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataIssue::MissingOrder { path, default } => write!(
                f,
                "Missing ':{}:' in {}. Defaulting to order {}.",
                ORDER_KEY,
                path.display(),
                default
            ),
            MetadataIssue::MissingTitle { path, fallback } => write!(
                f,
                "Missing ':{}:' in {}. Using filename '{}'.",
                TITLE_KEY,
                path.display(),
                fallback
            ),
            MetadataIssue::MissingFrontMatter { path } => {
                write!(f, "Missing or malformed YAML front matter in {}.", path.display())
            }
            MetadataIssue::InvalidFrontMatter { path, message } => {
                write!(f, "Invalid YAML front matter in {}: {}", path.display(), message)
            }
            MetadataIssue::InvalidDirective { path, line, message, block } => {
                write!(
                    f,
                    "Invalid metadata directive in {} at line {}: {}",
                    path.display(),
                    line,
                    message
                )?;
                for text in block.lines() {
                    write!(f, "\n    {}", text)?;
                }
                Ok(())
            }
            MetadataIssue::Unreadable { path, message } => {
                write!(f, "Failed to read {} for metadata: {}", path.display(), message)
            }
        }
    }
}

fn order_field_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^:content_order:[ \t]*(\d+)").unwrap())
}

fn title_field_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^:content_title:[ \t]*(.*)$").unwrap())
}

fn destination_field_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^:content_destination:[ \t]*(.*)$").unwrap())
}

fn front_matter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n---").unwrap())
}

/// Filename without extension, used as link path and fallback title
pub fn filename_base(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default()
}

/// Take at most `limit` characters, extended to the end of the line they stop in
pub fn head(content: &str, limit: usize) -> &str {
    let Some((cut, _)) = content.char_indices().nth(limit) else {
        return content;
    };
    match content[cut..].find('\n') {
        Some(newline) => &content[..cut + newline],
        None => content,
    }
}

/// Values found in a reStructuredText field list
#[derive(Debug, Default, PartialEq)]
pub struct FieldList {
    pub order: Option<u32>,
    pub title: Option<String>,
    pub destination: Option<String>,
}

/// Parse the `:content_*:` field list of a reStructuredText head
pub fn parse_field_list(text: &str) -> FieldList {
    let capture = |re: &Regex| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    };

    FieldList {
        order: capture(order_field_regex()).and_then(|s| s.parse().ok()),
        title: capture(title_field_regex()),
        destination: capture(destination_field_regex()),
    }
}

impl From<&MetadataNode> for FieldList {
    fn from(node: &MetadataNode) -> Self {
        FieldList {
            order: node.get_u32(ORDER_KEY),
            title: node.get_str(TITLE_KEY).filter(|s| !s.is_empty()),
            destination: node.get_str(DESTINATION_KEY).filter(|s| !s.is_empty()),
        }
    }
}

/// Metadata of a reStructuredText document from its text
///
/// A `.. metadata::` directive takes precedence over a bare field list.
pub fn rst_metadata_from_str(text: &str, path: &Path, default_order: u32) -> ContentMetadata {
    let mut meta = ContentMetadata::new(default_order);

    let fields = match directive::find_metadata(text) {
        Some(Ok(node)) => FieldList::from(&node),
        Some(Err(e)) => {
            meta.invalidate(MetadataIssue::InvalidDirective {
                path: path.to_path_buf(),
                line: e.line,
                message: e.message,
                block: e.block_text,
            });
            return meta;
        }
        None => parse_field_list(text),
    };

    match fields.order {
        Some(order) => meta.order = order,
        None => meta.invalidate(MetadataIssue::MissingOrder {
            path: path.to_path_buf(),
            default: default_order,
        }),
    }

    match fields.title {
        Some(title) => meta.title = Some(title),
        None => meta.issues.push(MetadataIssue::MissingTitle {
            path: path.to_path_buf(),
            fallback: filename_base(path),
        }),
    }

    meta.destination = fields.destination;
    meta
}

/// Front matter block of a Markdown document, if it has one
pub fn split_front_matter(text: &str) -> Option<&str> {
    front_matter_regex().captures(text).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// Metadata of a Markdown document from its text
///
/// Front matter provides order, title and destination. A metadata directive
/// that names a destination overrides the destination, its order when it is
/// not the default, its title when set, and decides validity.
pub fn md_metadata_from_str(text: &str, path: &Path, default_order: u32) -> ContentMetadata {
    let mut meta = ContentMetadata::new(default_order);
    let mut has_order = false;

    match split_front_matter(text) {
        None => {
            meta.invalidate(MetadataIssue::MissingFrontMatter { path: path.to_path_buf() });
            return meta;
        }
        Some(yaml) => match serde_yaml::from_str::<Value>(yaml) {
            Ok(data) => {
                let order =
                    data.get(ORDER_KEY).and_then(Value::as_u64).and_then(|n| u32::try_from(n).ok());
                match order {
                    Some(order) => {
                        meta.order = order;
                        has_order = true;
                    }
                    None => meta.invalidate(MetadataIssue::MissingOrder {
                        path: path.to_path_buf(),
                        default: default_order,
                    }),
                }
                let text_value = |key: &str| {
                    data.get(key)
                        .and_then(Value::as_str)
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                };
                meta.title = text_value(TITLE_KEY);
                meta.destination = text_value(DESTINATION_KEY);
            }
            Err(e) => meta.invalidate(MetadataIssue::InvalidFrontMatter {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        },
    }

    let directive_meta =
        directive::find_metadata(text).map(|_| rst_metadata_from_str(text, path, default_order));

    match directive_meta {
        Some(directive_meta) if directive_meta.destination.is_some() => {
            meta.destination = directive_meta.destination;
            if directive_meta.order != default_order {
                meta.order = directive_meta.order;
            }
            if directive_meta.title.is_some() {
                meta.title = directive_meta.title;
            }
            meta.valid = directive_meta.valid;
            meta.issues = directive_meta.issues;
            if meta.title.is_some() {
                meta.issues.retain(|issue| !matches!(issue, MetadataIssue::MissingTitle { .. }));
            }
        }
        Some(directive_meta) if !directive_meta.valid => {
            for issue in directive_meta.issues.into_iter().filter(MetadataIssue::is_error) {
                meta.invalidate(issue);
            }
        }
        _ => {
            if !has_order && meta.valid {
                meta.invalidate(MetadataIssue::MissingOrder {
                    path: path.to_path_buf(),
                    default: default_order,
                });
            }
        }
    }

    meta
}

/// Read the metadata of a document on disk
///
/// reStructuredText is scanned up to `head_limit` characters; Markdown front
/// matter is read from the whole file. Unreadable files come back invalid.
pub fn extract_metadata(
    path: &Path,
    kind: DocKind,
    default_order: u32,
    head_limit: usize,
) -> ContentMetadata {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let mut meta = ContentMetadata::new(default_order);
            meta.invalidate(MetadataIssue::Unreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
            return meta;
        }
    };

    match kind {
        DocKind::Rst => rst_metadata_from_str(head(&content, head_limit), path, default_order),
        DocKind::Markdown => md_metadata_from_str(&content, path, default_order),
    }
}
