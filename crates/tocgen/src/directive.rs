//! The `.. metadata::` directive
//!
//! Documents can carry a block of YAML inside a directive instead of (or in
//! addition to) a field list:
//!
//! ```rst
//! .. metadata::
//!
//!    :content_order: 20
//!    :content_title: Installing
//!    :content_destination: combined/setup
//!
//! .. metadata-end::
//! ```
//!
//! The body runs until the first non-blank line that is not indented, so the
//! closing `metadata-end` marker is never part of the YAML. A block that fails
//! to parse is reported with its line and the text as written.

use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;
use thiserror::Error;

/// A `.. metadata::` directive that failed to parse
#[derive(Debug, Error)]
#[error("Error parsing custom metadata YAML at line {line}: {message}")]
pub struct DirectiveError {
    /// 1-based line of the directive marker
    pub line: usize,
    pub message: String,
    /// The directive exactly as written, for display
    pub block_text: String,
}

/// Parsed contents of one metadata directive
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataNode {
    /// 1-based line of the directive marker
    pub line: usize,
    pub values: Mapping,
}

impl MetadataNode {
    /// Look up a value by key (keys are stored without surrounding colons)
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Integer value of a key, if it holds a non-negative integer
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(Value::as_u64).and_then(|n| u32::try_from(n).ok())
    }

    /// Trimmed string value of a key
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Value::as_str).map(|s| s.trim().to_string())
    }
}

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\.\.\s*metadata::\s*$").unwrap())
}

/// Line span of a directive inside a document
#[derive(Debug, Clone, Copy)]
struct BlockSpan {
    /// Index of the marker line
    start: usize,
    /// One past the last body line
    end: usize,
}

fn find_blocks(lines: &[&str]) -> Vec<BlockSpan> {
    let mut spans = Vec::new();
    let mut idx = 0;

    while idx < lines.len() {
        if !marker_regex().is_match(lines[idx]) {
            idx += 1;
            continue;
        }

        let start = idx;
        idx += 1;
        while idx < lines.len() {
            let line = lines[idx];
            if !line.trim().is_empty() && !line.starts_with([' ', '\t']) {
                break;
            }
            idx += 1;
        }
        spans.push(BlockSpan { start, end: idx });
    }

    spans
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Remove the common indentation measured on the first non-blank line
fn dedent(body: &[&str]) -> String {
    let indent = body
        .iter()
        .find(|line| !line.trim().is_empty())
        .map(|line| indent_width(line))
        .unwrap_or(0);

    body.iter()
        .map(|line| &line[indent_width(line).min(indent)..])
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_key(key: &Value) -> Value {
    match key {
        Value::String(s) => Value::String(s.trim_matches(':').to_string()),
        other => other.clone(),
    }
}

fn parse_block(lines: &[&str], span: BlockSpan) -> Result<MetadataNode, DirectiveError> {
    let body = &lines[span.start + 1..span.end];
    let yaml = dedent(body);
    let line = span.start + 1;

    let error = |message: String| DirectiveError {
        line,
        message,
        block_text: lines[span.start..span.end].join("\n"),
    };

    let parsed: Value = if yaml.trim().is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str(&yaml).map_err(|e| error(e.to_string()))?
    };

    let values = match parsed {
        Value::Null => Mapping::new(),
        Value::Mapping(map) => map.iter().map(|(k, v)| (normalize_key(k), v.clone())).collect(),
        _ => return Err(error("metadata block is not a key-value mapping".to_string())),
    };

    Ok(MetadataNode { line, values })
}

/// Parse every metadata directive in a document, in order
pub fn extract_all(text: &str) -> Vec<Result<MetadataNode, DirectiveError>> {
    let lines: Vec<&str> = text.lines().collect();
    find_blocks(&lines).into_iter().map(|span| parse_block(&lines, span)).collect()
}

/// Parse the first metadata directive in a document
///
/// Returns `None` when the document has no directive.
pub fn find_metadata(text: &str) -> Option<Result<MetadataNode, DirectiveError>> {
    extract_all(text).into_iter().next()
}
