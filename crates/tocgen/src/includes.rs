//! Combined include lists
//!
//! Documents tagged with `content_destination` are left out of navigation
//! and stitched together instead: every destination becomes one
//! `<root>/<destination>.rst` made of `.. include::` directives, ordered by
//! `content_order`.

use crate::config::Config;
use crate::constants::{INCLUDES_EXTENSION, INDEX_FILENAME};
use crate::errors::print_warning;
use crate::metadata::{extract_metadata, DocKind};
use anyhow::{Context, Result};
use colored::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// One document included into a destination
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct IncludeMember {
    pub order: u32,
    /// Path relative to the root
    pub path: PathBuf,
}

/// Members of each destination, keyed by destination name
pub type IncludeGroups = BTreeMap<String, Vec<IncludeMember>>;

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Relative path from a directory to a file, with `/` separators
///
/// Both paths must be relative to the same base.
pub fn relative_path(from_dir: &Path, to: &Path) -> String {
    let from: Vec<Component> = from_dir.components().filter(|c| *c != Component::CurDir).collect();
    let to: Vec<Component> = to.components().filter(|c| *c != Component::CurDir).collect();

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(to[common..].iter().map(|c| c.as_os_str().to_string_lossy().to_string()));
    parts.join("/")
}

/// Output file of a destination, relative to the root
///
/// Returns `None` for destinations that would land outside the root.
pub fn destination_file(destination: &str) -> Option<PathBuf> {
    let trimmed = destination.trim().trim_start_matches("./");
    if trimmed.is_empty() {
        return None;
    }

    let path = PathBuf::from(trimmed);
    if !path.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }

    if path.extension().and_then(|e| e.to_str()) == Some(INCLUDES_EXTENSION) {
        Some(path)
    } else {
        Some(PathBuf::from(format!("{}.{}", trimmed, INCLUDES_EXTENSION)))
    }
}

/// Find every destination-tagged reStructuredText file under the root
///
/// Hidden entries and paths matching the exclude patterns are skipped.
/// Members of each group are sorted by `(order, path)`.
pub fn collect_include_groups(root: &Path, config: &Config) -> IncludeGroups {
    let mut groups = IncludeGroups::new();

    let walker = WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(|entry| {
        if is_hidden(entry) {
            return false;
        }
        match entry.path().strip_prefix(root) {
            Ok(rel) if !rel.as_os_str().is_empty() => !config.is_excluded(rel),
            _ => true,
        }
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                print_warning(&format!("Failed to scan for include files: {}", e));
                continue;
            }
        };

        if !entry.file_type().is_file() || entry.file_name() == INDEX_FILENAME {
            continue;
        }
        let path = entry.path();
        if DocKind::from_path(path) != Some(DocKind::Rst) {
            continue;
        }

        let meta = extract_metadata(path, DocKind::Rst, config.default_order, config.head_limit);
        let Some(destination) = meta.destination else {
            continue;
        };

        let rel = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        groups.entry(destination).or_default().push(IncludeMember { order: meta.order, path: rel });
    }

    for members in groups.values_mut() {
        members.sort();
    }

    groups
}

/// Contents of an include list written to `output` (relative to the root)
pub fn render_include_list(output: &Path, members: &[IncludeMember]) -> String {
    let output_dir = output.parent().unwrap_or(Path::new(""));
    let directives: Vec<String> = members
        .iter()
        .map(|m| format!(".. include:: {}", relative_path(output_dir, &m.path)))
        .collect();

    format!("{}\n", directives.join("\n\n"))
}

/// Files the include lists of `groups` are written to, under `root`
pub fn include_outputs(root: &Path, groups: &IncludeGroups) -> BTreeSet<PathBuf> {
    groups.keys().filter_map(|d| destination_file(d)).map(|p| root.join(p)).collect()
}

/// Collect and write every include list, returning the files written
pub fn write_include_lists(root: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    write_include_groups(root, &collect_include_groups(root, config))
}

/// Write the include lists of already collected groups
pub fn write_include_groups(root: &Path, groups: &IncludeGroups) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if groups.is_empty() {
        println!("  {}", "No content destinations found".dimmed());
        return Ok(written);
    }

    for (destination, members) in groups {
        let Some(output) = destination_file(destination) else {
            print_warning(&format!(
                "Ignoring content destination '{}': it must be a relative path inside the root",
                destination
            ));
            continue;
        };

        let output_path = root.join(&output);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        fs::write(&output_path, render_include_list(&output, members))
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        println!(
            "  {} Include list generated: {} ({} files)",
            "✓".green(),
            output.display(),
            members.len()
        );
        written.push(output_path);
    }

    Ok(written)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn relative_path_resolves_back(
            from in prop::collection::vec("[a-z]{1,5}", 0..4),
            to in prop::collection::vec("[a-z]{1,5}", 1..5),
        ) {
            let from_dir: PathBuf = from.iter().collect();
            let target: PathBuf = to.iter().collect();

            let rel = relative_path(&from_dir, &target);

            // Walk the relative path from `from_dir` without touching the filesystem
            let mut resolved: Vec<String> = from.clone();
            for part in rel.split('/').filter(|p| !p.is_empty()) {
                if part == ".." {
                    resolved.pop();
                } else {
                    resolved.push(part.to_string());
                }
            }
            prop_assert_eq!(resolved, to);
        }
    }
}
