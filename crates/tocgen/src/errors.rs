//! Error types and error reporting utilities

use colored::*;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while generating navigation
#[derive(Debug, Error)]
pub enum TocError {
    #[error("Chapter root directory not found: {}", .0.display())]
    MissingChaptersRoot(PathBuf),

    #[error("Master index template not found: {}", .0.display())]
    MissingTemplate(PathBuf),

    #[error("Placeholder {placeholder} not found in template {}", path.display())]
    MissingPlaceholder { placeholder: String, path: PathBuf },

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TocError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TocError::Io { path: path.into(), source }
    }
}

/// Print a formatted error message
pub fn print_error(context: &str, error: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), context);
    eprintln!("  {}", error.to_string().red());

    // Show chain of causes
    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "Caused by:".dimmed(), cause.to_string().dimmed());
    }
}

/// Print an error with a suggestion
pub fn print_error_with_suggestion(context: &str, error: &anyhow::Error, suggestion: &str) {
    print_error(context, error);
    eprintln!("\n{} {}", "Suggestion:".cyan().bold(), suggestion);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}

/// Print a per-file error that does not stop the run
pub fn print_file_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// Suggestion shown next to a fatal error
pub fn suggestion_for(error: &anyhow::Error) -> Option<String> {
    match error.downcast_ref::<TocError>()? {
        TocError::MissingChaptersRoot(path) => Some(format!(
            "Create '{}' or pass the documentation source directory with --root-dir",
            path.display()
        )),
        TocError::MissingTemplate(path) => {
            Some(format!("Add a master index template at '{}'", path.display()))
        }
        TocError::MissingPlaceholder { placeholder, .. } => {
            Some(format!("Put '{}' under the toctree directive of the template", placeholder))
        }
        TocError::Io { .. } => None,
    }
}
