//! Navigation index generator for Sphinx documentation trees
//!
//! Walks a `chapters/` tree, writes one `index.rst` toctree per chapter
//! folder, stitches destination-tagged documents into combined include
//! files, and renders the master index from a template.

pub mod chapter;
pub mod config;
pub mod constants;
pub mod directive;
pub mod env;
pub mod errors;
pub mod generator;
pub mod includes;
pub mod master;
pub mod metadata;
pub mod nav;

pub use chapter::ChapterConfig;
pub use config::Config;
pub use env::EnvContext;
pub use errors::TocError;
pub use generator::{Generator, RunSummary};
pub use master::Chapter;
pub use metadata::{ContentMetadata, DocKind};
pub use nav::NavEntry;

/// Re-export common error types
pub use anyhow::{Error, Result};
