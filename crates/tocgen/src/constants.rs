//! Constants used throughout the tocgen crate

/// Order assigned to anything that does not declare one; sorts last
pub const DEFAULT_ORDER: u32 = 9999;

/// Marker file that turns a folder into a chapter
pub const CHAPTER_CONFIG_FILENAME: &str = ".chapterconf";

/// Name of the navigation index generated in every chapter folder
pub const INDEX_FILENAME: &str = "index.rst";

/// Master index template, relative to the root directory
pub const TEMPLATE_FILENAME: &str = "index_template.rst";

/// Token in the template that is replaced by the chapter links
pub const PLACEHOLDER: &str = "<<DYNAMIC_CHAPTER_LINKS>>";

/// Sub-directory of the root that holds the top-level chapters
pub const CHAPTERS_SUB_DIR: &str = "chapters";

/// Extension of generated include-list files
pub const INCLUDES_EXTENSION: &str = "rst";

/// Optional tool configuration file in the root directory
pub const CONFIG_FILENAME: &str = "tocgen.toml";

/// Number of characters scanned for reStructuredText metadata
pub const HEAD_LIMIT: usize = 1000;

/// `:maxdepth:` written into chapter toctrees
pub const TOCTREE_MAXDEPTH: u32 = 2;
