//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tocgen", version)]
#[command(
    about = "Generate chapter indexes and the master table of contents for a Sphinx source tree",
    long_about = None
)]
#[command(after_help = "Settings are read from <ROOT_DIR>/tocgen.toml when it exists.")]
pub struct Cli {
    /// Documentation source directory holding the chapters folder and index template
    #[arg(short, long, default_value = ".")]
    pub root_dir: PathBuf,
}
