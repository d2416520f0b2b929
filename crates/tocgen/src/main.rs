//! Sphinx table-of-contents generator CLI

use anyhow::Result;
use clap::Parser;
use colored::*;
use tocgen::config::Config;
use tocgen::env::EnvContext;
use tocgen::errors::{print_error, print_error_with_suggestion, suggestion_for};
use tocgen::generator::Generator;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = cli.root_dir;

    println!("{} {}\n", "tocgen".bold(), format!("(root: {})", root.display()).dimmed());

    let config = match Config::load(&root) {
        Ok(config) => config,
        Err(e) => {
            print_error_with_suggestion(
                "Failed to load configuration",
                &e,
                "Check tocgen.toml against the documented keys",
            );
            std::process::exit(1);
        }
    };

    // Snapshot once so the whole run sees the same values
    let env = EnvContext::from_process();

    let summary = match Generator::new(&root, config).run(&env) {
        Ok(summary) => summary,
        Err(e) => {
            match suggestion_for(&e) {
                Some(suggestion) => {
                    print_error_with_suggestion("Generation failed", &e, &suggestion)
                }
                None => print_error("Generation failed", &e),
            }
            std::process::exit(1);
        }
    };

    let master = match &summary.master_index {
        Some(path) => path.display().to_string(),
        None => "not updated".yellow().to_string(),
    };
    println!(
        "\n{} {} chapter indexes, {} include lists, master index {}",
        "✓ Done:".green().bold(),
        summary.chapter_indexes.len(),
        summary.include_lists.len(),
        master
    );
    if summary.invalid_documents > 0 {
        println!(
            "{} {} document(s) need ordering metadata",
            "Review:".yellow().bold(),
            summary.invalid_documents
        );
    }

    Ok(())
}
