//! The `familia init` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use familia_core::content::ContentKind;

use super::App;

pub fn execute(data_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    if config_path.is_none() {
        if Path::new("familia.toml").exists() {
            println!("familia.toml already exists, skipping.");
        } else {
            std::fs::write("familia.toml", SAMPLE_CONFIG)
                .context("failed to write familia.toml")?;
            println!("Created familia.toml");
        }
    }

    let app = App::open(data_dir, config_path.as_deref())?;

    for kind in [ContentKind::Vocabulary, ContentKind::Phrases] {
        if app.library.seed_if_missing(kind)? {
            println!("Seeded built-in {kind}");
        } else {
            println!("Existing {kind} kept");
        }
    }

    println!("\nData directory: {}", app.config.data_dir.display());
    println!("\nNext steps:");
    println!("  1. Run: familia categories");
    println!("  2. Run: familia quiz");
    println!("  3. Run: familia stats");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# familia configuration

# Where stats and content are stored.
# data_dir = "${HOME}/.local/share/familia"

[chat]
endpoint = "http://localhost:11434/api/generate"
model = "llama2"
timeout_secs = 120

[quiz]
questions = 5
flashcards = 20
"#;
