//! The `familia record` command.

use anyhow::{anyhow, Result};

use familia_core::stats::Grade;

use super::App;

pub fn stars(app: &App, count: u64) -> Result<()> {
    let total = app.tracker.add_stars(count);
    println!("Added {count} star(s), {total} today.");
    Ok(())
}

pub fn words(app: &App, count: u64) -> Result<()> {
    let total = app.tracker.add_words_explored(count);
    println!("Added {count} word(s), {total} today.");
    Ok(())
}

pub fn grade(app: &App, grade: &str) -> Result<()> {
    let parsed: Grade = grade.parse().map_err(|e: String| anyhow!(e))?;
    app.tracker.add_quiz_grade(&parsed.to_string());
    println!("Recorded grade {parsed} ({:.0}%).", parsed.percent());
    Ok(())
}
