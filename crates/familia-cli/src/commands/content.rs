//! The `familia categories`, `familia show` and `familia word-of-day` commands.

use anyhow::Result;
use comfy_table::{Cell, Table};

use familia_core::content::{display_name, word_of_the_day, ContentKind};

use super::App;

pub fn categories(app: &App, kind: ContentKind) -> Result<()> {
    let data = app.library.load(kind);
    if data.is_empty() {
        println!("No {kind} categories.");
        return Ok(());
    }

    let checked = app.tracker.today_stats().checked_words;

    let mut table = Table::new();
    table.set_header(vec!["Category", "Name", "Entries", "Known today"]);
    for (name, category) in &data {
        let known = (0..category.len())
            .filter(|&i| checked.contains(&kind.word_id(name, i)))
            .count();
        table.add_row(vec![
            Cell::new(name),
            Cell::new(display_name(name)),
            Cell::new(category.len()),
            Cell::new(known),
        ]);
    }

    println!("{table}");
    Ok(())
}

pub fn show(app: &App, kind: ContentKind, name: &str) -> Result<()> {
    let category = app.library.category(kind, name)?;
    let checked = app.tracker.today_stats().checked_words;

    println!("{} ({kind})", display_name(name));

    let mut table = Table::new();
    table.set_header(vec!["Id", "English", "Spanish", "Pronunciation", "Known"]);
    for (index, entry) in category.entries.iter().enumerate() {
        let id = kind.word_id(name, index);
        let known = if checked.contains(&id) { "yes" } else { "" };
        table.add_row(vec![
            Cell::new(&id),
            Cell::new(&entry.english),
            Cell::new(&entry.spanish),
            Cell::new(&entry.pronunciation),
            Cell::new(known),
        ]);
    }

    println!("{table}");
    Ok(())
}

pub fn word_of_day(app: &App) -> Result<()> {
    let vocabulary = app.library.load(ContentKind::Vocabulary);
    let word = word_of_the_day(&vocabulary, app.tracker.today());

    println!("Word of the day: {}", word.spanish);
    println!("  Meaning:       {}", word.english);
    if !word.pronunciation.is_empty() {
        println!("  Pronunciation: {}", word.pronunciation);
    }
    Ok(())
}
