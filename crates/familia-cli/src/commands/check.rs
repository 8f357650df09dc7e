//! The `familia check` command.

use anyhow::Result;

use super::App;

pub fn execute(app: &App, id: &str) -> Result<()> {
    let checked = app.tracker.toggle_word_checked(id);
    let words = app.tracker.today_stats().words;
    if checked {
        println!("Marked {id} as known ({words} word(s) today).");
    } else {
        println!("Unmarked {id} ({words} word(s) today).");
    }
    Ok(())
}
