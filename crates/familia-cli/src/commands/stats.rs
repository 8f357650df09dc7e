//! The `familia stats` and `familia repair` commands.

use anyhow::{bail, Result};
use comfy_table::{Cell, Table};

use familia_core::clock::parse_date_key;
use familia_core::stats::StatsSummary;

use super::App;

pub fn execute(app: &App, date: Option<String>, history: bool) -> Result<()> {
    if history {
        print_history(app);
        return Ok(());
    }

    let summary = match date {
        Some(date) => {
            if parse_date_key(&date).is_none() {
                bail!("invalid date {date:?}, expected YYYY-MM-DD");
            }
            StatsSummary::new(&date, &app.tracker.stats_for_date(&date))
        }
        None => app.tracker.summary(),
    };

    println!("Stats for {}", summary.date);
    println!("  Stars:         {}", summary.stars);
    println!("  Words:         {}", summary.words);
    println!("  Quizzes taken: {}", summary.quizzes_taken);
    println!("  Daily grade:   {}%", summary.daily_grade_percent);
    println!("  Checked words: {}", summary.checked_words);

    Ok(())
}

fn print_history(app: &App) {
    let days = app.tracker.history();
    if days.is_empty() {
        println!("No stats recorded yet.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Stars", "Words", "Quizzes", "Grade", "Checked"]);

    for (date, stats) in &days {
        let summary = StatsSummary::new(date, stats);
        table.add_row(vec![
            Cell::new(&summary.date),
            Cell::new(summary.stars),
            Cell::new(summary.words),
            Cell::new(summary.quizzes_taken),
            Cell::new(format!("{}%", summary.daily_grade_percent)),
            Cell::new(summary.checked_words),
        ]);
    }

    println!("{table}");
}

pub fn repair(app: &App) -> Result<()> {
    let repaired = app.tracker.repair_corrupted_data();
    if repaired == 0 {
        println!("Stats data is healthy, nothing to repair.");
    } else {
        println!("Repaired {repaired} day(s) of stats data.");
    }
    Ok(())
}
