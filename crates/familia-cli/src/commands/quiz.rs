//! The `familia quiz` and `familia flashcards` commands.
//!
//! Both read one answer per line from the given input, so they can be
//! driven interactively or from a pipe.

use std::io::BufRead;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use familia_core::content::{display_name, ContentKind};
use familia_core::quiz::{
    answer_options, build_flashcards, build_quiz, FlashcardSession, QuizSession, SessionOutcome,
};

use super::App;

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Next non-empty line of input, or `None` at end of input.
fn read_answer(input: &mut impl BufRead) -> Result<Option<String>> {
    loop {
        let mut line = String::new();
        if input.read_line(&mut line).context("failed to read answer")? == 0 {
            return Ok(None);
        }
        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(Some(answer.to_string()));
        }
    }
}

/// Map a typed answer to an option: a 1-based number or the option text.
fn pick_option(answer: &str, options: &[String]) -> String {
    if let Ok(n) = answer.parse::<usize>() {
        if (1..=options.len()).contains(&n) {
            return options[n - 1].clone();
        }
    }
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(answer))
        .cloned()
        .unwrap_or_else(|| answer.to_string())
}

fn finish(app: &App, outcome: &SessionOutcome) {
    let stats = app.tracker.record_session(outcome);
    println!(
        "\nScore: {}/{}  Stars earned: {}",
        outcome.correct, outcome.total, outcome.stars
    );
    println!("Today: {} star(s), {} word(s)", stats.stars, stats.words);
}

pub fn quiz(
    app: &App,
    kind: ContentKind,
    count: Option<usize>,
    seed: Option<u64>,
    input: &mut impl BufRead,
) -> Result<()> {
    let mut rng = rng_from(seed);
    let data = app.library.load(kind);
    let limit = count.unwrap_or(app.config.quiz.questions);

    let mut session = QuizSession::new(build_quiz(kind, &data, limit, &mut rng));
    if session.is_finished() {
        bail!("no {kind} content to quiz on");
    }

    while let Some(question) = session.current().cloned() {
        let (position, total) = session.progress();
        let options = answer_options(&question, &data, &mut rng);

        println!(
            "\nQuestion {position}/{total} ({})",
            display_name(&question.category)
        );
        println!("{}", question.question);
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }

        let Some(answer) = read_answer(input)? else {
            bail!("quiz ended before every question was answered; nothing recorded");
        };

        if session.submit(&pick_option(&answer, &options)) == Some(true) {
            println!("Correct!");
        } else {
            println!("Not quite. The answer is: {}", question.correct);
        }
    }

    if let Some(outcome) = session.outcome() {
        finish(app, &outcome);
    }
    Ok(())
}

pub fn flashcards(
    app: &App,
    count: Option<usize>,
    seed: Option<u64>,
    input: &mut impl BufRead,
) -> Result<()> {
    let mut rng = rng_from(seed);
    let vocabulary = app.library.load(ContentKind::Vocabulary);
    let phrases = app.library.load(ContentKind::Phrases);
    let limit = count.unwrap_or(app.config.quiz.flashcards);

    let mut session =
        FlashcardSession::new(build_flashcards(&vocabulary, &phrases, limit, &mut rng));
    if session.is_finished() {
        bail!("no content for flashcards");
    }

    while let Some(card) = session.current().cloned() {
        let (position, total) = session.progress();
        println!("\nCard {position}/{total} ({})", display_name(&card.category));
        if card.pronunciation.is_empty() {
            println!("{}", card.spanish);
        } else {
            println!("{}  [{}]", card.spanish, card.pronunciation);
        }
        println!("Did you know it? (y/n)");

        let Some(answer) = read_answer(input)? else {
            bail!("flashcards ended before every card was marked; nothing recorded");
        };
        let known = matches!(answer.to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí");
        println!("= {}", card.english);
        session.mark(known);
    }

    if !session.missed().is_empty() {
        println!("\nTo review:");
        for card in session.missed() {
            println!("  {} = {}", card.spanish, card.english);
        }
    }

    if let Some(outcome) = session.outcome() {
        finish(app, &outcome);
    }
    Ok(())
}
