//! Multiple-choice quiz and flashcard sessions.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::content::{ContentData, ContentKind};
use crate::stats::Grade;

/// Questions per quiz unless configured otherwise.
pub const DEFAULT_QUIZ_LENGTH: usize = 5;
/// Cards per flashcard session unless configured otherwise.
pub const DEFAULT_FLASHCARD_COUNT: usize = 20;
/// Wrong answers offered next to the right one.
pub const DISTRACTOR_COUNT: usize = 3;

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub correct: String,
    pub category: String,
    pub kind: ContentKind,
}

/// One flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashCard {
    pub id: String,
    pub kind: ContentKind,
    pub category: String,
    pub english: String,
    pub spanish: String,
    pub pronunciation: String,
}

/// Result of a finished quiz or flashcard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub correct: u32,
    pub total: u32,
    pub stars: u64,
}

impl SessionOutcome {
    pub fn grade(&self) -> Grade {
        Grade::new(self.correct, self.total)
    }
}

/// Stars for a quiz: 3 at 80 % or better, 2 at 60 % or better, else 1.
pub fn quiz_stars(correct: u32, total: u32) -> u64 {
    if total == 0 {
        return 1;
    }
    let percent = f64::from(correct) / f64::from(total) * 100.0;
    if percent >= 80.0 {
        3
    } else if percent >= 60.0 {
        2
    } else {
        1
    }
}

/// Stars for a flashcard session: a third of a star per known card, at
/// least one.
pub fn flashcard_stars(correct: u32, total: u32) -> u64 {
    if total == 0 {
        return 1;
    }
    let earned = (f64::from(correct) / f64::from(total) * 3.0).floor() as u64;
    earned.max(1)
}

/// The answer column a quiz of `kind` asks for.
fn answer_of(kind: ContentKind, english: &str, spanish: &str) -> String {
    match kind {
        ContentKind::Vocabulary => english.to_string(),
        ContentKind::Phrases => spanish.to_string(),
    }
}

/// Shuffle every entry of `data` into questions and keep the first `limit`.
///
/// Vocabulary asks for the English meaning of a Spanish word; phrases ask
/// for the Spanish form of an English phrase. Entries without an answer are
/// left out.
pub fn build_quiz<R: Rng + ?Sized>(
    kind: ContentKind,
    data: &ContentData,
    limit: usize,
    rng: &mut R,
) -> Vec<QuizQuestion> {
    let mut questions: Vec<QuizQuestion> = data
        .iter()
        .flat_map(|(category, entries)| {
            entries.entries.iter().map(move |entry| {
                let question = match kind {
                    ContentKind::Vocabulary => format!("What does \"{}\" mean?", entry.spanish),
                    ContentKind::Phrases => {
                        format!("How do you say \"{}\" in Spanish?", entry.english)
                    }
                };
                QuizQuestion {
                    question,
                    correct: answer_of(kind, &entry.english, &entry.spanish),
                    category: category.clone(),
                    kind,
                }
            })
        })
        .filter(|q| !q.correct.trim().is_empty())
        .collect();

    questions.shuffle(rng);
    questions.truncate(limit);
    questions
}

/// The correct answer plus up to [`DISTRACTOR_COUNT`] distinct wrong answers
/// from the same kind of content, in random order.
pub fn answer_options<R: Rng + ?Sized>(
    question: &QuizQuestion,
    data: &ContentData,
    rng: &mut R,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut wrong: Vec<String> = data
        .values()
        .flat_map(|c| c.entries.iter())
        .map(|e| answer_of(question.kind, &e.english, &e.spanish))
        .filter(|answer| !answer.trim().is_empty() && *answer != question.correct)
        .filter(|answer| seen.insert(answer.clone()))
        .collect();

    wrong.shuffle(rng);
    wrong.truncate(DISTRACTOR_COUNT);

    let mut options = wrong;
    options.push(question.correct.clone());
    options.shuffle(rng);
    options
}

/// Shuffle every vocabulary and phrase entry into cards and keep `limit`.
pub fn build_flashcards<R: Rng + ?Sized>(
    vocabulary: &ContentData,
    phrases: &ContentData,
    limit: usize,
    rng: &mut R,
) -> Vec<FlashCard> {
    let sources = [
        (ContentKind::Vocabulary, "vocab", vocabulary),
        (ContentKind::Phrases, "phrase", phrases),
    ];

    let mut cards: Vec<FlashCard> = sources
        .iter()
        .flat_map(|(kind, prefix, data)| {
            data.iter().flat_map(move |(category, entries)| {
                entries
                    .entries
                    .iter()
                    .enumerate()
                    .map(move |(index, entry)| FlashCard {
                        id: format!("{prefix}_{category}_{index}"),
                        kind: *kind,
                        category: category.clone(),
                        english: entry.english.clone(),
                        spanish: entry.spanish.clone(),
                        pronunciation: entry.pronunciation.clone(),
                    })
            })
        })
        .collect();

    cards.shuffle(rng);
    cards.truncate(limit);
    cards
}

/// A quiz in progress.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    score: u32,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current: 0,
            score: 0,
        }
    }

    /// The question awaiting an answer, if any.
    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    /// 1-based position of the current question and the quiz length.
    pub fn progress(&self) -> (usize, usize) {
        ((self.current + 1).min(self.questions.len()), self.questions.len())
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Answer the current question and move on. Returns whether the answer
    /// was right, or `None` once the quiz is over.
    pub fn submit(&mut self, answer: &str) -> Option<bool> {
        let question = self.questions.get(self.current)?;
        let correct = answer == question.correct;
        if correct {
            self.score += 1;
        }
        self.current += 1;
        Some(correct)
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }

    /// The result once every question is answered. An empty quiz has none.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        if !self.is_finished() || self.questions.is_empty() {
            return None;
        }
        let total = self.questions.len() as u32;
        Some(SessionOutcome {
            correct: self.score,
            total,
            stars: quiz_stars(self.score, total),
        })
    }
}

/// A flashcard run in progress.
#[derive(Debug, Clone)]
pub struct FlashcardSession {
    cards: Vec<FlashCard>,
    current: usize,
    known: Vec<FlashCard>,
    missed: Vec<FlashCard>,
}

impl FlashcardSession {
    pub fn new(cards: Vec<FlashCard>) -> Self {
        Self {
            cards,
            current: 0,
            known: Vec::new(),
            missed: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<&FlashCard> {
        self.cards.get(self.current)
    }

    pub fn progress(&self) -> (usize, usize) {
        ((self.current + 1).min(self.cards.len()), self.cards.len())
    }

    /// Record whether the current card was known and move on. Returns
    /// `false` once the session is over.
    pub fn mark(&mut self, known: bool) -> bool {
        let Some(card) = self.cards.get(self.current).cloned() else {
            return false;
        };
        if known {
            self.known.push(card);
        } else {
            self.missed.push(card);
        }
        self.current += 1;
        true
    }

    /// Cards marked as not known, in the order they were seen.
    pub fn missed(&self) -> &[FlashCard] {
        &self.missed
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.cards.len()
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        if !self.is_finished() || self.cards.is_empty() {
            return None;
        }
        let correct = self.known.len() as u32;
        let total = self.cards.len() as u32;
        Some(SessionOutcome {
            correct,
            total,
            stars: flashcard_stars(correct, total),
        })
    }
}
