//! Daily learning statistics.
//!
//! All stats live in one JSON object under [`keys::DAILY_STATS`], keyed by
//! `YYYY-MM-DD`. Each record is read, normalized, modified and written back
//! whole. The persisted shape is never trusted: the checked-word set is
//! stored as an array and rebuilt (deduplicated) on every read, and fields of
//! the wrong type fall back to their zero value.
//!
//! A blob that cannot be read at all is left alone: mutations still report
//! their effect but write nothing, so history is never replaced by a map
//! holding only today. A blob that reads but is not a JSON object is copied
//! to [`keys::DAILY_STATS_BACKUP`] before a fresh map replaces it.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::clock::{date_key, Clock, SystemClock};
use crate::keys;
use crate::quiz::SessionOutcome;
use crate::store::Store;

/// Learning activity for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    /// Reward points earned that day.
    pub stars: u64,
    /// Words explored or checked that day.
    pub words: u64,
    /// `"correct/total"` per completed session, in completion order.
    pub grades: Vec<String>,
    /// Identifiers of rows marked as known.
    pub checked_words: BTreeSet<String>,
}

impl DailyStats {
    /// Build a record from whatever JSON was persisted, coercing every field.
    pub fn from_value(raw: &Value) -> Self {
        Self {
            stars: normalize_count(raw.get("stars")),
            words: normalize_count(raw.get("words")),
            grades: normalize_grades(raw.get("grades")),
            checked_words: normalize_checked_words(raw.get("checkedWords")),
        }
    }

    fn to_value(&self) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "failed to serialize daily stats");
                None
            }
        }
    }
}

fn normalize_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .unwrap_or(0),
        _ => 0,
    }
}

fn normalize_grades(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Rebuild the checked-word set from its persisted form.
///
/// Arrays are deduplicated, objects contribute their keys (a legacy shape
/// produced by serializing a set directly), anything else is empty.
pub fn normalize_checked_words(value: Option<&Value>) -> BTreeSet<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        _ => BTreeSet::new(),
    }
}

// ---------------------------------------------------------------------------
// Grades
// ---------------------------------------------------------------------------

/// A parsed `"correct/total"` grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub correct: u32,
    pub total: u32,
}

impl Grade {
    pub fn new(correct: u32, total: u32) -> Self {
        Self { correct, total }
    }

    /// Score as a percentage of `total`.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total) * 100.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.correct, self.total)
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (correct, total) = s
            .split_once('/')
            .ok_or_else(|| format!("grade must look like correct/total: {s:?}"))?;
        let correct: u32 = correct
            .trim()
            .parse()
            .map_err(|_| format!("invalid correct count in grade {s:?}"))?;
        let total: u32 = total
            .trim()
            .parse()
            .map_err(|_| format!("invalid total in grade {s:?}"))?;
        if total == 0 {
            return Err(format!("grade total must be positive: {s:?}"));
        }
        Ok(Self { correct, total })
    }
}

/// Dashboard view of one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub date: String,
    pub stars: u64,
    pub words: u64,
    pub quizzes_taken: usize,
    /// Rounded mean percentage over the day's parseable grades.
    pub daily_grade_percent: u32,
    pub checked_words: usize,
}

impl StatsSummary {
    pub fn new(date: &str, stats: &DailyStats) -> Self {
        let percents: Vec<f64> = stats
            .grades
            .iter()
            .filter_map(|g| g.parse::<Grade>().ok())
            .map(|g| g.percent())
            .collect();
        let daily_grade_percent = if percents.is_empty() {
            0
        } else {
            (percents.iter().sum::<f64>() / percents.len() as f64).round() as u32
        };

        Self {
            date: date.to_string(),
            stars: stats.stars,
            words: stats.words,
            quizzes_taken: stats.grades.len(),
            daily_grade_percent,
            checked_words: stats.checked_words.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Reads and updates daily stats in a [`Store`].
///
/// Mutations run under an internal lock so a tracker shared between threads
/// never loses an update. Separate processes writing the same store are not
/// coordinated.
pub struct StatsTracker {
    store: Store,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl StatsTracker {
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// A tracker using the local wall clock.
    pub fn with_system_clock(store: Store) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }

    /// Today's date according to the tracker's clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Today's date key (`YYYY-MM-DD`, local time).
    pub fn today_key(&self) -> String {
        date_key(self.today())
    }

    /// Handle day rollover: when the last active date is not today, mark
    /// today active and create a zeroed record if none exists yet.
    ///
    /// Returns `true` if a rollover happened.
    pub fn ensure_today_initialized(&self) -> bool {
        let _guard = self.lock();
        let today = self.today_key();

        let last_active: Option<String> = self.store.load(keys::LAST_ACTIVE_DATE, None);
        if last_active.as_deref() == Some(today.as_str()) {
            return false;
        }

        self.store.save(keys::LAST_ACTIVE_DATE, &today);

        if let Some(mut all) = self.load_for_update() {
            if !all.contains_key(&today) {
                if let Some(value) = DailyStats::default().to_value() {
                    all.insert(today.clone(), value);
                    self.store.save(keys::DAILY_STATS, &all);
                }
            }
        }

        info!(
            today = %today,
            previous = last_active.as_deref().unwrap_or("none"),
            "started a new day"
        );
        true
    }

    /// Normalized stats for today. Never writes.
    pub fn today_stats(&self) -> DailyStats {
        self.stats_for_date(&self.today_key())
    }

    /// Normalized stats for any date key. Never writes and never creates a
    /// record; a missing date reads as zeroed stats.
    pub fn stats_for_date(&self, date: &str) -> DailyStats {
        self.load_all()
            .get(date)
            .map(DailyStats::from_value)
            .unwrap_or_default()
    }

    /// Dashboard summary for today.
    pub fn summary(&self) -> StatsSummary {
        let today = self.today_key();
        StatsSummary::new(&today, &self.stats_for_date(&today))
    }

    /// Every stored date in ascending order, normalized.
    pub fn history(&self) -> Vec<(String, DailyStats)> {
        let mut days: Vec<(String, DailyStats)> = self
            .load_all()
            .iter()
            .map(|(date, raw)| (date.clone(), DailyStats::from_value(raw)))
            .collect();
        days.sort_by(|a, b| a.0.cmp(&b.0));
        days
    }

    /// Add reward stars to today; returns the new total.
    pub fn add_stars(&self, count: u64) -> u64 {
        self.mutate_today(|stats| {
            stats.stars = stats.stars.saturating_add(count);
            stats.stars
        })
    }

    /// Add explored words to today; returns the new total.
    ///
    /// This does not touch the checked-word set, so a word counted here and
    /// also toggled with [`toggle_word_checked`](Self::toggle_word_checked)
    /// is counted twice.
    pub fn add_words_explored(&self, count: u64) -> u64 {
        self.mutate_today(|stats| {
            stats.words = stats.words.saturating_add(count);
            stats.words
        })
    }

    /// Append a `"correct/total"` grade to today. The format is not checked.
    pub fn add_quiz_grade(&self, grade: &str) {
        self.mutate_today(|stats| stats.grades.push(grade.to_string()));
    }

    /// Flip whether `word_id` is checked today, keeping `words` in step.
    ///
    /// Returns `true` if the word is now checked.
    pub fn toggle_word_checked(&self, word_id: &str) -> bool {
        self.mutate_today(|stats| {
            if stats.checked_words.remove(word_id) {
                stats.words = stats.words.saturating_sub(1);
                false
            } else {
                stats.checked_words.insert(word_id.to_string());
                stats.words = stats.words.saturating_add(1);
                true
            }
        })
    }

    pub fn is_word_checked(&self, word_id: &str) -> bool {
        self.today_stats().checked_words.contains(word_id)
    }

    /// Record a finished quiz or flashcard session: its stars, one explored
    /// word per card, and its grade. Returns today's updated stats.
    pub fn record_session(&self, outcome: &SessionOutcome) -> DailyStats {
        self.mutate_today(|stats| {
            stats.stars = stats.stars.saturating_add(outcome.stars);
            stats.words = stats.words.saturating_add(u64::from(outcome.total));
            stats.grades.push(outcome.grade().to_string());
            stats.clone()
        })
    }

    /// Rewrite every stored record in normalized form.
    ///
    /// Persists only when something changed; returns how many dates were
    /// repaired.
    pub fn repair_corrupted_data(&self) -> usize {
        let _guard = self.lock();
        let Some(mut all) = self.load_for_update() else {
            return 0;
        };
        let mut repaired = 0;

        for (date, raw) in all.iter_mut() {
            let Some(normalized) = DailyStats::from_value(raw).to_value() else {
                continue;
            };
            if *raw != normalized {
                debug!(date = %date, "normalized stats record");
                *raw = normalized;
                repaired += 1;
            }
        }

        if repaired > 0 {
            self.store.save(keys::DAILY_STATS, &all);
            info!(repaired, "repaired corrupted stats data");
        }
        repaired
    }

    fn mutate_today<R>(&self, apply: impl FnOnce(&mut DailyStats) -> R) -> R {
        let _guard = self.lock();
        let today = self.today_key();

        let loaded = self.load_for_update();
        let mut stats = loaded
            .as_ref()
            .and_then(|all| all.get(&today))
            .map(DailyStats::from_value)
            .unwrap_or_default();

        let result = apply(&mut stats);

        let Some(mut all) = loaded else {
            return result;
        };
        if let Some(value) = stats.to_value() {
            all.insert(today.clone(), value);
            self.store.save(keys::DAILY_STATS, &all);
        }
        self.store.save(keys::LAST_ACTIVE_DATE, &today);

        result
    }

    /// Every stored record for reading; anything unreadable reads as empty.
    fn load_all(&self) -> Map<String, Value> {
        match self.store.try_load_text(keys::DAILY_STATS) {
            Ok(Some(text)) => parse_records(&text).unwrap_or_default(),
            _ => Map::new(),
        }
    }

    /// Every stored record ahead of a write, or `None` when the blob could
    /// not be read and must not be overwritten.
    fn load_for_update(&self) -> Option<Map<String, Value>> {
        let text = match self.store.try_load_text(keys::DAILY_STATS) {
            Ok(Some(text)) => text,
            Ok(None) => return Some(Map::new()),
            Err(e) => {
                warn!(error = %e, "could not read daily stats, leaving them untouched");
                return None;
            }
        };
        if let Some(all) = parse_records(&text) {
            return Some(all);
        }

        warn!(
            backup = keys::DAILY_STATS_BACKUP,
            "stored daily stats are not an object, starting fresh"
        );
        self.store
            .save(keys::DAILY_STATS_BACKUP, &text)
            .then(Map::new)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn parse_records(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(text) {
        Ok(Value::Object(all)) => Some(all),
        _ => None,
    }
}
