//! Vocabulary and phrase content.
//!
//! A category is a list of rows (English, Spanish, pronunciation). On disk it
//! keeps the historical parallel-column shape:
//! `{"English": [...], "Spanish": [...], "Pronunciation": [...]}`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ContentError;
use crate::keys;
use crate::seed;
use crate::store::Store;
use crate::transcoder::{self, CsvImport};

/// One vocabulary word or phrase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub english: String,
    pub spanish: String,
    pub pronunciation: String,
}

impl Entry {
    pub fn new(
        english: impl Into<String>,
        spanish: impl Into<String>,
        pronunciation: impl Into<String>,
    ) -> Self {
        Self {
            english: english.into(),
            spanish: spanish.into(),
            pronunciation: pronunciation.into(),
        }
    }
}

/// An ordered list of entries sharing a category or routine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Columns", into = "Columns")]
pub struct Category {
    pub entries: Vec<Entry>,
}

impl Category {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Entry> for Category {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Persisted parallel-column form of a [`Category`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct Columns {
    #[serde(rename = "English", default)]
    english: Vec<String>,
    #[serde(rename = "Spanish", default)]
    spanish: Vec<String>,
    #[serde(rename = "Pronunciation", default)]
    pronunciation: Vec<String>,
}

impl From<Columns> for Category {
    fn from(columns: Columns) -> Self {
        // Ragged columns are padded with empty strings to the longest one.
        let len = columns
            .english
            .len()
            .max(columns.spanish.len())
            .max(columns.pronunciation.len());
        let mut english = columns.english.into_iter();
        let mut spanish = columns.spanish.into_iter();
        let mut pronunciation = columns.pronunciation.into_iter();

        (0..len)
            .map(|_| Entry {
                english: english.next().unwrap_or_default(),
                spanish: spanish.next().unwrap_or_default(),
                pronunciation: pronunciation.next().unwrap_or_default(),
            })
            .collect()
    }
}

impl From<Category> for Columns {
    fn from(category: Category) -> Self {
        let mut columns = Columns::default();
        for entry in category.entries {
            columns.english.push(entry.english);
            columns.spanish.push(entry.spanish);
            columns.pronunciation.push(entry.pronunciation);
        }
        columns
    }
}

/// Categories keyed by name.
pub type ContentData = BTreeMap<String, Category>;

/// Which content map an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Vocabulary,
    Phrases,
}

impl ContentKind {
    /// Storage key holding this kind's categories.
    pub fn storage_key(self) -> &'static str {
        match self {
            ContentKind::Vocabulary => keys::VOCABULARY_DATA,
            ContentKind::Phrases => keys::PHRASES_DATA,
        }
    }

    /// Stable identifier for row `index` of `category`, as used by the
    /// checked-word set.
    pub fn word_id(self, category: &str, index: usize) -> String {
        match self {
            ContentKind::Vocabulary => format!("{category}_{index}"),
            ContentKind::Phrases => format!("phrases_{category}_{index}"),
        }
    }

    /// Built-in starter content for this kind.
    pub fn seed(self) -> ContentData {
        match self {
            ContentKind::Vocabulary => seed::vocabulary(),
            ContentKind::Phrases => seed::phrases(),
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Vocabulary => write!(f, "vocabulary"),
            ContentKind::Phrases => write!(f, "phrases"),
        }
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vocabulary" | "vocab" | "words" => Ok(ContentKind::Vocabulary),
            "phrases" | "phrase" | "routines" => Ok(ContentKind::Phrases),
            other => Err(format!("unknown content kind: {other}")),
        }
    }
}

/// Human-friendly category name: underscores become spaces and each word is
/// capitalized (`"Family_Members"` -> `"Family Members"`).
pub fn display_name(category: &str) -> String {
    category
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The word shown for `date`: every vocabulary entry in category order,
/// indexed by day of year.
pub fn word_of_the_day(data: &ContentData, date: NaiveDate) -> Entry {
    let all: Vec<&Entry> = data.values().flat_map(|c| c.entries.iter()).collect();
    if all.is_empty() {
        return Entry::new("Family", "Familia", "fah-MEE-lee-ah");
    }
    let index = date.ordinal() as usize % all.len();
    all[index].clone()
}

/// Loads and saves vocabulary and phrase categories.
#[derive(Clone)]
pub struct ContentLibrary {
    store: Store,
}

impl ContentLibrary {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All categories of `kind`, or the built-in seed when nothing is stored.
    pub fn load(&self, kind: ContentKind) -> ContentData {
        match self.store.load::<Option<ContentData>>(kind.storage_key(), None) {
            Some(data) => data,
            None => kind.seed(),
        }
    }

    /// Persist every category of `kind`.
    pub fn save(&self, kind: ContentKind, data: &ContentData) -> Result<(), ContentError> {
        if self.store.save(kind.storage_key(), data) {
            Ok(())
        } else {
            Err(ContentError::SaveFailed(kind.storage_key().to_string()))
        }
    }

    /// Write the seed content for `kind` unless something is already stored.
    ///
    /// Returns `true` if the seed was written.
    pub fn seed_if_missing(&self, kind: ContentKind) -> Result<bool, ContentError> {
        if self.store.load_raw(kind.storage_key()).is_some() {
            return Ok(false);
        }
        self.save(kind, &kind.seed())?;
        Ok(true)
    }

    /// One category by name.
    pub fn category(&self, kind: ContentKind, name: &str) -> Result<Category, ContentError> {
        self.load(kind)
            .remove(name)
            .ok_or_else(|| ContentError::UnknownCategory {
                kind: kind.to_string(),
                name: name.to_string(),
            })
    }

    /// Replace (or create) a category.
    pub fn replace_category(
        &self,
        kind: ContentKind,
        name: &str,
        category: Category,
    ) -> Result<(), ContentError> {
        let mut data = self.load(kind);
        data.insert(name.to_string(), category);
        self.save(kind, &data)
    }

    /// Save edited table rows: fields are trimmed and rows with neither
    /// English nor Spanish text are dropped. Returns the saved row count.
    pub fn save_rows(
        &self,
        kind: ContentKind,
        name: &str,
        rows: Vec<Entry>,
    ) -> Result<usize, ContentError> {
        let category: Category = rows
            .into_iter()
            .map(|row| Entry {
                english: row.english.trim().to_string(),
                spanish: row.spanish.trim().to_string(),
                pronunciation: row.pronunciation.trim().to_string(),
            })
            .filter(|row| !row.english.is_empty() || !row.spanish.is_empty())
            .collect();
        let count = category.len();
        self.replace_category(kind, name, category)?;
        Ok(count)
    }

    /// Import CSV text into a category, replacing its rows.
    ///
    /// Nothing is written when the text has no usable rows.
    pub fn import_csv(
        &self,
        kind: ContentKind,
        name: &str,
        text: &str,
    ) -> Result<CsvImport, ContentError> {
        let import = transcoder::import_csv(text)?;
        if import.skipped > 0 {
            warn!(
                category = name,
                skipped = import.skipped,
                "some CSV lines could not be imported"
            );
        }
        self.replace_category(kind, name, import.category.clone())?;
        info!(
            kind = %kind,
            category = name,
            rows = import.category.len(),
            "imported CSV"
        );
        Ok(import)
    }

    /// Render a category as CSV.
    pub fn export_csv(&self, kind: ContentKind, name: &str) -> Result<String, ContentError> {
        let category = self.category(kind, name)?;
        transcoder::to_csv(&category)
    }
}
