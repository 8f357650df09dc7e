//! CSV import/export for a single category.
//!
//! Export writes a fixed header followed by one fully quoted row per entry.
//! Import is line oriented: each non-blank line after the header is one row,
//! so quoted fields may contain commas but not line breaks. A line with an
//! odd number of `"` characters has an unterminated quote; it is skipped
//! (and counted) rather than allowed to swallow the lines after it.

use chrono::NaiveDate;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use tracing::warn;

use crate::clock::date_key;
use crate::content::{Category, ContentKind, Entry};
use crate::error::ContentError;

/// Header row written on export and discarded on import.
pub const HEADER: &str = "English,Spanish,Pronunciation";

/// Result of parsing CSV text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvImport {
    /// Rows that parsed into at least English and Spanish.
    pub category: Category,
    /// Non-blank data lines that were dropped.
    pub skipped: usize,
}

/// Render `category` as CSV text.
pub fn to_csv(category: &Category) -> Result<String, ContentError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for entry in &category.entries {
        writer.write_record([&entry.english, &entry.spanish, &entry.pronunciation])?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;

    let mut out = String::with_capacity(HEADER.len() + 1 + body.len());
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(&String::from_utf8_lossy(&body));
    Ok(out)
}

/// Parse CSV text into a category, skipping lines that cannot be used.
///
/// The first non-blank line is the header. Each following non-blank line
/// yields up to three fields; extra fields are ignored, a missing
/// pronunciation becomes `""`, and lines with fewer than two fields are
/// skipped. Whitespace inside a line is kept as written, including at the
/// edges of unquoted fields.
pub fn from_csv(text: &str) -> CsvImport {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    lines.next();

    let mut entries = Vec::new();
    let mut skipped = 0;

    for (index, line) in lines.enumerate() {
        let row = index + 1;

        if line.matches('"').count() % 2 == 1 {
            warn!(row, "skipping CSV line with an unterminated quote");
            skipped += 1;
            continue;
        }

        match parse_line(line) {
            Some(record) if record.len() >= 2 => entries.push(Entry {
                english: record[0].to_string(),
                spanish: record[1].to_string(),
                pronunciation: record.get(2).unwrap_or_default().to_string(),
            }),
            _ => {
                warn!(row, "skipping CSV line with fewer than two fields");
                skipped += 1;
            }
        }
    }

    CsvImport {
        category: Category::new(entries),
        skipped,
    }
}

/// [`from_csv`], rejecting text that yields no rows at all.
pub fn import_csv(text: &str) -> Result<CsvImport, ContentError> {
    let import = from_csv(text);
    if import.category.is_empty() {
        return Err(ContentError::InvalidCsv {
            skipped: import.skipped,
        });
    }
    Ok(import)
}

fn parse_line(line: &str) -> Option<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    reader.records().next()?.ok()
}

/// `{category}.csv`
pub fn export_file_name(category: &str) -> String {
    format!("{category}.csv")
}

/// `{kind}_{category}_{YYYY-MM-DD}.csv`
pub fn dated_export_file_name(kind: ContentKind, category: &str, date: NaiveDate) -> String {
    format!("{kind}_{category}_{}.csv", date_key(date))
}
