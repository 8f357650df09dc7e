//! Well-known storage keys.
//!
//! These names match the layout written by earlier releases, so an existing
//! data directory keeps working.

pub const THEME: &str = "theme";
pub const VOCABULARY_DATA: &str = "vocabularyData";
pub const PHRASES_DATA: &str = "phrasesData";
pub const DAILY_STATS: &str = "dailyStats";
/// Holds a `dailyStats` blob that could not be parsed, before it is replaced.
pub const DAILY_STATS_BACKUP: &str = "dailyStatsBackup";
pub const LAST_ACTIVE_DATE: &str = "lastActiveDate";
pub const CHAT_API_ENDPOINT: &str = "chatApiEndpoint";
pub const CHAT_MODEL_NAME: &str = "chatModelName";
