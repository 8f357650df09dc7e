//! Application configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::quiz::{DEFAULT_FLASHCARD_COUNT, DEFAULT_QUIZ_LENGTH};
use crate::settings::{ChatSettings, DEFAULT_CHAT_ENDPOINT, DEFAULT_CHAT_MODEL};

/// Chat backend defaults. Values saved with `familia chat config` win over
/// these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Full URL of the generate endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model name sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_CHAT_ENDPOINT.to_string()
}
fn default_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}
fn default_timeout() -> u64 {
    120
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ChatConfig {
    pub fn settings(&self) -> ChatSettings {
        ChatSettings {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
        }
    }
}

/// Session sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Questions per quiz.
    #[serde(default = "default_questions")]
    pub questions: usize,
    /// Cards per flashcard session.
    #[serde(default = "default_flashcards")]
    pub flashcards: usize,
}

fn default_questions() -> usize {
    DEFAULT_QUIZ_LENGTH
}
fn default_flashcards() -> usize {
    DEFAULT_FLASHCARD_COUNT
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions: default_questions(),
            flashcards: default_flashcards(),
        }
    }
}

/// Top-level familia configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamiliaConfig {
    /// Directory holding the stored JSON blobs.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
}

fn default_data_dir() -> PathBuf {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".local").join("share").join("familia"))
        .unwrap_or_else(|| PathBuf::from("./familia-data"))
}

impl Default for FamiliaConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            chat: ChatConfig::default(),
            quiz: QuizConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

/// Load config from an explicit path, or search the well-known paths:
///
/// 1. `familia.toml` in the current directory
/// 2. `~/.config/familia/config.toml`
///
/// Environment variable overrides: `FAMILIA_DATA_DIR`, `FAMILIA_CHAT_ENDPOINT`,
/// `FAMILIA_CHAT_MODEL`.
pub fn load_config_from(path: Option<&Path>) -> Result<FamiliaConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("familia.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<FamiliaConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => FamiliaConfig::default(),
    };

    if let Ok(dir) = std::env::var("FAMILIA_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(endpoint) = std::env::var("FAMILIA_CHAT_ENDPOINT") {
        config.chat.endpoint = endpoint;
    }
    if let Ok(model) = std::env::var("FAMILIA_CHAT_MODEL") {
        config.chat.model = model;
    }

    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));
    config.chat.endpoint = resolve_env_vars(&config.chat.endpoint);
    config.chat.model = resolve_env_vars(&config.chat.model);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("familia"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_FAMILIA_TEST_VAR", "hola");
        assert_eq!(resolve_env_vars("${_FAMILIA_TEST_VAR}"), "hola");
        assert_eq!(
            resolve_env_vars("prefix_${_FAMILIA_TEST_VAR}_suffix"),
            "prefix_hola_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_FAMILIA_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = FamiliaConfig::default();
        assert_eq!(config.chat.endpoint, "http://localhost:11434/api/generate");
        assert_eq!(config.chat.model, "llama2");
        assert_eq!(config.quiz.questions, 5);
        assert_eq!(config.quiz.flashcards, 20);
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
data_dir = "/srv/familia"

[chat]
model = "mistral"

[quiz]
questions = 10
"#;
        let config: FamiliaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/familia"));
        assert_eq!(config.chat.model, "mistral");
        assert_eq!(config.chat.endpoint, DEFAULT_CHAT_ENDPOINT);
        assert_eq!(config.chat.timeout_secs, 120);
        assert_eq!(config.quiz.questions, 10);
        assert_eq!(config.quiz.flashcards, 20);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/familia.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("familia.toml");
        std::fs::write(&path, "[chat]\ntimeout_secs = 5\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.chat.timeout_secs, 5);
    }

    #[test]
    fn unparsable_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[chat\n").unwrap();
        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config"));
    }
}
