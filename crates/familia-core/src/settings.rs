//! User preferences kept in the store: theme and chat endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::keys;
use crate::store::Store;

pub const DEFAULT_CHAT_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_CHAT_MODEL: &str = "llama2";

/// Display theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// Interpret a stored theme value. Older versions saved the theme as a
    /// string, sometimes JSON-encoded twice.
    fn from_stored(text: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Bool(dark)) => Some(Self::from_flag(dark)),
            Ok(Value::String(inner)) => Self::from_stored(&inner).or_else(|| Self::from_word(&inner)),
            Ok(_) => None,
            Err(_) => Self::from_word(text),
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "dark" | "true" => Some(Theme::Dark),
            "light" | "false" => Some(Theme::Light),
            _ => None,
        }
    }

    fn from_flag(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_word(s).ok_or_else(|| format!("unknown theme: {s}"))
    }
}

/// Where chat requests go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSettings {
    pub endpoint: String,
    pub model: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }
}

/// Reads and writes preferences through the store.
#[derive(Clone)]
pub struct Settings {
    store: Store,
}

impl Settings {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// The saved theme, light when unset or unreadable.
    ///
    /// A legacy string value is rewritten as a boolean the first time it is
    /// read.
    pub fn theme(&self) -> Theme {
        let Some(text) = self.store.load_text(keys::THEME) else {
            return Theme::default();
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Bool(dark)) => Theme::from_flag(dark),
            _ => match Theme::from_stored(&text) {
                Some(theme) => {
                    info!(stored = %text, theme = %theme, "migrating legacy theme value");
                    self.set_theme(theme);
                    theme
                }
                None => {
                    debug!(stored = %text, "unrecognized theme value, using light");
                    Theme::default()
                }
            },
        }
    }

    pub fn set_theme(&self, theme: Theme) -> bool {
        self.store.save(keys::THEME, &theme.is_dark())
    }

    /// The saved chat endpoint and model, each falling back to `defaults`.
    pub fn chat(&self, defaults: &ChatSettings) -> ChatSettings {
        let read = |key: &str, fallback: &str| {
            self.store
                .load::<Option<String>>(key, None)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };
        ChatSettings {
            endpoint: read(keys::CHAT_API_ENDPOINT, &defaults.endpoint),
            model: read(keys::CHAT_MODEL_NAME, &defaults.model),
        }
    }

    /// Save whichever of endpoint and model are given.
    pub fn set_chat(&self, endpoint: Option<&str>, model: Option<&str>) -> bool {
        let mut ok = true;
        if let Some(endpoint) = endpoint {
            ok &= self.store.save(keys::CHAT_API_ENDPOINT, endpoint.trim());
        }
        if let Some(model) = model {
            ok &= self.store.save(keys::CHAT_MODEL_NAME, model.trim());
        }
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn with_raw_theme(raw: &str) -> (Arc<MemoryStore>, Settings) {
        let backend = Arc::new(MemoryStore::new());
        backend.set(keys::THEME, raw).unwrap();
        let settings = Settings::new(Store::new(backend.clone()));
        (backend, settings)
    }

    #[test]
    fn theme_defaults_to_light() {
        let settings = Settings::new(Store::in_memory());
        assert_eq!(settings.theme(), Theme::Light);
    }

    #[test]
    fn theme_is_stored_as_boolean() {
        let backend = Arc::new(MemoryStore::new());
        let settings = Settings::new(Store::new(backend.clone()));
        assert!(settings.set_theme(Theme::Dark));
        assert_eq!(backend.get(keys::THEME).unwrap().as_deref(), Some("true"));
        assert_eq!(settings.theme(), Theme::Dark);
    }

    #[test]
    fn legacy_theme_strings_are_migrated() {
        for (raw, expected) in [
            ("dark", Theme::Dark),
            ("\"dark\"", Theme::Dark),
            ("\"\\\"dark\\\"\"", Theme::Dark),
            ("\"true\"", Theme::Dark),
            ("light", Theme::Light),
            ("\"false\"", Theme::Light),
        ] {
            let (backend, settings) = with_raw_theme(raw);
            assert_eq!(settings.theme(), expected, "raw value {raw}");
            let migrated = backend.get(keys::THEME).unwrap().unwrap();
            assert_eq!(migrated, expected.is_dark().to_string());
        }
    }

    #[test]
    fn garbage_theme_is_light_and_left_alone() {
        let (backend, settings) = with_raw_theme("{\"x\":1}");
        assert_eq!(settings.theme(), Theme::Light);
        assert_eq!(backend.get(keys::THEME).unwrap().as_deref(), Some("{\"x\":1}"));
    }

    #[test]
    fn chat_settings_override_defaults() {
        let settings = Settings::new(Store::in_memory());
        let defaults = ChatSettings::default();
        assert_eq!(settings.chat(&defaults), defaults);

        settings.set_chat(None, Some("mistral"));
        let chat = settings.chat(&defaults);
        assert_eq!(chat.model, "mistral");
        assert_eq!(chat.endpoint, DEFAULT_CHAT_ENDPOINT);

        settings.set_chat(Some(" http://box:11434/api/generate "), None);
        assert_eq!(settings.chat(&defaults).endpoint, "http://box:11434/api/generate");
    }

    #[test]
    fn failed_saves_are_reported() {
        let settings = Settings::new(Store::new(Arc::new(crate::store::UnavailableStore)));
        assert!(!settings.set_theme(Theme::Dark));
        assert!(!settings.set_chat(Some("http://box/api/generate"), None));
        assert!(settings.set_chat(None, None));
    }
}
