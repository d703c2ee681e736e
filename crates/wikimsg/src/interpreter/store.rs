//! Message store: per-language bundles of raw message strings.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};

use crate::interpreter::error::LoadError;

/// A mapping from message key to raw locale string, per language.
///
/// The store is externally populated and read-only to the evaluator.
/// Loading a language **replaces** all of its previous messages;
/// file-loaded languages can be hot-reloaded from their recorded path.
/// Lookups fall back to English when the active language has no entry.
///
/// The bundle wire format is a JSON object mapping keys to strings; keys
/// beginning with `@` (bundle metadata) are ignored.
///
/// # Example
///
/// ```
/// use wikimsg::MessageStore;
///
/// let mut store = MessageStore::new();
/// let count = store
///     .load_str("en", r#"{ "greeting": "Hello $1!", "@metadata": {} }"#)
///     .unwrap();
/// assert_eq!(count, 1);
/// assert_eq!(store.get("en", "greeting"), Some("Hello $1!"));
/// ```
#[derive(Debug, Default)]
pub struct MessageStore {
    bundles: HashMap<String, HashMap<String, String>>,
    /// File paths for hot-reload support: language -> path.
    loaded_paths: HashMap<String, PathBuf>,
}

impl MessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a single message.
    pub fn insert(&mut self, language: &str, key: &str, raw: impl Into<String>) {
        self.bundles
            .entry(language.to_string())
            .or_default()
            .insert(key.to_string(), raw.into());
    }

    /// Look up a raw message, falling back to English.
    pub fn get(&self, language: &str, key: &str) -> Option<&str> {
        if let Some(raw) = self.bundles.get(language).and_then(|b| b.get(key)) {
            return Some(raw.as_str());
        }
        if language == "en" {
            return None;
        }
        self.bundles
            .get("en")
            .and_then(|b| b.get(key))
            .map(String::as_str)
    }

    /// Keys visible to a language (its own plus the English fallback),
    /// sorted and deduplicated.
    pub fn keys(&self, language: &str) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for lang in [language, "en"] {
            if let Some(bundle) = self.bundles.get(lang) {
                keys.extend(bundle.keys().cloned());
            }
        }
        keys.sort();
        keys.dedup();
        keys
    }

    /// Number of messages loaded for a language.
    pub fn message_count(&self, language: &str) -> usize {
        self.bundles.get(language).map_or(0, HashMap::len)
    }

    /// Load a JSON bundle from a string for a specific language.
    ///
    /// Bundles loaded this way cannot be reloaded via [`reload`](Self::reload).
    pub fn load_str(&mut self, language: &str, json: &str) -> Result<usize, LoadError> {
        self.loaded_paths.remove(language);
        self.load_str_internal(language, json, None)
    }

    /// Load a JSON bundle from a file for a specific language.
    ///
    /// The path is recorded for later [`reload`](Self::reload) support.
    pub fn load_file(
        &mut self,
        language: &str,
        path: impl AsRef<Path>,
    ) -> Result<usize, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let count = self.load_str_internal(language, &content, Some(path))?;
        self.loaded_paths
            .insert(language.to_string(), path.to_path_buf());
        Ok(count)
    }

    /// Hot-reload a language's bundle from its original file path.
    pub fn reload(&mut self, language: &str) -> Result<usize, LoadError> {
        let path = self.loaded_paths.get(language).cloned().ok_or_else(|| {
            LoadError::NoPathForReload {
                language: language.to_string(),
            }
        })?;
        self.load_file(language, path)
    }

    fn load_str_internal(
        &mut self,
        language: &str,
        json: &str,
        path: Option<&Path>,
    ) -> Result<usize, LoadError> {
        let bundle_path = || {
            path.map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(format!("<{language}>")))
        };

        let parsed: Map<String, JsonValue> =
            serde_json::from_str(json).map_err(|e| LoadError::Parse {
                path: bundle_path(),
                line: e.line(),
                column: e.column(),
                message: e.to_string(),
            })?;

        let mut messages: HashMap<String, String> = HashMap::new();
        for (key, value) in parsed {
            if key.starts_with('@') {
                continue;
            }
            match value {
                JsonValue::String(raw) => {
                    messages.insert(key, raw);
                }
                _ => {
                    return Err(LoadError::Parse {
                        path: bundle_path(),
                        line: 0,
                        column: 0,
                        message: format!("message '{key}' is not a string"),
                    });
                }
            }
        }

        let count = messages.len();
        self.bundles.insert(language.to_string(), messages);
        Ok(count)
    }
}
