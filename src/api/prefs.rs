//! Where prompts get sent: the destination table, the default destination
//! and per-prompt overrides.

use serde::{Deserialize, Serialize};
use serde_json::Map;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::core::config::Config;
use crate::core::model::{Document, Prompt};
use crate::core::storage::{Storage, GLOBAL_SETTINGS_KEY, PROMPT_OVERRIDES_KEY};

use super::bridge::{Clipboard, TabOpener};
use super::error::StoreError;

const BUILTIN_DESTINATIONS: [(&str, &str); 4] = [
    ("chatgpt", "https://chat.openai.com/"),
    ("claude", "https://claude.ai/new"),
    ("gemini", "https://gemini.google.com/app"),
    ("perplexity", "https://www.perplexity.ai/"),
];

/// Destination table plus the key used when a prompt has no override.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GlobalSettings {
    #[serde(default)]
    pub destinations: BTreeMap<String, String>,
    pub default_destination: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            destinations: BUILTIN_DESTINATIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            default_destination: "chatgpt".to_string(),
        }
    }
}

impl GlobalSettings {
    /// Built-in destinations with the config file's table layered on top.
    pub fn from_config(config: &Config) -> Self {
        let mut settings = Self::default();
        for (key, url) in &config.destinations {
            settings.destinations.insert(normalize_key(key), url.trim().to_string());
        }
        if let Some(default) = &config.default_destination {
            settings.default_destination = normalize_key(default);
        }
        settings
    }
}

/// Destination preferences, persisted separately from the library.
pub struct LlmPreferences<S> {
    storage: S,
    global: GlobalSettings,
    overrides: BTreeMap<String, String>,
}

impl<S: Storage> LlmPreferences<S> {
    /// Restores the stored preferences. When nothing is stored yet the
    /// config file seeds them; config destinations missing from a stored
    /// table are added.
    pub async fn load(storage: S, config: &Config) -> Result<Self, StoreError> {
        let mut stored = storage
            .get(&[GLOBAL_SETTINGS_KEY, PROMPT_OVERRIDES_KEY])
            .await?;
        let seeded = GlobalSettings::from_config(config);

        let global = match stored.remove(GLOBAL_SETTINGS_KEY) {
            None => seeded,
            Some(value) => match serde_json::from_value::<GlobalSettings>(value) {
                Ok(mut global) => {
                    for (key, url) in seeded.destinations {
                        global.destinations.entry(key).or_insert(url);
                    }
                    global
                }
                Err(e) => {
                    warn!(error = %e, "stored destination settings are malformed, using defaults");
                    seeded
                }
            },
        };

        let overrides = match stored.remove(PROMPT_OVERRIDES_KEY) {
            None => BTreeMap::new(),
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(error = %e, "stored prompt overrides are malformed, ignoring them");
                BTreeMap::new()
            }),
        };

        Ok(Self {
            storage,
            global,
            overrides,
        })
    }

    pub fn destinations(&self) -> &BTreeMap<String, String> {
        &self.global.destinations
    }

    pub fn default_destination(&self) -> &str {
        &self.global.default_destination
    }

    pub fn overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides
    }

    /// Writes both the global settings and the overrides.
    pub async fn save(&self) -> Result<(), StoreError> {
        let mut items = Map::new();
        items.insert(
            GLOBAL_SETTINGS_KEY.to_string(),
            serde_json::to_value(&self.global)?,
        );
        items.insert(
            PROMPT_OVERRIDES_KEY.to_string(),
            serde_json::to_value(&self.overrides)?,
        );
        self.storage.set(items).await?;
        debug!(
            destinations = self.global.destinations.len(),
            overrides = self.overrides.len(),
            "destination settings saved"
        );
        Ok(())
    }

    /// Adds or replaces a destination.
    pub async fn set_destination(&mut self, key: &str, url: &str) -> Result<(), StoreError> {
        let key = normalize_key(key);
        let url = url.trim();
        if key.is_empty() {
            return Err(StoreError::validation("Destination name cannot be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(StoreError::validation(format!(
                "Destination URL must start with http:// or https://, got '{}'",
                url
            )));
        }
        self.global.destinations.insert(key, url.to_string());
        self.save().await
    }

    /// Removes a destination and any override pointing at it. The default
    /// destination cannot be removed.
    pub async fn remove_destination(&mut self, key: &str) -> Result<bool, StoreError> {
        let key = normalize_key(key);
        if key == self.global.default_destination {
            return Err(StoreError::config(format!(
                "'{}' is the default destination; choose another default first",
                key
            )));
        }
        if self.global.destinations.remove(&key).is_none() {
            return Ok(false);
        }
        self.overrides.retain(|_, dest| *dest != key);
        self.save().await?;
        Ok(true)
    }

    pub async fn set_default(&mut self, key: &str) -> Result<(), StoreError> {
        let key = self.known_key(key)?;
        self.global.default_destination = key;
        self.save().await
    }

    /// Sends this prompt somewhere other than the default.
    pub async fn set_override(&mut self, prompt_id: &str, key: &str) -> Result<(), StoreError> {
        let key = self.known_key(key)?;
        self.overrides.insert(prompt_id.to_string(), key);
        self.save().await
    }

    pub async fn clear_override(&mut self, prompt_id: &str) -> Result<bool, StoreError> {
        if self.overrides.remove(prompt_id).is_none() {
            return Ok(false);
        }
        self.save().await?;
        Ok(true)
    }

    /// Drops overrides whose prompt is no longer in the library. Returns how
    /// many were dropped; storage is only written when that is non-zero.
    pub async fn prune_overrides(&mut self, doc: &Document) -> Result<usize, StoreError> {
        let before = self.overrides.len();
        self.overrides
            .retain(|prompt_id, _| doc.find_prompt(prompt_id).is_some());
        let removed = before - self.overrides.len();
        if removed > 0 {
            self.save().await?;
            debug!(removed, "stale prompt overrides dropped");
        }
        Ok(removed)
    }

    /// The override for this prompt if one is set, else the default.
    pub fn resolve_destination(&self, prompt_id: &str) -> &str {
        self.overrides
            .get(prompt_id)
            .map(String::as_str)
            .unwrap_or(self.global.default_destination.as_str())
    }

    pub fn url_for(&self, key: &str) -> Result<&str, StoreError> {
        let key = normalize_key(key);
        self.global
            .destinations
            .get(&key)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                StoreError::config(format!("No URL configured for destination '{}'", key))
            })
    }

    /// Copies the prompt to the clipboard and opens the destination.
    ///
    /// Returns the URL that was opened. Delivery stops at the clipboard: the
    /// user pastes the text on the destination page.
    pub fn dispatch(
        &self,
        prompt: &Prompt,
        destination: &str,
        clipboard: &mut impl Clipboard,
        tabs: &impl TabOpener,
    ) -> Result<String, StoreError> {
        let url = self.url_for(destination)?.to_string();
        clipboard.write_text(&prompt.content)?;
        tabs.open_url(&url)?;
        info!(prompt = %prompt.id, destination, %url, "prompt dispatched");
        Ok(url)
    }

    fn known_key(&self, key: &str) -> Result<String, StoreError> {
        let key = normalize_key(key);
        if self.global.destinations.contains_key(&key) {
            Ok(key)
        } else {
            Err(StoreError::config(format!("Unknown destination '{}'", key)))
        }
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStorage;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingClipboard(Vec<String>);

    impl Clipboard for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), StoreError> {
            self.0.push(text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingTabs(RefCell<Vec<String>>);

    impl TabOpener for RecordingTabs {
        fn open_url(&self, url: &str) -> Result<(), StoreError> {
            self.0.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    fn prompt() -> Prompt {
        Prompt {
            id: "p1".into(),
            title: "Greeting".into(),
            content: "Say hello".into(),
        }
    }

    #[tokio::test]
    async fn override_wins_over_default() {
        let mut prefs = LlmPreferences::load(MemoryStorage::new(), &Config::default())
            .await
            .unwrap();
        assert_eq!(prefs.resolve_destination("p1"), "chatgpt");
        prefs.set_override("p1", "Claude").await.unwrap();
        assert_eq!(prefs.resolve_destination("p1"), "claude");
        assert_eq!(prefs.resolve_destination("p2"), "chatgpt");
        assert!(prefs.clear_override("p1").await.unwrap());
        assert_eq!(prefs.resolve_destination("p1"), "chatgpt");
    }

    #[tokio::test]
    async fn dispatch_copies_then_opens() {
        let prefs = LlmPreferences::load(MemoryStorage::new(), &Config::default())
            .await
            .unwrap();
        let mut clipboard = RecordingClipboard::default();
        let tabs = RecordingTabs::default();
        let url = prefs
            .dispatch(&prompt(), "gemini", &mut clipboard, &tabs)
            .unwrap();
        assert_eq!(url, "https://gemini.google.com/app");
        assert_eq!(clipboard.0, vec!["Say hello"]);
        assert_eq!(tabs.0.borrow().as_slice(), ["https://gemini.google.com/app"]);
    }

    #[tokio::test]
    async fn dispatch_to_unknown_destination_is_a_config_error() {
        let prefs = LlmPreferences::load(MemoryStorage::new(), &Config::default())
            .await
            .unwrap();
        let mut clipboard = RecordingClipboard::default();
        let tabs = RecordingTabs::default();
        let err = prefs
            .dispatch(&prompt(), "nowhere", &mut clipboard, &tabs)
            .unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
        assert!(clipboard.0.is_empty());
        assert!(tabs.0.borrow().is_empty());
    }

    #[tokio::test]
    async fn settings_survive_reload() {
        let storage = MemoryStorage::new();
        let mut prefs = LlmPreferences::load(storage.clone(), &Config::default())
            .await
            .unwrap();
        prefs
            .set_destination("mistral", "https://chat.mistral.ai/chat")
            .await
            .unwrap();
        prefs.set_default("mistral").await.unwrap();
        prefs.set_override("p9", "claude").await.unwrap();

        let reloaded = LlmPreferences::load(storage, &Config::default()).await.unwrap();
        assert_eq!(reloaded.default_destination(), "mistral");
        assert_eq!(reloaded.url_for("MISTRAL").unwrap(), "https://chat.mistral.ai/chat");
        assert_eq!(reloaded.resolve_destination("p9"), "claude");
    }

    #[tokio::test]
    async fn config_seeds_and_fills_gaps() {
        let config = Config {
            log_level: None,
            destinations: [("mistral".to_string(), "https://chat.mistral.ai/chat".to_string())]
                .into_iter()
                .collect(),
            default_destination: Some("mistral".to_string()),
        };
        let fresh = LlmPreferences::load(MemoryStorage::new(), &config).await.unwrap();
        assert_eq!(fresh.default_destination(), "mistral");

        let storage = MemoryStorage::new().with(
            GLOBAL_SETTINGS_KEY,
            json!({ "destinations": { "claude": "https://claude.ai/new" }, "default_destination": "claude" }),
        );
        let stored = LlmPreferences::load(storage, &config).await.unwrap();
        assert_eq!(stored.default_destination(), "claude");
        assert!(stored.destinations().contains_key("mistral"));
    }

    #[tokio::test]
    async fn invalid_changes_are_rejected() {
        let mut prefs = LlmPreferences::load(MemoryStorage::new(), &Config::default())
            .await
            .unwrap();
        assert!(matches!(
            prefs.set_destination("x", "ftp://nope").await,
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            prefs.set_destination("  ", "https://x.test").await,
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            prefs.set_default("nowhere").await,
            Err(StoreError::Config(_))
        ));
        assert!(matches!(
            prefs.remove_destination("chatgpt").await,
            Err(StoreError::Config(_))
        ));
    }

    #[tokio::test]
    async fn overrides_for_deleted_prompts_are_pruned() {
        let storage = MemoryStorage::new();
        let mut prefs = LlmPreferences::load(storage.clone(), &Config::default())
            .await
            .unwrap();
        let doc = Document::default_library();
        prefs.set_override("2-1", "claude").await.unwrap();
        prefs.set_override("gone", "gemini").await.unwrap();

        assert_eq!(prefs.prune_overrides(&doc).await.unwrap(), 1);
        assert_eq!(prefs.prune_overrides(&doc).await.unwrap(), 0);
        assert_eq!(prefs.resolve_destination("gone"), "chatgpt");

        let reloaded = LlmPreferences::load(storage, &Config::default()).await.unwrap();
        let kept: Vec<&str> = reloaded.overrides().keys().map(String::as_str).collect();
        assert_eq!(kept, vec!["2-1"]);
    }

    #[tokio::test]
    async fn removing_a_destination_clears_its_overrides() {
        let mut prefs = LlmPreferences::load(MemoryStorage::new(), &Config::default())
            .await
            .unwrap();
        prefs.set_override("p1", "perplexity").await.unwrap();
        assert!(prefs.remove_destination("perplexity").await.unwrap());
        assert!(!prefs.remove_destination("perplexity").await.unwrap());
        assert!(prefs.overrides().is_empty());
    }
}
