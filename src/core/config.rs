//! Loads the optional `config.toml` from the data directory.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// User configuration. Every field is optional.
///
/// ```toml
/// log_level = "info"
/// default_destination = "claude"
///
/// [destinations]
/// mistral = "https://chat.mistral.ai/chat"
/// ```
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: Option<String>,
    #[serde(default)]
    pub destinations: BTreeMap<String, String>,
    pub default_destination: Option<String>,
}

/// Reads the config file. A missing file yields the defaults; a file that
/// exists but cannot be parsed is an error.
pub fn load_config(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config.toml: {}", e))?;
    toml::from_str(&content).map_err(|e| format!("Failed to parse config.toml: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = load_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn parses_destinations_table() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            "log_level = \"debug\"\ndefault_destination = \"mistral\"\n\n[destinations]\nmistral = \"https://chat.mistral.ai/chat\"\n",
        )
        .unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert_eq!(cfg.default_destination.as_deref(), Some("mistral"));
        assert_eq!(
            cfg.destinations.get("mistral").map(String::as_str),
            Some("https://chat.mistral.ai/chat")
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "destinations = 3 = 4").unwrap();
        assert!(load_config(&path).unwrap_err().contains("Failed to parse"));
    }
}
