use super::utils::ensure_dir;
use serde_json::{Map, Value};
use std::env;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::api::StoreError;

/// Storage key holding the prompt library.
pub const DOCUMENT_KEY: &str = "promptManager";
/// Storage key holding the destination table and the default destination.
pub const GLOBAL_SETTINGS_KEY: &str = "llmSettings";
/// Storage key holding per-prompt destination overrides.
pub const PROMPT_OVERRIDES_KEY: &str = "promptLlmSettings";

pub type StorageMap = Map<String, Value>;

/// A string-keyed persistent store of JSON values.
///
/// `get` returns only the requested keys that exist; `set` overwrites the
/// given keys and leaves every other key alone.
#[allow(async_fn_in_trait)]
pub trait Storage {
    async fn get(&self, keys: &[&str]) -> Result<StorageMap, StoreError>;
    async fn set(&self, items: StorageMap) -> Result<(), StoreError>;
}

/// Runtime context holding resolved paths.
pub struct AppCtx {
    pub base_dir: PathBuf,
    pub storage_path: PathBuf,
    pub config_path: PathBuf,
}

impl AppCtx {
    /// Resolves the data directory (`home` if given, else `~/.prompt-pilot`)
    /// and makes sure it exists.
    pub fn init(home: Option<&Path>) -> Result<Self, String> {
        let base_dir = match home {
            Some(dir) => dir.to_path_buf(),
            None => {
                let home = env::var("HOME")
                    .map_err(|_| "Unable to determine HOME directory".to_string())?;
                PathBuf::from(home).join(".prompt-pilot")
            }
        };
        ensure_dir(&base_dir)?;

        Ok(Self {
            storage_path: base_dir.join("storage.json"),
            config_path: base_dir.join("config.toml"),
            base_dir,
        })
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.storage_path)
    }
}

/// Keeps every key in a single JSON object on disk.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_all(&self) -> Result<StorageMap, StoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(StoreError::Storage(format!(
                    "Unable to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::Storage(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(StoreError::Storage(format!(
                "{} is corrupted: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

impl Storage for FileStorage {
    async fn get(&self, keys: &[&str]) -> Result<StorageMap, StoreError> {
        let all = self.read_all().await?;
        Ok(keys
            .iter()
            .filter_map(|k| all.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, items: StorageMap) -> Result<(), StoreError> {
        let mut all = self.read_all().await?;
        let keys: Vec<String> = items.keys().cloned().collect();
        all.extend(items);

        let body = serde_json::to_vec_pretty(&Value::Object(all))?;
        let tmp = self.path.with_extension("json.tmp");
        let write_err =
            |e: std::io::Error| StoreError::Storage(format!("Write error: {}", e));
        tokio::fs::write(&tmp, body).await.map_err(write_err)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))
                .await
                .ok();
        }
        tokio::fs::rename(&tmp, &self.path).await.map_err(write_err)?;
        debug!(path = %self.path.display(), ?keys, "storage written");
        Ok(())
    }
}

/// Process-local storage, shared between clones.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<StorageMap>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: Value) -> Self {
        self.lock().insert(key.to_string(), value);
        self
    }

    /// A copy of everything currently stored.
    pub fn snapshot(&self) -> StorageMap {
        self.lock().clone()
    }

    /// Makes every later `set` fail, to simulate an unavailable backend.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StorageMap> {
        // a poisoned map is still a valid map
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for MemoryStorage {
    async fn get(&self, keys: &[&str]) -> Result<StorageMap, StoreError> {
        let items = self.lock();
        Ok(keys
            .iter()
            .filter_map(|k| items.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, items: StorageMap) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("storage is unavailable".to_string()));
        }
        self.lock().extend(items);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path().join("storage.json"));
        let got = storage.get(&[DOCUMENT_KEY]).await.unwrap();
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn set_merges_with_existing_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("storage.json");
        let storage = FileStorage::new(&path);

        let mut first = Map::new();
        first.insert("a".into(), json!(1));
        storage.set(first).await.unwrap();

        let mut second = Map::new();
        second.insert("b".into(), json!({ "x": true }));
        storage.set(second).await.unwrap();

        let got = storage.get(&["a", "b", "c"]).await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got["a"], json!(1));
        assert_eq!(got["b"], json!({ "x": true }));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupted_file_is_a_storage_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("storage.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = FileStorage::new(&path).get(&["a"]).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
    }

    #[tokio::test]
    async fn unreadable_and_unwritable_paths_are_storage_errors() {
        let tmp = tempfile::tempdir().unwrap();
        // a directory where the file should be
        let storage = FileStorage::new(tmp.path());
        let err = storage.get(&["a"]).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));

        let missing_parent = FileStorage::new(tmp.path().join("gone").join("storage.json"));
        let err = missing_parent.set(Map::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(ref m) if m.starts_with("Write error")));
    }

    #[tokio::test]
    async fn memory_storage_shares_state_between_clones() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        let mut items = Map::new();
        items.insert("k".into(), json!("v"));
        storage.set(items).await.unwrap();
        assert_eq!(other.get(&["k"]).await.unwrap()["k"], json!("v"));

        other.set_fail_writes(true);
        assert!(storage.set(Map::new()).await.is_err());
    }

    #[test]
    fn ctx_uses_given_home() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("pilot");
        let ctx = AppCtx::init(Some(&home)).unwrap();
        assert!(home.is_dir());
        assert_eq!(ctx.storage_path, home.join("storage.json"));
        assert_eq!(ctx.config_path, home.join("config.toml"));
    }
}
