//! The single owner of the prompt library.

use serde_json::Map;
use tracing::{debug, warn};

use crate::core::model::{Document, Folder, Prompt};
use crate::core::storage::{Storage, DOCUMENT_KEY};
use crate::core::utils::{new_id, normalize_newlines};

use super::error::StoreError;

/// Visibility of one folder for a search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderMatch {
    pub folder_id: String,
    /// The folder name itself contains the term.
    pub name_matches: bool,
    /// Shown if the name matches or at least one prompt does.
    pub visible: bool,
    pub prompts: Vec<PromptMatch>,
}

/// Visibility of one prompt for a search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMatch {
    pub prompt_id: String,
    pub visible: bool,
}

/// Holds the library in memory and writes it back after every change.
///
/// If a write fails the in-memory change is kept, so the caller keeps
/// working with the latest state even though it may not survive a restart.
pub struct LibraryStore<S> {
    storage: S,
    document: Document,
}

impl<S: Storage> LibraryStore<S> {
    /// Restores the library from storage.
    ///
    /// A missing library, or one without a `folders` array, is replaced by
    /// the built-in default and persisted straight away.
    pub async fn load(storage: S) -> Result<Self, StoreError> {
        let mut stored = storage.get(&[DOCUMENT_KEY]).await?;
        let restored = match stored.remove(DOCUMENT_KEY) {
            None => None,
            Some(value) => {
                let doc = Document::from_value(&value);
                if doc.is_none() {
                    warn!("stored library is malformed, restoring the default library");
                }
                doc
            }
        };

        match restored {
            Some(document) => Ok(Self { storage, document }),
            None => {
                let store = Self {
                    storage,
                    document: Document::default_library(),
                };
                store.save().await?;
                Ok(store)
            }
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn folder(&self, folder_id: &str) -> Option<&Folder> {
        self.document.folder(folder_id)
    }

    /// First prompt with this id, in folder order.
    pub fn find_prompt(&self, prompt_id: &str) -> Option<(&Folder, &Prompt)> {
        self.document.find_prompt(prompt_id)
    }

    /// Writes the current library to storage.
    pub async fn save(&self) -> Result<(), StoreError> {
        let mut items = Map::new();
        items.insert(
            DOCUMENT_KEY.to_string(),
            serde_json::to_value(&self.document)?,
        );
        self.storage.set(items).await?;
        debug!(
            folders = self.document.folders.len(),
            prompts = self.document.prompt_count(),
            "library saved"
        );
        Ok(())
    }

    /// Appends an empty folder and returns its id.
    pub async fn create_folder(&mut self, name: &str) -> Result<String, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::validation("Folder name cannot be empty"));
        }
        let id = new_id();
        self.document.folders.push(Folder {
            id: id.clone(),
            name: name.to_string(),
            prompts: Vec::new(),
        });
        self.save().await?;
        Ok(id)
    }

    /// Renames a folder. Returns `false` when the name is blank or the folder
    /// does not exist, in which case nothing is written.
    pub async fn rename_folder(
        &mut self,
        folder_id: &str,
        new_name: &str,
    ) -> Result<bool, StoreError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Ok(false);
        }
        let Some(folder) = self.document.folder_mut(folder_id) else {
            return Ok(false);
        };
        folder.name = new_name.to_string();
        self.save().await?;
        Ok(true)
    }

    /// Removes a folder together with its prompts.
    pub async fn delete_folder(&mut self, folder_id: &str) -> Result<bool, StoreError> {
        let before = self.document.folders.len();
        self.document.folders.retain(|f| f.id != folder_id);
        if self.document.folders.len() == before {
            return Ok(false);
        }
        self.save().await?;
        Ok(true)
    }

    /// Appends a prompt to a folder and returns its id, or `None` if the
    /// folder does not exist.
    pub async fn create_prompt(
        &mut self,
        folder_id: &str,
        title: &str,
        content: &str,
    ) -> Result<Option<String>, StoreError> {
        let (title, content) = validate_prompt(title, content)?;
        let Some(folder) = self.document.folder_mut(folder_id) else {
            return Ok(None);
        };
        let id = new_id();
        folder.prompts.push(Prompt {
            id: id.clone(),
            title,
            content,
        });
        self.save().await?;
        Ok(Some(id))
    }

    /// Replaces a prompt's title and content in place.
    pub async fn update_prompt(
        &mut self,
        folder_id: &str,
        prompt_id: &str,
        title: &str,
        content: &str,
    ) -> Result<bool, StoreError> {
        let (title, content) = validate_prompt(title, content)?;
        let Some(prompt) = self
            .document
            .folder_mut(folder_id)
            .and_then(|f| f.prompt_mut(prompt_id))
        else {
            return Ok(false);
        };
        prompt.title = title;
        prompt.content = content;
        self.save().await?;
        Ok(true)
    }

    /// Removes a prompt; the folder itself stays even when it becomes empty.
    pub async fn delete_prompt(
        &mut self,
        folder_id: &str,
        prompt_id: &str,
    ) -> Result<bool, StoreError> {
        let Some(folder) = self.document.folder_mut(folder_id) else {
            return Ok(false);
        };
        let before = folder.prompts.len();
        folder.prompts.retain(|p| p.id != prompt_id);
        if folder.prompts.len() == before {
            return Ok(false);
        }
        self.save().await?;
        Ok(true)
    }

    /// Case-insensitive substring search over folder names and prompt titles.
    pub fn search(&self, term: &str) -> Vec<FolderMatch> {
        let term = term.to_lowercase();
        self.document
            .folders
            .iter()
            .map(|folder| {
                let name_matches = folder.name.to_lowercase().contains(&term);
                let prompts: Vec<PromptMatch> = folder
                    .prompts
                    .iter()
                    .map(|p| PromptMatch {
                        prompt_id: p.id.clone(),
                        visible: p.title.to_lowercase().contains(&term),
                    })
                    .collect();
                let visible = name_matches || prompts.iter().any(|p| p.visible);
                FolderMatch {
                    folder_id: folder.id.clone(),
                    name_matches,
                    visible,
                    prompts,
                }
            })
            .collect()
    }

    /// Swaps in a new library and persists it. Used by the importer once a
    /// candidate has been fully reconciled.
    pub(crate) async fn replace_document(&mut self, document: Document) -> Result<(), StoreError> {
        self.document = document;
        self.save().await
    }
}

fn validate_prompt(title: &str, content: &str) -> Result<(String, String), StoreError> {
    let title = normalize_newlines(title.trim());
    let content = normalize_newlines(content.trim());
    if title.is_empty() {
        return Err(StoreError::validation("Title cannot be empty"));
    }
    if content.is_empty() {
        return Err(StoreError::validation("Content cannot be empty"));
    }
    Ok((title, content))
}
