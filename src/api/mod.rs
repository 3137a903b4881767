//! High-level API: the library store, the importer and the dispatcher.

mod bridge;
mod error;
mod export;
mod import;
mod prefs;
mod store;

pub use bridge::{Clipboard, SystemBrowser, SystemClipboard, TabOpener};
pub use error::StoreError;
pub use export::{default_file_name, export};
pub use import::{parse_candidate, reconcile, Candidate, FileFormat, ImportMode, ImportReport};
pub use prefs::{GlobalSettings, LlmPreferences};
pub use store::{FolderMatch, LibraryStore, PromptMatch};
