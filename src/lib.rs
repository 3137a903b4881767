pub mod api;
pub mod cli;
pub mod commands;
pub mod core;

pub use api::{FileFormat, ImportMode, ImportReport, LibraryStore, LlmPreferences, StoreError};
pub use crate::core::model::{Document, Folder, Prompt};
