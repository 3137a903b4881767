//! Folding an imported JSON or CSV file into the live library.

use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::core::csv;
use crate::core::model::{candidates_from_value, CandidateFolder, Document, Folder, Prompt};
use crate::core::storage::Storage;
use crate::core::utils::new_id;

use super::error::StoreError;
use super::store::LibraryStore;

/// Supported import and export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FileFormat {
    Json,
    Csv,
}

impl FileFormat {
    /// Picks the format from the file extension, falling back to the first
    /// non-blank character of the content.
    pub fn infer(path: &Path, text: &str) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => FileFormat::Json,
            Some("csv") => FileFormat::Csv,
            _ if text.trim_start().starts_with('{') => FileFormat::Json,
            _ => FileFormat::Csv,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Csv => "csv",
        }
    }
}

/// How an import is applied to the live library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ImportMode {
    /// The imported folders become the whole library.
    Replace,
    /// Unknown folders and prompts are added; existing ones are kept as is.
    #[default]
    Merge,
}

/// Folders and prompts parsed from an import file.
#[derive(Debug)]
pub struct Candidate {
    pub folders: Vec<CandidateFolder>,
    /// CSV rows rejected while parsing.
    pub skipped_rows: usize,
}

/// Outcome of an import, for user feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub folders_created: usize,
    pub folders_merged: usize,
    pub prompts_added: usize,
    pub duplicates_skipped: usize,
    pub rows_skipped: usize,
}

impl ImportReport {
    pub fn folders_touched(&self) -> usize {
        self.folders_created + self.folders_merged
    }
}

/// Parses import text without touching any library.
pub fn parse_candidate(text: &str, format: FileFormat) -> Result<Candidate, StoreError> {
    let candidate = match format {
        FileFormat::Json => {
            let value: Value = serde_json::from_str(text)
                .map_err(|e| StoreError::format(format!("not valid JSON: {}", e)))?;
            let folders = candidates_from_value(&value)
                .ok_or_else(|| StoreError::format("missing folders array"))?;
            Candidate {
                folders,
                skipped_rows: 0,
            }
        }
        FileFormat::Csv => {
            let parsed = csv::parse(text)?;
            Candidate {
                folders: parsed.folders,
                skipped_rows: parsed.skipped_rows,
            }
        }
    };

    if candidate.folders.is_empty() {
        return Err(StoreError::format("no folders found"));
    }
    Ok(candidate)
}

/// Applies a parsed candidate to a document.
///
/// Merge matches folders by case-insensitive name and prompts inside a
/// matched folder by case-insensitive title. Nothing existing is removed
/// or overwritten, and everything added gets fresh ids.
pub fn reconcile(live: &mut Document, candidate: Candidate, mode: ImportMode) -> ImportReport {
    let mut report = ImportReport {
        rows_skipped: candidate.skipped_rows,
        ..ImportReport::default()
    };

    match mode {
        ImportMode::Replace => {
            let replacement = Document::from_candidates(candidate.folders);
            report.folders_created = replacement.folders.len();
            report.prompts_added = replacement.prompt_count();
            *live = replacement;
        }
        ImportMode::Merge => {
            for incoming in candidate.folders {
                let existing = live
                    .folders
                    .iter_mut()
                    .find(|f| same_text(&f.name, &incoming.name));
                match existing {
                    Some(folder) => {
                        let mut added = 0;
                        for prompt in incoming.prompts {
                            if folder.prompts.iter().any(|p| same_text(&p.title, &prompt.title)) {
                                report.duplicates_skipped += 1;
                                continue;
                            }
                            folder.prompts.push(Prompt {
                                id: new_id(),
                                title: prompt.title,
                                content: prompt.content,
                            });
                            added += 1;
                        }
                        if added > 0 {
                            report.folders_merged += 1;
                            report.prompts_added += added;
                        }
                    }
                    None => {
                        let prompts: Vec<Prompt> = incoming
                            .prompts
                            .into_iter()
                            .map(|p| Prompt {
                                id: new_id(),
                                title: p.title,
                                content: p.content,
                            })
                            .collect();
                        report.folders_created += 1;
                        report.prompts_added += prompts.len();
                        live.folders.push(Folder {
                            id: new_id(),
                            name: incoming.name,
                            prompts,
                        });
                    }
                }
            }
        }
    }
    report
}

fn same_text(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl<S: Storage> LibraryStore<S> {
    /// Parses `text` and folds it into the library.
    ///
    /// A parse failure returns before anything is changed. The reconciled
    /// library is built on a copy and swapped in whole.
    pub async fn import(
        &mut self,
        text: &str,
        format: FileFormat,
        mode: ImportMode,
    ) -> Result<ImportReport, StoreError> {
        let candidate = parse_candidate(text, format)?;
        let mut next = self.document().clone();
        let report = reconcile(&mut next, candidate, mode);
        self.replace_document(next).await?;
        info!(
            ?mode,
            ?format,
            created = report.folders_created,
            merged = report.folders_merged,
            added = report.prompts_added,
            duplicates = report.duplicates_skipped,
            skipped_rows = report.rows_skipped,
            "import applied"
        );
        Ok(report)
    }
}
