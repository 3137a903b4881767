//! Serializing the library for the user to save.

use chrono::NaiveDate;

use crate::core::csv;
use crate::core::model::Document;

use super::error::StoreError;
use super::import::FileFormat;

/// Renders the whole library in the requested format.
pub fn export(doc: &Document, format: FileFormat) -> Result<String, StoreError> {
    match format {
        FileFormat::Json => Ok(serde_json::to_string_pretty(doc)?),
        FileFormat::Csv => Ok(csv::write(doc)),
    }
}

/// `promptpilot-export-2024-05-01.json` style file name.
pub fn default_file_name(format: FileFormat, date: NaiveDate) -> String {
    format!(
        "promptpilot-export-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::import::{parse_candidate, reconcile, ImportMode};

    #[test]
    fn json_round_trip_preserves_everything_but_ids() {
        let original = Document::default_library();
        let text = export(&original, FileFormat::Json).unwrap();
        let mut restored = Document::default();
        let candidate = parse_candidate(&text, FileFormat::Json).unwrap();
        reconcile(&mut restored, candidate, ImportMode::Replace);

        assert_eq!(restored.folders.len(), original.folders.len());
        for (a, b) in original.folders.iter().zip(&restored.folders) {
            assert_eq!(a.name, b.name);
            let pa: Vec<_> = a.prompts.iter().map(|p| (&p.title, &p.content)).collect();
            let pb: Vec<_> = b.prompts.iter().map(|p| (&p.title, &p.content)).collect();
            assert_eq!(pa, pb);
        }
    }

    #[test]
    fn csv_export_quotes_multiline_content() {
        let text = export(&Document::default_library(), FileFormat::Csv).unwrap();
        assert!(text.starts_with("Folder,Title,Content\n"));
        assert!(text.contains("Code Review,\"Please review this code for:\n  1."));
    }

    #[test]
    fn file_name_uses_date_and_extension() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(
            default_file_name(FileFormat::Csv, date),
            "promptpilot-export-2024-05-01.csv"
        );
    }
}
