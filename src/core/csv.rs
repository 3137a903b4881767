//! Three-column `Folder,Title,Content` CSV reading and writing.

use tracing::warn;

use super::model::{CandidateFolder, CandidatePrompt, Document};
use crate::api::StoreError;

const REQUIRED_COLUMNS: [&str; 3] = ["folder", "title", "content"];

/// One accepted data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow {
    pub folder: String,
    pub title: String,
    pub content: String,
}

/// Result of parsing a CSV file: the grouped folders plus how many data
/// rows were rejected.
#[derive(Debug)]
pub struct ParsedCsv {
    pub folders: Vec<CandidateFolder>,
    pub skipped_rows: usize,
}

/// Splits one record into fields.
///
/// A double quote toggles the quoted state and a comma only separates
/// fields outside quotes. A field wrapped in quotes loses them, and any
/// doubled quote inside collapses to one.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        }
        if ch == ',' && !in_quotes {
            fields.push(unquote(&current));
            current.clear();
        } else {
            current.push(ch);
        }
    }
    fields.push(unquote(&current));
    fields
}

fn unquote(raw: &str) -> String {
    let field = raw.trim();
    if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        field[1..field.len() - 1].replace("\"\"", "\"")
    } else {
        field.to_string()
    }
}

/// Normalizes line endings and splits the text into records. A line that
/// ends inside an open quoted field continues on the next physical line.
/// A quote still open at the end of the text was a stray one, so the lines
/// it swallowed go back out as separate records.
pub fn split_records(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut records = Vec::new();
    let mut pending: Option<String> = None;

    for line in normalized.split('\n') {
        let record = match pending.take() {
            Some(mut open) => {
                open.push('\n');
                open.push_str(line);
                open
            }
            None => line.to_string(),
        };
        if record.matches('"').count() % 2 == 1 {
            pending = Some(record);
        } else {
            records.push(record);
        }
    }
    if let Some(unterminated) = pending {
        records.extend(unterminated.split('\n').map(str::to_string));
    }
    records
}

/// Parses CSV text into candidate folders.
///
/// Fails only when the header lacks one of the required columns. Bad data
/// rows are skipped and counted.
pub fn parse(text: &str) -> Result<ParsedCsv, StoreError> {
    let mut records = split_records(text).into_iter();
    let header = records
        .by_ref()
        .find(|r| !r.trim().is_empty())
        .ok_or_else(|| StoreError::format("file is empty"))?;

    let names: Vec<String> = tokenize_line(&header)
        .iter()
        .map(|n| n.trim().to_lowercase())
        .collect();
    let position = |col: &str| names.iter().position(|n| n == col);

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| position(*c).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(StoreError::format(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }

    let (folder_ix, title_ix, content_ix) = match (
        position("folder"),
        position("title"),
        position("content"),
    ) {
        (Some(f), Some(t), Some(c)) => (f, t, c),
        _ => return Err(StoreError::format("missing required columns")),
    };
    let max_ix = folder_ix.max(title_ix).max(content_ix);

    let mut rows = Vec::new();
    let mut skipped_rows = 0;
    for (offset, record) in records.enumerate() {
        if record.trim().is_empty() {
            continue;
        }
        let row = offset + 1;
        let fields = tokenize_line(&record);
        if fields.len() <= max_ix {
            warn!(row, fields = fields.len(), "skipping CSV row with too few fields");
            skipped_rows += 1;
            continue;
        }
        let folder = fields[folder_ix].trim();
        let title = fields[title_ix].trim();
        let content = fields[content_ix].trim();
        if folder.is_empty() || title.is_empty() || content.is_empty() {
            warn!(row, "skipping CSV row with an empty folder, title or content");
            skipped_rows += 1;
            continue;
        }
        rows.push(CandidateRow {
            folder: folder.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        });
    }

    Ok(ParsedCsv {
        folders: group_rows(rows),
        skipped_rows,
    })
}

/// Groups rows by exact folder name, keeping first-seen folder order and
/// row order inside each folder.
pub fn group_rows(rows: Vec<CandidateRow>) -> Vec<CandidateFolder> {
    let mut folders: Vec<CandidateFolder> = Vec::new();
    for row in rows {
        let prompt = CandidatePrompt {
            id: None,
            title: row.title,
            content: row.content,
        };
        match folders.iter_mut().find(|f| f.name == row.folder) {
            Some(folder) => folder.prompts.push(prompt),
            None => folders.push(CandidateFolder {
                id: None,
                name: row.folder,
                prompts: vec![prompt],
            }),
        }
    }
    folders
}

/// Quotes a field when it contains a comma, quote or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Writes one row per prompt under a `Folder,Title,Content` header.
pub fn write(doc: &Document) -> String {
    let mut lines = vec!["Folder,Title,Content".to_string()];
    for folder in &doc.folders {
        for prompt in &folder.prompts {
            lines.push(format!(
                "{},{},{}",
                escape_field(&folder.name),
                escape_field(&prompt.title),
                escape_field(&prompt.content)
            ));
        }
    }
    lines.join("\n")
}
