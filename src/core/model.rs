//! The prompt library document and its validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::warn;

use super::utils::{new_id, normalize_newlines};

/// A titled piece of reusable text.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// A named, ordered group of prompts.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub prompts: Vec<Prompt>,
}

impl Folder {
    pub fn prompt(&self, prompt_id: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == prompt_id)
    }

    pub fn prompt_mut(&mut self, prompt_id: &str) -> Option<&mut Prompt> {
        self.prompts.iter_mut().find(|p| p.id == prompt_id)
    }
}

/// The whole persisted library. Folder order is display order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub folders: Vec<Folder>,
}

impl Document {
    /// The library a user sees on first launch.
    pub fn default_library() -> Self {
        let sample = |fid: &str, name: &str, title: &str, lines: &[&str]| Folder {
            id: fid.to_string(),
            name: name.to_string(),
            prompts: vec![Prompt {
                id: format!("{}-1", fid),
                title: title.to_string(),
                content: lines.join("\n"),
            }],
        };

        Document {
            folders: vec![
                sample(
                    "1",
                    "\u{270D}\u{FE0F} Writing Assistant",
                    "Professional Email",
                    &[
                        "Write a professional email that is concise, clear, and maintains a friendly yet formal tone. Consider the following structure:",
                        "  1. Brief greeting",
                        "  2. Clear purpose in the first sentence",
                        "  3. Necessary details in 1-2 paragraphs",
                        "  4. Specific call to action",
                        "  5. Professional closing",
                        "  ",
                        "  Make sure to:",
                        "  - Be concise and respect the recipient's time",
                        "  - Maintain a professional tone",
                        "  - Include all necessary information",
                        "  - End with a clear next step",
                    ],
                ),
                sample(
                    "2",
                    "\u{1F4BB} Code Helper",
                    "Code Review",
                    &[
                        "Please review this code for:",
                        "  1. Potential bugs and errors",
                        "  2. Performance improvements",
                        "  3. Best practices",
                        "  4. Code style and consistency",
                        "  5. Security concerns",
                        "  ",
                        "  Provide specific examples and explanations for any issues found.",
                    ],
                ),
                sample(
                    "3",
                    "\u{1F4DD} Content Creation",
                    "Blog Post Structure",
                    &[
                        "Create a well-structured blog post following this framework:",
                        "  1. Attention-grabbing introduction",
                        "  2. Clear value proposition",
                        "  3. Main points (3-5 sections)",
                        "  4. Supporting evidence and examples",
                        "  5. Actionable takeaways",
                        "  ",
                        "  Ensure to:",
                        "  - Use engaging subheadings",
                        "  - Include relevant examples",
                        "  - Maintain consistent tone",
                        "  - End with a clear conclusion",
                        "  - Add a call to action",
                    ],
                ),
            ],
        }
    }

    /// Validates an untrusted JSON value into a document.
    ///
    /// Returns `None` when the value is not an object with a `folders` array.
    /// Individual elements that cannot be coerced are dropped with a warning.
    pub fn from_value(value: &Value) -> Option<Self> {
        candidates_from_value(value).map(Document::from_candidates)
    }

    /// Accepts validated candidates, keeping their ids where they are unique
    /// and generating fresh ones otherwise.
    pub fn from_candidates(candidates: Vec<CandidateFolder>) -> Self {
        let mut folder_ids = HashSet::new();
        let folders = candidates
            .into_iter()
            .map(|c| {
                let id = unique_id(c.id, &mut folder_ids);
                let mut prompt_ids = HashSet::new();
                let prompts = c
                    .prompts
                    .into_iter()
                    .map(|p| Prompt {
                        id: unique_id(p.id, &mut prompt_ids),
                        title: p.title,
                        content: p.content,
                    })
                    .collect();
                Folder {
                    id,
                    name: c.name,
                    prompts,
                }
            })
            .collect();
        Document { folders }
    }

    pub fn folder(&self, folder_id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == folder_id)
    }

    pub fn folder_mut(&mut self, folder_id: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| f.id == folder_id)
    }

    /// First prompt with the given id, in folder order.
    pub fn find_prompt(&self, prompt_id: &str) -> Option<(&Folder, &Prompt)> {
        self.folders
            .iter()
            .find_map(|f| f.prompt(prompt_id).map(|p| (f, p)))
    }

    pub fn prompt_count(&self) -> usize {
        self.folders.iter().map(|f| f.prompts.len()).sum()
    }
}

fn unique_id(candidate: Option<String>, seen: &mut HashSet<String>) -> String {
    let mut id = candidate.unwrap_or_else(new_id);
    while !seen.insert(id.clone()) {
        id = new_id();
    }
    id
}

/// A folder read from untrusted input, validated field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFolder {
    pub id: Option<String>,
    pub name: String,
    pub prompts: Vec<CandidatePrompt>,
}

/// A prompt read from untrusted input, validated field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePrompt {
    pub id: Option<String>,
    pub title: String,
    pub content: String,
}

/// Extracts the candidate folders of a `{ "folders": [...] }` value.
pub fn candidates_from_value(value: &Value) -> Option<Vec<CandidateFolder>> {
    let folders = value.as_object()?.get("folders")?.as_array()?;
    let mut out = Vec::with_capacity(folders.len());
    for (index, raw) in folders.iter().enumerate() {
        match CandidateFolder::from_value(raw) {
            Some(folder) => out.push(folder),
            None => warn!(index, "dropping folder entry without a usable name"),
        }
    }
    Some(out)
}

impl CandidateFolder {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let name = text_field(obj, "name")?;
        let prompts = match obj.get("prompts") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(index, raw)| {
                    let prompt = CandidatePrompt::from_value(raw);
                    if prompt.is_none() {
                        warn!(folder = %name, index, "dropping prompt entry without title or content");
                    }
                    prompt
                })
                .collect(),
            _ => Vec::new(),
        };
        Some(CandidateFolder {
            id: id_field(obj),
            name,
            prompts,
        })
    }
}

impl CandidatePrompt {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(CandidatePrompt {
            id: id_field(obj),
            title: text_field(obj, "title")?,
            content: text_field(obj, "content")?,
        })
    }
}

fn id_field(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("id")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(normalize_newlines)
}
