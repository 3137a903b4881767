//! Defines the command-line interface structure using clap.

use crate::api::{FileFormat, ImportMode};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "prompt-pilot",
    version,
    about = "Organize reusable prompts in folders and send them to your assistant"
)]
pub struct Cli {
    /// Data directory (defaults to ~/.prompt-pilot)
    #[arg(long, global = true, env = "PROMPT_PILOT_HOME")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// List every folder and its prompts
    List,
    /// Show folders and prompts whose name or title contains a term
    Search { term: String },
    /// Manage folders
    #[command(subcommand)]
    Folder(FolderCmd),
    /// Create a new prompt in a folder
    New {
        /// Folder ID or name
        #[arg(long)]
        folder: String,
        #[arg(long)]
        title: Option<String>,
        /// Prompt text; an editor opens when omitted
        #[arg(long)]
        content: Option<String>,
    },
    /// Show a prompt
    Get { id: String },
    /// Edit a prompt's title and content
    Edit {
        /// Folder ID or name
        folder: String,
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a prompt from a folder
    Delete {
        /// Folder ID or name
        folder: String,
        id: String,
    },
    /// Copy a prompt's content to the clipboard
    Copy { id: String },
    /// Copy a prompt and open its destination in the browser
    Send {
        id: String,
        /// Destination to use instead of the prompt's configured one
        #[arg(long)]
        to: Option<String>,
    },
    /// Export the whole library
    Export {
        #[arg(long, value_enum, default_value_t = FileFormat::Json)]
        format: FileFormat,
        /// Output file path (defaults to promptpilot-export-<date>.<ext>)
        #[arg(long)]
        out: Option<String>,
    },
    /// Import prompts from a JSON or CSV file
    Import {
        file: String,
        #[arg(long, value_enum, default_value_t = ImportMode::Merge)]
        mode: ImportMode,
        /// Force the file format instead of inferring it
        #[arg(long, value_enum)]
        format: Option<FileFormat>,
        /// Skip the confirmation before replacing the library
        #[arg(long)]
        yes: bool,
    },
    /// Manage where prompts are sent
    #[command(subcommand)]
    Llm(LlmCmd),
}

#[derive(Subcommand)]
pub enum FolderCmd {
    /// Create an empty folder
    New { name: String },
    /// Rename a folder
    Rename {
        /// Folder ID or name
        folder: String,
        name: String,
    },
    /// Delete a folder and every prompt in it
    Delete {
        /// Folder ID or name
        folder: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum LlmCmd {
    /// List destinations, the default and per-prompt assignments
    List,
    /// Add or change a destination URL
    Set { key: String, url: String },
    /// Remove a destination
    Remove { key: String },
    /// Choose the default destination
    Default { key: String },
    /// Always send a prompt to a given destination
    Assign { prompt_id: String, key: String },
    /// Send a prompt to the default destination again
    Unassign { prompt_id: String },
}
