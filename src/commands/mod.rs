use crate::api::{LibraryStore, LlmPreferences};
use crate::cli::{Cmd, FolderCmd, LlmCmd};
use crate::core::config::Config;
use crate::core::model::Document;
use crate::core::storage::{AppCtx, FileStorage};

pub mod copy;
pub mod delete;
pub mod edit;
pub mod export;
pub mod folder;
pub mod get;
pub mod import;
pub mod list;
pub mod llm;
pub mod new;
pub mod search;
pub mod send;

/// Dispatches the parsed command to the appropriate handler.
pub async fn dispatch(command: Cmd, ctx: &AppCtx, config: &Config) -> Result<(), String> {
    match command {
        Cmd::List => list::run(ctx).await,
        Cmd::Search { term } => search::run(ctx, &term).await,
        Cmd::Folder(folder_cmd) => match folder_cmd {
            FolderCmd::New { name } => folder::create(ctx, &name).await,
            FolderCmd::Rename { folder, name } => folder::rename(ctx, &folder, &name).await,
            FolderCmd::Delete { folder, yes } => folder::delete(ctx, config, &folder, yes).await,
        },
        Cmd::New {
            folder,
            title,
            content,
        } => new::run(ctx, &folder, title, content).await,
        Cmd::Get { id } => get::run(ctx, &id).await,
        Cmd::Edit {
            folder,
            id,
            title,
            content,
        } => edit::run(ctx, &folder, &id, title, content).await,
        Cmd::Delete { folder, id } => delete::run(ctx, config, &folder, &id).await,
        Cmd::Copy { id } => copy::run(ctx, &id).await,
        Cmd::Send { id, to } => send::run(ctx, config, &id, to.as_deref()).await,
        Cmd::Export { format, out } => export::run(ctx, format, out.as_deref()).await,
        Cmd::Import {
            file,
            mode,
            format,
            yes,
        } => import::run(ctx, config, &file, mode, format, yes).await,
        Cmd::Llm(llm_cmd) => llm::run(ctx, config, llm_cmd).await,
    }
}

pub(crate) async fn open_library(ctx: &AppCtx) -> Result<LibraryStore<FileStorage>, String> {
    LibraryStore::load(ctx.storage())
        .await
        .map_err(|e| e.to_string())
}

pub(crate) async fn open_preferences(
    ctx: &AppCtx,
    config: &Config,
) -> Result<LlmPreferences<FileStorage>, String> {
    LlmPreferences::load(ctx.storage(), config)
        .await
        .map_err(|e| e.to_string())
}

/// Forgets destination overrides for prompts that left the library.
pub(crate) async fn prune_overrides(
    ctx: &AppCtx,
    config: &Config,
    doc: &Document,
) -> Result<(), String> {
    let mut prefs = open_preferences(ctx, config).await?;
    prefs.prune_overrides(doc).await.map_err(|e| e.to_string())?;
    Ok(())
}

/// Finds a folder by exact ID, falling back to a case-insensitive name that
/// matches exactly one folder.
pub(crate) fn resolve_folder(doc: &Document, reference: &str) -> Result<String, String> {
    if let Some(folder) = doc.folder(reference) {
        return Ok(folder.id.clone());
    }
    let wanted = reference.trim().to_lowercase();
    let matches: Vec<&str> = doc
        .folders
        .iter()
        .filter(|f| f.name.to_lowercase() == wanted)
        .map(|f| f.id.as_str())
        .collect();
    match matches.as_slice() {
        [id] => Ok(id.to_string()),
        [] => Err(format!("No folder with ID or name '{}'", reference)),
        _ => Err(format!(
            "Folder name '{}' is ambiguous; use one of the IDs: {}",
            reference,
            matches.join(", ")
        )),
    }
}
