use crate::core::storage::AppCtx;
use console::style;
use dialoguer::Editor;

use super::{open_library, resolve_folder};

/// Edit a prompt. Without `--title` or `--content` the current content is
/// opened in an editor.
pub async fn run(
    ctx: &AppCtx,
    folder: &str,
    id: &str,
    title: Option<String>,
    content: Option<String>,
) -> Result<(), String> {
    let mut store = open_library(ctx).await?;
    let folder_id = resolve_folder(store.document(), folder)?;
    let current = store
        .folder(&folder_id)
        .and_then(|f| f.prompt(id))
        .cloned()
        .ok_or_else(|| format!("No prompt with ID {} in folder {}", id, folder_id))?;

    let content = match (&title, content) {
        (_, Some(c)) => c,
        (Some(_), None) => current.content.clone(),
        (None, None) => Editor::new()
            .edit(&current.content)
            .map_err(|e| format!("Editor error: {}", e))?
            .unwrap_or_else(|| current.content.clone()),
    };
    let title = title.unwrap_or(current.title);

    store
        .update_prompt(&folder_id, id, &title, &content)
        .await
        .map_err(|e| e.to_string())?;
    println!("{} prompt {} updated", style("•").green().bold(), id);
    Ok(())
}
