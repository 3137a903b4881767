use crate::core::storage::AppCtx;
use console::style;
use dialoguer::{theme::ColorfulTheme, Editor, Input};

use super::{open_library, resolve_folder};

/// Create a new prompt, asking for whatever was not given on the command line.
pub async fn run(
    ctx: &AppCtx,
    folder: &str,
    title: Option<String>,
    content: Option<String>,
) -> Result<(), String> {
    let mut store = open_library(ctx).await?;
    let folder_id = resolve_folder(store.document(), folder)?;

    let title = match title {
        Some(t) => t,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Title")
            .interact_text()
            .map_err(|e| format!("Title error: {}", e))?,
    };
    if title.trim().is_empty() {
        return Err("Title cannot be empty".to_string());
    }

    let content = match content {
        Some(c) => c,
        None => Editor::new()
            .edit("Enter your prompt content here.")
            .map_err(|e| format!("Editor error: {}", e))?
            .unwrap_or_default(),
    };

    let id = store
        .create_prompt(&folder_id, &title, &content)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("No folder with ID {}", folder_id))?;

    println!(
        "{} Prompt saved with ID {} and title '{}'",
        style("•").green().bold(),
        style(&id).yellow(),
        title.trim()
    );
    Ok(())
}
