use crate::core::config::Config;
use crate::core::storage::AppCtx;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};

use super::{open_library, prune_overrides, resolve_folder};

/// Create an empty folder.
pub async fn create(ctx: &AppCtx, name: &str) -> Result<(), String> {
    let mut store = open_library(ctx).await?;
    let id = store.create_folder(name).await.map_err(|e| e.to_string())?;
    println!(
        "{} Folder '{}' created with ID {}",
        style("•").green().bold(),
        name.trim(),
        style(&id).yellow()
    );
    Ok(())
}

/// Rename a folder.
pub async fn rename(ctx: &AppCtx, reference: &str, name: &str) -> Result<(), String> {
    let mut store = open_library(ctx).await?;
    let id = resolve_folder(store.document(), reference)?;
    if store.rename_folder(&id, name).await.map_err(|e| e.to_string())? {
        println!("{} folder {} renamed", style("•").green().bold(), id);
    } else {
        println!("{} nothing to rename", style("•").yellow().bold());
    }
    Ok(())
}

/// Delete a folder and its prompts.
pub async fn delete(
    ctx: &AppCtx,
    config: &Config,
    reference: &str,
    yes: bool,
) -> Result<(), String> {
    let mut store = open_library(ctx).await?;
    let id = resolve_folder(store.document(), reference)?;
    let (name, count) = match store.folder(&id) {
        Some(f) => (f.name.clone(), f.prompts.len()),
        None => return Err(format!("No folder with ID {}", id)),
    };

    if !yes && count > 0 {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete '{}' and its {} prompt(s)?", name, count))
            .default(false)
            .interact()
            .map_err(|e| format!("Confirm error: {}", e))?;
        if !confirmed {
            println!("{} cancelled", style("•").yellow().bold());
            return Ok(());
        }
    }

    store.delete_folder(&id).await.map_err(|e| e.to_string())?;
    prune_overrides(ctx, config, store.document()).await?;
    println!("{} folder '{}' deleted", style("•").green().bold(), name);
    Ok(())
}
