use crate::core::config::Config;
use crate::core::storage::AppCtx;
use console::style;

use super::{open_library, prune_overrides, resolve_folder};

/// Delete a prompt.
pub async fn run(ctx: &AppCtx, config: &Config, folder: &str, id: &str) -> Result<(), String> {
    let mut store = open_library(ctx).await?;
    let folder_id = resolve_folder(store.document(), folder)?;
    if store
        .delete_prompt(&folder_id, id)
        .await
        .map_err(|e| e.to_string())?
    {
        prune_overrides(ctx, config, store.document()).await?;
        println!("{} prompt {} deleted", style("•").green().bold(), id);
        Ok(())
    } else {
        Err(format!("No prompt with ID {}", id))
    }
}
