use crate::api::{Clipboard, SystemClipboard};
use crate::core::storage::AppCtx;
use console::style;

use super::open_library;

/// Copy prompt content to clipboard.
pub async fn run(ctx: &AppCtx, id: &str) -> Result<(), String> {
    let store = open_library(ctx).await?;
    let (_, prompt) = store
        .find_prompt(id)
        .ok_or_else(|| format!("No prompt with ID {}", id))?;

    let mut clipboard = SystemClipboard::new().map_err(|e| e.to_string())?;
    clipboard
        .write_text(&prompt.content)
        .map_err(|e| e.to_string())?;

    println!("{} copied to clipboard", style("•").green().bold());
    Ok(())
}
