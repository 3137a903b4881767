use crate::api::{SystemBrowser, SystemClipboard};
use crate::core::config::Config;
use crate::core::storage::AppCtx;
use console::style;

use super::{open_library, open_preferences};

/// Copy a prompt and open its destination so it can be pasted there.
pub async fn run(ctx: &AppCtx, config: &Config, id: &str, to: Option<&str>) -> Result<(), String> {
    let store = open_library(ctx).await?;
    let prefs = open_preferences(ctx, config).await?;
    let (_, prompt) = store
        .find_prompt(id)
        .ok_or_else(|| format!("No prompt with ID {}", id))?;

    let destination = to.unwrap_or_else(|| prefs.resolve_destination(id)).to_string();
    let mut clipboard = SystemClipboard::new().map_err(|e| e.to_string())?;
    let url = prefs
        .dispatch(prompt, &destination, &mut clipboard, &SystemBrowser)
        .map_err(|e| e.to_string())?;

    println!(
        "{} '{}' copied, opening {} ({}) - paste it there",
        style("•").green().bold(),
        prompt.title,
        style(&destination).yellow(),
        url
    );
    Ok(())
}
