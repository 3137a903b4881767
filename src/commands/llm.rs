use crate::cli::LlmCmd;
use crate::core::config::Config;
use crate::core::storage::AppCtx;
use console::style;

use super::open_preferences;

/// Manage destinations and per-prompt assignments.
pub async fn run(ctx: &AppCtx, config: &Config, command: LlmCmd) -> Result<(), String> {
    let mut prefs = open_preferences(ctx, config).await?;

    match command {
        LlmCmd::List => {
            println!("{}", style("Destinations:").green().bold());
            for (key, url) in prefs.destinations() {
                let marker = if key == prefs.default_destination() {
                    style("★").yellow()
                } else {
                    style("•").green()
                };
                println!("  {} {} - {}", marker, style(key).yellow(), url);
            }
            if !prefs.overrides().is_empty() {
                println!("{}", style("Assigned prompts:").green().bold());
                for (prompt_id, key) in prefs.overrides() {
                    println!("  {} {} → {}", style("•").green(), style(prompt_id).dim(), key);
                }
            }
        }
        LlmCmd::Set { key, url } => {
            prefs
                .set_destination(&key, &url)
                .await
                .map_err(|e| e.to_string())?;
            println!("{} destination {} saved", style("•").green().bold(), key);
        }
        LlmCmd::Remove { key } => {
            if prefs
                .remove_destination(&key)
                .await
                .map_err(|e| e.to_string())?
            {
                println!("{} destination {} removed", style("•").green().bold(), key);
            } else {
                return Err(format!("No destination named {}", key));
            }
        }
        LlmCmd::Default { key } => {
            prefs.set_default(&key).await.map_err(|e| e.to_string())?;
            println!("{} default destination is now {}", style("•").green().bold(), key);
        }
        LlmCmd::Assign { prompt_id, key } => {
            prefs
                .set_override(&prompt_id, &key)
                .await
                .map_err(|e| e.to_string())?;
            println!("{} prompt {} will be sent to {}", style("•").green().bold(), prompt_id, key);
        }
        LlmCmd::Unassign { prompt_id } => {
            prefs
                .clear_override(&prompt_id)
                .await
                .map_err(|e| e.to_string())?;
            println!(
                "{} prompt {} uses the default destination",
                style("•").green().bold(),
                prompt_id
            );
        }
    }
    Ok(())
}
