use crate::core::storage::AppCtx;
use console::style;

use super::open_library;

/// Print a prompt.
pub async fn run(ctx: &AppCtx, id: &str) -> Result<(), String> {
    let store = open_library(ctx).await?;
    let (folder, prompt) = store
        .find_prompt(id)
        .ok_or_else(|| format!("No prompt with ID {}", id))?;

    println!(
        "{} {} {}",
        style(&prompt.title).green().bold(),
        style("in").dim(),
        folder.name
    );
    println!("{}", prompt.content);
    Ok(())
}
