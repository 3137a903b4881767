use crate::core::storage::AppCtx;
use console::style;

use super::open_library;

/// List every folder with its prompts.
pub async fn run(ctx: &AppCtx) -> Result<(), String> {
    let store = open_library(ctx).await?;
    let doc = store.document();

    if doc.folders.is_empty() {
        println!("{}", style("No folders yet").green().bold());
        return Ok(());
    }

    println!(
        "{} ({} folders, {} prompts)",
        style("Prompt Library:").green().bold(),
        doc.folders.len(),
        doc.prompt_count()
    );
    for folder in &doc.folders {
        println!(
            "  {} {} - {}",
            style("•").blue(),
            style(&folder.id).yellow(),
            folder.name
        );
        for (i, prompt) in folder.prompts.iter().enumerate() {
            let prefix = if i == folder.prompts.len() - 1 {
                "  └─"
            } else {
                "  ├─"
            };
            println!("{} {} - {}", prefix, style(&prompt.id).dim(), prompt.title);
        }
    }
    Ok(())
}
