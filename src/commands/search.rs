use crate::core::storage::AppCtx;
use console::style;

use super::open_library;

/// Show folders whose name matches, or that hold a prompt whose title matches.
pub async fn run(ctx: &AppCtx, term: &str) -> Result<(), String> {
    let store = open_library(ctx).await?;
    let hits: Vec<_> = store.search(term).into_iter().filter(|h| h.visible).collect();

    if hits.is_empty() {
        println!("{}", style("No match").yellow());
        return Ok(());
    }

    println!("{}", style("Matches:").green().bold());
    for hit in hits {
        let Some(folder) = store.folder(&hit.folder_id) else {
            continue;
        };
        let marker = if hit.name_matches {
            style("•").green()
        } else {
            style("•").dim()
        };
        println!("  {} {} - {}", marker, style(&folder.id).yellow(), folder.name);
        for pm in hit.prompts.iter().filter(|p| p.visible) {
            if let Some(prompt) = folder.prompt(&pm.prompt_id) {
                println!("    {} {} - {}", style("›").green(), style(&prompt.id).dim(), prompt.title);
            }
        }
    }
    Ok(())
}
