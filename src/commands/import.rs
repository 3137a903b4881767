use crate::api::{FileFormat, ImportMode};
use crate::core::config::Config;
use crate::core::storage::AppCtx;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::fs;
use std::path::Path;

use super::{open_library, prune_overrides};

/// Import prompts from a JSON or CSV file.
pub async fn run(
    ctx: &AppCtx,
    config: &Config,
    file: &str,
    mode: ImportMode,
    format: Option<FileFormat>,
    yes: bool,
) -> Result<(), String> {
    let text = fs::read_to_string(file).map_err(|e| format!("Read error: {}", e))?;
    let format = format.unwrap_or_else(|| FileFormat::infer(Path::new(file), &text));
    let mut store = open_library(ctx).await?;

    if mode == ImportMode::Replace && !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Replace all {} folders with the contents of {}?",
                store.document().folders.len(),
                file
            ))
            .default(false)
            .interact()
            .map_err(|e| format!("Confirm error: {}", e))?;
        if !confirmed {
            println!("{} cancelled", style("•").yellow().bold());
            return Ok(());
        }
    }

    let report = store
        .import(&text, format, mode)
        .await
        .map_err(|e| e.to_string())?;
    if mode == ImportMode::Replace {
        prune_overrides(ctx, config, store.document()).await?;
    }

    println!(
        "{} imported {} prompts into {} folders",
        style("•").green().bold(),
        report.prompts_added,
        report.folders_touched()
    );
    if report.duplicates_skipped > 0 {
        println!(
            "  {} {} prompts already existed and were kept as is",
            style("›").dim(),
            report.duplicates_skipped
        );
    }
    if report.rows_skipped > 0 {
        println!(
            "  {} {} rows were skipped (missing fields)",
            style("›").yellow(),
            report.rows_skipped
        );
    }
    Ok(())
}
