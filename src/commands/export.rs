use crate::api::{self, FileFormat};
use crate::core::storage::AppCtx;
use console::style;
use std::fs;

use super::open_library;

/// Export the library to a JSON or CSV file.
pub async fn run(ctx: &AppCtx, format: FileFormat, out: Option<&str>) -> Result<(), String> {
    let store = open_library(ctx).await?;
    let body = api::export(store.document(), format).map_err(|e| e.to_string())?;

    let path = match out {
        Some(p) => p.to_string(),
        None => api::default_file_name(format, chrono::Local::now().date_naive()),
    };
    fs::write(&path, body).map_err(|e| format!("Write error: {}", e))?;

    println!(
        "{} exported {} prompts to {}",
        style("•").green().bold(),
        store.document().prompt_count(),
        style(&path).yellow()
    );
    Ok(())
}
