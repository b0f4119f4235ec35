//! Import command handler

use std::path::Path;

use crate::config::Config;
use crate::import::ImportFormat;
use crate::state::SharedState;

pub async fn cmd_import(
    config: &Config,
    path: &Path,
    user: &str,
    format: Option<ImportFormat>,
    dry_run: bool,
) -> anyhow::Result<()> {
    if !path.is_file() {
        println!("File does not exist: {}", path.display());
        return Ok(());
    }

    let state = SharedState::new(config.clone()).await?;

    if state.store.get_user_by_username(user).await?.is_none() {
        println!("User '{user}' not found.");
        println!("Use 'frases users list' to see accounts");
        return Ok(());
    }

    let format = format.unwrap_or_else(|| ImportFormat::from_path(path));
    let bytes = tokio::fs::read(path).await?;

    println!("Importing {} ({format})...", path.display());
    let summary = state
        .import_service
        .import(user, &bytes, format, dry_run)
        .await?;

    println!();
    if dry_run {
        println!("Dry run, nothing was written.");
        println!("  Would insert: {}", summary.inserted);
    } else {
        println!("  Inserted:   {}", summary.inserted);
    }
    println!("  Duplicates: {}", summary.duplicates);
    println!("  Errors:     {}", summary.errors);

    for error in &summary.error_details {
        println!("    row {}: {}", error.row, error.message);
    }

    Ok(())
}
