use std::path::PathBuf;

use crate::config::Config;
use crate::services::activity;
use crate::services::export::{backup_filename, phrases_to_csv};
use crate::state::SharedState;

use super::CLI_ACTOR;

pub async fn cmd_export(config: &Config, output: Option<PathBuf>) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let phrases = state.phrase_service.list().await?;
    let content = phrases_to_csv(&phrases)?;

    let output = output
        .unwrap_or_else(|| PathBuf::from(backup_filename(chrono::Local::now().date_naive())));
    tokio::fs::write(&output, content).await?;

    state
        .activity
        .record(
            CLI_ACTOR,
            activity::EXPORT,
            Some(format!("{} phrases", phrases.len())),
        )
        .await;

    println!(
        "✓ Exported {} phrases to {}",
        phrases.len(),
        output.display()
    );
    Ok(())
}
