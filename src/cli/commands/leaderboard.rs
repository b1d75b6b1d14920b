//! Leaderboard command.

use crate::cli::Output;
use crate::config::Settings;
use crate::store::open_store;
use anyhow::Result;

/// Run the leaderboard command.
pub async fn run_leaderboard(limit: usize, settings: Settings) -> Result<()> {
    let store = open_store(&settings)?;
    let entries = store.leaderboard(limit).await?;

    if entries.is_empty() {
        Output::info("No learners yet.");
        return Ok(());
    }

    Output::header("Leaderboard");
    println!();
    for entry in &entries {
        Output::leaderboard_row(entry);
    }
    println!();
    Output::kv("Learners", &store.count().await?.to_string());

    Ok(())
}
