use std::path::PathBuf;

use clap::Args;
use jiff::Timestamp;
use tracing::info;

use bargains::{announcement::announcement_text, categories::Category};
use bargains_app::{context::AppContext, listings};

use crate::config::DatabaseConfig;

#[derive(Debug, Args)]
pub(crate) struct SyncArgs {
    /// Category the listings were scraped from (name or stored integer)
    #[arg(long, value_parser = super::parse_category)]
    pub(super) category: Category,

    /// JSON array of scraped listings
    #[arg(long)]
    pub(super) listings: PathBuf,

    #[command(flatten)]
    pub(super) database: DatabaseConfig,
}

pub(crate) async fn run(args: SyncArgs) -> Result<(), String> {
    let batch = listings::load_batch(&args.listings, args.category)
        .map_err(|error| format!("failed to load listings: {error}"))?;

    let context = AppContext::from_database_url(&args.database.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let now = context
        .catalog
        .save(batch, Timestamp::now())
        .await
        .map_err(|error| format!("failed to save listings: {error}"))?;

    let candidate = context
        .catalog
        .choose_candidate(args.category, now)
        .await
        .map_err(|error| format!("failed to choose a candidate: {error}"))?;

    let Some(product) = candidate else {
        info!(category = %args.category, "nothing new to announce");
        return Ok(());
    };

    let json = serde_json::to_string_pretty(&product)
        .map_err(|error| format!("failed to serialize candidate: {error}"))?;

    println!("{json}");
    println!("{}", announcement_text(&product));

    Ok(())
}
