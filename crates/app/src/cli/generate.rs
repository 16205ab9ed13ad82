use std::{num::NonZeroUsize, path::PathBuf};

use clap::Args;

use bargains::pages::Emit;
use bargains_app::{
    context::AppContext,
    export::{DEFAULT_OUTPUT_DIR, DirectorySink, ExportOptions, export_pages},
};

use crate::config::DatabaseConfig;

#[derive(Debug, Args)]
pub(crate) struct GenerateArgs {
    /// Products per page after the index page
    #[arg(long)]
    pub(super) page_size: NonZeroUsize,

    /// Write every page instead of the index and the page after it
    #[arg(long)]
    pub(super) all: bool,

    /// Directory the pages are written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub(super) output: PathBuf,

    #[command(flatten)]
    pub(super) database: DatabaseConfig,
}

pub(crate) async fn run(args: GenerateArgs) -> Result<(), String> {
    let context = AppContext::from_database_url(&args.database.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let mut sink = DirectorySink::create(&args.output)
        .map_err(|error| format!("failed to prepare output directory: {error}"))?;

    let options = ExportOptions {
        page_size: args.page_size,
        emit: if args.all { Emit::All } else { Emit::Preview },
    };

    let summary = export_pages(context.catalog.as_ref(), &mut sink, options)
        .await
        .map_err(|error| format!("failed to export pages: {error}"))?;

    println!(
        "exported {} products to {} pages in {}",
        summary.records,
        summary.pages.len(),
        args.output.display()
    );

    Ok(())
}
