use clap::{Parser, Subcommand};

use bargains::categories::{Category, CategoryError};

use crate::config::LoggingConfig;

mod db;
mod generate;
mod publish;
mod sync;

#[derive(Debug, Parser)]
#[command(name = "bargains-app", about = "Bargains catalog CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Export the publication history as JSON pages
    Generate(generate::GenerateArgs),

    /// Save a scraped batch and pick the next product to announce
    Sync(sync::SyncArgs),

    /// Record that a product has been announced
    Publish(publish::PublishArgs),

    /// Database maintenance
    Db(db::DbCommand),
}

/// Accepts a category name (`fwrd-shoes`, `CoachBags`) or its stored integer.
fn parse_category(value: &str) -> Result<Category, CategoryError> {
    match value.parse::<i16>() {
        Ok(discriminant) => Category::try_from(discriminant),
        Err(_) => value.parse(),
    }
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Generate(args) => generate::run(args).await,
            Commands::Sync(args) => sync::run(args).await,
            Commands::Publish(args) => publish::run(args).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
