use clap::Args;
use jiff::Timestamp;

use bargains::{categories::Category, pages::page_token, products::ProductKey};
use bargains_app::context::AppContext;

use crate::config::DatabaseConfig;

#[derive(Debug, Args)]
pub(crate) struct PublishArgs {
    /// Listing id of the announced product
    #[arg(long)]
    pub(super) id: String,

    /// Category of the announced product (name or stored integer)
    #[arg(long, value_parser = super::parse_category)]
    pub(super) category: Category,

    /// When the announcement went out; defaults to now
    #[arg(long)]
    pub(super) at: Option<Timestamp>,

    #[command(flatten)]
    pub(super) database: DatabaseConfig,
}

pub(crate) async fn run(args: PublishArgs) -> Result<(), String> {
    let context = AppContext::from_database_url(&args.database.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let at = args.at.unwrap_or_else(Timestamp::now);

    let product = context
        .catalog
        .mark_published(ProductKey::new(args.id, args.category), at)
        .await
        .map_err(|error| format!("failed to mark product published: {error}"))?;

    println!("published: {} ({})", product.id, product.category);
    println!("page_token: {}", page_token(at));

    Ok(())
}
