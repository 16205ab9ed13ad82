//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    catalog::{CatalogService, PgCatalogService},
    database::{self, Db},
};

/// Errors raised while building the [`AppContext`].
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The database was unreachable.
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Services shared by the CLI commands.
#[derive(Clone)]
pub struct AppContext {
    /// Catalog service.
    pub catalog: Arc<dyn CatalogService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self {
            catalog: Arc::new(PgCatalogService::new(Db::new(pool))),
        })
    }
}
