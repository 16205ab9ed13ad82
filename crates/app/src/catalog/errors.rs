//! Catalog service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// Errors raised by [`CatalogService`](crate::catalog::CatalogService) operations.
#[derive(Debug, Error)]
pub enum CatalogServiceError {
    /// A row with the same key already exists.
    #[error("product already exists")]
    AlreadyExists,

    /// No product has the requested key.
    #[error("product not found")]
    NotFound,

    /// The product was announced before.
    #[error("product has already been published")]
    AlreadyPublished,

    /// A save was requested with no listings.
    #[error("listing batch is empty")]
    EmptyBatch,

    /// A foreign key did not resolve.
    #[error("related resource not found")]
    InvalidReference,

    /// A required column was null.
    #[error("missing required data")]
    MissingRequiredData,

    /// A row failed a table constraint.
    #[error("invalid data")]
    InvalidData,

    /// The batch timestamp could not be truncated.
    #[error("batch timestamp out of range")]
    Timestamp(#[from] jiff::Error),

    /// Any other database failure.
    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CatalogServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let error = CatalogServiceError::from(Error::RowNotFound);

        assert!(
            matches!(error, CatalogServiceError::NotFound),
            "expected NotFound, got {error:?}"
        );
    }

    #[test]
    fn test_other_errors_are_storage_errors() {
        let error = CatalogServiceError::from(Error::PoolTimedOut);

        assert!(
            matches!(error, CatalogServiceError::Sql(Error::PoolTimedOut)),
            "expected Sql, got {error:?}"
        );
    }
}
