//! Catalog

pub mod errors;
mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::*;
