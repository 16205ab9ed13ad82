//! Persistence, export, and batch loading for the bargains catalog.

pub mod catalog;
pub mod context;
pub mod database;
pub mod export;
pub mod listings;

#[cfg(test)]
mod test;
