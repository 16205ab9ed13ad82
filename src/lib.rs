//! Bargains
//!
//! Catalog synchronisation and publication-history export for scraped sale
//! listings: merge a freshly scraped batch into the catalog, pick the next
//! product to announce, and slice everything announced so far into a chain of
//! static JSON pages.

pub mod announcement;
pub mod catalog;
pub mod categories;
pub mod history;
pub mod pages;
pub mod prelude;
pub mod products;
pub mod selection;
