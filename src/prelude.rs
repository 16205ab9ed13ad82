//! Bargains prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    announcement::{announcement_text, savings_percent},
    catalog::{Merge, batch_timestamp, dedup_batch, merge},
    categories::{Category, CategoryError},
    history::{LinkedProduct, annotate},
    pages::{Emit, INDEX_PAGE_NAME, Page, PageError, PageLayout, build, page_token},
    products::{Listing, Product, ProductKey},
    selection::{choose_candidate, is_eligible},
};
