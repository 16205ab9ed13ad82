//! Catalog service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{Span, info};

use bargains::{
    catalog::{Merge, batch_timestamp, dedup_batch, merge},
    categories::Category,
    products::{Listing, Product, ProductKey},
    selection,
};

use crate::{
    catalog::{errors::CatalogServiceError, repository::PgCatalogRepository},
    database::Db,
};

/// [`CatalogService`] backed by the `products` table.
#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    #[tracing::instrument(
        name = "catalog.service.save",
        skip(self, batch),
        fields(
            batch_len = batch.len(),
            inserted = tracing::field::Empty,
            updated = tracing::field::Empty
        ),
        err
    )]
    async fn save(
        &self,
        batch: Vec<Listing>,
        now: Timestamp,
    ) -> Result<Timestamp, CatalogServiceError> {
        if batch.is_empty() {
            return Err(CatalogServiceError::EmptyBatch);
        }

        let now = batch_timestamp(now)?;

        let mut tx = self.db.begin().await?;

        let mut inserted = 0_usize;
        let mut updated = 0_usize;

        for listing in dedup_batch(batch) {
            let existing = self
                .repository
                .get_product_for_update(&mut tx, &listing.key())
                .await?;

            match merge(existing, listing, now) {
                Merge::Insert(product) => {
                    self.repository.insert_product(&mut tx, &product).await?;
                    inserted += 1;
                }
                Merge::Update(product) => {
                    if self.repository.update_product(&mut tx, &product).await? == 0 {
                        return Err(CatalogServiceError::NotFound);
                    }

                    updated += 1;
                }
            }
        }

        tx.commit().await?;

        let span = Span::current();

        span.record("inserted", inserted);
        span.record("updated", updated);

        info!(%now, inserted, updated, "saved listing batch");

        Ok(now)
    }

    #[tracing::instrument(
        name = "catalog.service.choose_candidate",
        skip(self),
        fields(eligible = tracing::field::Empty),
        err
    )]
    async fn choose_candidate(
        &self,
        category: Category,
        now: Timestamp,
    ) -> Result<Option<Product>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let candidates = self
            .repository
            .list_candidates(&mut tx, category, now)
            .await?;

        tx.commit().await?;

        // The query already applies the eligibility rule.
        debug_assert!(
            candidates
                .iter()
                .all(|product| selection::is_eligible(product, category, now)),
            "candidate query and eligibility rule disagree"
        );

        Span::current().record("eligible", candidates.len());

        let candidate =
            selection::choose_candidate(candidates, category, now, &mut rand::thread_rng());

        match &candidate {
            Some(product) => info!(id = %product.id, %category, "chose candidate"),
            None => info!(%category, "no eligible candidate"),
        }

        Ok(candidate)
    }

    #[tracing::instrument(
        name = "catalog.service.mark_published",
        skip(self, key),
        fields(id = %key.id, category = %key.category),
        err
    )]
    async fn mark_published(
        &self,
        key: ProductKey,
        at: Timestamp,
    ) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(product) = self.repository.mark_published(&mut tx, &key, at).await? else {
            let existing = self.repository.get_product(&mut tx, &key).await?;

            return Err(match existing {
                Some(_) => CatalogServiceError::AlreadyPublished,
                None => CatalogServiceError::NotFound,
            });
        };

        tx.commit().await?;

        info!(id = %product.id, category = %product.category, "marked product published");

        Ok(product)
    }

    #[tracing::instrument(
        name = "catalog.service.get_product",
        skip(self, key),
        fields(id = %key.id, category = %key.category),
        err
    )]
    async fn get_product(&self, key: ProductKey) -> Result<Product, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, &key).await?;

        tx.commit().await?;

        product.ok_or(CatalogServiceError::NotFound)
    }

    #[tracing::instrument(
        name = "catalog.service.published_products",
        skip(self),
        fields(count = tracing::field::Empty),
        err
    )]
    async fn published_products(&self) -> Result<Vec<Product>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_published_products(&mut tx).await?;

        tx.commit().await?;

        Span::current().record("count", products.len());

        Ok(products)
    }
}

/// Catalog operations used by the CLI commands and the exporter.
#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Upserts a scraped batch in one transaction and returns the batch
    /// timestamp every touched row was stamped with.
    async fn save(
        &self,
        batch: Vec<Listing>,
        now: Timestamp,
    ) -> Result<Timestamp, CatalogServiceError>;

    /// Picks an unpublished product of `category` seen in the batch stamped at
    /// `now`, if any.
    async fn choose_candidate(
        &self,
        category: Category,
        now: Timestamp,
    ) -> Result<Option<Product>, CatalogServiceError>;

    /// Records a confirmed announcement. A product is published at most once.
    async fn mark_published(
        &self,
        key: ProductKey,
        at: Timestamp,
    ) -> Result<Product, CatalogServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, key: ProductKey) -> Result<Product, CatalogServiceError>;

    /// Every published product, newest publication first.
    async fn published_products(&self) -> Result<Vec<Product>, CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use rust_decimal::{Decimal, dec};
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn listing(id: &str, category: Category, price: Decimal, sale_price: Decimal) -> Listing {
        Listing::new(
            ProductKey::new(id, category),
            format!("Product {id}"),
            format!("https://example.com/{id}"),
            Some(format!("https://example.com/{id}.jpg")),
            price,
            sale_price,
        )
    }

    #[tokio::test]
    async fn save_inserts_new_products() -> TestResult {
        let ctx = TestContext::new().await;

        let now = ctx
            .catalog
            .save(
                vec![listing("A1", Category::CoachBags, dec!(395), dec!(276.50))],
                Timestamp::now(),
            )
            .await?;

        let product = ctx
            .catalog
            .get_product(ProductKey::new("A1", Category::CoachBags))
            .await?;

        assert_eq!(product.created_utc, now);
        assert_eq!(product.last_updated_utc, Some(now));
        assert_eq!(product.last_posted_utc, None);
        assert_eq!(product.savings, dec!(118.50));
        assert_eq!(product.image.as_deref(), Some("https://example.com/A1.jpg"));

        Ok(())
    }

    #[tokio::test]
    async fn save_rejects_empty_batch() {
        let ctx = TestContext::new().await;

        let result = ctx.catalog.save(Vec::new(), Timestamp::now()).await;

        assert!(
            matches!(result, Err(CatalogServiceError::EmptyBatch)),
            "expected EmptyBatch, got {result:?}"
        );
    }

    #[tokio::test]
    async fn resave_updates_prices_and_keeps_history() -> TestResult {
        let ctx = TestContext::new().await;
        let key = ProductKey::new("A7", Category::CoachBags);

        let first = ctx
            .catalog
            .save(
                vec![listing("A7", Category::CoachBags, dec!(395), dec!(276.50))],
                Timestamp::now(),
            )
            .await?;

        let posted = first.checked_add(1.minute())?;

        ctx.catalog.mark_published(key.clone(), posted).await?;

        let second = ctx
            .catalog
            .save(
                vec![listing("A7", Category::CoachBags, dec!(395), dec!(197.50))],
                first.checked_add(24.hours())?,
            )
            .await?;

        let product = ctx.catalog.get_product(key).await?;

        assert_eq!(product.sale_price, dec!(197.50));
        assert_eq!(product.savings, dec!(197.50));
        assert_eq!(product.created_utc, first);
        assert_eq!(product.last_updated_utc, Some(second));
        assert_eq!(product.last_posted_utc, Some(posted));

        Ok(())
    }

    #[tokio::test]
    async fn same_id_in_two_categories_is_two_products() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.catalog
            .save(
                vec![
                    listing("X1", Category::FwrdShoes, dec!(300), dec!(200)),
                    listing("X1", Category::FwrdBags, dec!(900), dec!(450)),
                ],
                Timestamp::now(),
            )
            .await?;

        let shoes = ctx
            .catalog
            .get_product(ProductKey::new("X1", Category::FwrdShoes))
            .await?;

        let bags = ctx
            .catalog
            .get_product(ProductKey::new("X1", Category::FwrdBags))
            .await?;

        assert_eq!(shoes.price, dec!(300));
        assert_eq!(bags.price, dec!(900));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = 'X1'")
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(rows, 2, "category is part of the primary key");

        Ok(())
    }

    #[tokio::test]
    async fn choose_candidate_skips_stale_and_published_products() -> TestResult {
        let ctx = TestContext::new().await;

        let yesterday = ctx
            .catalog
            .save(
                vec![
                    listing("OLD", Category::FwrdDresses, dec!(100), dec!(50)),
                    listing("POSTED", Category::FwrdDresses, dec!(100), dec!(50)),
                ],
                Timestamp::now(),
            )
            .await?;

        let today = ctx
            .catalog
            .save(
                vec![
                    listing("POSTED", Category::FwrdDresses, dec!(100), dec!(50)),
                    listing("NEW", Category::FwrdDresses, dec!(100), dec!(50)),
                ],
                yesterday.checked_add(24.hours())?,
            )
            .await?;

        ctx.catalog
            .mark_published(ProductKey::new("POSTED", Category::FwrdDresses), today)
            .await?;

        let candidate = ctx
            .catalog
            .choose_candidate(Category::FwrdDresses, today)
            .await?
            .ok_or("expected a candidate")?;

        assert_eq!(candidate.id, "NEW");
        assert_eq!(
            ctx.catalog
                .choose_candidate(Category::CoachBags, today)
                .await?,
            None
        );

        Ok(())
    }

    #[tokio::test]
    async fn mark_published_is_exactly_once() -> TestResult {
        let ctx = TestContext::new().await;
        let key = ProductKey::new("B2", Category::FwrdBags);

        let now = ctx
            .catalog
            .save(
                vec![listing("B2", Category::FwrdBags, dec!(100), dec!(60))],
                Timestamp::now(),
            )
            .await?;

        let published = ctx.catalog.mark_published(key.clone(), now).await?;

        assert_eq!(published.last_posted_utc, Some(now));

        let again = ctx
            .catalog
            .mark_published(key, now.checked_add(1.hour())?)
            .await;

        assert!(
            matches!(again, Err(CatalogServiceError::AlreadyPublished)),
            "expected AlreadyPublished, got {again:?}"
        );

        let missing = ctx
            .catalog
            .mark_published(ProductKey::new("NOPE", Category::FwrdBags), now)
            .await;

        assert!(
            matches!(missing, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {missing:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn published_products_are_newest_first() -> TestResult {
        let ctx = TestContext::new().await;

        let now = ctx
            .catalog
            .save(
                vec![
                    listing("P1", Category::CoachBags, dec!(100), dec!(60)),
                    listing("P2", Category::CoachBags, dec!(100), dec!(60)),
                    listing("P3", Category::CoachBags, dec!(100), dec!(60)),
                ],
                Timestamp::now(),
            )
            .await?;

        for (id, minutes) in [("P1", 1), ("P3", 2)] {
            ctx.catalog
                .mark_published(
                    ProductKey::new(id, Category::CoachBags),
                    now.checked_add(minutes.minutes())?,
                )
                .await?;
        }

        let ids: Vec<String> = ctx
            .catalog
            .published_products()
            .await?
            .into_iter()
            .map(|product| product.id)
            .collect();

        assert_eq!(ids, vec!["P3", "P1"]);

        Ok(())
    }

    #[tokio::test]
    async fn save_keeps_prices_exact() -> TestResult {
        let ctx = TestContext::new().await;
        let key = ProductKey::new("E1", Category::FwrdShoes);

        ctx.catalog
            .save(
                vec![listing("E1", Category::FwrdShoes, dec!(10.005), dec!(5.004))],
                Timestamp::now(),
            )
            .await?;

        let product = ctx.catalog.get_product(key).await?;

        assert_eq!(product.price, dec!(10.005));
        assert_eq!(product.sale_price, dec!(5.004));
        assert_eq!(product.savings, dec!(5.001));
        assert_eq!(product.savings, product.price - product.sale_price);

        Ok(())
    }

    #[tokio::test]
    async fn failed_save_rolls_back_the_whole_batch() -> TestResult {
        let ctx = TestContext::new().await;

        sqlx::query("ALTER TABLE products ADD CONSTRAINT reject_bad_id CHECK (id <> 'BAD')")
            .execute(ctx.db.pool())
            .await?;

        let result = ctx
            .catalog
            .save(
                vec![
                    listing("GOOD", Category::CoachBags, dec!(100), dec!(60)),
                    listing("BAD", Category::CoachBags, dec!(100), dec!(60)),
                ],
                Timestamp::now(),
            )
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        let good = ctx
            .catalog
            .get_product(ProductKey::new("GOOD", Category::CoachBags))
            .await;

        assert!(
            matches!(good, Err(CatalogServiceError::NotFound)),
            "the earlier listing must not survive a failed batch, got {good:?}"
        );

        Ok(())
    }
}
