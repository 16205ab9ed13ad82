//! Catalog Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use bargains::{
    categories::Category,
    products::{Product, ProductKey},
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const GET_PRODUCT_FOR_UPDATE_SQL: &str = include_str!("sql/get_product_for_update.sql");
const INSERT_PRODUCT_SQL: &str = include_str!("sql/insert_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const LIST_CANDIDATES_SQL: &str = include_str!("sql/list_candidates.sql");
const LIST_PUBLISHED_PRODUCTS_SQL: &str = include_str!("sql/list_published_products.sql");
const MARK_PUBLISHED_SQL: &str = include_str!("sql/mark_published.sql");

/// Catalog row as decoded from `products`.
struct ProductRow(Product);

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        key: &ProductKey,
    ) -> Result<Option<Product>, sqlx::Error> {
        let row = query_as::<Postgres, ProductRow>(GET_PRODUCT_SQL)
            .bind(&key.id)
            .bind(key.category.as_i16())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(|ProductRow(product)| product))
    }

    /// Reads the row for `key`, locking it until the transaction ends.
    pub(crate) async fn get_product_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        key: &ProductKey,
    ) -> Result<Option<Product>, sqlx::Error> {
        let row = query_as::<Postgres, ProductRow>(GET_PRODUCT_FOR_UPDATE_SQL)
            .bind(&key.id)
            .bind(key.category.as_i16())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(|ProductRow(product)| product))
    }

    pub(crate) async fn insert_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &Product,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_PRODUCT_SQL)
            .bind(&product.id)
            .bind(product.category.as_i16())
            .bind(&product.name)
            .bind(&product.link)
            .bind(product.image.as_deref())
            .bind(product.price)
            .bind(product.sale_price)
            .bind(product.savings)
            .bind(SqlxTimestamp::from(product.created_utc))
            .bind(product.last_updated_utc.map(SqlxTimestamp::from))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Overwrites the descriptive fields and freshness of an existing row.
    ///
    /// `created_utc` and `last_posted_utc` are not part of the statement.
    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &Product,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_PRODUCT_SQL)
            .bind(&product.id)
            .bind(product.category.as_i16())
            .bind(&product.name)
            .bind(&product.link)
            .bind(product.image.as_deref())
            .bind(product.price)
            .bind(product.sale_price)
            .bind(product.savings)
            .bind(product.last_updated_utc.map(SqlxTimestamp::from))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_candidates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: Category,
        fresh_since: Timestamp,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let rows = query_as::<Postgres, ProductRow>(LIST_CANDIDATES_SQL)
            .bind(category.as_i16())
            .bind(SqlxTimestamp::from(fresh_since))
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(|ProductRow(product)| product).collect())
    }

    pub(crate) async fn list_published_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let rows = query_as::<Postgres, ProductRow>(LIST_PUBLISHED_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(|ProductRow(product)| product).collect())
    }

    /// Stamps `last_posted_utc` if it is still null, returning the stamped row.
    pub(crate) async fn mark_published(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        key: &ProductKey,
        at: Timestamp,
    ) -> Result<Option<Product>, sqlx::Error> {
        let row = query_as::<Postgres, ProductRow>(MARK_PUBLISHED_SQL)
            .bind(&key.id)
            .bind(key.category.as_i16())
            .bind(SqlxTimestamp::from(at))
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(|ProductRow(product)| product))
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let category = Category::try_from(row.try_get::<i16, _>("category")?).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "category".to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(Self(Product {
            id: row.try_get("id")?,
            category,
            name: row.try_get("name")?,
            link: row.try_get("link")?,
            image: row.try_get("image")?,
            price: row.try_get("price")?,
            sale_price: row.try_get("sale_price")?,
            savings: row.try_get("savings")?,
            created_utc: row.try_get::<SqlxTimestamp, _>("created_utc")?.to_jiff(),
            last_updated_utc: row
                .try_get::<Option<SqlxTimestamp>, _>("last_updated_utc")?
                .map(SqlxTimestamp::to_jiff),
            last_posted_utc: row
                .try_get::<Option<SqlxTimestamp>, _>("last_posted_utc")?
                .map(SqlxTimestamp::to_jiff),
        }))
    }
}
