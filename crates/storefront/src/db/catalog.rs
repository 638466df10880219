//! `PostgreSQL` catalog repository.
//!
//! Every statement binds its inputs; the category filter and product ids are
//! never interpolated into SQL text.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use catalog_core::{CategoryFilter, ProductId};

use super::{CatalogStore, RepositoryError};
use crate::models::Product;

/// Columns and joins shared by every product query.
const PRODUCT_JOIN: &str = r"
    SELECT p.id, p.title, pp.amount AS price, t.name AS category, f.uri AS image_uri
    FROM catalog.product p
    INNER JOIN catalog.product_price pp ON pp.product_id = p.id
    INNER JOIN catalog.product_category pc ON pc.product_id = p.id
    INNER JOIN catalog.taxonomy_term t ON t.id = pc.term_id
    INNER JOIN catalog.product_image pi ON pi.product_id = p.id
    INNER JOIN catalog.file f ON f.id = pi.file_id
";

/// A product to insert when seeding the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub title: String,
    pub price: Decimal,
    pub category: String,
    pub image_uri: String,
}

/// Repository for catalog database operations.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert products, creating categories and files as needed.
    ///
    /// All rows are written in one transaction. Category names are reused when
    /// they already exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing is
    /// written in that case.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn insert_products(
        &self,
        products: &[NewProduct],
    ) -> Result<Vec<ProductId>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(products.len());

        for product in products {
            let term_id: i32 = sqlx::query_scalar(
                r"
                INSERT INTO catalog.taxonomy_term (name)
                VALUES ($1)
                ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
                ",
            )
            .bind(&product.category)
            .fetch_one(&mut *tx)
            .await?;

            let file_id: i32 =
                sqlx::query_scalar("INSERT INTO catalog.file (uri) VALUES ($1) RETURNING id")
                    .bind(&product.image_uri)
                    .fetch_one(&mut *tx)
                    .await?;

            let product_id: ProductId =
                sqlx::query_scalar("INSERT INTO catalog.product (title) VALUES ($1) RETURNING id")
                    .bind(&product.title)
                    .fetch_one(&mut *tx)
                    .await?;

            sqlx::query("INSERT INTO catalog.product_price (product_id, amount) VALUES ($1, $2)")
                .bind(product_id)
                .bind(product.price)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                "INSERT INTO catalog.product_category (product_id, term_id) VALUES ($1, $2)",
            )
            .bind(product_id)
            .bind(term_id)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO catalog.product_image (product_id, file_id) VALUES ($1, $2)",
            )
            .bind(product_id)
            .bind(file_id)
            .execute(&mut *tx)
            .await?;

            ids.push(product_id);
        }

        tx.commit().await?;
        Ok(ids)
    }

    /// Delete every catalog row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            TRUNCATE catalog.product_image, catalog.product_category, catalog.product_price,
                     catalog.product, catalog.file, catalog.taxonomy_term
            RESTART IDENTITY
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for CatalogRepository {
    #[instrument(skip(self))]
    async fn products(&self, filter: &CategoryFilter) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "{PRODUCT_JOIN} WHERE ($1::text IS NULL OR t.name = $1) ORDER BY t.name, p.title, p.id"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(filter.name())
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let sql = format!(
            "SELECT DISTINCT category FROM ({PRODUCT_JOIN}) AS listed ORDER BY category"
        );
        let names = sqlx::query_scalar::<_, String>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let sql = format!("{PRODUCT_JOIN} WHERE p.id = ANY($1) ORDER BY p.id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(raw_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// These run against a throwaway database created by `sqlx::test` from
/// `DATABASE_URL`: `cargo test -p catalog-storefront -- --ignored`.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_product(title: &str, cents: i64, category: &str) -> NewProduct {
        NewProduct {
            title: title.to_string(),
            price: Decimal::new(cents, 2),
            category: category.to_string(),
            image_uri: format!("public://{}.jpg", title.to_lowercase()),
        }
    }

    async fn seeded(pool: PgPool) -> (CatalogRepository, Vec<ProductId>) {
        let repo = CatalogRepository::new(pool);
        let ids = repo
            .insert_products(&[
                new_product("Tent", 12000, "Outdoor"),
                new_product("Mug", 850, "Kitchen"),
                new_product("Lantern", 1999, "Outdoor"),
                new_product("Chef Knife", 4900, "Kitchen"),
            ])
            .await
            .unwrap();
        (repo, ids)
    }

    fn titles(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.title.as_str()).collect()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_products_ordered_by_category_then_title(
        pool: PgPool,
    ) -> Result<(), RepositoryError> {
        let (repo, _) = seeded(pool).await;

        let products = repo.products(&CategoryFilter::Any).await?;
        assert_eq!(titles(&products), vec!["Chef Knife", "Mug", "Lantern", "Tent"]);

        let mug = products.iter().find(|p| p.title == "Mug").unwrap();
        assert_eq!(mug.price, Decimal::new(850, 2));
        assert_eq!(mug.category, "Kitchen");
        assert_eq!(mug.image_uri, "public://mug.jpg");
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_products_filtered_by_category(pool: PgPool) -> Result<(), RepositoryError> {
        let (repo, _) = seeded(pool).await;

        let kitchen = repo.products(&CategoryFilter::parse("Kitchen")).await?;
        assert_eq!(titles(&kitchen), vec!["Chef Knife", "Mug"]);

        let none = repo.products(&CategoryFilter::parse("Garden")).await?;
        assert!(none.is_empty());

        // Exact match only
        let lower = repo.products(&CategoryFilter::parse("kitchen")).await?;
        assert!(lower.is_empty());
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_filter_value_is_bound(pool: PgPool) -> Result<(), RepositoryError> {
        let (repo, _) = seeded(pool).await;

        let injected = repo
            .products(&CategoryFilter::parse("Kitchen' OR '1'='1"))
            .await?;
        assert!(injected.is_empty());

        // Tables are intact afterwards
        assert_eq!(repo.products(&CategoryFilter::Any).await?.len(), 4);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_categories_are_distinct_and_reused(pool: PgPool) -> Result<(), RepositoryError> {
        let (repo, _) = seeded(pool).await;

        assert_eq!(repo.categories().await?, vec!["Kitchen", "Outdoor"]);

        let terms: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog.taxonomy_term")
            .fetch_one(repo.pool())
            .await?;
        assert_eq!(terms, 2);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_products_by_ids(pool: PgPool) -> Result<(), RepositoryError> {
        let (repo, ids) = seeded(pool).await;
        let tent = *ids.first().unwrap();
        let lantern = *ids.get(2).unwrap();

        let found = repo
            .products_by_ids(&[lantern, ProductId::new(9999), tent])
            .await?;
        let found_ids: Vec<ProductId> = found.iter().map(|p| p.id).collect();
        assert_eq!(found_ids, vec![tent, lantern]);

        assert!(repo.products_by_ids(&[]).await?.is_empty());
        assert_eq!(repo.product(tent).await?.map(|p| p.title), Some("Tent".to_string()));
        assert!(repo.product(ProductId::new(9999)).await?.is_none());
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_product_without_price_is_not_listed(pool: PgPool) -> Result<(), RepositoryError> {
        let (repo, _) = seeded(pool).await;

        sqlx::query("INSERT INTO catalog.product (title) VALUES ('Orphan')")
            .execute(repo.pool())
            .await?;

        let products = repo.products(&CategoryFilter::Any).await?;
        assert!(!products.iter().any(|p| p.title == "Orphan"));
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_clear_restarts_ids(pool: PgPool) -> Result<(), RepositoryError> {
        let (repo, _) = seeded(pool).await;

        repo.clear().await?;
        assert!(repo.products(&CategoryFilter::Any).await?.is_empty());
        assert!(repo.categories().await?.is_empty());

        let ids = repo
            .insert_products(&[new_product("Mug", 850, "Kitchen")])
            .await?;
        assert_eq!(ids, vec![ProductId::new(1)]);
        repo.ping().await
    }
}
