//! Catalog read access: products and their size variants.
//!
//! The storefront never writes the catalog. Queries are batched by design -
//! cart materialization and checkout validation each issue one query for
//! the whole cart, never one per line item.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use zed_core::{Price, ProductId, ProductImageId, SizeMeasurements, SizeVariant, SizeVariantId};

use super::RepositoryError;

/// The product fields needed to display and price a cart entry.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Newest image for the product, if any.
    pub image_id: Option<ProductImageId>,
}

#[derive(sqlx::FromRow)]
struct SizeVariantRow {
    id: SizeVariantId,
    product_id: ProductId,
    name: Option<String>,
    chest: i32,
    length: i32,
}

impl From<SizeVariantRow> for SizeVariant {
    fn from(row: SizeVariantRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            name: row.name,
            measurements: SizeMeasurements {
                chest: row.chest,
                length: row.length,
            },
        }
    }
}

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch current summaries for a set of products in one query.
    ///
    /// Ids with no matching product are simply absent from the result;
    /// the caller decides whether that is a drop (display) or a fatal
    /// error (checkout).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_summaries(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, ProductSummary>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| id.as_uuid()).collect();

        let rows: Vec<ProductSummary> = sqlx::query_as(
            r"
            SELECT p.id, p.title, p.price,
                   (SELECT i.id FROM product_image i
                    WHERE i.product_id = p.id
                    ORDER BY i.created_at DESC
                    LIMIT 1) AS image_id
            FROM product p
            WHERE p.id = ANY($1)
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| (row.id, row)).collect())
    }

    /// Fetch all size variants for a set of products in one query,
    /// grouped by product id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_size_variants(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Vec<SizeVariant>>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| id.as_uuid()).collect();

        let rows: Vec<SizeVariantRow> = sqlx::query_as(
            r"
            SELECT id, product_id, name, chest, length
            FROM product_size
            WHERE product_id = ANY($1)
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<ProductId, Vec<SizeVariant>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.product_id)
                .or_default()
                .push(SizeVariant::from(row));
        }
        Ok(grouped)
    }
}
