//! Order persistence: the atomic committer and guest lookups.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use zed_core::{
    OrderId, OrderItemId, OrderStatus, Price, ProductId, SizeMeasurements,
};

use super::RepositoryError;
use crate::models::order::{NewOrder, Order, OrderItem};

/// Exact-match identity fields for order recovery.
///
/// Matching is deliberately exact, not fuzzy: a guest recovering their
/// order list must reproduce the details they checked out with.
#[derive(Debug, Clone)]
pub struct OrderIdentity {
    pub first_name: String,
    pub phone: String,
    pub email: String,
    pub country: String,
    pub province: String,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    status: String,
    subtotal: Price,
    shipping_fee: Price,
    total: Price,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    title: String,
    price: Price,
    quantity: i32,
    size_name: Option<String>,
    chest: i32,
    length: i32,
}

impl OrderItemRow {
    fn into_item(self) -> Result<OrderItem, RepositoryError> {
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative quantity on order item {}",
                self.id
            ))
        })?;
        Ok(OrderItem {
            id: self.id,
            product_id: self.product_id,
            title: self.title,
            price: self.price,
            quantity,
            size_name: self.size_name,
            size: SizeMeasurements {
                chest: self.chest,
                length: self.length,
            },
        })
    }
}

fn parse_status(raw: &str) -> Result<OrderStatus, RepositoryError> {
    raw.parse::<OrderStatus>()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid status in database: {e}")))
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Commit a new order and its full line-item snapshot atomically.
    ///
    /// Either the order and every item are written, or nothing is: a
    /// failure here leaves no partial order behind and the caller's cart
    /// token untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement or the commit
    /// fails.
    pub async fn create(&self, new_order: &NewOrder) -> Result<OrderId, RepositoryError> {
        let order_id = OrderId::generate();
        let profile = &new_order.profile;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO "order"
                (id, status, first_name, last_name, email, phone, address,
                 city, country, province, billing_address, payment,
                 subtotal, shipping_fee, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(order_id)
        .bind(OrderStatus::Pending.to_string())
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(profile.full_address())
        .bind(&profile.city)
        .bind(&profile.country)
        .bind(&profile.province)
        .bind(&profile.billing_address)
        .bind(profile.payment_method.to_string())
        .bind(new_order.subtotal)
        .bind(new_order.shipping_fee)
        .bind(new_order.total)
        .execute(&mut *tx)
        .await?;

        for item in &new_order.items {
            sqlx::query(
                r"
                INSERT INTO order_item
                    (id, order_id, product_id, title, price, quantity,
                     size_name, chest, length)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ",
            )
            .bind(OrderItemId::generate())
            .bind(order_id)
            .bind(item.product_id)
            .bind(&item.title)
            .bind(item.price)
            .bind(i64::from(item.quantity))
            .bind(&item.size_name)
            .bind(item.size.chest)
            .bind(item.size.length)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(order_id)
    }

    /// Fetch orders (with item snapshots) for a set of ids, newest first.
    ///
    /// Unknown ids are silently absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` for unreadable rows.
    pub async fn find_by_ids(&self, ids: &[OrderId]) -> Result<Vec<Order>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw_ids: Vec<Uuid> = ids.iter().map(|id| id.as_uuid()).collect();

        let order_rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, status, subtotal, shipping_fee, total, created_at
            FROM "order"
            WHERE id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        let item_rows: Vec<OrderItemRow> = sqlx::query_as(
            r"
            SELECT id, order_id, product_id, title, price, quantity,
                   size_name, chest, length
            FROM order_item
            WHERE order_id = ANY($1)
            ",
        )
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        let mut items_by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for row in item_rows {
            let order_id = row.order_id;
            items_by_order
                .entry(order_id)
                .or_default()
                .push(row.into_item()?);
        }

        order_rows
            .into_iter()
            .map(|row| {
                Ok(Order {
                    id: row.id,
                    status: parse_status(&row.status)?,
                    subtotal: row.subtotal,
                    shipping_fee: row.shipping_fee,
                    total: row.total,
                    created_at: row.created_at,
                    items: items_by_order.remove(&row.id).unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Fetch a single order with its item snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` for unreadable rows.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let mut orders = self.find_by_ids(&[id]).await?;
        Ok(orders.pop())
    }

    /// Find order ids matching a guest's identity fields exactly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_ids_by_identity(
        &self,
        identity: &OrderIdentity,
    ) -> Result<Vec<OrderId>, RepositoryError> {
        let ids: Vec<OrderId> = sqlx::query_scalar(
            r#"
            SELECT id FROM "order"
            WHERE first_name = $1
              AND phone = $2
              AND email = $3
              AND country = $4
              AND province = $5
            ORDER BY created_at ASC
            "#,
        )
        .bind(&identity.first_name)
        .bind(&identity.phone)
        .bind(&identity.email)
        .bind(&identity.country)
        .bind(&identity.province)
        .fetch_all(self.pool)
        .await?;

        Ok(ids)
    }

    /// Progress an order's status, enforcing legal transitions.
    ///
    /// The current row is locked for the duration of the check-and-update
    /// so two racing progressions cannot both succeed.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if the order does not exist
    /// - `RepositoryError::Conflict` if the transition is illegal
    /// - `RepositoryError::Database` if a statement fails
    pub async fn update_status(
        &self,
        id: OrderId,
        next: OrderStatus,
    ) -> Result<OrderStatus, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar(r#"SELECT status FROM "order" WHERE id = $1 FOR UPDATE"#)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let current = parse_status(&current.ok_or(RepositoryError::NotFound)?)?;

        if !current.can_transition_to(next) {
            return Err(RepositoryError::Conflict(format!(
                "order {id} cannot move from {current} to {next}"
            )));
        }

        sqlx::query(r#"UPDATE "order" SET status = $2 WHERE id = $1"#)
            .bind(id)
            .bind(next.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(next)
    }
}
