//! PostgreSQL order store using sqlx.
//!
//! Provides `PostgresOrderStore`, an [`OrderStore`] backed by a
//! `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! orders-cache = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! Orders live in a single `orders` table. Amounts are stored as integer
//! cents; the `ck_order_amount_min_value` and `ck_order_amount_max_value`
//! check constraints enforce the amount bounds independently of boundary
//! validation.

use crate::core::error::PersistenceError;
use crate::core::order::{Amount, NewOrder, Order};
use crate::core::service::OrderStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

const BACKEND: &str = "PostgreSQL";

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Apply the required table and index (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), PersistenceError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS orders (
            order_id UUID PRIMARY KEY,
            customer_name VARCHAR(200) NOT NULL,
            product VARCHAR(200) NOT NULL,
            amount_cents BIGINT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            CONSTRAINT ck_order_amount_min_value CHECK (amount_cents >= 1),
            CONSTRAINT ck_order_amount_max_value CHECK (amount_cents <= 999999999999999)
        )",
    )
    .execute(pool)
    .await
    .map_err(map_sqlx_error)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_orders_created_at ON orders (created_at DESC)")
        .execute(pool)
        .await
        .map_err(map_sqlx_error)?;

    Ok(())
}

fn map_sqlx_error(err: sqlx::Error) -> PersistenceError {
    match err {
        sqlx::Error::Database(db) => match db.constraint() {
            Some(constraint) => PersistenceError::ConstraintViolation {
                constraint: constraint.to_string(),
                message: db.message().to_string(),
            },
            None => PersistenceError::query(BACKEND, db.message()),
        },
        e @ (sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed) => PersistenceError::connection(BACKEND, e),
        e => PersistenceError::query(BACKEND, e),
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    order_id: Uuid,
    customer_name: String,
    product: String,
    amount_cents: i64,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.order_id,
            customer_name: row.customer_name,
            product: row.product,
            amount: Amount::from_cents(row.amount_cents),
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// PostgresOrderStore
// ---------------------------------------------------------------------------

/// Order store backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// use orders::storage::PostgresOrderStore;
///
/// let store = PostgresOrderStore::connect("postgres://localhost/orders", 5).await?;
/// let order = store.create(new_order).await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and make sure the schema exists
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, PersistenceError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| PersistenceError::connection(BACKEND, e))?;

        ensure_schema(&pool).await?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn create(&self, order: NewOrder) -> Result<Order, PersistenceError> {
        // created_at comes from the server clock at microsecond precision, so
        // the returned record matches what later reads see
        let row = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO orders (order_id, customer_name, product, amount_cents, created_at) \
             VALUES ($1, $2, $3, $4, now()) \
             RETURNING order_id, customer_name, product, amount_cents, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&order.customer_name)
        .bind(&order.product)
        .bind(order.amount.cents())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Order>, PersistenceError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT order_id, customer_name, product, amount_cents, created_at \
             FROM orders WHERE order_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Order::from))
    }

    async fn get_all(&self) -> Result<Vec<Order>, PersistenceError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT order_id, customer_name, product, amount_cents, created_at \
             FROM orders ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<bool, PersistenceError> {
        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
