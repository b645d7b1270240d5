//! SQLite-backed catalog store.
//!
//! ## Schema
//!
//! One flat `products` table keyed by `sku`. `specifications` is stored as a JSON
//! object in a TEXT column. Natural (insertion) order is SQLite's `rowid`.
//!
//! `category_key` holds the category case-folded with `str::to_lowercase`, so the
//! substring filter is case-insensitive beyond ASCII (SQLite's `lower()` is not).
//!
//! ## Atomicity
//!
//! Every write is a single statement. Partial updates use
//! `SET col = COALESCE(?, col) ... RETURNING`, so a reader never observes a
//! half-applied change and two concurrent updates of the same SKU never
//! interleave field by field.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, QueryBuilder, Row, Sqlite};

use nexus_core::{Page, PageRequest, Sku};
use nexus_products::{
    category_key, round_cents, CategorySummary, InventoryOverview, Product, ProductChanges, ProductFilter,
    Specifications,
};

use super::{CatalogStore, StoreError, UpdateOutcome};

const PRODUCT_COLUMNS: &str = "sku, name, category, price, stock, image_url, specifications";

/// SQLite catalog store over a `sqlx` connection pool.
#[derive(Debug, Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    /// Connect to `database_url` (e.g. `sqlite://nexus.db?mode=rwc`) and make sure
    /// the schema exists. The database file is created when missing.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| map_sqlx_error("parse_database_url", e))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        tracing::info!(database_url, max_connections, "connected to catalog database");
        Self::from_pool(pool).await
    }

    /// Private in-memory database (tests/dev). Pinned to a single connection that
    /// is never recycled, since every SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| map_sqlx_error("parse_database_url", e))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the schema if needed.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                sku            TEXT    NOT NULL PRIMARY KEY,
                name           TEXT    NOT NULL,
                category       TEXT    NOT NULL,
                category_key   TEXT    NOT NULL,
                price          REAL    NOT NULL CHECK (price > 0),
                stock          INTEGER NOT NULL CHECK (stock >= 0),
                image_url      TEXT    NOT NULL,
                specifications TEXT    NOT NULL DEFAULT '{}'
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_products_table", e))?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn create(&self, product: Product) -> Result<Product, StoreError> {
        let specifications = encode_specifications(&product.specifications)?;

        sqlx::query(
            r#"
            INSERT INTO products (sku, name, category, category_key, price, stock, image_url, specifications)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(product.sku.as_str())
        .bind(&product.name)
        .bind(&product.category)
        .bind(category_key(&product.category))
        .bind(product.price)
        .bind(i64::from(product.stock))
        .bind(&product.image_url)
        .bind(&specifications)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateKey(product.sku.to_string())
            } else {
                map_sqlx_error("insert_product", e)
            }
        })?;

        tracing::debug!(sku = %product.sku, "product inserted");
        Ok(product)
    }

    async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_product", e))?;

        row.map(Product::try_from).transpose()
    }

    async fn list_filtered(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, StoreError> {
        // Count and page read from the same snapshot so `total` agrees with `items`.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM products");
        push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("count_products", e))?;

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
        push_filter(&mut select, filter);
        select.push(" ORDER BY rowid ASC LIMIT ");
        select.push_bind(to_sql_int(page.limit()));
        select.push(" OFFSET ");
        select.push_bind(to_sql_int(page.offset()));

        let rows: Vec<ProductRow> = select
            .build_query_as()
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("list_products", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        let items = rows
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            page = page.page(),
            page_size = page.page_size(),
            total,
            returned = items.len(),
            "listed products"
        );

        Ok(Page::new(items, total.max(0) as u64, page))
    }

    async fn update(&self, sku: &str, changes: &ProductChanges) -> Result<UpdateOutcome, StoreError> {
        if changes.is_empty() {
            return Ok(UpdateOutcome::NoChanges);
        }

        let specifications = changes
            .specifications()
            .map(encode_specifications)
            .transpose()?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products SET
                name           = COALESCE(?1, name),
                category       = COALESCE(?2, category),
                category_key   = COALESCE(?3, category_key),
                price          = COALESCE(?4, price),
                stock          = COALESCE(?5, stock),
                image_url      = COALESCE(?6, image_url),
                specifications = COALESCE(?7, specifications)
            WHERE sku = ?8
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(changes.name())
        .bind(changes.category())
        .bind(changes.category().map(category_key))
        .bind(changes.price())
        .bind(changes.stock().map(i64::from))
        .bind(changes.image_url())
        .bind(specifications)
        .bind(sku)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_product", e))?;

        match row {
            Some(row) => {
                tracing::debug!(sku, "product updated");
                Ok(UpdateOutcome::Updated(Product::try_from(row)?))
            }
            None => Ok(UpdateOutcome::NotFound),
        }
    }

    async fn delete(&self, sku: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE sku = ?1")
            .bind(sku)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;

        let removed = result.rows_affected() > 0;
        tracing::debug!(sku, removed, "product delete");
        Ok(removed)
    }

    async fn aggregate_by_category(&self) -> Result<Vec<CategorySummary>, StoreError> {
        // Ties on count keep the order in which each category first appeared.
        let rows = sqlx::query(
            r#"
            SELECT
                category,
                COUNT(*)              AS product_count,
                ROUND(AVG(price), 2)  AS avg_price,
                SUM(stock)            AS total_stock
            FROM products
            GROUP BY category
            ORDER BY product_count DESC, MIN(rowid) ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("aggregate_by_category", e))?;

        rows.iter()
            .map(|row| {
                let count: i64 = row.try_get("product_count").map_err(decode_error)?;
                let avg_price: f64 = row.try_get("avg_price").map_err(decode_error)?;
                let total_stock: i64 = row.try_get("total_stock").map_err(decode_error)?;
                Ok(CategorySummary {
                    category: row.try_get("category").map_err(decode_error)?,
                    count: count.max(0) as u64,
                    avg_price: round_cents(avg_price),
                    total_stock: total_stock.max(0) as u64,
                })
            })
            .collect()
    }

    async fn inventory_overview(&self) -> Result<InventoryOverview, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*)                           AS product_count,
                COUNT(DISTINCT category)           AS category_count,
                COALESCE(SUM(stock), 0)            AS total_units,
                COALESCE(SUM(price * stock), 0.0)  AS inventory_value,
                COALESCE(AVG(price), 0.0)          AS average_price
            FROM products
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("inventory_overview", e))?;

        let product_count: i64 = row.try_get("product_count").map_err(decode_error)?;
        let category_count: i64 = row.try_get("category_count").map_err(decode_error)?;
        let total_units: i64 = row.try_get("total_units").map_err(decode_error)?;
        let inventory_value: f64 = row.try_get("inventory_value").map_err(decode_error)?;
        let average_price: f64 = row.try_get("average_price").map_err(decode_error)?;

        Ok(InventoryOverview {
            product_count: product_count.max(0) as u64,
            category_count: category_count.max(0) as u64,
            total_units: total_units.max(0) as u64,
            inventory_value: round_cents(inventory_value),
            average_price: round_cents(average_price),
        })
    }

    async fn low_stock(&self, threshold: u32, limit: u32) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE stock < ?1 ORDER BY stock ASC, rowid ASC LIMIT ?2"
        ))
        .bind(i64::from(threshold))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("low_stock", e))?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY rowid ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_all_products", e))?;

        rows.into_iter().map(Product::try_from).collect()
    }
}

/// Append the conjunctive WHERE clause for `filter`.
fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ProductFilter) {
    qb.push(" WHERE 1 = 1");

    // instr() rather than LIKE: user input must not act as a wildcard pattern.
    if let Some(category) = filter.category() {
        qb.push(" AND instr(category_key, ");
        qb.push_bind(category_key(category));
        qb.push(") > 0");
    }
    if let Some(min_price) = filter.min_price() {
        qb.push(" AND price >= ");
        qb.push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price() {
        qb.push(" AND price <= ");
        qb.push_bind(max_price);
    }
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn encode_specifications(specifications: &Specifications) -> Result<String, StoreError> {
    serde_json::to_string(specifications)
        .map_err(|e| StoreError::Corrupt(format!("failed to encode specifications: {e}")))
}

#[derive(Debug)]
struct ProductRow {
    sku: String,
    name: String,
    category: String,
    price: f64,
    stock: i64,
    image_url: String,
    specifications: String,
}

impl<'r> FromRow<'r, SqliteRow> for ProductRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            sku: row.try_get("sku")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            price: row.try_get("price")?,
            stock: row.try_get("stock")?,
            image_url: row.try_get("image_url")?,
            specifications: row.try_get("specifications")?,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let sku = Sku::parse(&row.sku)
            .map_err(|e| StoreError::Corrupt(format!("row {:?}: {e}", row.sku)))?;
        let stock = u32::try_from(row.stock)
            .map_err(|_| StoreError::Corrupt(format!("row {:?}: stock out of range", row.sku)))?;
        let specifications: Specifications = serde_json::from_str(&row.specifications)
            .map_err(|e| StoreError::Corrupt(format!("row {:?}: bad specifications: {e}", row.sku)))?;

        Ok(Product {
            sku,
            name: row.name,
            category: row.category,
            price: row.price,
            stock,
            image_url: row.image_url,
            specifications,
        })
    }
}

fn decode_error(err: sqlx::Error) -> StoreError {
    StoreError::Corrupt(format!("failed to decode row: {err}"))
}

/// Check if an error is a unique/primary-key constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_check_violation() => StoreError::Corrupt(format!(
            "constraint rejected record in {operation}: {}",
            db_err.message()
        )),
        sqlx::Error::Database(db_err) => {
            StoreError::Unavailable(format!("database error in {operation}: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out waiting for a connection in {operation}"))
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) | sqlx::Error::Decode(_) => {
            StoreError::Corrupt(format!("failed to decode row in {operation}: {err}"))
        }
        _ => StoreError::Unavailable(format!("sqlx error in {operation}: {err}")),
    }
}
