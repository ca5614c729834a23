//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Filtered listing (availability, category, variants)
//! - Lookup by SKU / uid
//! - Atomic stock updates
//! - Variant hierarchy maintenance
//!
//! ## Guarded Stock Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read, compare in Rust, write back                           │
//! │     SELECT in_stock ...;  if stock >= q { UPDATE SET in_stock = 7 }    │
//! │     Two buyers both read 5, both write, stock oversold                 │
//! │                                                                         │
//! │  ✅ CORRECT: one conditional relative UPDATE                           │
//! │     UPDATE products SET in_stock = in_stock - q                        │
//! │     WHERE id = ? AND in_stock >= q                                     │
//! │                                                                         │
//! │  rows_affected = 1 → sold (true)                                       │
//! │  rows_affected = 0 → not enough stock (false) or no such product      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use catalog_core::hierarchy::ensure_acyclic;
use catalog_core::validation::validate_quantity;
use catalog_core::{CoreError, Product, ProductFilter};

const PRODUCT_COLUMNS: &str = "id, uid, parent_id, category_id, sku, name, description, \
     measurement, in_stock, price_cents, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// // Everything that can be bought right now
/// let available = repo.list_available().await?;
///
/// // Sell two units; false when fewer than two are left
/// let sold = repo.decrease_stock(&product.id, 2).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products matching `filter`, ordered by name.
    ///
    /// ## Example
    /// ```rust,ignore
    /// // In-stock variants of one product, at most 20
    /// let filter = ProductFilter::available().variants_of(&shirt.id).limit(20);
    /// let products = repo.list(&filter).await?;
    /// ```
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        debug!(?filter, "Listing products");

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE 1 = 1"));

        if let Some(category_id) = filter.category_id.as_deref() {
            query.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(parent_id) = filter.parent_id.as_deref() {
            query.push(" AND parent_id = ").push_bind(parent_id);
        }
        if filter.available_only {
            query.push(" AND in_stock > 0");
        }

        query.push(" ORDER BY name, id");

        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(i64::from(limit));
        }

        let products = query
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listing returned products");
        Ok(products)
    }

    /// Lists products with at least one unit in stock.
    pub async fn list_available(&self) -> DbResult<Vec<Product>> {
        self.list(&ProductFilter::available()).await
    }

    /// Lists every product of one category, variants included.
    ///
    /// An unknown category yields an empty list.
    pub async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<Product>> {
        self.list(&ProductFilter::all().in_category(category_id)).await
    }

    /// Lists the direct variants of a product.
    pub async fn list_variants(&self, parent_id: &str) -> DbResult<Vec<Product>> {
        self.list(&ProductFilter::all().variants_of(parent_id)).await
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        self.fetch_one_by("id", id).await
    }

    /// Finds a product by its SKU (exact match).
    pub async fn find_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        self.fetch_one_by("sku", sku).await
    }

    /// Finds a product by its external uid (exact match).
    pub async fn find_by_uid(&self, uid: &str) -> DbResult<Option<Product>> {
        self.fetch_one_by("uid", uid).await
    }

    /// Returns the parent of a variant, `None` for a root product.
    pub async fn get_parent(&self, product: &Product) -> DbResult<Option<Product>> {
        match product.parent_id.as_deref() {
            Some(parent_id) => self.get_by_id(parent_id).await,
            None => Ok(None),
        }
    }

    // `column` is always one of the unique columns above, never caller input.
    async fn fetch_one_by(&self, column: &str, value: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE {column} = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Arguments
    /// * `product` - Product to insert (built with `Product::new`)
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored product
    /// * `Err(DbError::Domain(..))` - A field rule failed
    /// * `Err(DbError::UniqueViolation)` - SKU or uid already exists
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown category or parent
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        product.validate()?;

        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, uid, parent_id, category_id, sku, name, description,
                measurement, in_stock, price_cents, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7,
                ?8, ?9, ?10, ?11, ?12
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.uid)
        .bind(&product.parent_id)
        .bind(&product.category_id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.measurement)
        .bind(product.in_stock)
        .bind(product.price_cents)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(|field| unique_value(product, field)))?;

        Ok(product.clone())
    }

    /// Updates the descriptive fields, category and price of a product.
    ///
    /// `in_stock` and `parent_id` are ignored here; they change only through
    /// the stock operations and [`ProductRepository::set_parent`].
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        product.validate()?;

        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                uid = ?2,
                category_id = ?3,
                sku = ?4,
                name = ?5,
                description = ?6,
                measurement = ?7,
                price_cents = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.uid)
        .bind(&product.category_id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.measurement)
        .bind(product.price_cents)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(|field| unique_value(product, field)))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Takes `quantity` units of a product if enough are on hand.
    ///
    /// The check and the write are one statement, so concurrent callers can
    /// never take more than the stock that exists: with `in_stock == q` and
    /// two simultaneous `decrease_stock(id, q)` calls, exactly one returns
    /// `true`.
    ///
    /// ## Returns
    /// * `Ok(true)` - Stock reduced by `quantity`
    /// * `Ok(false)` - Not enough stock; nothing changed
    /// * `Err(DbError::Domain(..))` - `quantity` is not positive
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn decrease_stock(&self, id: &str, quantity: i64) -> DbResult<bool> {
        validate_quantity(quantity)?;

        debug!(id = %id, quantity, "Decreasing stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                in_stock = in_stock - ?2,
                updated_at = ?3
            WHERE id = ?1 AND in_stock >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }

        if !self.exists(id).await? {
            return Err(DbError::not_found("Product", id));
        }

        debug!(id = %id, quantity, "Insufficient stock");
        Ok(false)
    }

    /// Adds `quantity` units to a product's stock.
    ///
    /// ## Returns
    /// * `Err(DbError::Domain(..))` - `quantity` is not positive, or the
    ///   counter would overflow
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn increase_stock(&self, id: &str, quantity: i64) -> DbResult<()> {
        validate_quantity(quantity)?;

        debug!(id = %id, quantity, "Increasing stock");

        // SQLite turns an overflowing integer sum into a REAL, so the bound
        // is checked in the WHERE clause.
        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                in_stock = in_stock + ?2,
                updated_at = ?3
            WHERE id = ?1 AND in_stock <= ?4
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .bind(i64::MAX - quantity)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        match self.get_by_id(id).await? {
            Some(product) => Err(CoreError::StockOverflow {
                sku: product.sku,
                current: product.in_stock,
                quantity,
            }
            .into()),
            None => Err(DbError::not_found("Product", id)),
        }
    }

    /// Makes `parent_id` the parent of product `id`, or detaches it with
    /// `None`.
    ///
    /// ## How It Works
    /// ```text
    /// BEGIN
    ///   UPDATE products SET parent_id = ?      (FK rejects unknown parents)
    ///   WITH RECURSIVE chain ...               (ancestors of the new parent)
    ///   ensure_acyclic(id, parent, chain)      (id among them? → cycle)
    /// COMMIT                                   (or rollback on any error)
    /// ```
    ///
    /// Writing first means a concurrent re-parent elsewhere in the tree is
    /// serialized behind this transaction's write lock.
    ///
    /// ## Returns
    /// * `Err(DbError::Domain(CoreError::SelfParent))` - `parent_id == id`
    /// * `Err(DbError::Domain(CoreError::HierarchyCycle))` - `id` is an
    ///   ancestor of `parent_id`; nothing changed
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown parent
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn set_parent(&self, id: &str, parent_id: Option<&str>) -> DbResult<()> {
        if parent_id == Some(id) {
            return Err(CoreError::SelfParent {
                product_id: id.to_string(),
            }
            .into());
        }

        debug!(id = %id, parent_id = ?parent_id, "Setting product parent");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                parent_id = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(parent_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        if let Some(parent_id) = parent_id {
            // UNION (not UNION ALL) stops the walk once a row repeats.
            let chain: Vec<(String, Option<String>)> = sqlx::query_as(
                r#"
                WITH RECURSIVE chain(id, parent_id) AS (
                    SELECT id, parent_id FROM products WHERE id = ?1
                    UNION
                    SELECT p.id, p.parent_id
                    FROM products p
                    INNER JOIN chain c ON p.id = c.parent_id
                )
                SELECT id, parent_id FROM chain
                "#,
            )
            .bind(parent_id)
            .fetch_all(&mut *tx)
            .await?;

            let parents: HashMap<String, Option<String>> = chain.into_iter().collect();
            ensure_acyclic(id, parent_id, |product_id| parents.get(product_id).cloned())?;
        }

        tx.commit().await?;

        info!(id = %id, parent_id = ?parent_id, "Product parent updated");
        Ok(())
    }

    /// Counts all products, variants included.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn exists(&self, id: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }
}

fn unique_value(product: &Product, field: &str) -> Option<String> {
    match field {
        "sku" => Some(product.sku.clone()),
        "uid" => Some(product.uid.clone()),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
