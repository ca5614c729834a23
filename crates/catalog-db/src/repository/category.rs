//! # Category Repository
//!
//! Database operations for categories.
//!
//! ## Key Operations
//! - Active listing (visibility gate)
//! - Product counts per category
//! - Lookup by external uid

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use catalog_core::{Category, CategoryScope, CategoryWithCount};

const CATEGORY_COLUMNS: &str =
    "id, uid, name, description, slug, is_active, created_at, updated_at";

/// Repository for category database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.categories();
///
/// let visible = repo.list_active().await?;
/// let drinks = repo.find_by_uid("cat-drinks").await?;
/// ```
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists categories with `is_active = true`, ordered by name.
    ///
    /// An empty catalog yields an empty list.
    pub async fn list_active(&self) -> DbResult<Vec<Category>> {
        debug!("Listing active categories");

        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE is_active = 1 ORDER BY name, id"
        );
        let categories = sqlx::query_as::<_, Category>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }

    /// Lists categories together with how many products each owns.
    ///
    /// ## How It Works
    /// ```text
    /// categories c  LEFT JOIN  products p ON p.category_id = c.id
    ///                   │
    ///                   ▼
    ///   GROUP BY c.id → COUNT(p.id)   (0 for categories with no products)
    /// ```
    ///
    /// Variants count as products of their own `category_id`. Read-only.
    pub async fn with_product_count(
        &self,
        scope: CategoryScope,
    ) -> DbResult<Vec<CategoryWithCount>> {
        debug!(?scope, "Counting products per category");

        let active_only = matches!(scope, CategoryScope::Active);

        let rows = sqlx::query_as::<_, CategoryWithCount>(
            r#"
            SELECT
                c.id,
                c.uid,
                c.name,
                c.description,
                c.slug,
                c.is_active,
                c.created_at,
                c.updated_at,
                COUNT(p.id) AS product_count
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id
            WHERE ?1 = 0 OR c.is_active = 1
            GROUP BY c.id
            ORDER BY c.name, c.id
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Finds the category with the given external uid.
    ///
    /// ## Returns
    /// * `Ok(Some(Category))` - Category found
    /// * `Ok(None)` - No category has this uid
    ///
    /// The schema keeps `uid` unique. Should a store ever hold duplicates,
    /// the first match is returned and the anomaly is logged.
    pub async fn find_by_uid(&self, uid: &str) -> DbResult<Option<Category>> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE uid = ?1 ORDER BY created_at, id LIMIT 2"
        );
        let mut matches = sqlx::query_as::<_, Category>(&sql)
            .bind(uid)
            .fetch_all(&self.pool)
            .await?;

        if matches.len() > 1 {
            warn!(uid = %uid, "Data integrity violation: multiple categories share a uid");
        }

        Ok(if matches.is_empty() {
            None
        } else {
            Some(matches.swap_remove(0))
        })
    }

    /// Gets a category by its primary key.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1");
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Inserts a new category.
    ///
    /// ## Returns
    /// * `Ok(Category)` - The stored category
    /// * `Err(DbError::Domain(..))` - A field rule failed
    /// * `Err(DbError::UniqueViolation)` - `uid` or `slug` already exists
    pub async fn insert(&self, category: &Category) -> DbResult<Category> {
        category.validate()?;

        debug!(uid = %category.uid, slug = %category.slug, "Inserting category");

        sqlx::query(
            r#"
            INSERT INTO categories (
                id, uid, name, description, slug, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&category.id)
        .bind(&category.uid)
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.slug)
        .bind(category.is_active)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DbError::from(e).with_duplicate_value(|field| match field {
                "uid" => Some(category.uid.clone()),
                "slug" => Some(category.slug.clone()),
                _ => None,
            })
        })?;

        Ok(category.clone())
    }

    /// Shows or hides a category. Its products are untouched.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Category doesn't exist
    pub async fn set_active(&self, id: &str, is_active: bool) -> DbResult<()> {
        debug!(id = %id, is_active, "Setting category visibility");

        let result = sqlx::query(
            r#"
            UPDATE categories
            SET
                is_active = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    /// Counts all categories, active or not.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
