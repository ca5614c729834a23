//! # Categories
//!
//! A category is a named grouping of products. Visibility to customers is
//! gated by `is_active`; deactivating a category hides it from
//! [`CategoryScope::Active`] queries but leaves its products untouched.
//!
//! ## Dual-Key Identity
//! - `id`: UUID v4, immutable, used by `products.category_id`
//! - `uid`: external identifier handed to clients
//! - `slug`: URL-safe unique name

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::product::Product;
use crate::validation::{
    slugify, validate_description, validate_name, validate_slug, validate_uid, ValidationResult,
};

// =============================================================================
// Category
// =============================================================================

/// A stored category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    /// Primary key (UUID v4).
    pub id: String,

    /// External-facing unique identifier.
    pub uid: String,

    /// Display name, never empty.
    pub name: String,

    pub description: Option<String>,

    /// URL-safe unique string.
    pub slug: String,

    /// Soft visibility switch.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Builds a category from caller input.
    ///
    /// ## What This Does
    /// 1. Generates the primary key
    /// 2. Uses the given `uid`, or a fresh UUID when absent
    /// 3. Uses the given `slug`, or derives one from `name`
    /// 4. Validates every field
    ///
    /// ```rust
    /// use catalog_core::{Category, NewCategory};
    ///
    /// let category = Category::new(NewCategory::new("Hot Drinks")).unwrap();
    /// assert_eq!(category.slug, "hot-drinks");
    /// assert!(category.is_active);
    /// ```
    pub fn new(new: NewCategory) -> CoreResult<Self> {
        let now = Utc::now();
        let name = new.name.trim().to_string();
        let slug = new.slug.unwrap_or_else(|| slugify(&name));

        let category = Category {
            id: Uuid::new_v4().to_string(),
            uid: new
                .uid
                .map(|uid| uid.trim().to_string())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name,
            description: new.description,
            slug,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        };

        category.validate()?;
        Ok(category)
    }

    /// Checks the field rules. Uniqueness is left to the store.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_uid(&self.uid)?;
        validate_name("name", &self.name)?;
        validate_description(self.description.as_deref())?;
        validate_slug(&self.slug)?;
        Ok(())
    }
}

// =============================================================================
// New Category
// =============================================================================

/// Caller input for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub uid: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub is_active: bool,
}

impl NewCategory {
    /// An active category with generated uid and slug.
    pub fn new(name: impl Into<String>) -> Self {
        NewCategory {
            uid: None,
            name: name.into(),
            description: None,
            slug: None,
            is_active: true,
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Creates the category hidden.
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

// =============================================================================
// Scopes & Aggregation
// =============================================================================

/// Which categories a listing covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryScope {
    #[default]
    All,
    /// Only `is_active = true`.
    Active,
}

impl CategoryScope {
    pub fn includes(&self, category: &Category) -> bool {
        match self {
            CategoryScope::All => true,
            CategoryScope::Active => category.is_active,
        }
    }
}

/// A category together with the number of products it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CategoryWithCount {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub category: Category,

    /// Owned products, variants included. Zero for empty categories.
    pub product_count: i64,
}

/// Pairs each category with its product count.
///
/// Read-only aggregation over already-loaded records; the database
/// repository computes the same thing with a `LEFT JOIN ... GROUP BY`.
/// Categories keep their input order.
pub fn count_products(categories: &[Category], products: &[Product]) -> Vec<CategoryWithCount> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for product in products {
        *counts.entry(product.category_id.as_str()).or_insert(0) += 1;
    }

    categories
        .iter()
        .map(|category| CategoryWithCount {
            category: category.clone(),
            product_count: counts.get(category.id.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::product::NewProduct;

    #[test]
    fn test_new_category_defaults() {
        let category = Category::new(NewCategory::new("  Hot Drinks ")).unwrap();

        assert_eq!(category.name, "Hot Drinks");
        assert_eq!(category.slug, "hot-drinks");
        assert!(category.is_active);
        assert!(Uuid::parse_str(&category.id).is_ok());
        assert!(Uuid::parse_str(&category.uid).is_ok());
        assert_ne!(category.id, category.uid);
    }

    #[test]
    fn test_new_category_explicit_fields() {
        let category = Category::new(
            NewCategory::new("Tea")
                .with_uid("CAT-TEA")
                .with_slug("loose-leaf-tea")
                .with_description("All the tea")
                .inactive(),
        )
        .unwrap();

        assert_eq!(category.uid, "CAT-TEA");
        assert_eq!(category.slug, "loose-leaf-tea");
        assert_eq!(category.description.as_deref(), Some("All the tea"));
        assert!(!category.is_active);
    }

    #[test]
    fn test_new_category_trims_uid() {
        let category = Category::new(NewCategory::new("Tea").with_uid(" cat-tea ")).unwrap();
        assert_eq!(category.uid, "cat-tea");

        let mut edited = category.clone();
        edited.uid = "cat-tea ".to_string();
        assert!(edited.validate().is_err());
    }

    #[test]
    fn test_new_category_rejects_bad_input() {
        assert!(Category::new(NewCategory::new("")).is_err());
        assert!(Category::new(NewCategory::new("Tea").with_slug("Tea Leaves")).is_err());
        // Nothing sluggable in the name and no explicit slug.
        assert!(Category::new(NewCategory::new("!!!")).is_err());
    }

    #[test]
    fn test_scope_includes() {
        let active = Category::new(NewCategory::new("A")).unwrap();
        let hidden = Category::new(NewCategory::new("B").inactive()).unwrap();

        let visible: Vec<_> = [active.clone(), hidden.clone()]
            .into_iter()
            .filter(|c| CategoryScope::Active.includes(c))
            .collect();
        assert_eq!(visible, vec![active]);
        assert!(CategoryScope::All.includes(&hidden));
    }

    #[test]
    fn test_count_products_includes_zero() {
        let tea = Category::new(NewCategory::new("Tea")).unwrap();
        let empty = Category::new(NewCategory::new("Empty")).unwrap();

        let products: Vec<Product> = ["TEA-1", "TEA-2"]
            .iter()
            .map(|sku| {
                Product::new(NewProduct::new(&tea.id, *sku, "Tea", Money::from_cents(100)))
                    .unwrap()
            })
            .collect();

        let counted = count_products(&[tea.clone(), empty.clone()], &products);
        assert_eq!(counted.len(), 2);
        assert_eq!(counted[0].category.id, tea.id);
        assert_eq!(counted[0].product_count, 2);
        assert_eq!(counted[1].product_count, 0);
    }

    #[test]
    fn test_category_with_count_serializes_flat() {
        let category = Category::new(NewCategory::new("Tea").with_uid("CAT-TEA")).unwrap();
        let value = serde_json::to_value(CategoryWithCount {
            category,
            product_count: 3,
        })
        .unwrap();

        assert_eq!(value["uid"], "CAT-TEA");
        assert_eq!(value["product_count"], 3);
    }
}
