//! # Products
//!
//! A product belongs to exactly one category and may be a variant of
//! another product.
//!
//! ## Stock Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  in_stock acts as a two-state gate                                      │
//! │                                                                         │
//! │    in_stock == 0  ──► unavailable   (is_available() == false)           │
//! │    in_stock  > 0  ──► available     (is_available() == true)            │
//! │                                                                         │
//! │  decrease_stock(q):  in_stock >= q ? in_stock -= q, true : false        │
//! │  increase_stock(q):  in_stock += q                                      │
//! │                                                                         │
//! │  q must be positive for both. in_stock never goes below zero.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The methods here mutate an in-memory record. Persisted stock is changed
//! through `ProductRepository` in catalog-db, which applies the same rule as
//! one conditional UPDATE.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{
    validate_description, validate_measurement, validate_name, validate_price_cents,
    validate_quantity, validate_sku, validate_stock_level, validate_uid,
};
use crate::{DEFAULT_MEASUREMENT, DISCOUNT_RATE};

// =============================================================================
// Product
// =============================================================================

/// A stored product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Primary key (UUID v4).
    pub id: String,

    /// External-facing unique identifier.
    pub uid: String,

    /// Parent product when this product is a variant.
    pub parent_id: Option<String>,

    /// Owning category.
    pub category_id: String,

    /// Stock Keeping Unit - unique business identifier.
    pub sku: String,

    pub name: String,

    pub description: Option<String>,

    /// Unit label: `pcs`, `kg`, `ml`, ...
    pub measurement: String,

    /// Units on hand. Never negative.
    pub in_stock: i64,

    /// Price in cents (two fractional digits).
    pub price_cents: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a product from caller input, generating `id` (and `uid` when
    /// absent) and validating every field.
    pub fn new(new: NewProduct) -> CoreResult<Self> {
        let now = Utc::now();

        let product = Product {
            id: Uuid::new_v4().to_string(),
            uid: new
                .uid
                .map(|uid| uid.trim().to_string())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            parent_id: new.parent_id,
            category_id: new.category_id,
            sku: new.sku.trim().to_string(),
            name: new.name.trim().to_string(),
            description: new.description,
            measurement: new.measurement.trim().to_string(),
            in_stock: new.in_stock,
            price_cents: new.price.cents(),
            created_at: now,
            updated_at: now,
        };

        product.validate()?;
        Ok(product)
    }

    /// Checks field rules and the self-parent rule.
    ///
    /// Existence of the category and parent, uniqueness, and deeper cycles
    /// need the store and are checked there.
    pub fn validate(&self) -> CoreResult<()> {
        validate_uid(&self.uid)?;
        validate_sku(&self.sku)?;
        validate_name("name", &self.name)?;
        validate_description(self.description.as_deref())?;
        validate_measurement(&self.measurement)?;
        validate_stock_level(self.in_stock)?;
        validate_price_cents(self.price_cents)?;

        if self.parent_id.as_deref() == Some(self.id.as_str()) {
            return Err(CoreError::SelfParent {
                product_id: self.id.clone(),
            });
        }

        Ok(())
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// True iff at least one unit is on hand.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.in_stock > 0
    }

    #[inline]
    pub fn is_variant(&self) -> bool {
        self.parent_id.is_some()
    }

    /// The fixed catalog discount: `max(0, price × 10%)`, rounded to the cent.
    ///
    /// Never negative, even for a (invalid) negative price.
    ///
    /// ## Example
    /// ```text
    /// price 100.00 → discount 10.00
    /// price  19.99 → discount  2.00   (1.999 rounds half-up)
    /// price   0.00 → discount  0.00
    /// price  -5.00 → discount  0.00
    /// ```
    pub fn discount(&self) -> Money {
        self.price().apply_rate(DISCOUNT_RATE).clamp_non_negative()
    }

    /// Price after the catalog discount.
    pub fn discounted_price(&self) -> Money {
        self.price() - self.discount()
    }

    /// Takes `quantity` units if enough are on hand.
    ///
    /// ## Returns
    /// * `Ok(true)` - stock reduced by `quantity`
    /// * `Ok(false)` - not enough stock; nothing changed
    /// * `Err(..)` - `quantity` is not positive; nothing changed
    pub fn decrease_stock(&mut self, quantity: i64) -> CoreResult<bool> {
        validate_quantity(quantity)?;

        if self.in_stock < quantity {
            return Ok(false);
        }

        self.in_stock -= quantity;
        self.updated_at = Utc::now();
        Ok(true)
    }

    /// Adds `quantity` units. No upper bound beyond the counter's range.
    pub fn increase_stock(&mut self, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        self.in_stock = self
            .in_stock
            .checked_add(quantity)
            .ok_or_else(|| CoreError::StockOverflow {
                sku: self.sku.clone(),
                current: self.in_stock,
                quantity,
            })?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

// =============================================================================
// New Product
// =============================================================================

/// Caller input for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub uid: Option<String>,
    pub parent_id: Option<String>,
    pub category_id: String,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub measurement: String,
    pub in_stock: i64,
    pub price: Money,
}

impl NewProduct {
    /// A product with no stock, measured in pieces.
    pub fn new(
        category_id: impl Into<String>,
        sku: impl Into<String>,
        name: impl Into<String>,
        price: Money,
    ) -> Self {
        NewProduct {
            uid: None,
            parent_id: None,
            category_id: category_id.into(),
            sku: sku.into(),
            name: name.into(),
            description: None,
            measurement: DEFAULT_MEASUREMENT.to_string(),
            in_stock: 0,
            price,
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Makes the new product a variant of `parent_id`.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_measurement(mut self, measurement: impl Into<String>) -> Self {
        self.measurement = measurement.into();
        self
    }

    pub fn with_stock(mut self, in_stock: i64) -> Self {
        self.in_stock = in_stock;
        self
    }
}

// =============================================================================
// Product Filter
// =============================================================================

/// Composable product listing criteria.
///
/// Every criterion narrows the result; an empty filter lists everything.
///
/// ```rust
/// use catalog_core::ProductFilter;
///
/// // Available products of one category, at most 20.
/// let filter = ProductFilter::available().in_category("cat-id").limit(20);
/// assert!(filter.available_only);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub category_id: Option<String>,
    pub parent_id: Option<String>,
    pub available_only: bool,
    pub limit: Option<u32>,
}

impl ProductFilter {
    pub fn all() -> Self {
        ProductFilter::default()
    }

    /// Only products with `in_stock > 0`.
    pub fn available() -> Self {
        ProductFilter {
            available_only: true,
            ..ProductFilter::default()
        }
    }

    pub fn in_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Only direct variants of `parent_id`.
    pub fn variants_of(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// In-memory evaluation of every criterion except `limit`.
    pub fn matches(&self, product: &Product) -> bool {
        if self.available_only && !product.is_available() {
            return false;
        }
        if let Some(category_id) = &self.category_id {
            if &product.category_id != category_id {
                return false;
            }
        }
        if let Some(parent_id) = &self.parent_id {
            if product.parent_id.as_ref() != Some(parent_id) {
                return false;
            }
        }
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn product(in_stock: i64, price_cents: i64) -> Product {
        Product::new(
            NewProduct::new("cat-1", "TEA-1", "Green Tea", Money::from_cents(price_cents))
                .with_stock(in_stock),
        )
        .unwrap()
    }

    #[test]
    fn test_new_product_defaults() {
        let p = product(0, 100);
        assert_eq!(p.measurement, "pcs");
        assert_eq!(p.parent_id, None);
        assert!(!p.is_variant());
        assert!(Uuid::parse_str(&p.uid).is_ok());
    }

    #[test]
    fn test_new_product_rejects_invalid_input() {
        let base = || NewProduct::new("cat-1", "TEA-1", "Tea", Money::from_cents(100));

        assert!(Product::new(base().with_stock(-1)).is_err());
        assert!(Product::new(NewProduct::new("c", "TEA-1", "Tea", Money::from_cents(-1))).is_err());
        assert!(Product::new(NewProduct::new("c", "", "Tea", Money::zero())).is_err());
        assert!(Product::new(NewProduct::new("c", "T-1", " ", Money::zero())).is_err());
        assert!(Product::new(base().with_measurement("")).is_err());
    }

    #[test]
    fn test_new_product_trims_identifiers() {
        let p = Product::new(
            NewProduct::new("cat-1", " TEA-1 ", "Tea", Money::from_cents(100)).with_uid(" prd-tea "),
        )
        .unwrap();
        assert_eq!(p.sku, "TEA-1");
        assert_eq!(p.uid, "prd-tea");

        // Edited records are checked as stored, without trimming.
        let mut edited = p.clone();
        edited.sku = "TEA-1 ".to_string();
        assert!(edited.validate().is_err());
    }

    #[test]
    fn test_self_parent_rejected() {
        let mut p = product(1, 100);
        p.parent_id = Some(p.id.clone());
        assert!(matches!(p.validate(), Err(CoreError::SelfParent { .. })));
    }

    #[test]
    fn test_is_available_matches_stock() {
        for stock in [0, 1, 7] {
            assert_eq!(product(stock, 100).is_available(), stock > 0);
        }
    }

    #[test]
    fn test_discount() {
        assert_eq!(product(0, 10000).discount(), Money::from_cents(1000));
        assert_eq!(product(0, 0).discount(), Money::zero());
        assert_eq!(product(0, 1999).discount(), Money::from_cents(200));
        assert_eq!(product(0, 10000).discounted_price(), Money::from_cents(9000));

        // Negative prices can't be created, but a corrupt record must still
        // never produce a negative discount.
        let mut corrupt = product(0, 100);
        corrupt.price_cents = -500;
        assert_eq!(corrupt.discount(), Money::zero());
    }

    #[test]
    fn test_decrease_stock_within_stock() {
        let mut p = product(5, 100);
        assert!(p.decrease_stock(3).unwrap());
        assert_eq!(p.in_stock, 2);
        assert!(p.decrease_stock(2).unwrap());
        assert_eq!(p.in_stock, 0);
        assert!(!p.is_available());
    }

    #[test]
    fn test_decrease_stock_insufficient_leaves_stock() {
        let mut p = product(2, 100);
        assert!(!p.decrease_stock(3).unwrap());
        assert_eq!(p.in_stock, 2);
    }

    #[test]
    fn test_stock_mutation_rejects_non_positive_quantity() {
        let mut p = product(2, 100);
        for qty in [0, -1] {
            assert!(matches!(
                p.decrease_stock(qty),
                Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
            ));
            assert!(p.increase_stock(qty).is_err());
        }
        assert_eq!(p.in_stock, 2);
    }

    #[test]
    fn test_increase_stock() {
        let mut p = product(2, 100);
        p.increase_stock(10).unwrap();
        assert_eq!(p.in_stock, 12);

        p.in_stock = i64::MAX - 1;
        assert!(matches!(
            p.increase_stock(2),
            Err(CoreError::StockOverflow { .. })
        ));
        assert_eq!(p.in_stock, i64::MAX - 1);
    }

    #[test]
    fn test_filter_matches() {
        let mut tea = product(0, 100);
        tea.category_id = "tea".to_string();
        let mut variant = product(4, 100);
        variant.category_id = "tea".to_string();
        variant.parent_id = Some(tea.id.clone());

        let available_tea = ProductFilter::available().in_category("tea");
        assert!(!available_tea.matches(&tea));
        assert!(available_tea.matches(&variant));

        assert!(ProductFilter::all().variants_of(&tea.id).matches(&variant));
        assert!(!ProductFilter::all().variants_of(&tea.id).matches(&tea));
        assert!(!ProductFilter::all().in_category("coffee").matches(&variant));
    }
}
