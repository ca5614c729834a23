//! # catalog-core: Pure Domain Rules for the Product Catalog
//!
//! Categories, products, variants, stock rules and the catalog discount, as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Service layer (HTTP/API, outside this workspace)     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ catalog-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ category  │  │  product  │  │ hierarchy │  │ validation│  │   │
//! │  │   │ Category  │  │  Product  │  │  acyclic  │  │   rules   │  │   │
//! │  │   │  scopes   │  │  stock    │  │  variants │  │   slugs   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  catalog-db (Database Layer)                    │   │
//! │  │        SQLite queries, migrations, atomic stock updates         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`category`] - Category, scopes, product-count aggregation
//! - [`product`] - Product, stock gate, discount, listing filter
//! - [`hierarchy`] - Variant (parent/child) acyclicity
//! - [`money`] - Integer minor-unit money
//! - [`validation`] - Field rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::{Category, Money, NewCategory, NewProduct, Product};
//!
//! let tea = Category::new(NewCategory::new("Tea")).unwrap();
//! let mut sencha = Product::new(
//!     NewProduct::new(&tea.id, "SENCHA-100", "Sencha 100g", "100.00".parse().unwrap())
//!         .with_stock(3),
//! )
//! .unwrap();
//!
//! assert_eq!(sencha.discount(), Money::from_cents(1000));
//! assert!(sencha.decrease_stock(3).unwrap());
//! assert!(!sencha.is_available());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod category;
pub mod error;
pub mod hierarchy;
pub mod money;
pub mod product;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use category::{count_products, Category, CategoryScope, CategoryWithCount, NewCategory};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{BasisPoints, Money};
pub use product::{NewProduct, Product, ProductFilter};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The fixed catalog discount: 10% of the price.
pub const DISCOUNT_RATE: BasisPoints = BasisPoints::from_bps(1000);

/// Measurement label used when the caller does not give one.
pub const DEFAULT_MEASUREMENT: &str = "pcs";
