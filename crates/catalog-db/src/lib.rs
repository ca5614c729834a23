//! # catalog-db: Database Layer for the Product Catalog
//!
//! SQLite persistence for categories and products, using sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                                │
//! │                                                                         │
//! │  Caller (service layer, seed binary, tests)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   catalog-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐ │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │ │   │
//! │  │   │               │    │ CategoryRepo   │    │ 0001_catalog │ │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo    │    │   _schema    │ │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘ │   │
//! │  │           ▲                                                     │   │
//! │  │           │ DbConfig (config.rs, env or builder)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL) or private in-memory database              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Domain rules (validation, discount, hierarchy checks) live in
//! `catalog-core`; this crate applies them and adds the rules that need the
//! store: uniqueness, references, atomic stock updates.
//!
//! ## Module Organization
//!
//! - [`config`] - Pool configuration, from code or environment
//! - [`pool`] - Connection pool creation
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Category and product repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//!
//! let categories = db.categories().with_product_count(CategoryScope::Active).await?;
//! let sold = db.products().decrease_stock(&product.id, 1).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, DbConfig};
pub use error::{DbError, DbResult};
pub use pool::Database;

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::product::ProductRepository;
