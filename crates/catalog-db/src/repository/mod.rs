//! # Repository Module
//!
//! Database repository implementations for the catalog.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Caller                                                                │
//! │       │                                                                 │
//! │       │  db.products().decrease_stock(&id, 2)                          │
//! │       ▼                                                                 │
//! │  ProductRepository                CategoryRepository                   │
//! │  ├── list(&filter)                ├── list_active()                    │
//! │  ├── find_by_sku / find_by_uid    ├── with_product_count(scope)        │
//! │  ├── decrease_stock / increase    ├── find_by_uid(uid)                 │
//! │  └── set_parent / list_variants   └── insert / set_active              │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories are cheap `Clone` handles over the shared pool, obtained
//! from [`crate::Database`].
//!
//! ## Available Repositories
//!
//! - [`category::CategoryRepository`] - Category listing, counts, lookups
//! - [`product::ProductRepository`] - Product listing, stock, variants

pub mod category;
pub mod product;
