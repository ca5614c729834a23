//! # Validation Module
//!
//! Input validation for catalog records and stock operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Service layer (outside this workspace)                       │
//! │  └── Request shape, authentication                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: catalog-core (THIS MODULE)                                   │
//! │  └── Field rules, positive quantities, non-negative prices             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE (uid, sku, slug)                                           │
//! │  ├── FOREIGN KEY (category_id, parent_id)                              │
//! │  └── CHECK (in_stock >= 0, price_cents >= 0, parent_id <> id)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::validation::{validate_quantity, validate_sku};
//!
//! validate_sku("TEA-GREEN-100G").unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MAX_SKU_LEN: usize = 64;
pub const MAX_UID_LEN: usize = 64;
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_SLUG_LEN: usize = 120;
pub const MAX_MEASUREMENT_LEN: usize = 32;
pub const MAX_DESCRIPTION_LEN: usize = 5000;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Shared rule for business codes: non-empty, bounded, `[A-Za-z0-9_-]`.
///
/// The value is checked exactly as given; surrounding whitespace fails the
/// character rule.
fn validate_code(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Only ASCII letters, digits, hyphens, underscores
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_sku;
///
/// assert!(validate_sku("COKE-330").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    validate_code("sku", sku, MAX_SKU_LEN)
}

/// Validates an external UID. Same character rules as a SKU, so generated
/// UUID strings are always accepted.
pub fn validate_uid(uid: &str) -> ValidationResult<()> {
    validate_code("uid", uid, MAX_UID_LEN)
}

// =============================================================================
// Text Validators
// =============================================================================

/// Validates a display name (category or product).
///
/// ## Rules
/// - Must not be empty or whitespace only
/// - At most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an optional description. `None` and empty text are fine.
pub fn validate_description(description: Option<&str>) -> ValidationResult<()> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LEN => {
            Err(ValidationError::TooLong {
                field: "description".to_string(),
                max: MAX_DESCRIPTION_LEN,
            })
        }
        _ => Ok(()),
    }
}

/// Validates a measurement unit label such as `pcs`, `kg`, `ml`.
pub fn validate_measurement(measurement: &str) -> ValidationResult<()> {
    let measurement = measurement.trim();

    if measurement.is_empty() {
        return Err(ValidationError::Required {
            field: "measurement".to_string(),
        });
    }

    if measurement.chars().count() > MAX_MEASUREMENT_LEN {
        return Err(ValidationError::TooLong {
            field: "measurement".to_string(),
            max: MAX_MEASUREMENT_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Slugs
// =============================================================================

/// Validates a URL-safe slug.
///
/// ## Rules
/// ```text
/// "hot-drinks"    ✓   lowercase ASCII letters and digits
/// "tea-2024"      ✓   single hyphens between words
/// "Hot-Drinks"    ✗   uppercase
/// "hot--drinks"   ✗   empty word
/// "-hot"          ✗   leading/trailing hyphen
/// "hot drinks"    ✗   space
/// ```
pub fn validate_slug(slug: &str) -> ValidationResult<()> {
    if slug.is_empty() {
        return Err(ValidationError::Required {
            field: "slug".to_string(),
        });
    }

    if slug.len() > MAX_SLUG_LEN {
        return Err(ValidationError::TooLong {
            field: "slug".to_string(),
            max: MAX_SLUG_LEN,
        });
    }

    let well_formed = slug.split('-').all(|word| {
        !word.is_empty()
            && word
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    });

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "slug".to_string(),
            reason: "must be lowercase letters and digits separated by single hyphens"
                .to_string(),
        });
    }

    Ok(())
}

/// Derives a slug from a display name.
///
/// Runs of anything that is not an ASCII letter or digit collapse into a
/// single hyphen. Returns an empty string when nothing usable remains, which
/// [`validate_slug`] then rejects.
///
/// ```rust
/// use catalog_core::validation::slugify;
///
/// assert_eq!(slugify("  Hot Drinks & Tea! "), "hot-drinks-tea");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock mutation quantity.
///
/// ## Rules
/// - Must be positive (> 0). Zero and negative quantities are rejected
///   before any state change.
///
/// ## Flow
/// ```text
/// decrease_stock(id, qty)
///      │
///      ▼
/// validate_quantity(qty) ← THIS FUNCTION
///      │
///      ├── qty <= 0? → Error: "quantity must be positive"
///      │
///      └── OK → conditional UPDATE
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates an initial stock level: zero or more.
pub fn validate_stock_level(in_stock: i64) -> ValidationResult<()> {
    if in_stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "in_stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ```rust
/// use catalog_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());     // Free item
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("COKE-330").is_ok());
        assert!(validate_sku("product_1").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku("ÜBER-1").is_err());
        assert!(validate_sku(&"A".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_uid_accepts_uuid() {
        assert!(validate_uid(&uuid::Uuid::new_v4().to_string()).is_ok());
        assert!(validate_uid("cat/1").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Green Tea 100g").is_ok());
        assert!(matches!(
            validate_name("name", "  "),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_name("name", &"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description(None).is_ok());
        assert!(validate_description(Some("")).is_ok());
        assert!(validate_description(Some(&"x".repeat(5001))).is_err());
    }

    #[test]
    fn test_validate_measurement() {
        assert!(validate_measurement("pcs").is_ok());
        assert!(validate_measurement("").is_err());
        assert!(validate_measurement(&"m".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("hot-drinks").is_ok());
        assert!(validate_slug("tea-2024").is_ok());

        assert!(validate_slug("").is_err());
        assert!(validate_slug("Hot-Drinks").is_err());
        assert!(validate_slug("hot--drinks").is_err());
        assert!(validate_slug("-hot").is_err());
        assert!(validate_slug("hot-").is_err());
        assert!(validate_slug("hot drinks").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hot Drinks"), "hot-drinks");
        assert_eq!(slugify("  Hot Drinks & Tea! "), "hot-drinks-tea");
        assert_eq!(slugify("Чай"), "");
        assert_eq!(slugify("Size: XL"), "size-xl");

        for name in ["Hot Drinks", "A  B", "x--y", "2024 Deals!!"] {
            assert!(validate_slug(&slugify(name)).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1_000_000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_stock_and_price() {
        assert!(validate_stock_level(0).is_ok());
        assert!(validate_stock_level(-1).is_err());
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_codes_with_surrounding_whitespace_rejected() {
        for padded in [" cat-tea", "cat-tea ", " cat-tea ", "\tCOKE-330"] {
            assert!(matches!(
                validate_uid(padded),
                Err(ValidationError::InvalidFormat { .. })
            ));
            assert!(validate_sku(padded).is_err());
        }
        assert!(validate_uid("cat-tea").is_ok());
    }
}
