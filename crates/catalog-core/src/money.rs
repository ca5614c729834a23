//! # Money Module
//!
//! Provides the `Money` type for prices and discounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PRICES ARE FIXED-POINT WITH TWO FRACTIONAL DIGITS                      │
//! │                                                                         │
//! │  Floating point:                                                        │
//! │    19.99 * 0.1 = 1.9990000000000001  ❌                                 │
//! │                                                                         │
//! │  Integer minor units (cents):                                           │
//! │    1999 cents × 1000 bps = 199.9 cents → 200 cents (half-up)  ✅        │
//! │                                                                         │
//! │  The database stores price_cents INTEGER. Only the edges parse or       │
//! │  format the "19.99" decimal form.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::money::{BasisPoints, Money};
//!
//! let price: Money = "100.00".parse().unwrap();
//! assert_eq!(price.cents(), 10000);
//!
//! let discount = price.apply_rate(BasisPoints::from_bps(1000)); // 10%
//! assert_eq!(discount.to_string(), "10.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Basis Points
// =============================================================================

/// A rate in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000, so 1000 bps = 10%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        BasisPoints(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor units (hundredths).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic can go negative; callers clamp where the
///   domain forbids it (see [`Money::clamp_non_negative`])
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **No currency**: the catalog is single-currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Returns `self`, or zero when `self` is negative.
    ///
    /// ```rust
    /// use catalog_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-250).clamp_non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(250).clamp_non_negative().cents(), 250);
    /// ```
    #[inline]
    pub fn clamp_non_negative(self) -> Self {
        self.max(Money::zero())
    }

    /// Applies a rate and rounds half away from zero to the nearest cent.
    ///
    /// ## Implementation
    /// Integer math on i128: `(amount * bps ± 5000) / 10000`.
    /// The ±5000 is half of the 10000 divisor.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::money::{BasisPoints, Money};
    ///
    /// let price = Money::from_cents(1999);              // 19.99
    /// let ten_pct = BasisPoints::from_bps(1000);
    /// assert_eq!(price.apply_rate(ten_pct).cents(), 200); // 1.999 → 2.00
    /// ```
    pub fn apply_rate(&self, rate: BasisPoints) -> Money {
        let raw = self.0 as i128 * rate.bps() as i128;
        let rounded = if raw >= 0 {
            (raw + 5000) / 10000
        } else {
            (raw - 5000) / 10000
        };
        Money(rounded as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal form with two fractional digits, e.g. `10.99`, `-5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Parses the decimal form used at the service boundary.
///
/// Accepts an optional leading `-`, digits, and up to two fractional digits:
/// `"7"`, `"7.5"`, `"7.50"`. Anything finer than a cent is rejected rather
/// than silently rounded.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (major, minor) = match digits.split_once('.') {
            Some((major, minor)) if !minor.is_empty() => (major, minor),
            Some(_) => return Err(invalid("expected digits after the decimal point")),
            None => (digits, ""),
        };

        if major.is_empty() || !major.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected a decimal number such as 19.99"));
        }
        if minor.len() > 2 || !minor.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("at most two fractional digits are allowed"));
        }

        let major: i64 = major.parse().map_err(|_| invalid("amount is too large"))?;
        let minor: i64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => minor.parse::<i64>().map_err(|_| invalid("bad fraction"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!("100.00".parse::<Money>().unwrap().cents(), 10000);
        assert_eq!("7".parse::<Money>().unwrap().cents(), 700);
        assert_eq!("7.5".parse::<Money>().unwrap().cents(), 750);
        assert_eq!(" 0.05 ".parse::<Money>().unwrap().cents(), 5);
        assert_eq!("-5.50".parse::<Money>().unwrap().cents(), -550);

        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.".parse::<Money>().is_err());
        assert!(".50".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("1,50".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((b - a).cents(), -500);
    }

    #[test]
    fn test_apply_rate_rounding() {
        let ten_pct = BasisPoints::from_bps(1000);

        assert_eq!(Money::from_cents(10000).apply_rate(ten_pct).cents(), 1000);
        assert_eq!(Money::from_cents(1999).apply_rate(ten_pct).cents(), 200);
        assert_eq!(Money::from_cents(1994).apply_rate(ten_pct).cents(), 199);
        assert_eq!(Money::from_cents(5).apply_rate(ten_pct).cents(), 1);
        assert_eq!(Money::from_cents(4).apply_rate(ten_pct).cents(), 0);
        assert_eq!(Money::from_cents(-1999).apply_rate(ten_pct).cents(), -200);
        assert_eq!(Money::zero().apply_rate(ten_pct), Money::zero());
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_cents(0).clamp_non_negative(), Money::zero());
        assert_eq!(Money::from_cents(-1).clamp_non_negative(), Money::zero());
    }

    #[test]
    fn test_basis_points() {
        let rate = BasisPoints::from_bps(1000);
        assert_eq!(rate.bps(), 1000);
        assert_eq!(crate::DISCOUNT_RATE, rate);
    }
}
