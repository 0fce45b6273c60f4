//! # Money Module
//!
//! Provides the `Money` type for medicine prices and cart totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A cart line of 3 × ₹19.99 must be exactly ₹59.97, and merging         │
//! │  +2 into it must give exactly 5 × ₹19.99 = ₹99.95.                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise/cents)                       │
//! │    1999 × 5 = 9995  ✓                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use medizap_core::money::Money;
//!
//! let price = Money::from_cents(1999); // ₹19.99
//! let line_total = price.checked_multiply_quantity(3).unwrap();
//! assert_eq!(line_total.cents(), 5997);
//!
//! // Parsing user input is exact too
//! let parsed: Money = "19.99".parse().unwrap();
//! assert_eq!(parsed, price);
//! ```
//!
//! All arithmetic is checked: a result outside the `i64` range is `None`,
//! never a wrapped or panicking value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Where Money is Used
/// ```text
/// Medicine.price_cents ──► CartEntry.total_price_cents = price × quantity
///                                   │
///                                   └──► CartSummary.total_cents = Σ totals
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use medizap_core::money::Money;
    ///
    /// let price = Money::from_cents(1000); // ₹10.00
    /// assert_eq!(price.cents(), 1000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies a unit price by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use medizap_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_multiply_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(unit_price.checked_multiply_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with the rupee sign, e.g. `₹10.99`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.major().abs(), self.cents_part())
    }
}

/// Parses a decimal amount such as `"10"`, `"10.5"` or `"10.50"`.
///
/// At most two fractional digits are accepted; anything finer than one
/// minor unit is rejected rather than rounded.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ValidationError::InvalidFormat {
            field: "price".to_string(),
            value: s.to_string(),
        };
        let too_large = || ValidationError::Overflow {
            field: "price".to_string(),
        };

        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "price".to_string(),
            });
        }

        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (major_str, minor_str) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major_str.is_empty()
            || !major_str.chars().all(|c| c.is_ascii_digit())
            || minor_str.len() > 2
            || !minor_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        // Only digits remain, so a failed parse means too many of them
        let major: i64 = major_str.parse().map_err(|_| too_large())?;
        let minor: i64 = match minor_str.len() {
            0 => 0,
            1 => minor_str.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => minor_str.parse().map_err(|_| invalid())?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(too_large)?;

        Ok(Money(if negative { -cents } else { cents }))
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
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "₹10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::zero()), "₹0.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("10.05".parse::<Money>().unwrap().cents(), 1005);
        assert_eq!("0.99".parse::<Money>().unwrap().cents(), 99);
        assert_eq!("-5.50".parse::<Money>().unwrap().cents(), -550);

        assert!("".parse::<Money>().is_err());
        assert!("10.999".parse::<Money>().is_err());
        assert!(".50".parse::<Money>().is_err());
    }

    #[test]
    fn test_parse_errors_name_the_problem() {
        let err = "abc".parse::<Money>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref value, .. } if value == "abc"));
        assert_eq!(err.to_string(), "price is not a valid amount: 'abc'");

        let err = "99999999999999999999".parse::<Money>().unwrap_err();
        assert!(matches!(err, ValidationError::Overflow { .. }));

        // Fits in i64 as rupees, not as paise
        let err = "92233720368547758.08".parse::<Money>().unwrap_err();
        assert!(matches!(err, ValidationError::Overflow { .. }));
    }

    #[test]
    fn test_merge_totals_are_exact() {
        // 0.1-style values that drift in floating point stay exact here
        let price = Money::from_cents(1999);
        let first = price.checked_multiply_quantity(3).unwrap();
        let merged = price.checked_multiply_quantity(3 + 2).unwrap();
        assert_eq!(first.cents(), 5997);
        assert_eq!(merged.cents(), 9995);
    }

    #[test]
    fn test_checked_multiply_overflow() {
        let price = Money::from_cents(i64::MAX / 2);
        assert!(price.checked_multiply_quantity(3).is_none());
        assert_eq!(
            Money::from_cents(1000).checked_multiply_quantity(5),
            Some(Money::from_cents(5000))
        );
    }

    #[test]
    fn test_checked_add() {
        let a = Money::from_cents(1999);
        assert_eq!(a.checked_add(Money::from_cents(1)), Some(Money::from_cents(2000)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }
}
