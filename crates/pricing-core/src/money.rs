//! # Money Module
//!
//! Provides the `Money` type and the rounding vocabulary used by the pricing
//! pipeline.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    107800 × 0.03 = 3233.9999999999995  ❌ WRONG!                         │
//! │                                                                         │
//! │  OUR SOLUTION: Fixed-point decimals                                     │
//! │    107800 × 0.03 = 3234.00 exactly                                      │
//! │    Intermediate values keep full precision; rounding happens ONCE,      │
//! │    when the result is assembled, with an explicit scale and mode.       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pricing_core::money::{Money, RoundingMode};
//! use pricing_core::types::Rate;
//!
//! let unit_price = Money::from_major(1000);
//! let line = unit_price.checked_multiply_quantity(10).unwrap(); // 10000
//! let discount = line.percentage(Rate::from_percent(5));        // 500.00
//!
//! let reported = (line - discount).round_to(2, RoundingMode::HalfUp);
//! assert_eq!(reported.to_string(), "9500.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::Rate;

// =============================================================================
// Rounding Mode
// =============================================================================

/// How a value is brought down to a fixed number of decimal places.
///
/// ## Two Rounding Paths
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  OrderRequest.roundingMode (default HALF_UP)                            │
/// │       │                                                                 │
/// │       └──► TaxCalculator (collaborator rounds its OWN amounts)          │
/// │                                                                         │
/// │  Result assembly                                                        │
/// │       │                                                                 │
/// │       └──► ALWAYS HALF_UP, regardless of the request                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingMode {
    /// Away from zero.
    Up,
    /// Towards zero (truncate).
    Down,
    /// Towards positive infinity.
    Ceiling,
    /// Towards negative infinity.
    Floor,
    /// Nearest neighbour, ties away from zero.
    #[default]
    HalfUp,
    /// Nearest neighbour, ties towards zero.
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour (bankers rounding).
    HalfEven,
}

impl RoundingMode {
    /// Maps the mode onto the `rust_decimal` strategy that implements it.
    pub const fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::Up => RoundingStrategy::AwayFromZero,
            RoundingMode::Down => RoundingStrategy::ToZero,
            RoundingMode::Ceiling => RoundingStrategy::ToPositiveInfinity,
            RoundingMode::Floor => RoundingStrategy::ToNegativeInfinity,
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfDown => RoundingStrategy::MidpointTowardZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundingMode::Up => "UP",
            RoundingMode::Down => "DOWN",
            RoundingMode::Ceiling => "CEILING",
            RoundingMode::Floor => "FLOOR",
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfDown => "HALF_DOWN",
            RoundingMode::HalfEven => "HALF_EVEN",
        };
        f.write_str(name)
    }
}

impl FromStr for RoundingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "UP" => Ok(RoundingMode::Up),
            "DOWN" => Ok(RoundingMode::Down),
            "CEILING" => Ok(RoundingMode::Ceiling),
            "FLOOR" => Ok(RoundingMode::Floor),
            "HALF_UP" => Ok(RoundingMode::HalfUp),
            "HALF_DOWN" => Ok(RoundingMode::HalfDown),
            "HALF_EVEN" => Ok(RoundingMode::HalfEven),
            other => Err(ValidationError::InvalidFormat {
                field: "roundingMode".to_string(),
                reason: format!("unknown rounding mode '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the catalog's currency unit.
///
/// ## Design Decisions
/// - **Decimal (not integer cents)**: discount rates produce sub-cent
///   intermediates (e.g. `1.005`) that must survive until final rounding
/// - **Signed**: the cap policy emits a negative adjustment
/// - **Scale is preserved**: `Money` never rounds implicitly; only
///   [`Money::round_to`] changes precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a whole-unit amount (`from_major(1000)` is `1000`).
    #[inline]
    pub fn from_major(major: i64) -> Self {
        Money(Decimal::from(major))
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Number of digits after the decimal point currently carried.
    #[inline]
    pub const fn scale(&self) -> u32 {
        self.0.scale()
    }

    /// Checks if the value is zero (at any scale: `0.00` is zero).
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a unit price by a quantity. No rounding.
    ///
    /// Returns `None` when the product does not fit in a decimal.
    ///
    /// ## Example
    /// ```rust
    /// use pricing_core::money::Money;
    ///
    /// let unit_price: Money = "2.99".parse().unwrap();
    /// assert_eq!(unit_price.checked_multiply_quantity(3).unwrap().to_string(), "8.97");
    /// assert!(Money::from_major(100_000_000_000).checked_multiply_quantity(i64::MAX).is_none());
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// Returns `self × rate` at full precision. No rounding.
    ///
    /// ## Example
    /// ```rust
    /// use pricing_core::money::Money;
    /// use pricing_core::types::Rate;
    ///
    /// let base = Money::from_major(107800);
    /// let discount = base.percentage(Rate::from_percent(3));
    /// assert_eq!(discount, Money::from_major(3234));
    /// ```
    #[inline]
    pub fn percentage(&self, rate: Rate) -> Self {
        Money(self.0 * rate.value())
    }

    /// [`Money::percentage`] that returns `None` instead of overflowing.
    #[inline]
    pub fn checked_percentage(&self, rate: Rate) -> Option<Self> {
        self.0.checked_mul(rate.value()).map(Money)
    }

    /// `self + other`, or `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// `self − other`, or `None` on overflow.
    #[inline]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Sums amounts in iteration order, or `None` if any partial sum
    /// overflows.
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, amount| acc.checked_add(amount))
    }

    /// Rounds to exactly `scale` decimal places with the given mode.
    ///
    /// The result always carries `scale` digits, padding with zeros when the
    /// value had fewer (`1000` at scale 2 becomes `1000.00`).
    ///
    /// ## Example
    /// ```rust
    /// use pricing_core::money::{Money, RoundingMode};
    ///
    /// let tax: Money = "10000.4999".parse().unwrap();
    /// assert_eq!(tax.round_to(2, RoundingMode::HalfUp).to_string(), "10000.50");
    ///
    /// let gross: Money = "110000.49".parse().unwrap();
    /// assert_eq!(gross.round_to(0, RoundingMode::HalfUp).to_string(), "110000");
    /// ```
    pub fn round_to(&self, scale: u32, mode: RoundingMode) -> Self {
        let mut rounded = self.0.round_dp_with_strategy(scale, mode.strategy());
        // round_dp leaves shorter values untouched; pad them to the fixed scale
        rounded.rescale(scale);
        Money(rounded)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount with whatever scale it currently carries.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str_exact(s.trim())
            .map(Money)
            .map_err(|e| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: e.to_string(),
            })
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
