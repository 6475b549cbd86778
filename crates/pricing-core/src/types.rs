//! # Domain Types
//!
//! Core domain types used throughout the pricing pipeline.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  OrderRequest   │   │      Line       │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  region         │──►│  product_id     │──►│  id             │       │
//! │  │  rounding_mode? │   │  qty (> 0)      │   │  name           │       │
//! │  │  lines          │   └─────────────────┘   │  unit_price     │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────────────┐   ┌─────────────────────────────────┐     │
//! │  │      OrderResult        │   │   OrderRecord (persistence)     │     │
//! │  │  ─────────────────────  │   │  ─────────────────────────────  │     │
//! │  │  net before   (2 dp)    │──►│  region, totals, labels         │     │
//! │  │  discount     (2 dp)    │   │  lines: product_id, qty,        │     │
//! │  │  net after    (2 dp)    │   │         unit_price              │     │
//! │  │  tax          (2 dp)    │   └─────────────────────────────────┘     │
//! │  │  gross        (0 dp)    │                                            │
//! │  │  applied discounts      │                                            │
//! │  └─────────────────────────┘                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All of these are transient: built for one pricing call and dropped after.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::discount::DiscountType;
use crate::money::{Money, RoundingMode};
use crate::{AMOUNT_SCALE, GROSS_SCALE};

// =============================================================================
// Rate
// =============================================================================

/// A fraction applied to an amount (`0.05` = 5%).
///
/// ## Why a fraction, not basis points?
/// Rates are configuration values (`pricing.toml`) and are multiplied into
/// decimals directly. [`Rate::from_bps`] builds one from an integer number
/// of basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(Decimal);

impl Rate {
    /// Creates a rate from a decimal fraction.
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Rate(value)
    }

    /// Creates a rate from a whole percentage (`from_percent(5)` = 0.05).
    #[inline]
    pub fn from_percent(pct: u32) -> Self {
        Rate(Decimal::new(i64::from(pct), 2))
    }

    /// Creates a rate from basis points (`from_bps(825)` = 0.0825).
    #[inline]
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::new(i64::from(bps), 4))
    }

    /// Returns the fraction.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(Decimal::ZERO)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as returned by the catalog collaborator.
///
/// The pipeline reads products and never mutates or caches them beyond one
/// pricing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque product identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price, non-negative.
    pub unit_price: Money,
}

impl Product {
    /// Creates a product.
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: Money) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            unit_price,
        }
    }
}

// =============================================================================
// Order Request
// =============================================================================

/// One requested product and quantity.
///
/// Several lines may name the same product; they are priced and reserved
/// independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// Product identifier, resolved through the catalog.
    pub product_id: String,

    /// Requested quantity. Must be > 0 (checked by validation, not by type,
    /// so that malformed requests can be represented and rejected).
    pub qty: i64,
}

impl Line {
    /// Creates an order line.
    pub fn new(product_id: impl Into<String>, qty: i64) -> Self {
        Line {
            product_id: product_id.into(),
            qty,
        }
    }
}

/// An order to be priced.
///
/// Absent JSON fields deserialize to empty values (`""`, `[]`) so that they
/// fail validation the same way blank values do.
///
/// ## Example
/// ```rust
/// use pricing_core::types::OrderRequest;
/// use pricing_core::money::RoundingMode;
///
/// let json = r#"{"region":"JP","roundingMode":"HALF_DOWN","lines":[{"productId":"A","qty":2}]}"#;
/// let request: OrderRequest = serde_json::from_str(json).unwrap();
/// assert_eq!(request.tax_rounding_mode(), RoundingMode::HalfDown);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Tax region identifier, must not be blank.
    #[serde(default)]
    pub region: String,

    /// Rounding mode handed to the tax collaborator. `None` means HALF_UP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding_mode: Option<RoundingMode>,

    /// Requested lines, must not be empty.
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl OrderRequest {
    /// Creates a request without an explicit rounding mode.
    pub fn new(region: impl Into<String>, lines: Vec<Line>) -> Self {
        OrderRequest {
            region: region.into(),
            rounding_mode: None,
            lines,
        }
    }

    /// Sets the rounding mode passed to the tax collaborator.
    pub fn with_rounding_mode(mut self, mode: RoundingMode) -> Self {
        self.rounding_mode = Some(mode);
        self
    }

    /// The mode the tax collaborator receives: the requested one, else HALF_UP.
    pub fn tax_rounding_mode(&self) -> RoundingMode {
        self.rounding_mode.unwrap_or_default()
    }

    /// Number of distinct product ids across all lines.
    ///
    /// ## Example
    /// ```rust
    /// use pricing_core::types::{Line, OrderRequest};
    ///
    /// let request = OrderRequest::new("JP", vec![
    ///     Line::new("A", 1),
    ///     Line::new("B", 1),
    ///     Line::new("A", 4),
    /// ]);
    /// assert_eq!(request.distinct_product_count(), 2);
    /// ```
    pub fn distinct_product_count(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.product_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

// =============================================================================
// Order Result
// =============================================================================

/// The priced order.
///
/// ## Scale Contract
/// | field | scale | mode |
/// |---|---|---|
/// | `total_net_before_discount` | 2 | HALF_UP |
/// | `total_discount` | 2 | HALF_UP |
/// | `total_net_after_discount` | 2 | HALF_UP |
/// | `total_tax` | 2 | HALF_UP |
/// | `total_gross` | 0 | HALF_UP |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    pub total_net_before_discount: Money,
    pub total_discount: Money,
    pub total_net_after_discount: Money,
    pub total_tax: Money,
    pub total_gross: Money,
    /// Labels of the discount policies that contributed, in chain order.
    pub applied_discounts: Vec<DiscountType>,
}

/// Unrounded pipeline totals, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTotals {
    pub net_before_discount: Money,
    pub discount: Money,
    pub net_after_discount: Money,
    pub tax: Money,
    pub gross: Money,
}

impl OrderResult {
    /// Normalizes raw totals to the fixed scales.
    ///
    /// Always HALF_UP: the request's rounding mode only reaches the tax
    /// collaborator, never this step.
    pub fn assemble(raw: RawTotals, applied_discounts: Vec<DiscountType>) -> Self {
        let normalize = |amount: Money| amount.round_to(AMOUNT_SCALE, RoundingMode::HalfUp);
        OrderResult {
            total_net_before_discount: normalize(raw.net_before_discount),
            total_discount: normalize(raw.discount),
            total_net_after_discount: normalize(raw.net_after_discount),
            total_tax: normalize(raw.tax),
            total_gross: raw.gross.round_to(GROSS_SCALE, RoundingMode::HalfUp),
            applied_discounts,
        }
    }
}

// =============================================================================
// Persistence Projection
// =============================================================================

/// One line of a persisted order, with the unit price resolved at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRecord {
    pub product_id: String,
    pub qty: i64,
    pub unit_price: Money,
}

/// Persistence-shaped projection of an [`OrderResult`].
///
/// Consumed by an [`OrderRepository`](crate::ports::OrderRepository); the
/// pricing pipeline itself never builds or stores one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub region: String,
    pub lines: Vec<OrderLineRecord>,
    pub net_before: Money,
    pub total_discount: Money,
    pub net_after: Money,
    pub total_tax: Money,
    pub gross: Money,
    pub applied_discounts: Vec<DiscountType>,
}

impl OrderRecord {
    /// Combines a priced result with resolved line records.
    pub fn from_result(region: &str, lines: Vec<OrderLineRecord>, result: &OrderResult) -> Self {
        OrderRecord {
            region: region.to_string(),
            lines,
            net_before: result.total_net_before_discount,
            total_discount: result.total_discount,
            net_after: result.total_net_after_discount,
            total_tax: result.total_tax,
            gross: result.total_gross,
            applied_discounts: result.applied_discounts.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
