//! # Discount Policy Chain
//!
//! Order-level discounts applied as an ordered fold over a fixed list of
//! policy variants.
//!
//! ## The Running Base
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal = 115000                                                      │
//! │                                                                         │
//! │  Volume      5% of ORIGINAL qty≥10 lines  = 5000    base → 110000       │
//! │  MultiItem   2% of base (≥3 products)     = 2200    base → 107800       │
//! │  HighAmount  3% of base (base ≥ 100000)   = 3234    base → 104566       │
//! │  Cap         sum 10434 vs 30% × 115000    = 0       (under the cap)     │
//! │                                                                         │
//! │  total = 10434   applied = [VOLUME, MULTI_ITEM, HIGH_AMOUNT]            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each policy receives `subtotal − (sum of earlier discounts)`. The cap
//! policy runs last and returns a negative adjustment when the cumulative
//! discount exceeds `rate × subtotal`, bringing the total down to exactly
//! the cap.
//!
//! Policies only read the request and the catalog.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{PricingError, PricingResult};
use crate::money::Money;
use crate::ports::ProductCatalog;
use crate::pricing::{price_line, price_lines, subtotal};
use crate::types::{OrderRequest, Rate};

// =============================================================================
// Labels and Result
// =============================================================================

/// Label reported for a policy that contributed a non-zero amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    Volume,
    MultiItem,
    HighAmount,
    Cap,
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DiscountType::Volume => "VOLUME",
            DiscountType::MultiItem => "MULTI_ITEM",
            DiscountType::HighAmount => "HIGH_AMOUNT",
            DiscountType::Cap => "CAP",
        };
        f.write_str(name)
    }
}

/// Outcome of running the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountResult {
    /// Sum of every policy's contribution, including the cap adjustment.
    pub total: Money,
    /// Labels of contributing policies, in chain order.
    pub applied: Vec<DiscountType>,
}

// =============================================================================
// Policies
// =============================================================================

/// `rate` of the original amount of every line with `qty ≥ min_qty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeDiscount {
    pub rate: Rate,
    pub min_qty: i64,
    pub label: Option<DiscountType>,
}

impl VolumeDiscount {
    pub fn new(rate: Rate, min_qty: i64) -> Self {
        VolumeDiscount {
            rate,
            min_qty,
            label: Some(DiscountType::Volume),
        }
    }

    /// Looks up only the lines that qualify.
    fn discount<C>(&self, request: &OrderRequest, catalog: &C) -> PricingResult<Money>
    where
        C: ProductCatalog + ?Sized,
    {
        let mut total = Money::zero();
        for line in request.lines.iter().filter(|line| line.qty >= self.min_qty) {
            let priced = price_line(line, catalog)?;
            total = priced
                .amount
                .checked_percentage(self.rate)
                .and_then(|amount| total.checked_add(amount))
                .ok_or_else(|| PricingError::overflow("VOLUME discount"))?;
        }
        Ok(total)
    }
}

/// `rate` of the running base when the order names at least
/// `min_distinct_products` different products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiItemDiscount {
    pub rate: Rate,
    pub min_distinct_products: usize,
    pub label: Option<DiscountType>,
}

impl MultiItemDiscount {
    pub fn new(rate: Rate, min_distinct_products: usize) -> Self {
        MultiItemDiscount {
            rate,
            min_distinct_products,
            label: Some(DiscountType::MultiItem),
        }
    }

    fn discount(&self, request: &OrderRequest, base: Money) -> PricingResult<Money> {
        if request.distinct_product_count() >= self.min_distinct_products {
            base.checked_percentage(self.rate)
                .ok_or_else(|| PricingError::overflow("MULTI_ITEM discount"))
        } else {
            Ok(Money::zero())
        }
    }
}

/// `rate` of the running base when the base reaches `threshold`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighAmountDiscount {
    pub rate: Rate,
    pub threshold: Money,
    pub label: Option<DiscountType>,
}

impl HighAmountDiscount {
    pub fn new(rate: Rate, threshold: Money) -> Self {
        HighAmountDiscount {
            rate,
            threshold,
            label: Some(DiscountType::HighAmount),
        }
    }

    fn discount(&self, base: Money) -> PricingResult<Money> {
        if base >= self.threshold {
            base.checked_percentage(self.rate)
                .ok_or_else(|| PricingError::overflow("HIGH_AMOUNT discount"))
        } else {
            Ok(Money::zero())
        }
    }
}

/// Ceiling on the cumulative discount: `rate × original subtotal`.
///
/// Returns `cap − sum_so_far` (negative) when the discounts applied so far
/// exceed the cap, zero otherwise. It never increases the discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapPolicy {
    pub rate: Rate,
    pub label: Option<DiscountType>,
}

impl CapPolicy {
    pub fn new(rate: Rate) -> Self {
        CapPolicy {
            rate,
            label: Some(DiscountType::Cap),
        }
    }

    /// The original subtotal is recomputed from the catalog; the discounts
    /// applied so far are `subtotal − base`.
    fn discount<C>(&self, request: &OrderRequest, catalog: &C, base: Money) -> PricingResult<Money>
    where
        C: ProductCatalog + ?Sized,
    {
        let overflow = || PricingError::overflow("CAP adjustment");
        let subtotal = subtotal(&price_lines(&request.lines, catalog)?)?;
        let sum_so_far = subtotal.checked_sub(base).ok_or_else(overflow)?;
        let cap = subtotal.checked_percentage(self.rate).ok_or_else(overflow)?;

        if sum_so_far > cap {
            trace!(%sum_so_far, %cap, "Discount exceeds cap");
            cap.checked_sub(sum_so_far).ok_or_else(overflow)
        } else {
            Ok(Money::zero())
        }
    }
}

/// One step of the chain.
///
/// A closed set of variants: the chain order is data at the call site, not
/// something discovered through a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountPolicy {
    Volume(VolumeDiscount),
    MultiItem(MultiItemDiscount),
    HighAmount(HighAmountDiscount),
    Cap(CapPolicy),
}

impl DiscountPolicy {
    /// Amount this policy takes off, given the base left by earlier policies.
    pub fn discount<C>(&self, request: &OrderRequest, catalog: &C, base: Money) -> PricingResult<Money>
    where
        C: ProductCatalog + ?Sized,
    {
        match self {
            DiscountPolicy::Volume(policy) => policy.discount(request, catalog),
            DiscountPolicy::MultiItem(policy) => policy.discount(request, base),
            DiscountPolicy::HighAmount(policy) => policy.discount(base),
            DiscountPolicy::Cap(policy) => policy.discount(request, catalog, base),
        }
    }

    /// Label reported when this policy contributes.
    pub fn label(&self) -> Option<DiscountType> {
        match self {
            DiscountPolicy::Volume(policy) => policy.label,
            DiscountPolicy::MultiItem(policy) => policy.label,
            DiscountPolicy::HighAmount(policy) => policy.label,
            DiscountPolicy::Cap(policy) => policy.label,
        }
    }

    /// Same policy, reported without a label.
    pub fn unlabeled(mut self) -> Self {
        match &mut self {
            DiscountPolicy::Volume(policy) => policy.label = None,
            DiscountPolicy::MultiItem(policy) => policy.label = None,
            DiscountPolicy::HighAmount(policy) => policy.label = None,
            DiscountPolicy::Cap(policy) => policy.label = None,
        }
        self
    }
}

impl From<VolumeDiscount> for DiscountPolicy {
    fn from(policy: VolumeDiscount) -> Self {
        DiscountPolicy::Volume(policy)
    }
}

impl From<MultiItemDiscount> for DiscountPolicy {
    fn from(policy: MultiItemDiscount) -> Self {
        DiscountPolicy::MultiItem(policy)
    }
}

impl From<HighAmountDiscount> for DiscountPolicy {
    fn from(policy: HighAmountDiscount) -> Self {
        DiscountPolicy::HighAmount(policy)
    }
}

impl From<CapPolicy> for DiscountPolicy {
    fn from(policy: CapPolicy) -> Self {
        DiscountPolicy::Cap(policy)
    }
}

// =============================================================================
// The Fold
// =============================================================================

/// Runs `policies` in order over `subtotal`.
///
/// A policy that computes exactly zero is not labeled.
pub fn apply_in_order<C>(
    policies: &[DiscountPolicy],
    request: &OrderRequest,
    catalog: &C,
    subtotal: Money,
) -> PricingResult<DiscountResult>
where
    C: ProductCatalog + ?Sized,
{
    let mut base = subtotal;
    let mut total = Money::zero();
    let mut applied = Vec::new();

    for policy in policies {
        let amount = policy.discount(request, catalog, base)?;
        if !amount.is_zero() {
            if let Some(label) = policy.label() {
                applied.push(label);
            }
        }
        debug!(policy = ?policy.label(), %amount, %base, "Applied discount policy");
        total = total
            .checked_add(amount)
            .ok_or_else(|| PricingError::overflow("total discount"))?;
        base = base
            .checked_sub(amount)
            .ok_or_else(|| PricingError::overflow("discount base"))?;
    }

    Ok(DiscountResult { total, applied })
}

// =============================================================================
// Unit Tests
// =============================================================================
