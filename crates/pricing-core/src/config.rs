//! # Pricing Configuration
//!
//! Discount rates and thresholds, injected into the pipeline instead of
//! being hard-coded in the policies.
//!
//! ## Defaults
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  policy        rate    condition                                        │
//! │  ───────────   ─────   ──────────────────────────────────────────────   │
//! │  volume        5%      per line, qty ≥ 10, on the original line amount  │
//! │  multi_item    2%      ≥ 3 distinct products, on the running base       │
//! │  high_amount   3%      running base ≥ 100000, on the running base       │
//! │  cap           30%     cumulative discount ≤ 30% of the subtotal        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## File Format
//! ```toml
//! [volume]
//! rate = 0.05
//! min_qty = 10
//!
//! [multi_item]
//! rate = 0.02
//! min_distinct_products = 3
//!
//! [high_amount]
//! rate = 0.03
//! threshold = 100000
//!
//! [cap]
//! enabled = true
//! rate = 0.30
//! ```
//!
//! Loading from disk and the environment lives in `pricing-store`; this
//! module only defines the shape, the defaults and validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::discount::{CapPolicy, DiscountPolicy, HighAmountDiscount, MultiItemDiscount, VolumeDiscount};
use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::Rate;
use crate::validation::{validate_min_count, validate_non_negative, validate_rate};

// =============================================================================
// Policy Settings
// =============================================================================

/// Volume discount settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSettings {
    #[serde(default = "default_volume_rate")]
    pub rate: Rate,

    /// Minimum line quantity that qualifies.
    #[serde(default = "default_min_qty")]
    pub min_qty: i64,
}

fn default_volume_rate() -> Rate {
    Rate::from_percent(5)
}

fn default_min_qty() -> i64 {
    10
}

impl Default for VolumeSettings {
    fn default() -> Self {
        VolumeSettings {
            rate: default_volume_rate(),
            min_qty: default_min_qty(),
        }
    }
}

/// Multi-item discount settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiItemSettings {
    #[serde(default = "default_multi_item_rate")]
    pub rate: Rate,

    /// Minimum number of distinct product ids in the order.
    #[serde(default = "default_min_distinct_products")]
    pub min_distinct_products: usize,
}

fn default_multi_item_rate() -> Rate {
    Rate::from_percent(2)
}

fn default_min_distinct_products() -> usize {
    3
}

impl Default for MultiItemSettings {
    fn default() -> Self {
        MultiItemSettings {
            rate: default_multi_item_rate(),
            min_distinct_products: default_min_distinct_products(),
        }
    }
}

/// High-amount discount settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighAmountSettings {
    #[serde(default = "default_high_amount_rate")]
    pub rate: Rate,

    /// Running base at or above which the discount applies (inclusive).
    #[serde(default = "default_threshold")]
    pub threshold: Money,
}

fn default_high_amount_rate() -> Rate {
    Rate::from_percent(3)
}

fn default_threshold() -> Money {
    Money::from_major(100000)
}

impl Default for HighAmountSettings {
    fn default() -> Self {
        HighAmountSettings {
            rate: default_high_amount_rate(),
            threshold: default_threshold(),
        }
    }
}

/// Discount cap settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapSettings {
    /// When false the cap policy is left out of the chain.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum cumulative discount as a fraction of the subtotal.
    #[serde(default = "default_cap_rate")]
    pub rate: Rate,
}

fn default_true() -> bool {
    true
}

fn default_cap_rate() -> Rate {
    Rate::from_percent(30)
}

impl Default for CapSettings {
    fn default() -> Self {
        CapSettings {
            enabled: true,
            rate: default_cap_rate(),
        }
    }
}

// =============================================================================
// Pricing Configuration
// =============================================================================

/// Complete discount configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub volume: VolumeSettings,

    #[serde(default)]
    pub multi_item: MultiItemSettings,

    #[serde(default)]
    pub high_amount: HighAmountSettings,

    #[serde(default)]
    pub cap: CapSettings,
}

impl PricingConfig {
    /// Validates rates and thresholds.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_rate("volume.rate", self.volume.rate)?;
        if self.volume.min_qty <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "volume.min_qty".to_string(),
            });
        }

        validate_rate("multi_item.rate", self.multi_item.rate)?;
        validate_min_count(
            "multi_item.min_distinct_products",
            self.multi_item.min_distinct_products as u64,
        )?;

        validate_rate("high_amount.rate", self.high_amount.rate)?;
        validate_non_negative("high_amount.threshold", self.high_amount.threshold)?;

        validate_rate("cap.rate", self.cap.rate)?;

        Ok(())
    }

    /// Builds the policy chain: Volume, MultiItem, HighAmount, then Cap.
    pub fn discount_chain(&self) -> Vec<DiscountPolicy> {
        let mut chain: Vec<DiscountPolicy> = vec![
            VolumeDiscount::new(self.volume.rate, self.volume.min_qty).into(),
            MultiItemDiscount::new(self.multi_item.rate, self.multi_item.min_distinct_products).into(),
            HighAmountDiscount::new(self.high_amount.rate, self.high_amount.threshold).into(),
        ];
        if self.cap.enabled {
            chain.push(CapPolicy::new(self.cap.rate).into());
        }
        chain
    }

    /// Disables the cap policy.
    pub fn without_cap(mut self) -> Self {
        self.cap.enabled = false;
        self
    }

    /// Sets the cap rate and enables the cap policy.
    pub fn with_cap_rate(mut self, rate: Rate) -> Self {
        self.cap = CapSettings { enabled: true, rate };
        self
    }
}

/// Parses a rate written as a decimal fraction (`"0.05"`).
pub fn parse_rate(value: &str) -> ValidationResult<Rate> {
    value
        .trim()
        .parse::<Decimal>()
        .map(Rate::new)
        .map_err(|e| ValidationError::InvalidFormat {
            field: "rate".to_string(),
            reason: e.to_string(),
        })
}
