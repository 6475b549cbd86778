//! # Regional Tax Calculator
//!
//! Flat per-region tax rates implementing the [`TaxCalculator`] port.
//!
//! ```text
//! calc_tax_amount(104566, "JP", HALF_UP)   rate[JP] = 0.10  ──► 10456.60
//! add_tax        (104566, "JP", HALF_UP)                    ──► 115022.60
//! calc_tax_amount(100,    "ZZ", HALF_UP)   no entry → default rate
//! ```
//!
//! The tax amount is rounded to two decimals with the caller's mode. The
//! gross is `net + that rounded tax`, so both methods agree with each other.

use std::collections::HashMap;

use pricing_core::ports::TaxCalculator;
use pricing_core::types::Rate;
use pricing_core::{Money, RoundingMode, AMOUNT_SCALE};
use tracing::trace;

use crate::config::TaxSettings;

/// Per-region flat rates with a fallback rate.
///
/// Region codes are matched case-insensitively.
#[derive(Debug, Clone)]
pub struct RegionalTaxCalculator {
    rates: HashMap<String, Rate>,
    default_rate: Rate,
}

impl RegionalTaxCalculator {
    /// Creates a calculator that applies `default_rate` everywhere.
    pub fn new(default_rate: Rate) -> Self {
        RegionalTaxCalculator {
            rates: HashMap::new(),
            default_rate,
        }
    }

    /// Adds or replaces a region's rate.
    pub fn with_region(mut self, region: &str, rate: Rate) -> Self {
        self.rates.insert(region_key(region), rate);
        self
    }

    /// Builds a calculator from configuration.
    pub fn from_settings(settings: &TaxSettings) -> Self {
        settings
            .regions
            .iter()
            .fold(Self::new(settings.default_rate), |calc, (region, rate)| {
                calc.with_region(region, *rate)
            })
    }

    /// Rate applied for `region`.
    pub fn rate_for(&self, region: &str) -> Rate {
        self.rates
            .get(&region_key(region))
            .copied()
            .unwrap_or(self.default_rate)
    }
}

fn region_key(region: &str) -> String {
    region.trim().to_uppercase()
}

impl TaxCalculator for RegionalTaxCalculator {
    fn calc_tax_amount(&self, net: Money, region: &str, mode: RoundingMode) -> Money {
        let rate = self.rate_for(region);
        let tax = net.percentage(rate).round_to(AMOUNT_SCALE, mode);
        trace!(region, %rate, %net, %tax, %mode, "Computed tax");
        tax
    }

    fn add_tax(&self, net: Money, region: &str, mode: RoundingMode) -> Money {
        net + self.calc_tax_amount(net, region, mode)
    }
}
