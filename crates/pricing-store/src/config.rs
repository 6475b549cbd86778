//! # Application Configuration
//!
//! Loads discount and tax settings for the pricing pipeline.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     PRICING_VOLUME_RATE=0.07                                            │
//! │     PRICING_CAP_RATE=off                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/order-pricing/pricing.toml (Linux)                        │
//! │     ~/Library/Application Support/com.example.order-pricing/... (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     5% / 2% / 3% discounts, 30% cap, 10% tax                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # pricing.toml
//! [pricing.volume]
//! rate = 0.05
//! min_qty = 10
//!
//! [pricing.cap]
//! enabled = true
//! rate = 0.30
//!
//! [tax]
//! default_rate = 0.10
//!
//! [tax.regions]
//! JP = 0.10
//! US-TX = 0.0825
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pricing_core::config::parse_rate;
use pricing_core::types::Rate;
use pricing_core::validation::validate_rate;
use pricing_core::{Money, PricingConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "pricing.toml";

// =============================================================================
// Tax Settings
// =============================================================================

/// Rates for [`RegionalTaxCalculator`](crate::tax::RegionalTaxCalculator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSettings {
    /// Rate for regions without an entry.
    #[serde(default = "default_tax_rate")]
    pub default_rate: Rate,

    /// Per-region overrides, keyed by region code.
    #[serde(default)]
    pub regions: BTreeMap<String, Rate>,
}

fn default_tax_rate() -> Rate {
    Rate::from_percent(10)
}

impl Default for TaxSettings {
    fn default() -> Self {
        TaxSettings {
            default_rate: default_tax_rate(),
            regions: BTreeMap::new(),
        }
    }
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Complete configuration for a pricing host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Discount rates and thresholds.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Tax rates.
    #[serde(default)]
    pub tax: TaxSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (pricing.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading pricing config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load pricing config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a config file without applying environment overrides.
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::InvalidConfig("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Pricing config saved");
        Ok(())
    }

    /// Validates discount and tax settings.
    pub fn validate(&self) -> StoreResult<()> {
        self.pricing.validate()?;

        validate_rate("tax.default_rate", self.tax.default_rate)?;
        for (region, rate) in &self.tax.regions {
            if region.trim().is_empty() {
                return Err(StoreError::InvalidConfig(
                    "tax region code must not be blank".into(),
                ));
            }
            validate_rate(&format!("tax.regions.{}", region), *rate)?;
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Split out from
    /// [`apply_env_overrides`](Self::apply_env_overrides) so tests need not
    /// touch the process environment.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(rate) = rate_var(&lookup, "PRICING_VOLUME_RATE") {
            self.pricing.volume.rate = rate;
        }

        if let Some(rate) = rate_var(&lookup, "PRICING_MULTI_ITEM_RATE") {
            self.pricing.multi_item.rate = rate;
        }

        if let Some(rate) = rate_var(&lookup, "PRICING_HIGH_AMOUNT_RATE") {
            self.pricing.high_amount.rate = rate;
        }

        if let Some(value) = lookup("PRICING_HIGH_AMOUNT_THRESHOLD") {
            match value.trim().parse::<Money>() {
                Ok(threshold) => {
                    debug!(%threshold, "Overriding high-amount threshold from environment");
                    self.pricing.high_amount.threshold = threshold;
                }
                Err(e) => warn!(value = %value, error = %e, "Ignoring PRICING_HIGH_AMOUNT_THRESHOLD"),
            }
        }

        if let Some(value) = lookup("PRICING_CAP_RATE") {
            match value.trim().to_lowercase().as_str() {
                "off" | "none" => {
                    debug!("Disabling discount cap from environment");
                    self.pricing.cap.enabled = false;
                }
                other => match parse_rate(other) {
                    Ok(rate) => {
                        debug!(%rate, "Overriding cap rate from environment");
                        self.pricing.cap.enabled = true;
                        self.pricing.cap.rate = rate;
                    }
                    Err(e) => warn!(value = %value, error = %e, "Ignoring PRICING_CAP_RATE"),
                },
            }
        }

        if let Some(rate) = rate_var(&lookup, "PRICING_TAX_DEFAULT_RATE") {
            self.tax.default_rate = rate;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "example", "order-pricing")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn rate_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Rate> {
    let value = lookup(key)?;
    match parse_rate(&value) {
        Ok(rate) => {
            debug!(key, %rate, "Overriding rate from environment");
            Some(rate)
        }
        Err(e) => {
            warn!(key, value = %value, error = %e, "Ignoring unparseable rate");
            None
        }
    }
}
