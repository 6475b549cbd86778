//! # pricing-core: Order Pricing Pipeline
//!
//! Turns an order request into a priced, discounted, taxed and rounded
//! [`OrderResult`], calling out to collaborators for everything it does not
//! own: product lookup, stock, tax.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Pricing Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Host (quote binary, application service)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ OrderRequest                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ pricing-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ validation │  │  pricing  │  │ discount  │  │  service  │  │   │
//! │  │   │  request   │  │ line amts │  │  policy   │  │ pipeline  │  │   │
//! │  │   │   guard    │  │ subtotal  │  │   chain   │  │  + round  │  │   │
//! │  │   └────────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ports: ProductCatalog • Inventory • TaxCalculator • Repository│   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ trait calls                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        pricing-store (in-memory collaborators, config)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Requests, results, products, persistence records
//! - [`money`] - Decimal money and rounding modes
//! - [`discount`] - Discount policies and the fold that applies them
//! - [`service`] - The pricing orchestrator
//! - [`use_case`] - Price-then-save flow
//! - [`ports`] - Collaborator traits
//! - [`config`] - Discount rates and thresholds
//! - [`validation`] - Request and config checks
//! - [`error`] - Error types
//!
//! ## Design Principles
//!
//! 1. **No I/O**: collaborators are traits; this crate never touches a disk
//!    or a socket
//! 2. **Decimal Money**: amounts are `rust_decimal` values, never floats
//! 3. **Round Once**: intermediate values keep full precision; rounding
//!    happens when the result is assembled
//! 4. **Explicit Errors**: every failure is a typed error, never a panic
//!
//! ## Example Usage
//!
//! ```rust
//! use pricing_core::money::Money;
//! use pricing_core::types::Rate;
//!
//! let subtotal = Money::from_major(10000);
//! let volume = subtotal.percentage(Rate::from_percent(5));
//! assert_eq!(volume, Money::from_major(500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod discount;
pub mod error;
pub mod inventory;
pub mod money;
pub mod ports;
pub mod pricing;
pub mod service;
pub mod types;
pub mod use_case;
pub mod validation;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::PricingConfig;
pub use discount::{DiscountPolicy, DiscountType};
pub use error::{PlaceOrderError, PricingError, ValidationError};
pub use money::{Money, RoundingMode};
pub use service::OrderService;
pub use types::*;
pub use use_case::PlaceOrderUseCase;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Scale of every amount in an [`OrderResult`] except the gross total.
pub const AMOUNT_SCALE: u32 = 2;

/// Scale of [`OrderResult::total_gross`].
pub const GROSS_SCALE: u32 = 0;
