//! # pricing-store: Collaborators for the Order Pricing Pipeline
//!
//! In-memory implementations of the pricing-core ports, configuration
//! loading, and the seeded demo data used by the `quote` binary.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Pricing Data Flow                          │
//! │                                                                         │
//! │  quote binary / host application                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pricing-core: OrderService::place_order                                │
//! │       │ port calls                                                      │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  pricing-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐ ┌──────────────┐ ┌──────────┐ ┌──────────┐  │   │
//! │  │   │   catalog    │ │  inventory   │ │   tax    │ │  order   │  │   │
//! │  │   │ InMemory     │ │ InMemory     │ │ Regional │ │  store   │  │   │
//! │  │   │ Catalog      │ │ Inventory    │ │ TaxCalc  │ │ ORD-uuid │  │   │
//! │  │   └──────────────┘ └──────────────┘ └──────────┘ └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   config: pricing.toml + PRICING_* environment overrides        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`catalog`] - Immutable product catalog
//! - [`inventory`] - Stock counts and reservations
//! - [`tax`] - Per-region flat tax
//! - [`order_store`] - Saved orders
//! - [`config`] - Configuration loading
//! - [`demo`] - Seeded demo catalog and stock
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust
//! use pricing_core::{Line, OrderRequest, OrderService};
//! use pricing_store::config::AppConfig;
//! use pricing_store::{demo, RegionalTaxCalculator};
//!
//! let config = AppConfig::default();
//! let service = OrderService::new(
//!     demo::catalog().unwrap(),
//!     demo::inventory(),
//!     RegionalTaxCalculator::from_settings(&config.tax),
//!     &config.pricing,
//! );
//!
//! let request = OrderRequest::new("JP", vec![Line::new("P001", 10)]);
//! let result = service.place_order(&request).unwrap();
//! assert_eq!(result.total_net_after_discount.to_string(), "9500.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod config;
pub mod demo;
pub mod error;
pub mod inventory;
pub mod order_store;
pub mod tax;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::InMemoryCatalog;
pub use config::{AppConfig, TaxSettings};
pub use error::{StoreError, StoreResult};
pub use inventory::InMemoryInventory;
pub use order_store::{InMemoryOrderStore, StoredOrder};
pub use tax::RegionalTaxCalculator;

// =============================================================================
// End-to-End Tests
// =============================================================================
