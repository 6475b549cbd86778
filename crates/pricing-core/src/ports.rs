//! # Collaborator Ports
//!
//! The contracts the pricing pipeline calls out to. Implementations live
//! outside this crate (see `pricing-store` for in-memory versions).
//!
//! ## Who Calls What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       OrderService::place_order                         │
//! │                                                                         │
//! │   Inventory::check_available ×n   (request order, fail fast)            │
//! │   ProductCatalog::find_by_id  ×n  (line pricing + catalog policies)     │
//! │   TaxCalculator::calc_tax_amount  (post-discount net)                   │
//! │   TaxCalculator::add_tax          (same net, region, mode)              │
//! │   Inventory::reserve          ×n  (request order, no rollback)          │
//! │                                                                         │
//! │                       PlaceOrderUseCase::execute                        │
//! │                                                                         │
//! │   PlaceOrder::place_order → ProductCatalog::find_by_id ×n               │
//! │                           → OrderRepository::save                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All methods take `&self`: collaborators that mutate state (inventory,
//! repository) own their synchronization.

use std::sync::Arc;

use crate::error::{BoxError, PricingResult};
use crate::money::{Money, RoundingMode};
use crate::types::{OrderRecord, OrderRequest, OrderResult, Product};

// =============================================================================
// Outbound Ports
// =============================================================================

/// Product lookup.
pub trait ProductCatalog {
    /// Returns the product, or `None` when the id is unknown. "Not found" is
    /// never an error.
    fn find_by_id(&self, product_id: &str) -> Option<Product>;
}

/// Stock availability and reservation.
pub trait Inventory {
    /// Whether `qty` units of the product can currently be reserved.
    fn check_available(&self, product_id: &str, qty: i64) -> bool;

    /// Commits a reservation of `qty` units.
    fn reserve(&self, product_id: &str, qty: i64) -> Result<(), BoxError>;
}

/// Tax computation. The pipeline never computes tax itself.
pub trait TaxCalculator {
    /// Tax due on `net` in `region`, rounded by the collaborator with `mode`.
    fn calc_tax_amount(&self, net: Money, region: &str, mode: RoundingMode) -> Money;

    /// `net` plus tax in `region`, rounded by the collaborator with `mode`.
    fn add_tax(&self, net: Money, region: &str, mode: RoundingMode) -> Money;
}

/// Persistence of finished orders. Returns the stored order's id.
pub trait OrderRepository {
    fn save(&self, order: OrderRecord) -> Result<String, BoxError>;
}

// =============================================================================
// Inbound Port
// =============================================================================

/// Prices an order. Implemented by [`OrderService`](crate::service::OrderService).
pub trait PlaceOrder {
    fn place_order(&self, request: &OrderRequest) -> PricingResult<OrderResult>;
}

// =============================================================================
// Blanket Implementations
// =============================================================================
// Lets callers hand the pipeline a reference or a shared pointer instead of
// giving up ownership of a collaborator.

macro_rules! forward_pointer_impls {
    ($($ptr:ty),*) => {
        $(
            impl<T: ProductCatalog + ?Sized> ProductCatalog for $ptr {
                fn find_by_id(&self, product_id: &str) -> Option<Product> {
                    (**self).find_by_id(product_id)
                }
            }

            impl<T: Inventory + ?Sized> Inventory for $ptr {
                fn check_available(&self, product_id: &str, qty: i64) -> bool {
                    (**self).check_available(product_id, qty)
                }

                fn reserve(&self, product_id: &str, qty: i64) -> Result<(), BoxError> {
                    (**self).reserve(product_id, qty)
                }
            }

            impl<T: TaxCalculator + ?Sized> TaxCalculator for $ptr {
                fn calc_tax_amount(&self, net: Money, region: &str, mode: RoundingMode) -> Money {
                    (**self).calc_tax_amount(net, region, mode)
                }

                fn add_tax(&self, net: Money, region: &str, mode: RoundingMode) -> Money {
                    (**self).add_tax(net, region, mode)
                }
            }

            impl<T: OrderRepository + ?Sized> OrderRepository for $ptr {
                fn save(&self, order: OrderRecord) -> Result<String, BoxError> {
                    (**self).save(order)
                }
            }

            impl<T: PlaceOrder + ?Sized> PlaceOrder for $ptr {
                fn place_order(&self, request: &OrderRequest) -> PricingResult<OrderResult> {
                    (**self).place_order(request)
                }
            }
        )*
    };
}

forward_pointer_impls!(&T, Box<T>, Arc<T>);
