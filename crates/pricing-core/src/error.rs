//! # Error Types
//!
//! Domain-specific error types for pricing-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ValidationError  - Malformed request fields / config values           │
//! │        │                                                                │
//! │        ▼ (#[from])                                                      │
//! │  PricingError     - Everything place_order can fail with               │
//! │   ├── InvalidRequest      (before ANY collaborator call)               │
//! │   ├── ProductNotFound     (line pricing or a catalog-reading policy)   │
//! │   ├── OutOfStock          (availability check, nothing reserved)       │
//! │   ├── AmountOverflow      (an amount left the decimal range)           │
//! │   └── ReservationFailure  (collaborator error, NOT compensated)        │
//! │        │                                                                │
//! │        ▼ (#[from])                                                      │
//! │  PlaceOrderError  - Pricing + persistence projection + save            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, field name)
//! 3. Collaborator failures are carried as their original error (`source`)
//! 4. Errors are returned, never logged here

use rust_decimal::Decimal;
use thiserror::Error;

/// Opaque error produced by an external collaborator (inventory, repository).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// =============================================================================
// Pricing Error
// =============================================================================

/// Failures of a single `place_order` call.
///
/// There is no partial result: when one of these is returned no `OrderResult`
/// exists for the call.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The request is malformed. No collaborator was called.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),

    /// A line (or a discount policy) referenced a product the catalog does
    /// not know. Nothing was reserved and tax was not computed.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The inventory reported the product as unavailable for the requested
    /// quantity. Remaining lines were not checked and nothing was reserved.
    #[error("Out of stock: {0}")]
    OutOfStock(String),

    /// An intermediate amount (line amount, subtotal, discount) does not fit
    /// in a decimal. Raised before tax and reservation, so nothing was
    /// reserved.
    #[error("Amount out of range while computing {0}")]
    AmountOverflow(String),

    /// The inventory failed to reserve a line.
    ///
    /// ## Partial Reservations
    /// ```text
    /// reserve(A) ✅ ──► reserve(B) ✅ ──► reserve(C) ❌ ──► ReservationFailure
    ///                                                        │
    ///   A and B STAY reserved: no rollback is attempted ◄────┘
    /// ```
    #[error("Reservation failed for {product_id}: {source}")]
    ReservationFailure {
        product_id: String,
        #[source]
        source: BoxError,
    },
}

impl PricingError {
    /// Creates an AmountOverflow naming what was being computed.
    pub fn overflow(context: impl Into<String>) -> Self {
        PricingError::AmountOverflow(context.into())
    }

    /// Creates a ReservationFailure for a product from a collaborator error.
    pub fn reservation(product_id: impl Into<String>, source: impl Into<BoxError>) -> Self {
        PricingError::ReservationFailure {
            product_id: product_id.into(),
            source: source.into(),
        }
    }
}

// =============================================================================
// Place-and-Save Error
// =============================================================================

/// Failures of the place-and-save use case.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    /// Pricing failed; nothing was saved.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A product disappeared from the catalog between pricing and building
    /// the persistence record.
    #[error("Product not found while recording order: {0}")]
    ProductNotFound(String),

    /// The order repository rejected the record.
    #[error("Failed to save order: {0}")]
    Persistence(#[source] BoxError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for order requests (before any collaborator runs) and for
/// configuration values (before a pipeline is built).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing, empty or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Amount must not be negative.
    #[error("{field} must not be negative")]
    NegativeAmount { field: String },

    /// A rate must be a fraction in `[0, 1]`.
    #[error("{field} must be between 0 and 1, got {value}")]
    InvalidRate { field: String, value: Decimal },

    /// Invalid format (e.g., unparseable amount or rounding mode).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type PricingResult<T> = Result<T, PricingError>;

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
