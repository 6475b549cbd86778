//! # Store Error Types
//!
//! Errors raised by the in-memory collaborators and the configuration
//! loader.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  InMemoryInventory::reserve                                             │
//! │       │ StoreError::InsufficientStock                                   │
//! │       ▼                                                                 │
//! │  BoxError (Inventory port)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PricingError::ReservationFailure { source } ← pricing-core             │
//! │                                                                         │
//! │  AppConfig::load ──► Io / TomlParse / Validation                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pricing_core::ValidationError;
use thiserror::Error;

/// Collaborator and configuration errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Not enough stock left to reserve.
    ///
    /// ## When This Occurs
    /// - Stock was consumed between the availability check and the
    ///   reservation
    /// - The same product appears on several lines of one order
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
        available: i64,
    },

    /// Product has no stock entry at all.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// Configuration value rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading or writing a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for [`AppConfig`](crate::config::AppConfig).
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Config could not be written as TOML.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Request or result JSON could not be read or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configured rate or amount failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl StoreError {
    /// Creates an InsufficientStock error.
    pub fn insufficient(product_id: impl Into<String>, requested: i64, available: i64) -> Self {
        StoreError::InsufficientStock {
            product_id: product_id.into(),
            requested,
            available,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = StoreError::insufficient("A", 5, 2);
        assert_eq!(
            err.to_string(),
            "Insufficient stock for A: requested 5, available 2"
        );
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: StoreError = ValidationError::Required {
            field: "region".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "region is required");
    }
}
