//! # In-Memory Product Catalog
//!
//! Read-only [`ProductCatalog`] backed by a map built once at construction.
//!
//! ## Price Normalization
//! ```text
//! Product { id: "P002", unit_price: 200 }      ──►  unit_price: 200.00
//! Product { id: "P003", unit_price: 19.995 }   ──►  unit_price: 20.00   (HALF_UP)
//! ```
//!
//! Every unit price is stored at scale 2. The map is never mutated after
//! construction, so the catalog can be shared freely across threads.

use std::collections::HashMap;

use pricing_core::ports::ProductCatalog;
use pricing_core::validation::validate_non_negative;
use pricing_core::{Product, RoundingMode, AMOUNT_SCALE};
use tracing::debug;

use crate::error::StoreResult;

/// Immutable catalog keyed by product id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: HashMap<String, Product>,
}

impl InMemoryCatalog {
    /// Builds a catalog, normalizing prices to two decimals.
    ///
    /// Fails on a negative unit price. A later product with the same id
    /// replaces an earlier one.
    pub fn new(products: impl IntoIterator<Item = Product>) -> StoreResult<Self> {
        let mut map = HashMap::new();
        for product in products {
            validate_non_negative("unit_price", product.unit_price)?;
            let normalized = Product {
                unit_price: product.unit_price.round_to(AMOUNT_SCALE, RoundingMode::HalfUp),
                ..product
            };
            map.insert(normalized.id.clone(), normalized);
        }

        debug!(products = map.len(), "Catalog loaded");
        Ok(InMemoryCatalog { products: map })
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn find_by_id(&self, product_id: &str) -> Option<Product> {
        self.products.get(product_id).cloned()
    }
}
