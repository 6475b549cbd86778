//! # In-Memory Inventory
//!
//! Stock counts behind a mutex, implementing the [`Inventory`] port.
//!
//! ```text
//! check_available("A", 3)   stock[A] = 5  ──► true
//! reserve("A", 3)           stock[A] = 5  ──► stock[A] = 2
//! reserve("A", 3)           stock[A] = 2  ──► Err(InsufficientStock)
//! ```
//!
//! `check_available` and `reserve` are separate lock acquisitions: stock
//! checked as available may be gone by the time it is reserved, in which
//! case `reserve` fails and the pricing call reports a reservation failure.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use pricing_core::error::BoxError;
use pricing_core::ports::Inventory;
use tracing::debug;

use crate::error::StoreError;

/// Mutex-guarded stock map.
#[derive(Debug, Default)]
pub struct InMemoryInventory {
    stock: Mutex<HashMap<String, i64>>,
}

impl InMemoryInventory {
    /// Creates an inventory from `(product_id, quantity)` pairs.
    pub fn new<S: Into<String>>(stock: impl IntoIterator<Item = (S, i64)>) -> Self {
        InMemoryInventory {
            stock: Mutex::new(stock.into_iter().map(|(id, qty)| (id.into(), qty)).collect()),
        }
    }

    /// Current stock for a product, `None` when it has no entry.
    pub fn available(&self, product_id: &str) -> Option<i64> {
        self.lock().get(product_id).copied()
    }

    // A panic while holding the lock cannot leave the map half-updated:
    // every mutation is a single assignment.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, i64>> {
        self.stock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inventory for InMemoryInventory {
    fn check_available(&self, product_id: &str, qty: i64) -> bool {
        self.lock()
            .get(product_id)
            .is_some_and(|&available| available >= qty)
    }

    fn reserve(&self, product_id: &str, qty: i64) -> Result<(), BoxError> {
        let mut stock = self.lock();
        let available = stock
            .get_mut(product_id)
            .ok_or_else(|| StoreError::UnknownProduct(product_id.to_string()))?;

        if *available < qty {
            return Err(StoreError::insufficient(product_id, qty, *available).into());
        }

        *available -= qty;
        debug!(product_id, qty, remaining = *available, "Stock reserved");
        Ok(())
    }
}
