//! # In-Memory Order Store
//!
//! [`OrderRepository`] that keeps saved orders in a vector and hands out
//! `ORD-<uuid>` ids.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use pricing_core::error::BoxError;
use pricing_core::ports::OrderRepository;
use pricing_core::OrderRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Prefix of generated order ids.
pub const ORDER_ID_PREFIX: &str = "ORD-";

/// A saved order with its id and save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredOrder {
    pub id: String,
    pub saved_at: DateTime<Utc>,
    pub order: OrderRecord,
}

#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<Vec<StoredOrder>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a saved order by id.
    pub fn get(&self, id: &str) -> Option<StoredOrder> {
        self.lock().iter().find(|stored| stored.id == id).cloned()
    }

    /// All saved orders, oldest first.
    pub fn all(&self) -> Vec<StoredOrder> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StoredOrder>> {
        self.orders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OrderRepository for InMemoryOrderStore {
    fn save(&self, order: OrderRecord) -> Result<String, BoxError> {
        let id = format!("{}{}", ORDER_ID_PREFIX, Uuid::new_v4());
        let stored = StoredOrder {
            id: id.clone(),
            saved_at: Utc::now(),
            order,
        };

        debug!(order_id = %id, "Order stored");
        self.lock().push(stored);
        Ok(id)
    }
}
