//! # Place-and-Save Use Case
//!
//! Prices an order through the [`PlaceOrder`] port and stores the result
//! through the [`OrderRepository`] port.
//!
//! ```text
//! execute(request)
//!   │
//!   ├─► pricer.place_order(request)   ──► Err ──► PlaceOrderError::Pricing
//!   │                                            (repository never called)
//!   ├─► catalog.find_by_id ×n          (unit prices for the record lines)
//!   │
//!   └─► repository.save(OrderRecord)   ──► order id
//! ```

use tracing::info;

use crate::error::PlaceOrderError;
use crate::ports::{OrderRepository, PlaceOrder, ProductCatalog};
use crate::types::{OrderLineRecord, OrderRecord, OrderRequest};

/// Runs pricing, then persists the priced order.
pub struct PlaceOrderUseCase<P, C, R> {
    pricer: P,
    catalog: C,
    repository: R,
}

impl<P, C, R> PlaceOrderUseCase<P, C, R>
where
    P: PlaceOrder,
    C: ProductCatalog,
    R: OrderRepository,
{
    pub fn new(pricer: P, catalog: C, repository: R) -> Self {
        PlaceOrderUseCase {
            pricer,
            catalog,
            repository,
        }
    }

    /// Prices and saves the order, returning the repository's order id.
    pub fn execute(&self, request: &OrderRequest) -> Result<String, PlaceOrderError> {
        let result = self.pricer.place_order(request)?;

        let lines = request
            .lines
            .iter()
            .map(|line| {
                let product = self
                    .catalog
                    .find_by_id(&line.product_id)
                    .ok_or_else(|| PlaceOrderError::ProductNotFound(line.product_id.clone()))?;
                Ok(OrderLineRecord {
                    product_id: line.product_id.clone(),
                    qty: line.qty,
                    unit_price: product.unit_price,
                })
            })
            .collect::<Result<Vec<_>, PlaceOrderError>>()?;

        let record = OrderRecord::from_result(&request.region, lines, &result);
        let order_id = self
            .repository
            .save(record)
            .map_err(PlaceOrderError::Persistence)?;

        info!(order_id = %order_id, gross = %result.total_gross, "Order saved");
        Ok(order_id)
    }
}
