//! Availability gate and reservation commit around the [`Inventory`] port.
//!
//! ```text
//! ensure_available:  check(A) ✅ ─► check(B) ❌ ─► OutOfStock("B")   (C never checked)
//! reserve_all:       reserve(A) ✅ ─► reserve(B) ❌ ─► ReservationFailure (A stays)
//! ```

use tracing::trace;

use crate::error::{PricingError, PricingResult};
use crate::ports::Inventory;
use crate::types::Line;

/// Checks every line in request order, failing on the first unavailable one.
pub fn ensure_available<I>(inventory: &I, lines: &[Line]) -> PricingResult<()>
where
    I: Inventory + ?Sized,
{
    for line in lines {
        if !inventory.check_available(&line.product_id, line.qty) {
            return Err(PricingError::OutOfStock(line.product_id.clone()));
        }
    }
    Ok(())
}

/// Reserves every line in request order.
///
/// Lines reserved before a failure are not released.
pub fn reserve_all<I>(inventory: &I, lines: &[Line]) -> PricingResult<()>
where
    I: Inventory + ?Sized,
{
    for line in lines {
        inventory
            .reserve(&line.product_id, line.qty)
            .map_err(|source| PricingError::reservation(line.product_id.clone(), source))?;
        trace!(product_id = %line.product_id, qty = line.qty, "Reserved stock");
    }
    Ok(())
}
