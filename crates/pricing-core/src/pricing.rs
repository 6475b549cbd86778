//! # Line Pricer
//!
//! Resolves order lines to unit prices and computes line amounts and the
//! order subtotal.
//!
//! ```text
//! Line { product_id: "A", qty: 10 }
//!      │
//!      ▼  catalog.find_by_id("A")  ──► None ──► ProductNotFound("A")
//!      │
//!      ▼
//! PricedLine { unit_price: 1000, qty: 10, amount: 10000 }   (unrounded)
//! ```
//!
//! Amounts that leave the decimal range fail with `AmountOverflow` instead
//! of panicking.

use tracing::trace;

use crate::error::{PricingError, PricingResult};
use crate::money::Money;
use crate::ports::ProductCatalog;
use crate::types::Line;

/// A line with its resolved unit price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: String,
    pub qty: i64,
    pub unit_price: Money,
    /// `unit_price × qty`, unrounded.
    pub amount: Money,
}

/// Prices a single line against the catalog.
pub fn price_line<C>(line: &Line, catalog: &C) -> PricingResult<PricedLine>
where
    C: ProductCatalog + ?Sized,
{
    let product = catalog
        .find_by_id(&line.product_id)
        .ok_or_else(|| PricingError::ProductNotFound(line.product_id.clone()))?;

    let amount = product
        .unit_price
        .checked_multiply_quantity(line.qty)
        .ok_or_else(|| PricingError::overflow(format!("line {}", line.product_id)))?;
    trace!(product_id = %line.product_id, qty = line.qty, %amount, "Priced line");

    Ok(PricedLine {
        product_id: line.product_id.clone(),
        qty: line.qty,
        unit_price: product.unit_price,
        amount,
    })
}

/// Prices every line in request order, stopping at the first unknown product.
pub fn price_lines<C>(lines: &[Line], catalog: &C) -> PricingResult<Vec<PricedLine>>
where
    C: ProductCatalog + ?Sized,
{
    lines.iter().map(|line| price_line(line, catalog)).collect()
}

/// Sum of all line amounts, in request order.
pub fn subtotal(priced: &[PricedLine]) -> PricingResult<Money> {
    Money::checked_sum(priced.iter().map(|line| line.amount))
        .ok_or_else(|| PricingError::overflow("subtotal"))
}
