//! # Order Service
//!
//! The pricing orchestrator: runs one order through the fixed pipeline and
//! returns a fully rounded [`OrderResult`].
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        place_order(request)                             │
//! │                                                                         │
//! │  1. validate_request         ──► InvalidRequest   (no collaborator run) │
//! │  2. ensure_available         ──► OutOfStock       (nothing reserved)    │
//! │  3. price_lines              ──► ProductNotFound, AmountOverflow        │
//! │  4. subtotal                 ──► AmountOverflow                         │
//! │  5. apply_in_order(policies) ──► ProductNotFound, AmountOverflow        │
//! │  6. tax.calc_tax_amount(net_after, region, mode)                        │
//! │     tax.add_tax        (net_after, region, mode)                        │
//! │  7. reserve_all              ──► ReservationFailure (no rollback)       │
//! │  8. OrderResult::assemble    (HALF_UP, scales 2/2/2/2/0)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding
//! `mode` in step 6 is the request's rounding mode (default HALF_UP) and only
//! governs the tax collaborator's own rounding. Step 8 always uses HALF_UP.
//!
//! ## Usage
//! ```rust
//! use pricing_core::config::PricingConfig;
//! use pricing_core::error::BoxError;
//! use pricing_core::money::{Money, RoundingMode};
//! use pricing_core::ports::{Inventory, ProductCatalog, TaxCalculator};
//! use pricing_core::service::OrderService;
//! use pricing_core::types::{Line, OrderRequest, Product};
//!
//! struct Catalog;
//! impl ProductCatalog for Catalog {
//!     fn find_by_id(&self, id: &str) -> Option<Product> {
//!         Some(Product::new(id, id, Money::from_major(1000)))
//!     }
//! }
//!
//! struct Stock;
//! impl Inventory for Stock {
//!     fn check_available(&self, _: &str, _: i64) -> bool { true }
//!     fn reserve(&self, _: &str, _: i64) -> Result<(), BoxError> { Ok(()) }
//! }
//!
//! struct NoTax;
//! impl TaxCalculator for NoTax {
//!     fn calc_tax_amount(&self, _: Money, _: &str, _: RoundingMode) -> Money { Money::zero() }
//!     fn add_tax(&self, net: Money, _: &str, _: RoundingMode) -> Money { net }
//! }
//!
//! let service = OrderService::new(Catalog, Stock, NoTax, &PricingConfig::default());
//! let result = service
//!     .place_order(&OrderRequest::new("JP", vec![Line::new("A", 10)]))
//!     .unwrap();
//!
//! assert_eq!(result.total_net_after_discount.to_string(), "9500.00");
//! ```

use tracing::{debug, info};

use crate::config::PricingConfig;
use crate::discount::{apply_in_order, DiscountPolicy};
use crate::error::{PricingError, PricingResult};
use crate::inventory::{ensure_available, reserve_all};
use crate::ports::{Inventory, PlaceOrder, ProductCatalog, TaxCalculator};
use crate::pricing::{price_lines, subtotal};
use crate::types::{OrderRequest, OrderResult, RawTotals};
use crate::validation::validate_request;

/// Prices orders against a catalog, an inventory and a tax collaborator.
///
/// Holds no mutable state of its own; concurrent callers only share the
/// collaborators, which own their synchronization.
pub struct OrderService<C, I, T> {
    catalog: C,
    inventory: I,
    tax: T,
    /// Owned snapshot taken at construction.
    policies: Box<[DiscountPolicy]>,
}

impl<C, I, T> OrderService<C, I, T>
where
    C: ProductCatalog,
    I: Inventory,
    T: TaxCalculator,
{
    /// Creates a service with the policy chain built from `config`.
    pub fn new(catalog: C, inventory: I, tax: T, config: &PricingConfig) -> Self {
        Self::with_policies(catalog, inventory, tax, config.discount_chain())
    }

    /// Creates a service with an explicit policy chain, applied in the given
    /// order.
    pub fn with_policies(
        catalog: C,
        inventory: I,
        tax: T,
        policies: impl IntoIterator<Item = DiscountPolicy>,
    ) -> Self {
        OrderService {
            catalog,
            inventory,
            tax,
            policies: policies.into_iter().collect(),
        }
    }

    /// The policy chain, in application order.
    pub fn policies(&self) -> &[DiscountPolicy] {
        &self.policies
    }

    /// Prices one order. See the module docs for the stage order.
    pub fn place_order(&self, request: &OrderRequest) -> PricingResult<OrderResult> {
        validate_request(request)?;
        debug!(region = %request.region, lines = request.lines.len(), "Pricing order");

        ensure_available(&self.inventory, &request.lines)?;

        let priced = price_lines(&request.lines, &self.catalog)?;
        let net_before_discount = subtotal(&priced)?;

        let discounts = apply_in_order(&self.policies, request, &self.catalog, net_before_discount)?;
        let net_after_discount = net_before_discount
            .checked_sub(discounts.total)
            .ok_or_else(|| PricingError::overflow("net after discount"))?;

        let mode = request.tax_rounding_mode();
        let tax = self.tax.calc_tax_amount(net_after_discount, &request.region, mode);
        let gross = self.tax.add_tax(net_after_discount, &request.region, mode);

        reserve_all(&self.inventory, &request.lines)?;

        let result = OrderResult::assemble(
            RawTotals {
                net_before_discount,
                discount: discounts.total,
                net_after_discount,
                tax,
                gross,
            },
            discounts.applied,
        );

        info!(
            region = %request.region,
            net = %result.total_net_after_discount,
            gross = %result.total_gross,
            applied = ?result.applied_discounts,
            "Order priced"
        );
        Ok(result)
    }
}

impl<C, I, T> PlaceOrder for OrderService<C, I, T>
where
    C: ProductCatalog,
    I: Inventory,
    T: TaxCalculator,
{
    fn place_order(&self, request: &OrderRequest) -> PricingResult<OrderResult> {
        OrderService::place_order(self, request)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::{CapPolicy, DiscountType, HighAmountDiscount, MultiItemDiscount, VolumeDiscount};
    use crate::error::{PricingError, ValidationError};
    use crate::money::{Money, RoundingMode};
    use crate::testing::{money, Call, CallLog, FakeCatalog, FakeInventory, FakeTax};
    use crate::types::{Line, Rate};
    use proptest::prelude::*;
    use rstest::rstest;

    type TestService = OrderService<FakeCatalog, FakeInventory, FakeTax>;

    fn service_with(prices: &[(&str, &str)], config: &PricingConfig, log: &CallLog) -> TestService {
        OrderService::new(
            FakeCatalog::new(prices, log.clone()),
            FakeInventory::new(log.clone()),
            FakeTax::new(log.clone()),
            config,
        )
    }

    fn scenario_c_prices() -> Vec<(&'static str, &'static str)> {
        vec![("A", "10000"), ("B", "10000"), ("C", "5000")]
    }

    fn scenario_c_request() -> OrderRequest {
        OrderRequest::new(
            "JP",
            vec![Line::new("A", 10), Line::new("B", 1), Line::new("C", 1)],
        )
    }

    // -------------------------------------------------------------------------
    // Scenarios
    // -------------------------------------------------------------------------

    #[test]
    fn test_no_policy_triggers() {
        let log = CallLog::default();
        let service = service_with(&[("A", "1000")], &PricingConfig::default(), &log);

        let result = service
            .place_order(&OrderRequest::new("JP", vec![Line::new("A", 1)]))
            .unwrap();

        assert_eq!(result.total_net_before_discount.to_string(), "1000.00");
        assert_eq!(result.total_discount.to_string(), "0.00");
        assert_eq!(result.total_net_after_discount.to_string(), "1000.00");
        assert!(result.applied_discounts.is_empty());
    }

    #[test]
    fn test_volume_discount() {
        let log = CallLog::default();
        let service = service_with(&[("A", "1000")], &PricingConfig::default(), &log);

        let result = service
            .place_order(&OrderRequest::new("JP", vec![Line::new("A", 10)]))
            .unwrap();

        assert_eq!(result.total_net_before_discount.to_string(), "10000.00");
        assert_eq!(result.total_discount.to_string(), "500.00");
        assert_eq!(result.total_net_after_discount.to_string(), "9500.00");
        assert_eq!(result.applied_discounts, vec![DiscountType::Volume]);
    }

    #[test]
    fn test_all_three_policies_compound() {
        let log = CallLog::default();
        let service = service_with(&scenario_c_prices(), &PricingConfig::default(), &log);

        let result = service.place_order(&scenario_c_request()).unwrap();

        assert_eq!(result.total_net_before_discount.to_string(), "115000.00");
        assert_eq!(result.total_discount.to_string(), "10434.00");
        assert_eq!(result.total_net_after_discount.to_string(), "104566.00");
        assert_eq!(
            result.applied_discounts,
            vec![DiscountType::Volume, DiscountType::MultiItem, DiscountType::HighAmount]
        );
    }

    #[test]
    fn test_cap_limits_total_discount() {
        let log = CallLog::default();
        let config = PricingConfig::default().with_cap_rate(Rate::from_percent(5));
        let service = service_with(&scenario_c_prices(), &config, &log);

        let result = service.place_order(&scenario_c_request()).unwrap();

        assert_eq!(result.total_discount.to_string(), "5750.00");
        assert_eq!(result.total_net_after_discount.to_string(), "109250.00");
        assert_eq!(
            result.applied_discounts,
            vec![
                DiscountType::Volume,
                DiscountType::MultiItem,
                DiscountType::HighAmount,
                DiscountType::Cap
            ]
        );
    }

    #[test]
    fn test_out_of_stock_fails_before_tax_and_reserve() {
        let log = CallLog::default();
        let service = OrderService::new(
            FakeCatalog::new(&scenario_c_prices(), log.clone()),
            FakeInventory::new(log.clone()).out_of_stock("B"),
            FakeTax::new(log.clone()),
            &PricingConfig::default(),
        );

        let err = service.place_order(&scenario_c_request()).unwrap_err();

        assert!(matches!(err, PricingError::OutOfStock(ref id) if id == "B"));
        assert_eq!(
            log.calls(),
            vec![
                Call::CheckAvailable("A".into(), 10),
                Call::CheckAvailable("B".into(), 1)
            ]
        );
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    #[rstest]
    #[case(OrderRequest::new("JP", vec![Line::new("A", 0)]))]
    #[case(OrderRequest::new("JP", vec![Line::new("A", 1), Line::new("B", -3)]))]
    #[case(OrderRequest::new("", vec![Line::new("A", 1)]))]
    #[case(OrderRequest::new("  ", vec![Line::new("A", 1)]))]
    #[case(OrderRequest::new("JP", vec![]))]
    #[case(OrderRequest::default())]
    fn test_invalid_request_touches_no_collaborator(#[case] request: OrderRequest) {
        let log = CallLog::default();
        let service = service_with(&[("A", "1000"), ("B", "1000")], &PricingConfig::default(), &log);

        let err = service.place_order(&request).unwrap_err();

        assert!(matches!(err, PricingError::InvalidRequest(_)));
        assert!(log.is_empty());
    }

    #[test]
    fn test_invalid_request_names_the_field() {
        let log = CallLog::default();
        let service = service_with(&[("A", "1000")], &PricingConfig::default(), &log);

        let err = service
            .place_order(&OrderRequest::new("JP", vec![Line::new("A", 0)]))
            .unwrap_err();

        match err {
            PricingError::InvalidRequest(ValidationError::MustBePositive { field }) => {
                assert_eq!(field, "lines[0].qty")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // -------------------------------------------------------------------------
    // Call Order
    // -------------------------------------------------------------------------

    #[test]
    fn test_collaborator_call_order() {
        let log = CallLog::default();
        let service = service_with(&scenario_c_prices(), &PricingConfig::default(), &log);

        service.place_order(&scenario_c_request()).unwrap();

        let calls = log.calls();
        let last_check = calls
            .iter()
            .rposition(|c| matches!(c, Call::CheckAvailable(..)))
            .unwrap();
        let first_lookup = log.position(|c| matches!(c, Call::FindById(_))).unwrap();
        let last_lookup = calls.iter().rposition(|c| matches!(c, Call::FindById(_))).unwrap();
        let calc = log.position(|c| matches!(c, Call::CalcTaxAmount(..))).unwrap();
        let add = log.position(|c| matches!(c, Call::AddTax(..))).unwrap();
        let first_reserve = log.position(|c| matches!(c, Call::Reserve(..))).unwrap();

        assert!(last_check < first_lookup);
        assert!(last_lookup < calc);
        assert_eq!(add, calc + 1);
        assert!(add < first_reserve);
        assert_eq!(
            log.filtered(|c| matches!(c, Call::Reserve(..))),
            vec![
                Call::Reserve("A".into(), 10),
                Call::Reserve("B".into(), 1),
                Call::Reserve("C".into(), 1)
            ]
        );
        assert_eq!(first_reserve + 3, calls.len());
    }

    #[test]
    fn test_tax_calls_share_arguments() {
        let log = CallLog::default();
        let service = service_with(&scenario_c_prices(), &PricingConfig::default(), &log);
        let request = scenario_c_request().with_rounding_mode(RoundingMode::HalfEven);

        service.place_order(&request).unwrap();

        let tax_calls = log.filtered(|c| matches!(c, Call::CalcTaxAmount(..) | Call::AddTax(..)));
        assert_eq!(
            tax_calls,
            vec![
                Call::CalcTaxAmount(money("104566"), "JP".into(), RoundingMode::HalfEven),
                Call::AddTax(money("104566"), "JP".into(), RoundingMode::HalfEven)
            ]
        );
    }

    #[test]
    fn test_tax_mode_defaults_to_half_up() {
        let log = CallLog::default();
        let service = service_with(&[("A", "1000")], &PricingConfig::default(), &log);

        service
            .place_order(&OrderRequest::new("EU", vec![Line::new("A", 1)]))
            .unwrap();

        assert_eq!(
            log.filtered(|c| matches!(c, Call::CalcTaxAmount(..))),
            vec![Call::CalcTaxAmount(money("1000"), "EU".into(), RoundingMode::HalfUp)]
        );
    }

    #[test]
    fn test_unknown_product_stops_before_tax_and_reserve() {
        let log = CallLog::default();
        let service = service_with(&[("A", "1000")], &PricingConfig::default(), &log);
        let request = OrderRequest::new("JP", vec![Line::new("A", 1), Line::new("X", 1)]);

        let err = service.place_order(&request).unwrap_err();

        assert!(matches!(err, PricingError::ProductNotFound(ref id) if id == "X"));
        assert!(log
            .filtered(|c| matches!(c, Call::Reserve(..) | Call::CalcTaxAmount(..) | Call::AddTax(..)))
            .is_empty());
    }

    #[test]
    fn test_huge_quantity_fails_without_panicking() {
        let log = CallLog::default();
        let service = service_with(&[("A", "100000000000")], &PricingConfig::default(), &log);
        let request = OrderRequest::new("JP", vec![Line::new("A", i64::MAX)]);

        let err = service.place_order(&request).unwrap_err();

        assert!(matches!(err, PricingError::AmountOverflow(ref what) if what == "line A"));
        assert!(log
            .filtered(|c| matches!(c, Call::Reserve(..) | Call::CalcTaxAmount(..) | Call::AddTax(..)))
            .is_empty());
    }

    #[test]
    fn test_reservation_failure_keeps_earlier_reservations() {
        let log = CallLog::default();
        let service = OrderService::new(
            FakeCatalog::new(&scenario_c_prices(), log.clone()),
            FakeInventory::new(log.clone()).failing_reservation("B"),
            FakeTax::new(log.clone()),
            &PricingConfig::default(),
        );

        let err = service.place_order(&scenario_c_request()).unwrap_err();

        assert!(matches!(
            err,
            PricingError::ReservationFailure { ref product_id, .. } if product_id == "B"
        ));
        assert_eq!(
            log.filtered(|c| matches!(c, Call::Reserve(..))),
            vec![Call::Reserve("A".into(), 10), Call::Reserve("B".into(), 1)]
        );
    }

    // -------------------------------------------------------------------------
    // Rounding
    // -------------------------------------------------------------------------

    #[test]
    fn test_collaborator_values_are_normalized() {
        let log = CallLog::default();
        let service = OrderService::new(
            FakeCatalog::new(&[("A", "1000")], log.clone()),
            FakeInventory::new(log.clone()),
            FakeTax::new(log.clone()).returning("10000.4999", "110000.49"),
            &PricingConfig::default(),
        );

        let result = service
            .place_order(&OrderRequest::new("JP", vec![Line::new("A", 1)]))
            .unwrap();

        assert_eq!(result.total_tax.to_string(), "10000.50");
        assert_eq!(result.total_gross.to_string(), "110000");
    }

    #[test]
    fn test_request_mode_does_not_change_field_rounding() {
        let log = CallLog::default();
        let service = service_with(&[("A", "10.005")], &PricingConfig::default(), &log);
        let request =
            OrderRequest::new("JP", vec![Line::new("A", 1)]).with_rounding_mode(RoundingMode::HalfDown);

        let result = service.place_order(&request).unwrap();

        // HALF_DOWN would give 10.00
        assert_eq!(result.total_net_before_discount.to_string(), "10.01");
        assert_eq!(
            log.filtered(|c| matches!(c, Call::CalcTaxAmount(..))),
            vec![Call::CalcTaxAmount(money("10.005"), "JP".into(), RoundingMode::HalfDown)]
        );
    }

    // -------------------------------------------------------------------------
    // Policy Chain
    // -------------------------------------------------------------------------

    fn standard_policies() -> Vec<DiscountPolicy> {
        vec![
            VolumeDiscount::new(Rate::from_percent(5), 10).into(),
            MultiItemDiscount::new(Rate::from_percent(2), 3).into(),
            HighAmountDiscount::new(Rate::from_percent(3), Money::from_major(100000)).into(),
        ]
    }

    #[test]
    fn test_policy_order_changes_totals() {
        let log = CallLog::default();
        let mut reversed = standard_policies();
        reversed.reverse();

        let forward = OrderService::with_policies(
            FakeCatalog::new(&scenario_c_prices(), log.clone()),
            FakeInventory::new(log.clone()),
            FakeTax::new(log.clone()),
            standard_policies(),
        );
        let backward = OrderService::with_policies(
            FakeCatalog::new(&scenario_c_prices(), log.clone()),
            FakeInventory::new(log.clone()),
            FakeTax::new(log.clone()),
            reversed,
        );

        let a = forward.place_order(&scenario_c_request()).unwrap();
        let b = backward.place_order(&scenario_c_request()).unwrap();

        assert_eq!(a.total_discount.to_string(), "10434.00");
        assert_eq!(b.total_discount.to_string(), "10681.00");
        assert_ne!(a.applied_discounts, b.applied_discounts);
    }

    #[test]
    fn test_policies_are_a_snapshot() {
        let log = CallLog::default();
        let mut supplied = standard_policies();
        let service = OrderService::with_policies(
            FakeCatalog::new(&scenario_c_prices(), log.clone()),
            FakeInventory::new(log.clone()),
            FakeTax::new(log.clone()),
            supplied.clone(),
        );

        supplied.push(CapPolicy::new(Rate::zero()).into());
        supplied.clear();

        assert_eq!(service.policies(), standard_policies().as_slice());
        let result = service.place_order(&scenario_c_request()).unwrap();
        assert_eq!(result.total_discount.to_string(), "10434.00");
    }

    #[test]
    fn test_empty_chain_prices_without_discount() {
        let log = CallLog::default();
        let service = OrderService::with_policies(
            FakeCatalog::new(&scenario_c_prices(), log.clone()),
            FakeInventory::new(log.clone()),
            FakeTax::new(log.clone()),
            Vec::new(),
        );

        let result = service.place_order(&scenario_c_request()).unwrap();
        assert_eq!(result.total_discount.to_string(), "0.00");
        assert_eq!(result.total_net_after_discount.to_string(), "115000.00");
    }

    #[test]
    fn test_service_behind_inbound_port() {
        let log = CallLog::default();
        let service = service_with(&[("A", "1000")], &PricingConfig::default(), &log);
        let port: &dyn PlaceOrder = &service;

        let result = port
            .place_order(&OrderRequest::new("JP", vec![Line::new("A", 10)]))
            .unwrap();
        assert_eq!(result.applied_discounts, vec![DiscountType::Volume]);
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    const PROP_PRICES: [(&str, &str); 5] = [
        ("A", "19.99"),
        ("B", "1250.50"),
        ("C", "0.35"),
        ("D", "48000"),
        ("E", "999.99"),
    ];

    fn arb_lines() -> impl Strategy<Value = Vec<Line>> {
        prop::collection::vec((0usize..PROP_PRICES.len(), 1i64..25), 1..8).prop_map(|pairs| {
            pairs
                .into_iter()
                .map(|(index, qty)| Line::new(PROP_PRICES[index].0, qty))
                .collect()
        })
    }

    fn price(lines: Vec<Line>, config: &PricingConfig) -> OrderResult {
        let log = CallLog::default();
        service_with(&PROP_PRICES, config, &log)
            .place_order(&OrderRequest::new("JP", lines))
            .unwrap()
    }

    proptest! {
        #[test]
        fn prop_line_order_does_not_matter(lines in arb_lines(), shift in 0usize..8) {
            let config = PricingConfig::default();
            let original = price(lines.clone(), &config);

            let mut reversed = lines.clone();
            reversed.reverse();
            let mut rotated = lines.clone();
            let by = shift % rotated.len();
            rotated.rotate_left(by);

            prop_assert_eq!(&price(reversed, &config), &original);
            prop_assert_eq!(&price(rotated, &config), &original);
        }

        #[test]
        fn prop_lower_cap_never_increases_discount(lines in arb_lines(), low in 0u32..=100, high in 0u32..=100) {
            let (low, high) = if low <= high { (low, high) } else { (high, low) };

            let capped_low = price(lines.clone(), &PricingConfig::default().with_cap_rate(Rate::from_percent(low)));
            let capped_high = price(lines, &PricingConfig::default().with_cap_rate(Rate::from_percent(high)));

            prop_assert!(capped_low.total_discount <= capped_high.total_discount);
        }

        #[test]
        fn prop_net_after_is_net_before_minus_discount(lines in arb_lines(), cap in 0u32..=100) {
            let result = price(lines, &PricingConfig::default().with_cap_rate(Rate::from_percent(cap)));

            let expected = result.total_net_before_discount - result.total_discount;
            let drift = (result.total_net_after_discount - expected).abs();
            prop_assert!(drift <= money("0.01"));
        }
    }
}
