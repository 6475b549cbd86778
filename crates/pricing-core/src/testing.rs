//! Recording fakes for the collaborator ports, shared by the unit tests.
//!
//! Every fake appends to one [`CallLog`], so a test can assert the exact
//! interleaving of catalog, inventory, tax and repository calls.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::error::{BoxError, PricingError, PricingResult};
use crate::money::{Money, RoundingMode};
use crate::ports::{Inventory, OrderRepository, PlaceOrder, ProductCatalog, TaxCalculator};
use crate::types::{OrderRecord, OrderRequest, OrderResult, Product};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindById(String),
    CheckAvailable(String, i64),
    Reserve(String, i64),
    CalcTaxAmount(Money, String, RoundingMode),
    AddTax(Money, String, RoundingMode),
    PlaceOrder,
    Save,
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    pub fn record(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Calls matching a predicate, in order.
    pub fn filtered(&self, keep: impl Fn(&Call) -> bool) -> Vec<Call> {
        self.0.borrow().iter().filter(|c| keep(*c)).cloned().collect()
    }

    /// Index of the first call matching a predicate.
    pub fn position(&self, matches: impl Fn(&Call) -> bool) -> Option<usize> {
        self.0.borrow().iter().position(|c| matches(c))
    }
}

pub fn money(s: &str) -> Money {
    s.parse().unwrap()
}

// =============================================================================
// Catalog
// =============================================================================

pub struct FakeCatalog {
    products: HashMap<String, Product>,
    log: CallLog,
}

impl FakeCatalog {
    pub fn new(prices: &[(&str, &str)], log: CallLog) -> Self {
        let products = prices
            .iter()
            .map(|(id, price)| (id.to_string(), Product::new(*id, *id, money(price))))
            .collect();
        FakeCatalog { products, log }
    }
}

impl ProductCatalog for FakeCatalog {
    fn find_by_id(&self, product_id: &str) -> Option<Product> {
        self.log.record(Call::FindById(product_id.to_string()));
        self.products.get(product_id).cloned()
    }
}

// =============================================================================
// Inventory
// =============================================================================

pub struct FakeInventory {
    out_of_stock: HashSet<String>,
    failing: HashSet<String>,
    log: CallLog,
}

impl FakeInventory {
    pub fn new(log: CallLog) -> Self {
        FakeInventory {
            out_of_stock: HashSet::new(),
            failing: HashSet::new(),
            log,
        }
    }

    /// `check_available` answers false for this product.
    pub fn out_of_stock(mut self, product_id: &str) -> Self {
        self.out_of_stock.insert(product_id.to_string());
        self
    }

    /// `reserve` fails with "inventory down" for this product.
    pub fn failing_reservation(mut self, product_id: &str) -> Self {
        self.failing.insert(product_id.to_string());
        self
    }
}

impl Inventory for FakeInventory {
    fn check_available(&self, product_id: &str, qty: i64) -> bool {
        self.log.record(Call::CheckAvailable(product_id.to_string(), qty));
        !self.out_of_stock.contains(product_id)
    }

    fn reserve(&self, product_id: &str, qty: i64) -> Result<(), BoxError> {
        self.log.record(Call::Reserve(product_id.to_string(), qty));
        if self.failing.contains(product_id) {
            return Err("inventory down".into());
        }
        Ok(())
    }
}

// =============================================================================
// Tax
// =============================================================================

/// Zero tax by default: `calc_tax_amount` returns 0, `add_tax` returns `net`.
pub struct FakeTax {
    tax_amount: Option<Money>,
    gross: Option<Money>,
    log: CallLog,
}

impl FakeTax {
    pub fn new(log: CallLog) -> Self {
        FakeTax {
            tax_amount: None,
            gross: None,
            log,
        }
    }

    pub fn returning(mut self, tax_amount: &str, gross: &str) -> Self {
        self.tax_amount = Some(money(tax_amount));
        self.gross = Some(money(gross));
        self
    }
}

impl TaxCalculator for FakeTax {
    fn calc_tax_amount(&self, net: Money, region: &str, mode: RoundingMode) -> Money {
        self.log
            .record(Call::CalcTaxAmount(net, region.to_string(), mode));
        self.tax_amount.unwrap_or_default()
    }

    fn add_tax(&self, net: Money, region: &str, mode: RoundingMode) -> Money {
        self.log.record(Call::AddTax(net, region.to_string(), mode));
        self.gross.unwrap_or(net)
    }
}

// =============================================================================
// Inbound pricer + repository (use case tests)
// =============================================================================

pub struct StubPricer {
    result: Option<OrderResult>,
    log: CallLog,
}

impl StubPricer {
    pub fn returning(result: OrderResult, log: CallLog) -> Self {
        StubPricer {
            result: Some(result),
            log,
        }
    }

    /// Fails every call with `ProductNotFound("NG")`.
    pub fn failing(log: CallLog) -> Self {
        StubPricer { result: None, log }
    }
}

impl PlaceOrder for StubPricer {
    fn place_order(&self, _request: &OrderRequest) -> PricingResult<OrderResult> {
        self.log.record(Call::PlaceOrder);
        self.result
            .clone()
            .ok_or_else(|| PricingError::ProductNotFound("NG".to_string()))
    }
}

pub struct FakeRepository {
    id: String,
    fail: bool,
    saved: RefCell<Vec<OrderRecord>>,
    log: CallLog,
}

impl FakeRepository {
    pub fn new(id: &str, log: CallLog) -> Self {
        FakeRepository {
            id: id.to_string(),
            fail: false,
            saved: RefCell::new(Vec::new()),
            log,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn saved(&self) -> Vec<OrderRecord> {
        self.saved.borrow().clone()
    }
}

impl OrderRepository for FakeRepository {
    fn save(&self, order: OrderRecord) -> Result<String, BoxError> {
        self.log.record(Call::Save);
        if self.fail {
            return Err("disk full".into());
        }
        self.saved.borrow_mut().push(order);
        Ok(self.id.clone())
    }
}
