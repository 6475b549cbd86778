//! Seeded demo catalog and stock for the `quote` binary and doc examples.

use pricing_core::{Money, Product};

use crate::catalog::InMemoryCatalog;
use crate::error::StoreResult;
use crate::inventory::InMemoryInventory;

/// `(id, name, unit price, stock)`.
const PRODUCTS: &[(&str, &str, &str, i64)] = &[
    ("P001", "Apple Crate", "1000", 500),
    ("P002", "Orange Crate", "200", 500),
    ("P003", "Melon", "2980", 120),
    ("P004", "Grape Box", "1450.50", 80),
    ("P005", "Espresso Machine", "54800", 10),
    ("P006", "Chef Knife Set", "19800", 25),
    ("P007", "Cast Iron Pan", "6980", 40),
    ("P008", "Linen Apron", "2490", 60),
    ("P009", "Tea Sampler", "1280.25", 200),
    ("P010", "Ceramic Teapot", "8800", 0),
];

/// Demo catalog, prices normalized to two decimals.
pub fn catalog() -> StoreResult<InMemoryCatalog> {
    let products = PRODUCTS
        .iter()
        .map(|(id, name, price, _)| Ok(Product::new(*id, *name, price.parse::<Money>()?)))
        .collect::<StoreResult<Vec<_>>>()?;
    InMemoryCatalog::new(products)
}

/// Demo stock levels. P010 is listed but out of stock.
pub fn inventory() -> InMemoryInventory {
    InMemoryInventory::new(PRODUCTS.iter().map(|(id, _, _, stock)| (*id, *stock)))
}
