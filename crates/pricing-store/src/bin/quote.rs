//! # Order Quote
//!
//! Prices an order request against the seeded demo catalog and prints the
//! result as JSON.
//!
//! ## Usage
//! ```bash
//! # Price a request file with the default configuration
//! cargo run -p pricing-store --bin quote -- order.json
//!
//! # Read the request from stdin, use an explicit config file
//! cat order.json | cargo run -p pricing-store --bin quote -- - --config ./pricing.toml
//!
//! # Save the priced order and print it with its generated id
//! cargo run -p pricing-store --bin quote -- order.json --save
//! ```
//!
//! ## Request Format
//! ```json
//! {
//!   "region": "JP",
//!   "roundingMode": "HALF_EVEN",
//!   "lines": [
//!     { "productId": "P001", "qty": 10 },
//!     { "productId": "P003", "qty": 2 }
//!   ]
//! }
//! ```
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show each discount policy
//! - `RUST_LOG=pricing_core=trace` - Show line pricing and reservations
//! - Default: INFO, DEBUG for the pricing crates

use std::env;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use pricing_core::{OrderRequest, OrderService, PlaceOrderUseCase};
use pricing_store::{demo, AppConfig, InMemoryOrderStore, RegionalTaxCalculator};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut request_path: Option<String> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut save = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--save" | "-s" => save = true,
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => request_path = Some(other.to_string()),
        }
        i += 1;
    }

    let Some(request_path) = request_path else {
        print_help();
        std::process::exit(2);
    };

    let request = read_request(&request_path)?;
    let config = AppConfig::load(config_path)?;

    let catalog = Arc::new(demo::catalog()?);
    let service = OrderService::new(
        Arc::clone(&catalog),
        demo::inventory(),
        RegionalTaxCalculator::from_settings(&config.tax),
        &config.pricing,
    );

    let output = if save {
        let store = InMemoryOrderStore::new();
        let order_id = PlaceOrderUseCase::new(&service, catalog, &store).execute(&request)?;
        let saved = store.get(&order_id);
        json!({ "orderId": order_id, "order": saved })
    } else {
        serde_json::to_value(service.place_order(&request)?)?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Reads the request from a file, or from stdin when the path is `-`.
fn read_request(path: &str) -> Result<OrderRequest, Box<dyn std::error::Error>> {
    let contents = if path == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&contents)?)
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pricing_core=debug,pricing_store=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_help() {
    println!("Order Quote");
    println!();
    println!("Usage: quote <REQUEST.json | -> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>  Config file (default: platform config dir/pricing.toml)");
    println!("  -s, --save           Save the priced order and print it with its id");
    println!("  -h, --help           Show this help message");
}
