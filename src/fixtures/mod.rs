use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::order::{LedgerConfig, LineRequest, Order, OrderLedger};

// ============================================================================
// Fixture Data - Seed orders and product catalog
// ============================================================================
//
// Embedded JSON so the demo and tests share one data set. Seed orders are
// validated when they are loaded into a ledger.
//
// ============================================================================

const SEED_ORDERS: &str = include_str!("../../data/orders.json");
const CATALOG: &str = include_str!("../../data/products.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: i64,
    pub original_price: i64,
    pub category: String,
    pub rating: f32,
    pub reviews: u32,
    pub in_stock: bool,
}

impl Product {
    /// Line request priced from the current catalog entry
    pub fn line(&self, quantity: u32) -> LineRequest {
        LineRequest::new(self.name.clone(), self.image.clone())
            .with_price(self.price)
            .with_quantity(quantity)
    }

    pub fn discount(&self) -> i64 {
        (self.original_price - self.price).max(0)
    }
}

/// Seed orders, most recent first
pub fn seed_orders() -> Result<Vec<Order>> {
    serde_json::from_str(SEED_ORDERS).context("Failed to parse seed orders")
}

pub fn catalog() -> Result<Vec<Product>> {
    serde_json::from_str(CATALOG).context("Failed to parse product catalog")
}

pub fn seeded_ledger(config: LedgerConfig) -> Result<OrderLedger> {
    let orders = seed_orders()?;
    OrderLedger::with_orders(config, orders).context("Seed orders violate ledger invariants")
}
