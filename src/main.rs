use actix::prelude::*;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use order_ledger::actors::{
    AddToCart, CancelOrder, Checkout, FilterOrders, GetStatusCounts, LedgerActor, ListOrders,
    PlaceOrder,
};
use order_ledger::metrics::{start_metrics_server, Metrics};
use order_ledger::utils::format_inr;
use order_ledger::{fixtures, LedgerConfig, OrderStatus, StatusFilter};

const CONFIG_ENV: &str = "ORDER_LEDGER_CONFIG";
const METRICS_PORT_ENV: &str = "ORDER_LEDGER_METRICS_PORT";

// Stand-in for the network round trip the dashboard shows a spinner for
const SIMULATED_LATENCY: Duration = Duration::from_millis(300);

#[actix::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,order_ledger=debug")),
        )
        .init();

    tracing::info!("Starting order ledger demo");

    // === 1. Configuration ===
    let config = load_config()?;
    tracing::info!(
        cancel_mode = ?config.cancel_mode,
        input_policy = ?config.input_policy,
        "Ledger configuration loaded"
    );

    // === 2. Metrics ===
    let metrics = Arc::new(Metrics::new()?);
    let metrics_port = metrics_port()?;
    if let Some(port) = metrics_port {
        // Own thread and System so the HTTP workers stay off the ledger's arbiter
        let server_metrics = metrics.clone();
        std::thread::spawn(move || {
            let system = actix_web::rt::System::new();
            if let Err(e) = system.block_on(start_metrics_server(server_metrics, port)) {
                tracing::error!("Metrics server error: {}", e);
            }
        });
    }

    // === 3. Ledger actor seeded with fixture orders ===
    let ledger = fixtures::seeded_ledger(config)?;
    let ledger = LedgerActor::new(ledger).with_metrics(metrics.clone()).start();

    let orders = ledger.send(ListOrders).await?;
    tracing::info!(orders = orders.len(), "Ledger seeded");

    // === 4. Checkout from the catalog ===
    let catalog = fixtures::catalog()?;
    for (product, quantity) in catalog.iter().take(2).zip([1, 2]) {
        tracing::debug!(
            product = %product.name,
            price = %format_inr(product.price),
            discount = %format_inr(product.discount()),
            "Adding to cart"
        );
        ledger.send(AddToCart { line: product.line(quantity) }).await?;
    }

    tokio::time::sleep(SIMULATED_LATENCY).await;
    let order = ledger.send(Checkout).await??;
    tracing::info!(
        order_id = %order.id(),
        total = %format_inr(order.total()),
        estimated_delivery = ?order.estimated_delivery(),
        "Catalog order placed"
    );

    // === 5. Quick reorder ===
    let serum = catalog
        .iter()
        .find(|p| p.category == "Beauty")
        .context("Catalog has no beauty products")?;
    tokio::time::sleep(SIMULATED_LATENCY).await;
    let reorder = ledger.send(PlaceOrder { lines: vec![serum.line(1)] }).await??;
    tracing::info!(order_id = %reorder.id(), total = %format_inr(reorder.total()), "Reorder placed");

    // === 6. Cancellation rules ===
    let shipped = ledger
        .send(FilterOrders {
            filter: StatusFilter::Only(OrderStatus::Shipped),
        })
        .await?;
    if let Some(shipped) = shipped.first() {
        match ledger.send(CancelOrder { order_id: shipped.id().clone() }).await? {
            Ok(c) => tracing::warn!(order_id = %c.order_id, "Shipped order was cancelled"),
            Err(e) => tracing::info!("Cancel refused as expected: {}", e),
        }
    }

    let cancellation = ledger.send(CancelOrder { order_id: order.id().clone() }).await??;
    tracing::info!(
        order_id = %cancellation.order_id,
        removed = cancellation.removed,
        "{}",
        cancellation.message
    );

    // === 7. Final state ===
    let counts = ledger.send(GetStatusCounts).await?;
    tracing::info!(
        all = counts.all,
        processing = counts.processing,
        shipped = counts.shipped,
        delivered = counts.delivered,
        cancelled = counts.cancelled,
        "Ledger status counts"
    );
    let orders = ledger.send(ListOrders).await?;
    tracing::debug!("Orders: {}", serde_json::to_string_pretty(&orders)?);

    if let Some(port) = metrics_port {
        tracing::info!("Serving metrics on port {}, press Ctrl-C to exit", port);
        tokio::signal::ctrl_c().await?;
    }

    tracing::info!("Demo complete");

    Ok(())
}

fn load_config() -> anyhow::Result<LedgerConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read ledger config {}", path))?;
            LedgerConfig::from_json(&json).with_context(|| format!("Invalid ledger config {}", path))
        }
        Err(_) => Ok(LedgerConfig::default()),
    }
}

fn metrics_port() -> anyhow::Result<Option<u16>> {
    match std::env::var(METRICS_PORT_ENV) {
        Ok(port) => Ok(Some(
            port.parse()
                .with_context(|| format!("{} must be a port number", METRICS_PORT_ENV))?,
        )),
        Err(_) => Ok(None),
    }
}
