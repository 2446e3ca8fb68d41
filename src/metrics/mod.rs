// Private module declaration
mod server;

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::domain::order::{OrderLedger, OrderStatus};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for the order ledger
// ============================================================================
//
// - Orders placed and their value
// - Placement rejections by reason
// - Cancellation outcomes
// - Current ledger size by status
//
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub orders_placed: IntCounter,
    pub order_value_total: IntCounter,
    pub orders_rejected: IntCounterVec,
    pub cancellations: IntCounterVec,
    pub ledger_orders: IntGaugeVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_placed = IntCounter::new("ledger_orders_placed_total", "Total orders placed")?;
        registry.register(Box::new(orders_placed.clone()))?;

        let order_value_total = IntCounter::new(
            "ledger_order_value_total",
            "Sum of placed order totals in whole rupees",
        )?;
        registry.register(Box::new(order_value_total.clone()))?;

        let orders_rejected = IntCounterVec::new(
            Opts::new("ledger_orders_rejected_total", "Order placements rejected by validation"),
            &["reason"],
        )?;
        registry.register(Box::new(orders_rejected.clone()))?;

        let cancellations = IntCounterVec::new(
            Opts::new("ledger_cancellations_total", "Cancellation attempts by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(cancellations.clone()))?;

        let ledger_orders = IntGaugeVec::new(
            Opts::new("ledger_orders", "Orders currently held by the ledger"),
            &["status"],
        )?;
        registry.register(Box::new(ledger_orders.clone()))?;

        Ok(Self {
            registry,
            orders_placed,
            order_value_total,
            orders_rejected,
            cancellations,
            ledger_orders,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_order_placed(&self, total: i64) {
        self.orders_placed.inc();
        self.order_value_total.inc_by(total.max(0) as u64);
    }

    pub fn record_order_rejected(&self, reason: &str) {
        self.orders_rejected.with_label_values(&[reason]).inc();
    }

    /// Outcome is `cancelled`, `removed`, `not_found` or `not_cancellable`
    pub fn record_cancellation(&self, outcome: &str) {
        self.cancellations.with_label_values(&[outcome]).inc();
    }

    pub fn observe_ledger(&self, ledger: &OrderLedger) {
        let counts = ledger.status_counts();
        for status in OrderStatus::ALL {
            let count = counts.get(status.into());
            self.ledger_orders
                .with_label_values(&[status.as_str()])
                .set(count as i64);
        }
    }

    /// Text exposition format
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::LedgerConfig;
    use crate::fixtures;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        metrics.record_cancellation("cancelled");
        assert!(!metrics.registry().gather().is_empty());
    }

    #[test]
    fn test_record_order_placed() {
        let metrics = Metrics::new().unwrap();
        metrics.record_order_placed(250);
        metrics.record_order_placed(0);

        assert_eq!(metrics.orders_placed.get(), 2);
        assert_eq!(metrics.order_value_total.get(), 250);
    }

    #[test]
    fn test_record_cancellation_outcomes() {
        let metrics = Metrics::new().unwrap();
        metrics.record_cancellation("removed");
        metrics.record_cancellation("not_cancellable");
        metrics.record_cancellation("not_cancellable");

        assert_eq!(metrics.cancellations.with_label_values(&["removed"]).get(), 1);
        assert_eq!(metrics.cancellations.with_label_values(&["not_cancellable"]).get(), 2);
    }

    #[test]
    fn test_observe_ledger() {
        let metrics = Metrics::new().unwrap();
        let ledger = fixtures::seeded_ledger(LedgerConfig::default()).unwrap();
        metrics.observe_ledger(&ledger);

        assert_eq!(metrics.ledger_orders.with_label_values(&["processing"]).get(), 1);
        assert_eq!(metrics.ledger_orders.with_label_values(&["shipped"]).get(), 2);
        assert_eq!(metrics.ledger_orders.with_label_values(&["delivered"]).get(), 5);
        assert_eq!(metrics.ledger_orders.with_label_values(&["cancelled"]).get(), 0);
    }

    #[test]
    fn test_render_text_format() {
        let metrics = Metrics::new().unwrap();
        metrics.record_order_placed(10999);

        let text = metrics.render().unwrap();
        assert!(text.contains("ledger_orders_placed_total 1"));
        assert!(text.contains("ledger_order_value_total 10999"));
    }
}
