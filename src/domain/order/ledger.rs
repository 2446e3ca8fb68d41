use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;

use super::aggregate::Order;
use super::config::{CancelMode, InputPolicy, LedgerConfig};
use super::errors::{CancelRejection, OrderError};
use super::events::{EventEnvelope, OrderEvent, OrderPlaced, OrderRemoved};
use super::value_objects::{LineItem, LineRequest, OrderId, OrderStatus, StatusFilter};
use crate::utils::currency::format_inr;

// ============================================================================
// Order Ledger
// ============================================================================
//
// Authoritative, most-recent-first list of the session's orders. All
// creation, lookup and cancellation goes through here. Mutation takes
// `&mut self`; hosts with several writers wrap it in `LedgerActor`.
//
// ============================================================================

/// Outcome of a successful cancellation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cancellation {
    pub order_id: OrderId,
    pub removed: bool,
    pub message: String,
}

/// Per-status order counts for filter badges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub all: usize,
    pub processing: usize,
    pub shipped: usize,
    pub delivered: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    pub fn get(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Only(OrderStatus::Processing) => self.processing,
            StatusFilter::Only(OrderStatus::Shipped) => self.shipped,
            StatusFilter::Only(OrderStatus::Delivered) => self.delivered,
            StatusFilter::Only(OrderStatus::Cancelled) => self.cancelled,
        }
    }
}

#[derive(Debug)]
pub struct OrderLedger {
    config: LedgerConfig,
    orders: Vec<Order>,
    cart: Vec<LineRequest>,
    history: Vec<EventEnvelope<OrderEvent>>,
    next_sequence: u64,
    next_line_id: u64,
}

impl OrderLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            next_sequence: config.sequence_base,
            next_line_id: config.line_id_base,
            config,
            orders: Vec::new(),
            cart: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Ledger seeded with existing orders, given most-recent-first
    pub fn with_orders(config: LedgerConfig, orders: Vec<Order>) -> Result<Self, OrderError> {
        let mut seen = HashSet::new();
        for order in &orders {
            order.validate()?;
            if !seen.insert(order.id().clone()) {
                return Err(OrderError::DuplicateOrderId(order.id().clone()));
            }
        }

        // Never hand out a sequence or line id already present in the seed
        let next_sequence = orders
            .iter()
            .filter_map(|o| o.id().sequence())
            .map(|seq| seq + 1)
            .max()
            .unwrap_or(0)
            .max(config.sequence_base.saturating_add(orders.len() as u64));
        let next_line_id = orders
            .iter()
            .flat_map(|o| o.items())
            .map(|item| item.id.saturating_add(1))
            .max()
            .unwrap_or(0)
            .max(config.line_id_base);

        tracing::debug!(
            seeded = orders.len(),
            next_sequence,
            next_line_id,
            "Order ledger initialised"
        );

        Ok(Self {
            config,
            orders,
            cart: Vec::new(),
            history: Vec::new(),
            next_sequence,
            next_line_id,
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    // ------------------------------------------------------------------------
    // Placement
    // ------------------------------------------------------------------------

    pub fn place(&mut self, lines: Vec<LineRequest>) -> Result<Order, OrderError> {
        self.place_on(lines, Utc::now().date_naive())
    }

    pub fn place_on(&mut self, lines: Vec<LineRequest>, date: NaiveDate) -> Result<Order, OrderError> {
        if lines.is_empty() && self.config.input_policy == InputPolicy::Strict {
            tracing::warn!("Rejected order with no items");
            return Err(OrderError::EmptyItems);
        }

        // Validate everything before touching the counters
        let mut normalized = Vec::with_capacity(lines.len());
        for (index, line) in lines.into_iter().enumerate() {
            let (price, quantity) = self.normalize_line(index, &line).map_err(|e| {
                tracing::warn!(error = %e, "Rejected order line");
                e
            })?;
            normalized.push((line, price, quantity));
        }

        let line_base = self.next_line_id;
        let items: Vec<LineItem> = normalized
            .into_iter()
            .zip(line_base..)
            .map(|((line, price, quantity), id)| LineItem {
                id,
                name: line.name,
                image: line.image,
                price,
                quantity,
            })
            .collect();

        let order = OrderId::new(date.year(), self.next_sequence)
            .and_then(|order_id| {
                Order::place(order_id, date, items, self.config.delivery_lead_days)
            })
            .map_err(|e| {
                tracing::warn!(error = %e, "Rejected order");
                e
            })?;

        // Nothing above mutates the ledger; commit counters only on success
        self.next_line_id = line_base.saturating_add(order.items().len() as u64);
        self.next_sequence += 1;
        self.orders.insert(0, order.clone());
        self.cart.clear();

        self.record(
            order.id().clone(),
            OrderEvent::Placed(OrderPlaced {
                date,
                total: order.total(),
                items: order.items().to_vec(),
            }),
        );

        tracing::info!(
            order_id = %order.id(),
            item_count = order.items().len(),
            total = %format_inr(order.total()),
            "Order placed"
        );

        Ok(order)
    }

    fn normalize_line(&self, index: usize, line: &LineRequest) -> Result<(i64, u32), OrderError> {
        match self.config.input_policy {
            InputPolicy::Lenient => {
                let quantity = match line.quantity {
                    None | Some(0) => 1,
                    Some(q) => q,
                };
                Ok((line.price.unwrap_or(0), quantity))
            }
            InputPolicy::Strict => {
                let price = line.price.ok_or(OrderError::MissingPrice(index))?;
                if price < 0 {
                    return Err(OrderError::NegativePrice(index, price));
                }
                let quantity = line.quantity.unwrap_or(1);
                if quantity == 0 {
                    return Err(OrderError::InvalidQuantity(index, quantity));
                }
                Ok((price, quantity))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Cancellation and removal
    // ------------------------------------------------------------------------

    pub fn cancel(&mut self, order_id: &OrderId) -> Result<Cancellation, OrderError> {
        self.cancel_on(order_id, Utc::now().date_naive())
    }

    pub fn cancel_on(&mut self, order_id: &OrderId, date: NaiveDate) -> Result<Cancellation, OrderError> {
        let Some(index) = self.position(order_id) else {
            tracing::warn!(order_id = %order_id, "Cancel rejected: order not found");
            return Err(OrderError::CancelRejected {
                order_id: order_id.clone(),
                reason: CancelRejection::NotFound,
            });
        };

        let remove = self.config.cancel_mode == CancelMode::Remove;
        let event = match self.orders[index].handle_cancel(date, remove) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(order_id = %order_id, error = %e, "Cancel rejected");
                return Err(e);
            }
        };

        if remove {
            self.orders.remove(index);
        } else {
            self.orders[index].apply_event(&event);
        }
        self.record(order_id.clone(), event);

        tracing::info!(order_id = %order_id, removed = remove, "Order cancelled");

        Ok(Cancellation {
            order_id: order_id.clone(),
            removed: remove,
            message: "Order cancelled successfully".to_string(),
        })
    }

    /// Delete a processing or cancelled order outright
    pub fn remove(&mut self, order_id: &OrderId) -> Result<Order, OrderError> {
        let index = self
            .position(order_id)
            .ok_or_else(|| OrderError::NotFound(order_id.clone()))?;

        let status = self.orders[index].status();
        if !matches!(status, OrderStatus::Processing | OrderStatus::Cancelled) {
            return Err(OrderError::NotRemovable(order_id.clone(), status));
        }

        let order = self.orders.remove(index);
        self.record(
            order_id.clone(),
            OrderEvent::Removed(OrderRemoved {
                previous_status: status,
            }),
        );

        tracing::info!(order_id = %order_id, previous_status = %status, "Order removed");

        Ok(order)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn list(&self) -> Vec<Order> {
        self.orders.clone()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn filter_by_status(&self, filter: StatusFilter) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|o| filter.matches(o.status()))
            .cloned()
            .collect()
    }

    pub fn get(&self, order_id: &OrderId) -> Option<Order> {
        self.orders.iter().find(|o| o.id() == order_id).cloned()
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts {
            all: self.orders.len(),
            ..StatusCounts::default()
        };
        for order in &self.orders {
            match order.status() {
                OrderStatus::Processing => counts.processing += 1,
                OrderStatus::Shipped => counts.shipped += 1,
                OrderStatus::Delivered => counts.delivered += 1,
                OrderStatus::Cancelled => counts.cancelled += 1,
            }
        }
        counts
    }

    pub fn history(&self) -> &[EventEnvelope<OrderEvent>] {
        &self.history
    }

    // ------------------------------------------------------------------------
    // Cart
    // ------------------------------------------------------------------------

    pub fn add_to_cart(&mut self, line: LineRequest) {
        tracing::debug!(name = %line.name, "Line added to cart");
        self.cart.push(line);
    }

    pub fn cart(&self) -> &[LineRequest] {
        &self.cart
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Place the cart contents as one order
    pub fn checkout(&mut self) -> Result<Order, OrderError> {
        self.checkout_on(Utc::now().date_naive())
    }

    pub fn checkout_on(&mut self, date: NaiveDate) -> Result<Order, OrderError> {
        let lines = self.cart.clone();
        self.place_on(lines, date)
    }

    fn position(&self, order_id: &OrderId) -> Option<usize> {
        self.orders.iter().position(|o| o.id() == order_id)
    }

    fn record(&mut self, order_id: OrderId, event: OrderEvent) {
        let sequence = self.history.len() as u64 + 1;
        self.history.push(EventEnvelope::new(sequence, order_id, event));
    }
}

impl Default for OrderLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::Fulfillment;
    use crate::fixtures;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    fn priced(name: &str, price: i64, quantity: u32) -> LineRequest {
        LineRequest::new(name, format!("{}.jpg", name))
            .with_price(price)
            .with_quantity(quantity)
    }

    fn seeded(config: LedgerConfig) -> OrderLedger {
        OrderLedger::with_orders(config, fixtures::seed_orders().unwrap()).unwrap()
    }

    fn first_with_status(ledger: &OrderLedger, status: OrderStatus) -> OrderId {
        ledger
            .orders()
            .iter()
            .find(|o| o.status() == status)
            .map(|o| o.id().clone())
            .unwrap()
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let mut ledger = OrderLedger::default();
        let order = ledger
            .place_on(vec![priced("a", 100, 2), priced("b", 50, 1)], today())
            .unwrap();

        assert_eq!(order.total(), 250);
        assert_eq!(order.status(), OrderStatus::Processing);
        assert_eq!(order.date(), today());
        assert_eq!(order.estimated_delivery(), NaiveDate::from_ymd_opt(2025, 1, 11));
    }

    #[test]
    fn test_size_grows_and_ids_stay_unique() {
        let mut ledger = seeded(LedgerConfig::default());
        let seeded_count = ledger.len();

        for n in 0..25 {
            ledger.place_on(vec![priced("item", n, 1)], today()).unwrap();
        }

        assert_eq!(ledger.len(), seeded_count + 25);
        let ids: HashSet<_> = ledger.orders().iter().map(|o| o.id().clone()).collect();
        assert_eq!(ids.len(), ledger.len());
    }

    #[test]
    fn test_new_orders_are_prepended() {
        let mut ledger = seeded(LedgerConfig::default());
        let before = ledger.list();

        let order = ledger.place_on(vec![priced("a", 10, 1)], today()).unwrap();
        let after = ledger.list();

        assert_eq!(after[0], order);
        assert_eq!(&after[1..], &before[..]);
    }

    #[test]
    fn test_ids_continue_after_seed() {
        let mut ledger = seeded(LedgerConfig::default());
        let first = ledger.place_on(vec![priced("a", 10, 1)], today()).unwrap();
        let second = ledger.place_on(vec![priced("b", 10, 1)], today()).unwrap();

        assert_eq!(first.id().as_str(), "ORD-2025-001311");
        assert_eq!(second.id().as_str(), "ORD-2025-001312");
    }

    #[test]
    fn test_ids_stay_monotonic_after_removal() {
        let config = LedgerConfig::default().with_cancel_mode(CancelMode::Remove);
        let mut ledger = OrderLedger::new(config);
        let first = ledger.place_on(vec![priced("a", 10, 1)], today()).unwrap();
        ledger.cancel_on(first.id(), today()).unwrap();
        let second = ledger.place_on(vec![priced("b", 10, 1)], today()).unwrap();

        assert_ne!(first.id(), second.id());
        assert!(second.id().sequence() > first.id().sequence());
    }

    #[test]
    fn test_line_ids_are_fresh() {
        let mut ledger = seeded(LedgerConfig::default());
        let order = ledger
            .place_on(vec![priced("a", 10, 1), priced("b", 20, 1)], today())
            .unwrap();

        let seeded_line_ids: HashSet<u64> = ledger.orders()[1..]
            .iter()
            .flat_map(|o| o.items().iter().map(|i| i.id))
            .collect();
        for item in order.items() {
            assert!(!seeded_line_ids.contains(&item.id));
        }
        assert_ne!(order.items()[0].id, order.items()[1].id);
    }

    #[test]
    fn test_strict_policy_rejects_bad_input() {
        let mut ledger = OrderLedger::default();

        assert_eq!(ledger.place_on(vec![], today()), Err(OrderError::EmptyItems));
        assert_eq!(
            ledger.place_on(vec![LineRequest::new("free", "free.jpg")], today()),
            Err(OrderError::MissingPrice(0))
        );
        assert_eq!(
            ledger.place_on(vec![priced("a", 10, 1), priced("b", -5, 1)], today()),
            Err(OrderError::NegativePrice(1, -5))
        );
        assert_eq!(
            ledger.place_on(vec![priced("a", 10, 0)], today()),
            Err(OrderError::InvalidQuantity(0, 0))
        );

        assert!(ledger.is_empty());
        assert!(ledger.history().is_empty());
        let order = ledger.place_on(vec![priced("a", 10, 1)], today()).unwrap();
        assert_eq!(order.id().sequence(), Some(1303));
    }

    #[test]
    fn test_overflowing_total_is_rejected_without_side_effects() {
        let mut ledger = OrderLedger::default();
        ledger.add_to_cart(priced("pending", 99, 1));

        assert_eq!(
            ledger.place_on(vec![priced("bulk", i64::MAX / 2, 3)], today()),
            Err(OrderError::TotalOverflow { line: 0 })
        );
        assert_eq!(
            ledger.place_on(
                vec![priced("a", i64::MAX / 2, 2), priced("b", 2, 1)],
                today()
            ),
            Err(OrderError::TotalOverflow { line: 1 })
        );

        assert!(ledger.is_empty());
        assert!(ledger.history().is_empty());
        assert_eq!(ledger.cart().len(), 1);

        let order = ledger.place_on(vec![priced("a", 10, 1)], today()).unwrap();
        assert_eq!(order.id().sequence(), Some(1303));
        assert_eq!(order.items()[0].id, 200);
    }

    #[test]
    fn test_lenient_policy_still_rejects_overflow() {
        let config = LedgerConfig::default().with_input_policy(InputPolicy::Lenient);
        let mut ledger = OrderLedger::new(config);

        let bulk = LineRequest::new("bulk", "bulk.jpg")
            .with_price(i64::MAX)
            .with_quantity(2);
        assert_eq!(
            ledger.place_on(vec![bulk], today()),
            Err(OrderError::TotalOverflow { line: 0 })
        );
        assert!(ledger.is_empty());

        let order = ledger.place_on(vec![], today()).unwrap();
        assert_eq!(order.id().sequence(), Some(1303));
    }

    #[test]
    fn test_sequence_exhaustion_is_rejected() {
        let config = LedgerConfig {
            sequence_base: 999_999,
            ..LedgerConfig::default()
        };
        let mut ledger = OrderLedger::new(config);

        let last = ledger.place_on(vec![priced("a", 10, 1)], today()).unwrap();
        assert_eq!(last.id().as_str(), "ORD-2025-999999");

        assert_eq!(
            ledger.place_on(vec![priced("b", 10, 1)], today()),
            Err(OrderError::SequenceExhausted(1_000_000))
        );
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.history().len(), 1);
        assert_eq!(ledger.next_sequence, 1_000_000);
        assert_eq!(ledger.next_line_id, 201);
    }

    #[test]
    fn test_lenient_policy_normalizes_input() {
        let mut ledger = OrderLedger::new(LedgerConfig::reference());

        let empty = ledger.place_on(vec![], today()).unwrap();
        assert_eq!(empty.total(), 0);
        assert!(empty.items().is_empty());

        let order = ledger
            .place_on(
                vec![
                    LineRequest::new("no price", "x.jpg").with_quantity(3),
                    LineRequest::new("no quantity", "y.jpg").with_price(400),
                    priced("zero quantity", 70, 0),
                ],
                today(),
            )
            .unwrap();

        let quantities: Vec<u32> = order.items().iter().map(|i| i.quantity).collect();
        assert_eq!(quantities, vec![3, 1, 1]);
        assert_eq!(order.total(), 470);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_place_clears_cart() {
        let mut ledger = OrderLedger::default();
        ledger.add_to_cart(priced("pending", 99, 1));

        ledger.place_on(vec![priced("direct", 10, 1)], today()).unwrap();
        assert!(ledger.cart().is_empty());
    }

    #[test]
    fn test_failed_place_keeps_cart() {
        let mut ledger = OrderLedger::default();
        ledger.add_to_cart(priced("pending", 99, 1));

        assert!(ledger.place_on(vec![], today()).is_err());
        assert_eq!(ledger.cart().len(), 1);
    }

    #[test]
    fn test_checkout_places_cart() {
        let mut ledger = OrderLedger::default();
        ledger.add_to_cart(priced("serum", 699, 2));
        ledger.add_to_cart(priced("coffee", 599, 1));

        let order = ledger.checkout_on(today()).unwrap();

        assert_eq!(order.total(), 1997);
        assert_eq!(order.items().len(), 2);
        assert!(ledger.cart().is_empty());
    }

    #[test]
    fn test_clear_cart() {
        let mut ledger = OrderLedger::new(LedgerConfig::reference());
        ledger.add_to_cart(priced("pending", 99, 1));
        ledger.clear_cart();

        assert!(ledger.cart().is_empty());
        assert_eq!(ledger.config().cancel_mode, CancelMode::Remove);

        // Lenient checkout of an empty cart still yields an order
        let order = ledger.checkout_on(today()).unwrap();
        assert_eq!(order.total(), 0);
    }

    #[test]
    fn test_checkout_empty_cart_is_rejected_when_strict() {
        let mut ledger = OrderLedger::default();
        assert_eq!(ledger.checkout_on(today()), Err(OrderError::EmptyItems));
    }

    #[test]
    fn test_cancel_shipped_is_rejected() {
        let mut ledger = seeded(LedgerConfig::reference());
        let shipped = first_with_status(&ledger, OrderStatus::Shipped);
        let before = ledger.list();

        let result = ledger.cancel_on(&shipped, today());

        assert_eq!(
            result,
            Err(OrderError::CancelRejected {
                order_id: shipped.clone(),
                reason: CancelRejection::NotCancellable(OrderStatus::Shipped),
            })
        );
        assert_eq!(ledger.list(), before);
    }

    #[test]
    fn test_cancel_unknown_order_is_rejected() {
        let mut ledger = seeded(LedgerConfig::default());
        let before = ledger.len();

        let result = ledger.cancel_on(&OrderId::from("ORD-1999-000001"), today());

        assert!(matches!(
            result,
            Err(OrderError::CancelRejected {
                reason: CancelRejection::NotFound,
                ..
            })
        ));
        assert_eq!(ledger.len(), before);
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn test_cancel_processing_removes_in_remove_mode() {
        let mut ledger = seeded(LedgerConfig::reference());
        let processing = first_with_status(&ledger, OrderStatus::Processing);
        let before = ledger.len();

        let cancellation = ledger.cancel_on(&processing, today()).unwrap();

        assert!(cancellation.removed);
        assert_eq!(cancellation.message, "Order cancelled successfully");
        assert_eq!(ledger.len(), before - 1);
        assert!(ledger.list().iter().all(|o| o.id() != &processing));
        assert!(ledger.get(&processing).is_none());
    }

    #[test]
    fn test_cancel_processing_retains_record_by_default() {
        let mut ledger = seeded(LedgerConfig::default());
        let processing = first_with_status(&ledger, OrderStatus::Processing);
        let before = ledger.len();

        let cancellation = ledger.cancel_on(&processing, today()).unwrap();
        assert!(!cancellation.removed);
        assert_eq!(ledger.len(), before);

        let order = ledger.get(&processing).unwrap();
        assert_eq!(order.status(), OrderStatus::Cancelled);
        assert_eq!(
            order.fulfillment(),
            &Fulfillment::Cancelled {
                cancelled_at: Some(today())
            }
        );

        // A second cancel is refused
        assert!(ledger.cancel_on(&processing, today()).is_err());
    }

    #[test]
    fn test_cancel_keeps_positions_of_other_orders() {
        let mut ledger = seeded(LedgerConfig::reference());
        let order = ledger.place_on(vec![priced("a", 10, 1)], today()).unwrap();
        let before: Vec<_> = ledger.orders()[1..].to_vec();

        ledger.cancel_on(order.id(), today()).unwrap();

        assert_eq!(ledger.list(), before);
    }

    #[test]
    fn test_remove_rules() {
        let mut ledger = seeded(LedgerConfig::default());
        let delivered = first_with_status(&ledger, OrderStatus::Delivered);
        let processing = first_with_status(&ledger, OrderStatus::Processing);

        assert_eq!(
            ledger.remove(&delivered),
            Err(OrderError::NotRemovable(delivered.clone(), OrderStatus::Delivered))
        );

        ledger.cancel_on(&processing, today()).unwrap();
        let removed = ledger.remove(&processing).unwrap();
        assert_eq!(removed.status(), OrderStatus::Cancelled);
        assert!(ledger.get(&processing).is_none());

        assert_eq!(
            ledger.remove(&processing),
            Err(OrderError::NotFound(processing.clone()))
        );
    }

    #[test]
    fn test_filter_all_matches_list() {
        let ledger = seeded(LedgerConfig::default());
        let all = ledger.filter_by_status(StatusFilter::All);
        assert_eq!(all, ledger.list());
        assert_eq!(all.len(), ledger.len());
    }

    #[test]
    fn test_filter_by_status_preserves_order() {
        let ledger = seeded(LedgerConfig::default());
        let delivered = ledger.filter_by_status(StatusFilter::Only(OrderStatus::Delivered));

        assert!(!delivered.is_empty());
        assert!(delivered.iter().all(|o| o.status() == OrderStatus::Delivered));

        let expected: Vec<_> = ledger
            .list()
            .into_iter()
            .filter(|o| o.status() == OrderStatus::Delivered)
            .collect();
        assert_eq!(delivered, expected);
    }

    #[test]
    fn test_list_is_idempotent() {
        let ledger = seeded(LedgerConfig::default());
        assert_eq!(ledger.list(), ledger.list());
    }

    #[test]
    fn test_status_counts() {
        let mut ledger = seeded(LedgerConfig::default());
        let counts = ledger.status_counts();
        assert_eq!(counts.all, ledger.len());
        assert_eq!(
            counts.processing + counts.shipped + counts.delivered + counts.cancelled,
            counts.all
        );

        let processing = first_with_status(&ledger, OrderStatus::Processing);
        ledger.cancel_on(&processing, today()).unwrap();

        let after = ledger.status_counts();
        assert_eq!(after.processing, counts.processing - 1);
        assert_eq!(after.cancelled, counts.cancelled + 1);
        assert_eq!(after.get(StatusFilter::All), counts.all);
    }

    #[test]
    fn test_history_survives_removal() {
        let mut ledger = OrderLedger::new(LedgerConfig::reference());
        let order = ledger.place_on(vec![priced("a", 10, 3)], today()).unwrap();
        ledger.cancel_on(order.id(), today()).unwrap();

        let history = ledger.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].event_type, "OrderPlaced");
        assert_eq!(history[1].event_type, "OrderCancelled");
        assert_eq!(history[1].sequence_number, 2);
        assert!(history.iter().all(|e| e.order_id == *order.id()));

        match &history[0].event_data {
            OrderEvent::Placed(placed) => assert_eq!(placed.total, 30),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_is_not_live() {
        let mut ledger = OrderLedger::default();
        let order = ledger.place_on(vec![priced("a", 10, 1)], today()).unwrap();

        ledger.cancel_on(order.id(), today()).unwrap();

        assert_eq!(order.status(), OrderStatus::Processing);
        assert_eq!(ledger.get(order.id()).unwrap().status(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_seed_rejects_duplicate_ids() {
        let mut orders = fixtures::seed_orders().unwrap();
        orders.push(orders[0].clone());

        let result = OrderLedger::with_orders(LedgerConfig::default(), orders);
        assert!(matches!(result, Err(OrderError::DuplicateOrderId(_))));
    }
}
