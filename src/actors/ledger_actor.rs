use actix::prelude::*;
use std::sync::Arc;

use crate::domain::order::{
    CancelRejection, Cancellation, LineRequest, Order, OrderError, OrderId, OrderLedger,
    StatusCounts, StatusFilter,
};
use crate::metrics::Metrics;

// ============================================================================
// Actor Messages
// ============================================================================

#[derive(Message)]
#[rtype(result = "Result<Order, OrderError>")]
pub struct PlaceOrder {
    pub lines: Vec<LineRequest>,
}

#[derive(Message)]
#[rtype(result = "Result<Cancellation, OrderError>")]
pub struct CancelOrder {
    pub order_id: OrderId,
}

#[derive(Message)]
#[rtype(result = "Result<Order, OrderError>")]
pub struct RemoveOrder {
    pub order_id: OrderId,
}

#[derive(Message)]
#[rtype(result = "Vec<Order>")]
pub struct ListOrders;

#[derive(Message)]
#[rtype(result = "Vec<Order>")]
pub struct FilterOrders {
    pub filter: StatusFilter,
}

#[derive(Message)]
#[rtype(result = "Option<Order>")]
pub struct GetOrder {
    pub order_id: OrderId,
}

/// Replies with the cart size after the add
#[derive(Message)]
#[rtype(result = "usize")]
pub struct AddToCart {
    pub line: LineRequest,
}

#[derive(Message)]
#[rtype(result = "Result<Order, OrderError>")]
pub struct Checkout;

#[derive(Message)]
#[rtype(result = "StatusCounts")]
pub struct GetStatusCounts;

// ============================================================================
// Ledger Actor - single writer for one order ledger
// ============================================================================
//
// Messages are handled one at a time, so callers on any thread see the
// ledger mutated by at most one operation at once.
//
// ============================================================================

pub struct LedgerActor {
    ledger: OrderLedger,
    metrics: Option<Arc<Metrics>>,
}

impl LedgerActor {
    pub fn new(ledger: OrderLedger) -> Self {
        Self {
            ledger,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        metrics.observe_ledger(&self.ledger);
        self.metrics = Some(metrics);
        self
    }

    fn record_placement(&self, result: &Result<Order, OrderError>) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        match result {
            Ok(order) => metrics.record_order_placed(order.total()),
            Err(e) => metrics.record_order_rejected(rejection_label(e)),
        }
        metrics.observe_ledger(&self.ledger);
    }

    fn record_cancellation(&self, result: &Result<Cancellation, OrderError>) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        let outcome = match result {
            Ok(c) if c.removed => "removed",
            Ok(_) => "cancelled",
            Err(OrderError::CancelRejected {
                reason: CancelRejection::NotFound,
                ..
            }) => "not_found",
            Err(_) => "not_cancellable",
        };
        metrics.record_cancellation(outcome);
        metrics.observe_ledger(&self.ledger);
    }
}

fn rejection_label(error: &OrderError) -> &'static str {
    match error {
        OrderError::EmptyItems => "empty_items",
        OrderError::MissingPrice(_) => "missing_price",
        OrderError::NegativePrice(..) => "negative_price",
        OrderError::InvalidQuantity(..) => "invalid_quantity",
        OrderError::TotalOverflow { .. } => "total_overflow",
        OrderError::SequenceExhausted(_) => "sequence_exhausted",
        _ => "other",
    }
}

impl Actor for LedgerActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!(orders = self.ledger.len(), "LedgerActor started");
    }
}

// ============================================================================
// Message Handlers
// ============================================================================

impl Handler<PlaceOrder> for LedgerActor {
    type Result = Result<Order, OrderError>;

    fn handle(&mut self, msg: PlaceOrder, _: &mut Self::Context) -> Self::Result {
        let result = self.ledger.place(msg.lines);
        self.record_placement(&result);
        result
    }
}

impl Handler<CancelOrder> for LedgerActor {
    type Result = Result<Cancellation, OrderError>;

    fn handle(&mut self, msg: CancelOrder, _: &mut Self::Context) -> Self::Result {
        let result = self.ledger.cancel(&msg.order_id);
        self.record_cancellation(&result);
        result
    }
}

impl Handler<RemoveOrder> for LedgerActor {
    type Result = Result<Order, OrderError>;

    fn handle(&mut self, msg: RemoveOrder, _: &mut Self::Context) -> Self::Result {
        let result = self.ledger.remove(&msg.order_id);
        if let Some(metrics) = &self.metrics {
            metrics.observe_ledger(&self.ledger);
        }
        result
    }
}

impl Handler<ListOrders> for LedgerActor {
    type Result = MessageResult<ListOrders>;

    fn handle(&mut self, _: ListOrders, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.ledger.list())
    }
}

impl Handler<FilterOrders> for LedgerActor {
    type Result = MessageResult<FilterOrders>;

    fn handle(&mut self, msg: FilterOrders, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.ledger.filter_by_status(msg.filter))
    }
}

impl Handler<GetOrder> for LedgerActor {
    type Result = MessageResult<GetOrder>;

    fn handle(&mut self, msg: GetOrder, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.ledger.get(&msg.order_id))
    }
}

impl Handler<AddToCart> for LedgerActor {
    type Result = MessageResult<AddToCart>;

    fn handle(&mut self, msg: AddToCart, _: &mut Self::Context) -> Self::Result {
        self.ledger.add_to_cart(msg.line);
        MessageResult(self.ledger.cart().len())
    }
}

impl Handler<Checkout> for LedgerActor {
    type Result = Result<Order, OrderError>;

    fn handle(&mut self, _: Checkout, _: &mut Self::Context) -> Self::Result {
        let result = self.ledger.checkout();
        self.record_placement(&result);
        result
    }
}

impl Handler<GetStatusCounts> for LedgerActor {
    type Result = MessageResult<GetStatusCounts>;

    fn handle(&mut self, _: GetStatusCounts, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.ledger.status_counts())
    }
}
