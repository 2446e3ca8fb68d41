// ============================================================================
// Order Ledger
// ============================================================================
//
// Session order ledger for the shopping-profile dashboard: placement,
// cancellation, listing and filtering of orders, with an actor boundary,
// seed fixtures and Prometheus metrics around it.
//
// ============================================================================

pub mod actors;
pub mod domain;
pub mod fixtures;
pub mod metrics;
pub mod utils;

pub use domain::order::{
    CancelMode, Cancellation, InputPolicy, LedgerConfig, LineItem, LineRequest, Order,
    OrderError, OrderId, OrderLedger, OrderStatus, StatusFilter,
};
