// ============================================================================
// Order Domain - Order lifecycle and session ledger
// ============================================================================
//
// - Value objects (OrderId, OrderStatus, LineItem, LineRequest)
// - Aggregate (Order and its Fulfillment state)
// - Events (ledger history)
// - Errors (OrderError)
// - Config (LedgerConfig, CancelMode, InputPolicy)
// - Ledger (OrderLedger)
//
// ============================================================================

pub mod value_objects;
pub mod aggregate;
pub mod events;
pub mod errors;
pub mod config;
pub mod ledger;

pub use value_objects::*;
pub use aggregate::*;
pub use events::*;
pub use errors::*;
pub use config::*;
pub use ledger::*;
