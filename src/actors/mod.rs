// ============================================================================
// Actors Module
// ============================================================================
//
// Actor boundary around the order ledger for multi-threaded hosts. Domain
// rules stay in `domain::order`; the actor only serializes access and
// records metrics.
//
// ============================================================================

mod ledger_actor;

pub use ledger_actor::{
    AddToCart, CancelOrder, Checkout, FilterOrders, GetOrder, GetStatusCounts, LedgerActor,
    ListOrders, PlaceOrder, RemoveOrder,
};
