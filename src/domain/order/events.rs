use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{LineItem, OrderId, OrderStatus};

// ============================================================================
// Order Events - Ledger history entries
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    Placed(OrderPlaced),
    Cancelled(OrderCancelled),
    Removed(OrderRemoved),
}

impl OrderEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::Placed(_) => "OrderPlaced",
            OrderEvent::Cancelled(_) => "OrderCancelled",
            OrderEvent::Removed(_) => "OrderRemoved",
        }
    }
}

/// Order Placed - first event of every ledger-created order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub date: NaiveDate,
    pub total: i64,
    pub items: Vec<LineItem>,
}

/// Order Cancelled - buyer cancelled while processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub cancelled_on: NaiveDate,
    /// True when the ledger dropped the record instead of keeping it
    pub removed: bool,
}

/// Order Removed - explicit deletion of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRemoved {
    pub previous_status: OrderStatus,
}

// ============================================================================
// Event Envelope
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    pub event_id: Uuid,
    pub sequence_number: u64,
    pub order_id: OrderId,
    pub event_type: String,
    pub event_data: E,
    pub timestamp: DateTime<Utc>,
}

impl EventEnvelope<OrderEvent> {
    pub fn new(sequence_number: u64, order_id: OrderId, event: OrderEvent) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            sequence_number,
            order_id,
            event_type: event.event_type().to_string(),
            event_data: event,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_carries_event_type() {
        let envelope = EventEnvelope::new(
            7,
            OrderId::new(2025, 1311).unwrap(),
            OrderEvent::Removed(OrderRemoved {
                previous_status: OrderStatus::Cancelled,
            }),
        );

        assert_eq!(envelope.sequence_number, 7);
        assert_eq!(envelope.event_type, "OrderRemoved");
        assert_eq!(envelope.order_id.as_str(), "ORD-2025-001311");
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = OrderEvent::Cancelled(OrderCancelled {
            cancelled_on: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            removed: false,
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Cancelled");
        assert_eq!(json["data"]["cancelled_on"], "2025-01-06");

        let back: OrderEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
