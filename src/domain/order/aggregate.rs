use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::errors::{CancelRejection, OrderError};
use super::events::{OrderCancelled, OrderEvent};
use super::value_objects::{LineItem, OrderId, OrderStatus};

// ============================================================================
// Order - Ledger record
// ============================================================================
//
// Status-specific fields live inside `Fulfillment`, so an order can only
// carry the fields that belong to its status. Serialized shape:
//
//   { "id": "ORD-2025-001302", "date": "2025-01-05", "total": 10999,
//     "items": [...], "status": "processing", "estimatedDelivery": "..." }
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Fulfillment {
    #[serde(rename_all = "camelCase")]
    Processing { estimated_delivery: NaiveDate },

    #[serde(rename_all = "camelCase")]
    Shipped {
        tracking_number: String,
        carrier: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        estimated_delivery: Option<NaiveDate>,
    },

    #[serde(rename_all = "camelCase")]
    Delivered { delivered_at: NaiveDate },

    #[serde(rename_all = "camelCase")]
    Cancelled {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cancelled_at: Option<NaiveDate>,
    },
}

impl Fulfillment {
    pub fn status(&self) -> OrderStatus {
        match self {
            Fulfillment::Processing { .. } => OrderStatus::Processing,
            Fulfillment::Shipped { .. } => OrderStatus::Shipped,
            Fulfillment::Delivered { .. } => OrderStatus::Delivered,
            Fulfillment::Cancelled { .. } => OrderStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,
    date: NaiveDate,
    total: i64,
    items: Vec<LineItem>,
    #[serde(flatten)]
    fulfillment: Fulfillment,
}

impl Order {
    /// Build an order whose total is computed from its items
    pub fn from_parts(
        id: OrderId,
        date: NaiveDate,
        items: Vec<LineItem>,
        fulfillment: Fulfillment,
    ) -> Result<Self, OrderError> {
        let total = compute_total(&items)?;
        Ok(Self {
            id,
            date,
            total,
            items,
            fulfillment,
        })
    }

    /// New processing order, delivery estimated `lead_days` after `date`
    pub fn place(
        id: OrderId,
        date: NaiveDate,
        items: Vec<LineItem>,
        lead_days: u64,
    ) -> Result<Self, OrderError> {
        let estimated_delivery = date.checked_add_days(Days::new(lead_days)).unwrap_or(date);
        Self::from_parts(id, date, items, Fulfillment::Processing { estimated_delivery })
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn status(&self) -> OrderStatus {
        self.fulfillment.status()
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn fulfillment(&self) -> &Fulfillment {
        &self.fulfillment
    }

    pub fn estimated_delivery(&self) -> Option<NaiveDate> {
        match &self.fulfillment {
            Fulfillment::Processing { estimated_delivery } => Some(*estimated_delivery),
            Fulfillment::Shipped { estimated_delivery, .. } => *estimated_delivery,
            _ => None,
        }
    }

    pub fn tracking_number(&self) -> Option<&str> {
        match &self.fulfillment {
            Fulfillment::Shipped { tracking_number, .. } => Some(tracking_number.as_str()),
            _ => None,
        }
    }

    pub fn carrier(&self) -> Option<&str> {
        match &self.fulfillment {
            Fulfillment::Shipped { carrier, .. } => Some(carrier.as_str()),
            _ => None,
        }
    }

    pub fn delivered_at(&self) -> Option<NaiveDate> {
        match &self.fulfillment {
            Fulfillment::Delivered { delivered_at } => Some(*delivered_at),
            _ => None,
        }
    }

    pub fn cancelled_at(&self) -> Option<NaiveDate> {
        match &self.fulfillment {
            Fulfillment::Cancelled { cancelled_at } => *cancelled_at,
            _ => None,
        }
    }

    /// Check invariants on records that did not come through `from_parts`
    pub fn validate(&self) -> Result<(), OrderError> {
        OrderId::parse(self.id.as_str())?;

        let computed = compute_total(&self.items)?;
        if computed != self.total {
            return Err(OrderError::TotalMismatch {
                order_id: self.id.clone(),
                recorded: self.total,
                computed,
            });
        }

        Ok(())
    }

    /// Business rule for buyer cancellation
    pub fn handle_cancel(&self, on: NaiveDate, remove: bool) -> Result<OrderEvent, OrderError> {
        let status = self.status();
        if !status.is_cancellable() {
            return Err(OrderError::CancelRejected {
                order_id: self.id.clone(),
                reason: CancelRejection::NotCancellable(status),
            });
        }

        Ok(OrderEvent::Cancelled(OrderCancelled {
            cancelled_on: on,
            removed: remove,
        }))
    }

    pub fn apply_event(&mut self, event: &OrderEvent) {
        match event {
            OrderEvent::Cancelled(e) if !e.removed => {
                self.fulfillment = Fulfillment::Cancelled {
                    cancelled_at: Some(e.cancelled_on),
                };
            }
            // Placement is the constructor; removals drop the record
            _ => {}
        }
    }
}

/// Sum of line subtotals, failing on the first line that overflows `i64`
pub fn compute_total(items: &[LineItem]) -> Result<i64, OrderError> {
    items.iter().enumerate().try_fold(0i64, |total, (line, item)| {
        item.subtotal()
            .and_then(|subtotal| total.checked_add(subtotal))
            .ok_or(OrderError::TotalOverflow { line })
    })
}
