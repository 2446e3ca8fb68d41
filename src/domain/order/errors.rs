use super::value_objects::{OrderId, OrderStatus};

// ============================================================================
// Order Business Rule Errors
// ============================================================================

/// Why a cancellation was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CancelRejection {
    #[error("order not found")]
    NotFound,

    #[error("only processing orders can be cancelled, order is {0}")]
    NotCancellable(OrderStatus),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("Cannot cancel order {order_id}: {reason}")]
    CancelRejected {
        order_id: OrderId,
        reason: CancelRejection,
    },

    #[error("Cannot remove order {0} in status: {1}")]
    NotRemovable(OrderId, OrderStatus),

    #[error("Order not found: {0}")]
    NotFound(OrderId),

    #[error("Order items cannot be empty")]
    EmptyItems,

    #[error("Line {0} has no price")]
    MissingPrice(usize),

    #[error("Line {0} has a negative price: {1}")]
    NegativePrice(usize, i64),

    #[error("Line {0} has an invalid quantity: {1}")]
    InvalidQuantity(usize, u32),

    #[error("Order total overflows at line {line}")]
    TotalOverflow { line: usize },

    #[error("Order sequence {0} does not fit in six digits")]
    SequenceExhausted(u64),

    #[error("Order {order_id} total {recorded} does not match its items ({computed})")]
    TotalMismatch {
        order_id: OrderId,
        recorded: i64,
        computed: i64,
    },

    #[error("Duplicate order id: {0}")]
    DuplicateOrderId(OrderId),

    #[error("Invalid order id: {0}")]
    InvalidOrderId(String),

    #[error("Unknown order status: {0}")]
    UnknownStatus(String),
}

impl OrderError {
    pub fn is_cancel_rejection(&self) -> bool {
        matches!(self, OrderError::CancelRejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_rejection_message() {
        let err = OrderError::CancelRejected {
            order_id: OrderId::from("ORD-2025-001298"),
            reason: CancelRejection::NotCancellable(OrderStatus::Shipped),
        };
        assert!(err.is_cancel_rejection());
        assert_eq!(
            err.to_string(),
            "Cannot cancel order ORD-2025-001298: only processing orders can be cancelled, order is shipped"
        );
    }

    #[test]
    fn test_rejection_reasons_display() {
        assert_eq!(CancelRejection::NotFound.to_string(), "order not found");
        assert_eq!(
            OrderError::TotalOverflow { line: 2 }.to_string(),
            "Order total overflows at line 2"
        );
    }

    #[test]
    fn test_validation_errors_are_not_cancel_rejections() {
        assert!(!OrderError::EmptyItems.is_cancel_rejection());
        assert_eq!(
            OrderError::InvalidQuantity(1, 0).to_string(),
            "Line 1 has an invalid quantity: 0"
        );
    }
}
