use serde::{Deserialize, Serialize};

// ============================================================================
// Ledger Configuration
// ============================================================================

/// What a successful cancellation does to the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelMode {
    /// Keep the order and move it to `cancelled`
    #[default]
    Retain,
    /// Drop the order from the ledger
    Remove,
}

/// How `place` treats missing or malformed line data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputPolicy {
    /// Reject empty orders, missing or negative prices and zero quantities
    #[default]
    Strict,
    /// Missing price becomes 0, missing or zero quantity becomes 1
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub cancel_mode: CancelMode,
    pub input_policy: InputPolicy,
    /// First order sequence number, offset by the number of seeded orders
    pub sequence_base: u64,
    /// First line item id handed out by the ledger
    pub line_id_base: u64,
    /// Days between order date and estimated delivery
    pub delivery_lead_days: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::durable()
    }
}

impl LedgerConfig {
    /// Keeps cancelled orders and validates input
    pub fn durable() -> Self {
        Self {
            cancel_mode: CancelMode::Retain,
            input_policy: InputPolicy::Strict,
            sequence_base: 1303,
            line_id_base: 200,
            delivery_lead_days: 5,
        }
    }

    /// Mirrors the mock commerce API: delete on cancel, normalize input
    pub fn reference() -> Self {
        Self {
            cancel_mode: CancelMode::Remove,
            input_policy: InputPolicy::Lenient,
            ..Self::durable()
        }
    }

    pub fn with_cancel_mode(mut self, cancel_mode: CancelMode) -> Self {
        self.cancel_mode = cancel_mode;
        self
    }

    pub fn with_input_policy(mut self, input_policy: InputPolicy) -> Self {
        self.input_policy = input_policy;
        self
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
