use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Processor-reported state of a charge intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    #[serde(other)]
    Unknown,
}

impl SettlementStatus {
    pub fn is_settled(&self) -> bool {
        *self == SettlementStatus::Succeeded
    }
}

/// A request to open a charge intent with the payment processor.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    /// Amount in minor currency units.
    pub amount: i64,
    pub currency: String,
    pub metadata: BTreeMap<String, String>,
    pub receipt_email: Option<String>,
    pub description: String,
}

/// A charge intent as returned by the processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub status: SettlementStatus,
    #[serde(default)]
    pub amount: i64,
}
