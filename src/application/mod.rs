//! Application layer containing the checkout flows.
//!
//! `OrderService` and `PromoService` each follow the same create-then-confirm
//! lifecycle: persist a pending record, open a charge intent with the payment
//! processor, and later flip the record to paid once the processor reports the
//! charge as settled.

pub mod charges;
pub mod locks;
pub mod orders;
pub mod promos;

use serde::Serialize;

/// What the client needs to complete payment for a newly created record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHandle {
    /// Id of the order or promo that was created.
    pub id: u64,
    pub transaction_id: String,
    pub client_secret: String,
}
