//! Response bodies. Owner ids never leave the service, and a voucher code is
//! only revealed once its promo has been paid for.

use crate::domain::money::Price;
use crate::domain::order::{CartLine, Order, OrderStatus};
use crate::domain::promo::Promo;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: u64,
    pub status: OrderStatus,
    pub total: Price,
    pub cart: Vec<CartLine>,
    pub address: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            status: order.status,
            total: order.total,
            cart: order.cart,
            address: order.address,
            user_name: order.contact.name,
            user_email: order.contact.email,
            user_phone: order.contact.phone,
            transaction_id: order.transaction_id,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoView {
    pub id: u64,
    pub giftcard: u64,
    pub promo_code: Option<String>,
    pub promo_price: Price,
    pub email_to: String,
    pub paid: bool,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Promo> for PromoView {
    fn from(promo: Promo) -> Self {
        Self {
            id: promo.id,
            giftcard: promo.giftcard_id,
            promo_code: promo.paid.then(|| promo.code.to_string()),
            promo_price: promo.price,
            email_to: promo.email_to,
            paid: promo.paid,
            transaction_id: promo.transaction_id,
            created_at: promo.created_at,
        }
    }
}
