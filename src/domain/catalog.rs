use super::money::Price;
use serde::{Deserialize, Serialize};

/// A purchasable product, looked up by slug during order intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub slug: String,
    pub name: String,
    pub price: Price,
}

/// A gift card product that promos are issued against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Giftcard {
    pub id: u64,
    pub slug: String,
    pub name: String,
    pub price: Price,
}
