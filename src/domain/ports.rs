use super::catalog::{Giftcard, Product};
use super::order::{NewOrder, Order};
use super::payment::{ChargeIntent, ChargeRequest};
use super::promo::{NewPromo, Promo};
use super::user::User;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists a new order and returns it with its assigned id.
    async fn create(&self, order: NewOrder) -> Result<Order>;
    async fn get(&self, id: u64) -> Result<Option<Order>>;
    async fn find_by_transaction(&self, transaction_id: &str) -> Result<Option<Order>>;
    /// Overwrites a previously created order.
    async fn update(&self, order: Order) -> Result<()>;
    async fn list_by_owner(&self, owner: u64) -> Result<Vec<Order>>;
    async fn all(&self) -> Result<Vec<Order>>;
}

#[async_trait]
pub trait PromoRepository: Send + Sync {
    async fn create(&self, promo: NewPromo) -> Result<Promo>;
    async fn get(&self, id: u64) -> Result<Option<Promo>>;
    async fn find_by_transaction(&self, transaction_id: &str) -> Result<Option<Promo>>;
    async fn update(&self, promo: Promo) -> Result<()>;
    async fn list_by_owner(&self, owner: u64) -> Result<Vec<Promo>>;
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>>;
}

#[async_trait]
pub trait GiftcardCatalog: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Giftcard>>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_token(&self, token: &str) -> Result<Option<User>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn create_intent(&self, request: ChargeRequest) -> Result<ChargeIntent>;
    async fn retrieve_intent(&self, intent_id: &str) -> Result<ChargeIntent>;
}

/// Receives records that have just moved to paid.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn order_paid(&self, order: &Order) -> Result<()>;
    async fn promo_paid(&self, promo: &Promo) -> Result<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub type OrderRepositoryBox = Box<dyn OrderRepository>;
pub type PromoRepositoryBox = Box<dyn PromoRepository>;
pub type ProductCatalogBox = Box<dyn ProductCatalog>;
pub type GiftcardCatalogBox = Box<dyn GiftcardCatalog>;
pub type UserDirectoryBox = Box<dyn UserDirectory>;

// Shared between the order and promo services.
pub type PaymentProcessorRef = Arc<dyn PaymentProcessor>;
pub type NotifierRef = Arc<dyn Notifier>;
pub type ClockRef = Arc<dyn Clock>;
