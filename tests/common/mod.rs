#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::sync::Arc;
use storefront::application::orders::{CartItem, CheckoutRequest, OrderService};
use storefront::application::promos::PromoService;
use storefront::config::Settings;
use storefront::domain::catalog::{Giftcard, Product};
use storefront::domain::money::Price;
use storefront::domain::order::ShippingAddress;
use storefront::domain::user::User;
use storefront::infrastructure::clock::FixedClock;
use storefront::infrastructure::in_memory::{
    InMemoryGiftcardCatalog, InMemoryOrderRepository, InMemoryPaymentProcessor,
    InMemoryProductCatalog, InMemoryPromoRepository, InMemoryUserDirectory,
};
use storefront::infrastructure::notifier::{ChannelNotifier, PaidEvent};
use storefront::interfaces::http::{AppContext, AppState};
use tokio::sync::mpsc::UnboundedReceiver;

pub const ASHA_TOKEN: &str = "token-asha";
pub const RAVI_TOKEN: &str = "token-ravi";
pub const VOUCHER_PREFIX: &str = "shop-";

pub fn issue_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap_or_default()
}

pub fn asha() -> User {
    User {
        id: 1,
        username: "asha".to_string(),
        email: "asha@example.com".to_string(),
        phone: Some("9840012345".to_string()),
    }
}

pub fn ravi() -> User {
    User {
        id: 2,
        username: "ravi".to_string(),
        email: "ravi@example.com".to_string(),
        phone: None,
    }
}

pub fn products() -> Vec<Product> {
    vec![
        Product {
            id: 1,
            slug: "a".to_string(),
            name: "Cold Pressed Oil".to_string(),
            price: Price::new(dec!(100)),
        },
        Product {
            id: 2,
            slug: "b".to_string(),
            name: "Millet Flour".to_string(),
            price: Price::new(dec!(45.75)),
        },
    ]
}

pub fn giftcards() -> Vec<Giftcard> {
    vec![Giftcard {
        id: 10,
        slug: "gold".to_string(),
        name: "Gold Card".to_string(),
        price: Price::new(dec!(1000)),
    }]
}

pub fn address() -> ShippingAddress {
    ShippingAddress {
        line1: "12 Market Road".to_string(),
        line2: Some("Flat 3".to_string()),
        city: "Chennai".to_string(),
        postal_code: "600001".to_string(),
        state: "TN".to_string(),
        country: "IN".to_string(),
    }
}

pub fn checkout(items: &[(&str, u32)]) -> CheckoutRequest {
    CheckoutRequest {
        cart_items: Some(
            items
                .iter()
                .map(|(slug, quantity)| CartItem {
                    slug: slug.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        ),
        address: Some(address()),
        ..Default::default()
    }
}

pub fn settings() -> Settings {
    Settings {
        currency: "inr".to_string(),
        site_url: "https://shop.example".to_string(),
        store_name: "Shop".to_string(),
        voucher_prefix: VOUCHER_PREFIX.to_string(),
    }
}

/// Services wired to in-memory adapters, with handles to inspect them.
pub struct Harness {
    pub state: AppState,
    pub orders: InMemoryOrderRepository,
    pub promos: InMemoryPromoRepository,
    pub payments: InMemoryPaymentProcessor,
    pub events: UnboundedReceiver<PaidEvent>,
}

impl Harness {
    pub fn new() -> Self {
        let orders = InMemoryOrderRepository::new();
        let promos = InMemoryPromoRepository::new();
        let payments = InMemoryPaymentProcessor::new();
        let (notifier, events) = ChannelNotifier::new();
        let notifier = Arc::new(notifier);
        let clock = Arc::new(FixedClock::on(issue_date()));

        let state = Arc::new(AppContext {
            orders: OrderService::new(
                Box::new(orders.clone()),
                Box::new(InMemoryProductCatalog::with_products(products())),
                Arc::new(payments.clone()),
                notifier.clone(),
                clock.clone(),
                settings(),
            ),
            promos: PromoService::new(
                Box::new(promos.clone()),
                Box::new(InMemoryGiftcardCatalog::with_giftcards(giftcards())),
                Arc::new(payments.clone()),
                notifier,
                clock,
                settings(),
            ),
            users: Box::new(InMemoryUserDirectory::with_users([
                (ASHA_TOKEN.to_string(), asha()),
                (RAVI_TOKEN.to_string(), ravi()),
            ])),
        });

        Self {
            state,
            orders,
            promos,
            payments,
            events,
        }
    }

    /// Paid notifications received so far.
    pub fn drain_events(&mut self) -> Vec<PaidEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}
