use super::PaymentHandle;
use super::charges::{Payer, build_charge};
use super::locks::TransactionLocks;
use crate::config::Settings;
use crate::domain::order::{CartLine, Contact, NewOrder, Order, ShippingAddress};
use crate::domain::ports::{
    ClockRef, NotifierRef, OrderRepositoryBox, PaymentProcessorRef, ProductCatalogBox,
};
use crate::domain::user::User;
use crate::error::{RecordKind, Result, StorefrontError};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartItem {
    pub slug: String,
    pub quantity: u32,
}

/// Body of a checkout request. Every field is optional on the wire so that
/// missing pieces turn into explicit client errors.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub cart_items: Option<Vec<CartItem>>,
    #[serde(default)]
    pub address: Option<ShippingAddress>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Order intake and confirmation.
///
/// Every call is a straight sequence of awaited store and processor calls.
/// Confirmations hold a lock on their transaction reference so two requests
/// for the same payment cannot both flip the order and notify twice.
pub struct OrderService {
    orders: OrderRepositoryBox,
    products: ProductCatalogBox,
    payments: PaymentProcessorRef,
    notifier: NotifierRef,
    clock: ClockRef,
    locks: TransactionLocks,
    settings: Settings,
}

impl OrderService {
    pub fn new(
        orders: OrderRepositoryBox,
        products: ProductCatalogBox,
        payments: PaymentProcessorRef,
        notifier: NotifierRef,
        clock: ClockRef,
        settings: Settings,
    ) -> Self {
        Self {
            orders,
            products,
            payments,
            notifier,
            clock,
            locks: TransactionLocks::new(),
            settings,
        }
    }

    /// Validates the cart, persists a pending order and opens a charge intent for it.
    ///
    /// Cart items whose slug does not resolve are left out of both the order
    /// and its total. `origin` is the caller's site, reported to the processor.
    pub async fn checkout(
        &self,
        user: &User,
        request: CheckoutRequest,
        origin: Option<&str>,
    ) -> Result<PaymentHandle> {
        let items = request.cart_items.ok_or(StorefrontError::MissingCart)?;
        let address = request.address.ok_or(StorefrontError::MissingAddress)?;

        let mut cart = Vec::with_capacity(items.len());
        for item in &items {
            if item.quantity == 0 {
                return Err(StorefrontError::InvalidQuantity(item.slug.clone()));
            }
            match self.products.find_by_slug(&item.slug).await? {
                Some(product) => cart.push(CartLine::new(&product, item.quantity)),
                None => debug!(slug = %item.slug, "Skipping unknown product"),
            }
        }
        if cart.is_empty() {
            return Err(StorefrontError::EmptyCart);
        }

        let contact = Contact {
            name: non_empty(request.name).unwrap_or_else(|| user.username.clone()),
            email: non_empty(request.email).unwrap_or_else(|| user.email.clone()),
            phone: non_empty(request.phone)
                .or_else(|| user.phone.clone())
                .unwrap_or_default(),
        };

        let new_order = NewOrder::new(
            user.id,
            cart,
            address.to_text(),
            contact,
            self.clock.now(),
        );
        let mut order = self.orders.create(new_order).await?;
        info!(order_id = order.id, owner = user.id, total = %order.total, "Created pending order");

        let payer = Payer {
            name: &order.contact.name,
            email: &order.contact.email,
            phone: &order.contact.phone,
        };
        let charge = build_charge(
            order.total,
            &self.settings.currency,
            &payer,
            origin.unwrap_or(&self.settings.site_url),
            format!("OrderId #{}", order.id),
            format!("{} OrderId #{}", self.settings.store_name, order.id),
        )?;
        let amount_minor = charge.amount;

        let intent = self.payments.create_intent(charge).await?;
        order.transaction_id = Some(intent.id.clone());
        self.orders.update(order.clone()).await?;
        let client_secret = intent.client_secret.clone().ok_or_else(|| {
            StorefrontError::Payment(format!("intent {} has no client secret", intent.id))
        })?;
        info!(
            order_id = order.id,
            transaction_id = %intent.id,
            amount_minor,
            "Opened charge intent"
        );

        Ok(PaymentHandle {
            id: order.id,
            transaction_id: intent.id,
            client_secret,
        })
    }

    /// Marks the order paid if the processor reports its charge as settled.
    pub async fn confirm(&self, transaction_id: &str) -> Result<Order> {
        let _guard = self.locks.acquire(transaction_id).await;

        let intent = self.payments.retrieve_intent(transaction_id).await?;
        if !intent.status.is_settled() {
            info!(transaction_id, status = ?intent.status, "Order payment not settled");
            return Err(StorefrontError::PaymentNotVerified(RecordKind::Order));
        }

        let mut order = self
            .orders
            .find_by_transaction(transaction_id)
            .await?
            .ok_or(StorefrontError::NotFound(RecordKind::Order))?;

        if order.mark_paid() {
            self.orders.update(order.clone()).await?;
            info!(order_id = order.id, transaction_id, "Order paid");
            if let Err(e) = self.notifier.order_paid(&order).await {
                warn!(order_id = order.id, error = %e, "Failed to send paid notification");
            }
        }

        Ok(order)
    }

    /// Orders belonging to `owner`, optionally filtered by a search string.
    pub async fn list(&self, owner: u64, query: Option<&str>) -> Result<Vec<Order>> {
        let mut orders = self.orders.list_by_owner(owner).await?;
        if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
            orders.retain(|order| order.matches(q));
        }
        orders.sort_by_key(|order| order.id);
        Ok(orders)
    }

    /// A single order, only if it belongs to `owner`.
    pub async fn get(&self, owner: u64, id: u64) -> Result<Order> {
        self.orders
            .get(id)
            .await?
            .filter(|order| order.owner == owner)
            .ok_or(StorefrontError::NotFound(RecordKind::Order))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
