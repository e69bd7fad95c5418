use crate::domain::order::Order;
use crate::domain::ports::Notifier;
use crate::domain::promo::Promo;
use crate::error::{Result, StorefrontError};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

/// Writes paid notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn order_paid(&self, order: &Order) -> Result<()> {
        info!(
            order_id = order.id,
            email = %order.contact.email,
            total = %order.total,
            "Payment received for order"
        );
        Ok(())
    }

    async fn promo_paid(&self, promo: &Promo) -> Result<()> {
        info!(
            promo_id = promo.id,
            email_to = %promo.email_to,
            code = %promo.code,
            "Voucher ready to send"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaidEvent {
    Order(Order),
    Promo(Promo),
}

/// Forwards paid records to a channel, e.g. for a mail worker.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<PaidEvent>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PaidEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn send(&self, event: PaidEvent) -> Result<()> {
        self.sender
            .send(event)
            .map_err(|_| StorefrontError::InternalError("notification channel closed".into()))
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn order_paid(&self, order: &Order) -> Result<()> {
        self.send(PaidEvent::Order(order.clone()))
    }

    async fn promo_paid(&self, promo: &Promo) -> Result<()> {
        self.send(PaidEvent::Promo(promo.clone()))
    }
}
