use super::PaymentHandle;
use super::charges::{Payer, build_charge};
use super::locks::TransactionLocks;
use crate::config::Settings;
use crate::domain::ports::{
    ClockRef, GiftcardCatalogBox, NotifierRef, PaymentProcessorRef, PromoRepositoryBox,
};
use crate::domain::promo::{NewPromo, Promo, VoucherCode};
use crate::domain::user::User;
use crate::error::{RecordKind, Result, StorefrontError};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoRequest {
    /// Slug of the gift card being bought.
    #[serde(default)]
    pub giftcard: Option<String>,
    /// Recipient of the voucher; the buyer's own email when absent.
    #[serde(default)]
    pub email_to: Option<String>,
}

/// Gift card voucher issuance and confirmation. Same lifecycle as orders,
/// with a boolean `paid` flag in place of a status.
pub struct PromoService {
    promos: PromoRepositoryBox,
    giftcards: GiftcardCatalogBox,
    payments: PaymentProcessorRef,
    notifier: NotifierRef,
    clock: ClockRef,
    locks: TransactionLocks,
    settings: Settings,
}

impl PromoService {
    pub fn new(
        promos: PromoRepositoryBox,
        giftcards: GiftcardCatalogBox,
        payments: PaymentProcessorRef,
        notifier: NotifierRef,
        clock: ClockRef,
        settings: Settings,
    ) -> Self {
        Self {
            promos,
            giftcards,
            payments,
            notifier,
            clock,
            locks: TransactionLocks::new(),
            settings,
        }
    }

    pub async fn issue(
        &self,
        user: &User,
        request: PromoRequest,
        origin: Option<&str>,
    ) -> Result<PaymentHandle> {
        let slug = request
            .giftcard
            .filter(|slug| !slug.trim().is_empty())
            .ok_or(StorefrontError::MissingGiftcard)?;
        let giftcard = self
            .giftcards
            .find_by_slug(slug.trim())
            .await?
            .ok_or(StorefrontError::GiftcardNotFound)?;

        let code = VoucherCode::generate(
            &self.settings.voucher_prefix,
            self.clock.today(),
            &mut rand::thread_rng(),
        );
        let email_to = request
            .email_to
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| user.email.clone());

        let new_promo = NewPromo::new(user.id, &giftcard, code, email_to, self.clock.now());
        let mut promo = self.promos.create(new_promo).await?;
        info!(promo_id = promo.id, owner = user.id, giftcard = %giftcard.slug, "Created unpaid promo");

        let payer = Payer {
            name: &user.username,
            email: &user.email,
            phone: user.phone.as_deref().unwrap_or_default(),
        };
        let charge = build_charge(
            promo.price,
            &self.settings.currency,
            &payer,
            origin.unwrap_or(&self.settings.site_url),
            format!("Promo Id #{}", promo.id),
            format!("{} PromoId #{}", self.settings.store_name, promo.id),
        )?;

        let intent = self.payments.create_intent(charge).await?;
        promo.transaction_id = Some(intent.id.clone());
        self.promos.update(promo.clone()).await?;
        let client_secret = intent.client_secret.clone().ok_or_else(|| {
            StorefrontError::Payment(format!("intent {} has no client secret", intent.id))
        })?;
        info!(promo_id = promo.id, transaction_id = %intent.id, "Opened charge intent");

        Ok(PaymentHandle {
            id: promo.id,
            transaction_id: intent.id,
            client_secret,
        })
    }

    pub async fn confirm(&self, transaction_id: &str) -> Result<Promo> {
        let _guard = self.locks.acquire(transaction_id).await;

        let intent = self.payments.retrieve_intent(transaction_id).await?;
        if !intent.status.is_settled() {
            info!(transaction_id, status = ?intent.status, "Promo payment not settled");
            return Err(StorefrontError::PaymentNotVerified(RecordKind::Promo));
        }

        let mut promo = self
            .promos
            .find_by_transaction(transaction_id)
            .await?
            .ok_or(StorefrontError::NotFound(RecordKind::Promo))?;

        if promo.mark_paid() {
            self.promos.update(promo.clone()).await?;
            info!(promo_id = promo.id, transaction_id, "Promo paid");
            if let Err(e) = self.notifier.promo_paid(&promo).await {
                warn!(promo_id = promo.id, error = %e, "Failed to send voucher notification");
            }
        }

        Ok(promo)
    }

    pub async fn list(&self, owner: u64, query: Option<&str>) -> Result<Vec<Promo>> {
        let mut promos = self.promos.list_by_owner(owner).await?;
        if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
            promos.retain(|promo| promo.matches(q));
        }
        promos.sort_by_key(|promo| promo.id);
        Ok(promos)
    }

    pub async fn get(&self, owner: u64, id: u64) -> Result<Promo> {
        self.promos
            .get(id)
            .await?
            .filter(|promo| promo.owner == owner)
            .ok_or(StorefrontError::NotFound(RecordKind::Promo))
    }
}
