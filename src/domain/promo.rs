use super::catalog::Giftcard;
use super::money::Price;
use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

/// Length of the random part of a voucher code.
pub const VOUCHER_RANDOM_LEN: usize = 6;

/// A redemption code issued for a gift card purchase.
///
/// Always has the shape `<prefix><6 alphanumeric>-<ddmmyyyy>`, where the date
/// is the day the code was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoucherCode(String);

impl VoucherCode {
    pub fn generate<R: Rng + ?Sized>(prefix: &str, issued_on: NaiveDate, rng: &mut R) -> Self {
        let random: String = rng
            .sample_iter(&Alphanumeric)
            .take(VOUCHER_RANDOM_LEN)
            .map(char::from)
            .collect();
        Self(format!(
            "{prefix}{random}-{}",
            issued_on.format("%d%m%Y")
        ))
    }

    /// Checks that `code` has the voucher shape for `prefix` and returns the issue date.
    pub fn issue_date(code: &str, prefix: &str) -> Option<NaiveDate> {
        let rest = code.strip_prefix(prefix)?;
        let (random, date) = rest.split_once('-')?;
        if random.len() != VOUCHER_RANDOM_LEN
            || !random.chars().all(|c| c.is_ascii_alphanumeric())
            || date.len() != 8
            || !date.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }
        NaiveDate::parse_from_str(date, "%d%m%Y").ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoucherCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A promo that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPromo {
    pub owner: u64,
    pub giftcard_id: u64,
    pub code: VoucherCode,
    pub price: Price,
    pub email_to: String,
    pub created_at: DateTime<Utc>,
}

impl NewPromo {
    pub fn new(
        owner: u64,
        giftcard: &Giftcard,
        code: VoucherCode,
        email_to: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            owner,
            giftcard_id: giftcard.id,
            code,
            price: giftcard.price,
            email_to,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promo {
    pub id: u64,
    pub owner: u64,
    pub giftcard_id: u64,
    pub code: VoucherCode,
    pub price: Price,
    pub email_to: String,
    pub transaction_id: Option<String>,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}

impl Promo {
    pub fn from_new(id: u64, new: NewPromo) -> Self {
        Self {
            id,
            owner: new.owner,
            giftcard_id: new.giftcard_id,
            code: new.code,
            price: new.price,
            email_to: new.email_to,
            transaction_id: None,
            paid: false,
            created_at: new.created_at,
        }
    }

    /// Sets the paid flag. Returns false if the promo was already paid.
    pub fn mark_paid(&mut self) -> bool {
        !std::mem::replace(&mut self.paid, true)
    }

    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.code.as_str().to_lowercase().contains(&needle)
            || self.email_to.to_lowercase().contains(&needle)
            || self
                .transaction_id
                .as_deref()
                .is_some_and(|tx| tx.to_lowercase().contains(&needle))
    }
}
