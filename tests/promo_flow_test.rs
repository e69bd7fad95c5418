mod common;

use common::{Harness, VOUCHER_PREFIX, asha, issue_date};
use rust_decimal_macros::dec;
use storefront::application::promos::PromoRequest;
use storefront::domain::money::Price;
use storefront::domain::payment::SettlementStatus;
use storefront::domain::ports::PromoRepository;
use storefront::domain::promo::VoucherCode;
use storefront::error::{RecordKind, StorefrontError};
use storefront::infrastructure::notifier::PaidEvent;

fn request(giftcard: &str, email_to: Option<&str>) -> PromoRequest {
    PromoRequest {
        giftcard: Some(giftcard.to_string()),
        email_to: email_to.map(str::to_string),
    }
}

#[tokio::test]
async fn test_issue_generates_dated_voucher() {
    let harness = Harness::new();
    let handle = harness
        .state
        .promos
        .issue(&asha(), request("gold", Some("friend@example.com")), Some("https://gift.example"))
        .await
        .unwrap();

    let promo = harness.promos.get(handle.id).await.unwrap().unwrap();
    assert!(!promo.paid);
    assert_eq!(promo.price, Price::new(dec!(1000)));
    assert_eq!(promo.giftcard_id, 10);
    assert_eq!(promo.email_to, "friend@example.com");
    assert_eq!(
        VoucherCode::issue_date(promo.code.as_str(), VOUCHER_PREFIX),
        Some(issue_date())
    );
    assert!(promo.code.as_str().ends_with("-09032024"));

    let charge = &harness.payments.requests().await[0];
    assert_eq!(charge.amount, 100_000);
    assert_eq!(charge.metadata["Order_Id"], format!("Promo Id #{}", handle.id));
    assert_eq!(charge.metadata["Site_Url"], "https://gift.example");
    assert_eq!(charge.description, format!("Shop PromoId #{}", handle.id));
}

#[tokio::test]
async fn test_recipient_defaults_to_buyer() {
    let harness = Harness::new();
    let handle = harness
        .state
        .promos
        .issue(&asha(), request("gold", None), None)
        .await
        .unwrap();

    let promo = harness.promos.get(handle.id).await.unwrap().unwrap();
    assert_eq!(promo.email_to, asha().email);
}

#[tokio::test]
async fn test_issue_rejects_missing_or_unknown_giftcard() {
    let harness = Harness::new();
    let promos = &harness.state.promos;

    let err = promos
        .issue(&asha(), PromoRequest::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::MissingGiftcard));

    let err = promos
        .issue(&asha(), request("platinum", None), None)
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::GiftcardNotFound));
    assert!(harness.payments.requests().await.is_empty());
}

#[tokio::test]
async fn test_confirm_flips_paid_only_when_settled() {
    let mut harness = Harness::new();
    let handle = harness
        .state
        .promos
        .issue(&asha(), request("gold", None), None)
        .await
        .unwrap();

    harness
        .payments
        .set_status(&handle.transaction_id, SettlementStatus::Processing)
        .await
        .unwrap();
    let err = harness
        .state
        .promos
        .confirm(&handle.transaction_id)
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::PaymentNotVerified(RecordKind::Promo)));
    assert!(!harness.promos.get(handle.id).await.unwrap().unwrap().paid);

    harness
        .payments
        .set_status(&handle.transaction_id, SettlementStatus::Succeeded)
        .await
        .unwrap();
    let promo = harness
        .state
        .promos
        .confirm(&handle.transaction_id)
        .await
        .unwrap();
    assert!(promo.paid);

    // confirming again is a no-op
    harness
        .state
        .promos
        .confirm(&handle.transaction_id)
        .await
        .unwrap();
    let events = harness.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], PaidEvent::Promo(p) if p.code == promo.code));
}
