use crate::domain::money::Price;
use crate::domain::payment::ChargeRequest;
use crate::error::Result;
use std::collections::BTreeMap;

/// Who is paying, as reported to the processor for reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Payer<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
}

/// Builds the charge request sent for an order or promo.
///
/// `reference` ends up in the `Order_Id` metadata field and `description` is
/// shown on the processor dashboard.
pub fn build_charge(
    amount: Price,
    currency: &str,
    payer: &Payer<'_>,
    site_url: &str,
    reference: String,
    description: String,
) -> Result<ChargeRequest> {
    let mut metadata = BTreeMap::new();
    metadata.insert("Customer_Name".to_string(), payer.name.to_string());
    metadata.insert("Customer_Email".to_string(), payer.email.to_string());
    metadata.insert("User_Phone".to_string(), payer.phone.to_string());
    metadata.insert("Site_Url".to_string(), site_url.to_string());
    metadata.insert("Order_Id".to_string(), reference);

    Ok(ChargeRequest {
        amount: amount.to_minor_units()?,
        currency: currency.to_string(),
        metadata,
        receipt_email: Some(payer.email.to_string()).filter(|e| !e.is_empty()),
        description,
    })
}
