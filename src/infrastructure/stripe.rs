//! Payment-intent client for Stripe-compatible HTTP APIs.

use crate::config::PaymentConfig;
use crate::domain::payment::{ChargeIntent, ChargeRequest};
use crate::domain::ports::PaymentProcessor;
use crate::error::{Result, StorefrontError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

/// Talks to `/v1/payment_intents` with form-encoded requests and bearer auth.
#[derive(Debug, Clone)]
pub struct HttpPaymentProcessor {
    config: PaymentConfig,
    http: Client,
}

impl HttpPaymentProcessor {
    pub fn new(config: PaymentConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    async fn parse(response: Response) -> Result<ChargeIntent> {
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            return Err(StorefrontError::Payment(format!(
                "processor responded with {status}: {message}"
            )));
        }
        Ok(response.json().await?)
    }
}

/// Flattens a charge request into the processor's form fields.
///
/// Metadata keys are nested as `metadata[Key]`.
pub fn charge_form(request: &ChargeRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("amount".to_string(), request.amount.to_string()),
        ("currency".to_string(), request.currency.clone()),
        ("description".to_string(), request.description.clone()),
    ];
    if let Some(email) = &request.receipt_email {
        form.push(("receipt_email".to_string(), email.clone()));
    }
    for (key, value) in &request.metadata {
        form.push((format!("metadata[{key}]"), value.clone()));
    }
    form
}

/// Intent ids are interpolated into the URL path, so only plain ids are accepted.
fn validate_intent_id(intent_id: &str) -> Result<()> {
    if intent_id.is_empty()
        || !intent_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(StorefrontError::MalformedPayload(format!(
            "invalid transaction id '{intent_id}'"
        )));
    }
    Ok(())
}

#[async_trait]
impl PaymentProcessor for HttpPaymentProcessor {
    async fn create_intent(&self, request: ChargeRequest) -> Result<ChargeIntent> {
        debug!(amount = request.amount, currency = %request.currency, "Creating payment intent");
        let response = self
            .http
            .post(self.url("/v1/payment_intents"))
            .bearer_auth(&self.config.secret_key)
            .form(&charge_form(&request))
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn retrieve_intent(&self, intent_id: &str) -> Result<ChargeIntent> {
        validate_intent_id(intent_id)?;
        let response = self
            .http
            .get(self.url(&format!("/v1/payment_intents/{intent_id}")))
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;
        Self::parse(response).await
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
