//! Runtime settings shared by the services and the HTTP layer.
//!
//! The binary fills these from command-line flags and environment variables
//! (see `main.rs`); library users and tests construct them directly.

use std::net::SocketAddr;

pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_CURRENCY: &str = "inr";
pub const DEFAULT_STORE_NAME: &str = "Storefront";
pub const DEFAULT_VOUCHER_PREFIX: &str = "storefront-";
pub const DEFAULT_PAYMENT_API_BASE: &str = "https://api.stripe.com";

/// Settings consumed by the checkout services.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// ISO currency code sent with every charge request.
    pub currency: String,
    /// Reported as `Site_Url` when the request carries no `Origin` header.
    pub site_url: String,
    /// Prefix of charge descriptions, e.g. `"<store> OrderId #12"`.
    pub store_name: String,
    pub voucher_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            store_name: DEFAULT_STORE_NAME.to_string(),
            voucher_prefix: DEFAULT_VOUCHER_PREFIX.to_string(),
        }
    }
}

/// Connection details for the payment processor's HTTP API.
#[derive(Clone, PartialEq)]
pub struct PaymentConfig {
    pub api_base: String,
    pub secret_key: String,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("api_base", &self.api_base)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub settings: Settings,
    pub payment: PaymentConfig,
}
