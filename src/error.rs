use thiserror::Error;

/// Which kind of record a confirmation was attempted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Order,
    Promo,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Order => f.write_str("order"),
            RecordKind::Promo => f.write_str("promo"),
        }
    }
}

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Please add cart items to body")]
    MissingCart,
    #[error("None of the cart items could be found")]
    EmptyCart,
    #[error("Quantity for '{0}' must be at least 1")]
    InvalidQuantity(String),
    #[error("Please add a shipping address to body")]
    MissingAddress,
    #[error("Please add a giftcard to body")]
    MissingGiftcard,
    #[error("Giftcard is not found")]
    GiftcardNotFound,
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    #[error("Missing or invalid credentials")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(RecordKind),
    #[error("It seems like the {0} wasn't verified, please contact support")]
    PaymentNotVerified(RecordKind),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Payment processor error: {0}")]
    Payment(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl StorefrontError {
    /// True for errors caused by the caller's input rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StorefrontError::MissingCart
                | StorefrontError::EmptyCart
                | StorefrontError::InvalidQuantity(_)
                | StorefrontError::MissingAddress
                | StorefrontError::MissingGiftcard
                | StorefrontError::GiftcardNotFound
                | StorefrontError::MalformedPayload(_)
                | StorefrontError::Unauthorized
                | StorefrontError::NotFound(_)
                | StorefrontError::PaymentNotVerified(_)
        )
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for StorefrontError {
    fn from(err: rocksdb::Error) -> Self {
        StorefrontError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for StorefrontError {
    fn from(err: reqwest::Error) -> Self {
        StorefrontError::Payment(err.to_string())
    }
}

impl From<serde_json::Error> for StorefrontError {
    fn from(err: serde_json::Error) -> Self {
        StorefrontError::InternalError(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
