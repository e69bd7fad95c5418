use serde::{Deserialize, Serialize};

/// The authenticated customer making a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}
