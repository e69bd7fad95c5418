use crate::domain::catalog::{Giftcard, Product};
use crate::domain::user::User;
use crate::error::Result;
use crate::infrastructure::in_memory::{
    InMemoryGiftcardCatalog, InMemoryProductCatalog, InMemoryUserDirectory,
};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A user entry in the seed file together with the token that identifies it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedUser {
    pub token: String,
    #[serde(flatten)]
    pub user: User,
}

/// Catalog and account data loaded at startup.
///
/// ```json
/// {
///   "products":  [{ "id": 1, "slug": "ghee", "name": "Ghee 1L", "price": "650.00" }],
///   "giftcards": [{ "id": 1, "slug": "gold", "name": "Gold", "price": "1000" }],
///   "users":     [{ "token": "t0k3n", "id": 1, "username": "asha", "email": "a@x.in" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub giftcards: Vec<Giftcard>,
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

impl Seed {
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        Ok(serde_json::from_reader(BufReader::new(source))?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn product_catalog(&self) -> InMemoryProductCatalog {
        InMemoryProductCatalog::with_products(self.products.clone())
    }

    pub fn giftcard_catalog(&self) -> InMemoryGiftcardCatalog {
        InMemoryGiftcardCatalog::with_giftcards(self.giftcards.clone())
    }

    pub fn user_directory(&self) -> InMemoryUserDirectory {
        InMemoryUserDirectory::with_users(
            self.users
                .iter()
                .map(|entry| (entry.token.clone(), entry.user.clone())),
        )
    }
}
