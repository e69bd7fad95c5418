use crate::domain::catalog::{Giftcard, Product};
use crate::domain::order::{NewOrder, Order};
use crate::domain::payment::{ChargeIntent, ChargeRequest, SettlementStatus};
use crate::domain::ports::{
    GiftcardCatalog, OrderRepository, PaymentProcessor, ProductCatalog, PromoRepository,
    UserDirectory,
};
use crate::domain::promo::{NewPromo, Promo};
use crate::domain::user::User;
use crate::error::{Result, StorefrontError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Rows keyed by id plus an index from transaction reference to id.
#[derive(Debug)]
struct Table<T> {
    next_id: u64,
    rows: HashMap<u64, T>,
    by_transaction: HashMap<String, u64>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: HashMap::new(),
            by_transaction: HashMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn put(&mut self, id: u64, row: T, transaction_id: Option<&str>) -> Result<()> {
        if let Some(tx) = transaction_id {
            match self.by_transaction.get(tx) {
                Some(existing) if *existing != id => {
                    return Err(StorefrontError::Storage(format!(
                        "transaction {tx} already belongs to record {existing}"
                    )));
                }
                _ => {
                    self.by_transaction.insert(tx.to_string(), id);
                }
            }
        }
        self.rows.insert(id, row);
        Ok(())
    }

    fn find_by_transaction(&self, transaction_id: &str) -> Option<T> {
        self.by_transaction
            .get(transaction_id)
            .and_then(|id| self.rows.get(id))
            .cloned()
    }
}

/// A thread-safe in-memory order store.
///
/// Clones share the same underlying table.
#[derive(Default, Clone)]
pub struct InMemoryOrderRepository {
    table: Arc<RwLock<Table<Order>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        let mut table = self.table.write().await;
        let id = table.allocate_id();
        let order = Order::from_new(id, order);
        table.put(id, order.clone(), None)?;
        Ok(order)
    }

    async fn get(&self, id: u64) -> Result<Option<Order>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_transaction(&self, transaction_id: &str) -> Result<Option<Order>> {
        let table = self.table.read().await;
        Ok(table.find_by_transaction(transaction_id))
    }

    async fn update(&self, order: Order) -> Result<()> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&order.id) {
            return Err(StorefrontError::Storage(format!(
                "order {} does not exist",
                order.id
            )));
        }
        let tx = order.transaction_id.clone();
        table.put(order.id, order, tx.as_deref())
    }

    async fn list_by_owner(&self, owner: u64) -> Result<Vec<Order>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|order| order.owner == owner)
            .cloned()
            .collect())
    }

    async fn all(&self) -> Result<Vec<Order>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }
}

/// A thread-safe in-memory promo store.
#[derive(Default, Clone)]
pub struct InMemoryPromoRepository {
    table: Arc<RwLock<Table<Promo>>>,
}

impl InMemoryPromoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PromoRepository for InMemoryPromoRepository {
    async fn create(&self, promo: NewPromo) -> Result<Promo> {
        let mut table = self.table.write().await;
        let id = table.allocate_id();
        let promo = Promo::from_new(id, promo);
        table.put(id, promo.clone(), None)?;
        Ok(promo)
    }

    async fn get(&self, id: u64) -> Result<Option<Promo>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_transaction(&self, transaction_id: &str) -> Result<Option<Promo>> {
        let table = self.table.read().await;
        Ok(table.find_by_transaction(transaction_id))
    }

    async fn update(&self, promo: Promo) -> Result<()> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&promo.id) {
            return Err(StorefrontError::Storage(format!(
                "promo {} does not exist",
                promo.id
            )));
        }
        let tx = promo.transaction_id.clone();
        table.put(promo.id, promo, tx.as_deref())
    }

    async fn list_by_owner(&self, owner: u64) -> Result<Vec<Promo>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|promo| promo.owner == owner)
            .cloned()
            .collect())
    }
}

/// Products keyed by slug.
#[derive(Default, Clone)]
pub struct InMemoryProductCatalog {
    products: Arc<HashMap<String, Product>>,
}

impl InMemoryProductCatalog {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(products.into_iter().map(|p| (p.slug.clone(), p)).collect()),
        }
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>> {
        Ok(self.products.get(slug).cloned())
    }
}

/// Gift cards keyed by slug.
#[derive(Default, Clone)]
pub struct InMemoryGiftcardCatalog {
    giftcards: Arc<HashMap<String, Giftcard>>,
}

impl InMemoryGiftcardCatalog {
    pub fn with_giftcards(giftcards: Vec<Giftcard>) -> Self {
        Self {
            giftcards: Arc::new(giftcards.into_iter().map(|g| (g.slug.clone(), g)).collect()),
        }
    }
}

#[async_trait]
impl GiftcardCatalog for InMemoryGiftcardCatalog {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Giftcard>> {
        Ok(self.giftcards.get(slug).cloned())
    }
}

/// Users keyed by their API token.
#[derive(Default, Clone)]
pub struct InMemoryUserDirectory {
    users: Arc<HashMap<String, User>>,
}

impl InMemoryUserDirectory {
    pub fn with_users(users: impl IntoIterator<Item = (String, User)>) -> Self {
        Self {
            users: Arc::new(users.into_iter().collect()),
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_token(&self, token: &str) -> Result<Option<User>> {
        Ok(self.users.get(token).cloned())
    }
}

/// A payment processor that keeps intents in memory.
///
/// New intents start in `requires_payment_method`; tests move them along
/// with [`InMemoryPaymentProcessor::set_status`].
#[derive(Default, Clone)]
pub struct InMemoryPaymentProcessor {
    intents: Arc<RwLock<HashMap<String, ChargeIntent>>>,
    requests: Arc<RwLock<Vec<ChargeRequest>>>,
}

impl InMemoryPaymentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_status(&self, intent_id: &str, status: SettlementStatus) -> Result<()> {
        let mut intents = self.intents.write().await;
        let intent = intents
            .get_mut(intent_id)
            .ok_or_else(|| StorefrontError::Payment(format!("No such payment_intent: '{intent_id}'")))?;
        intent.status = status;
        Ok(())
    }

    /// Every charge request received so far, oldest first.
    pub async fn requests(&self) -> Vec<ChargeRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl PaymentProcessor for InMemoryPaymentProcessor {
    async fn create_intent(&self, request: ChargeRequest) -> Result<ChargeIntent> {
        let mut intents = self.intents.write().await;
        let id = format!("pi_{}", intents.len() + 1);
        let intent = ChargeIntent {
            id: id.clone(),
            client_secret: Some(format!("{id}_secret")),
            status: SettlementStatus::RequiresPaymentMethod,
            amount: request.amount,
        };
        intents.insert(id, intent.clone());
        self.requests.write().await.push(request);
        Ok(intent)
    }

    async fn retrieve_intent(&self, intent_id: &str) -> Result<ChargeIntent> {
        let intents = self.intents.read().await;
        intents
            .get(intent_id)
            .cloned()
            .ok_or_else(|| StorefrontError::Payment(format!("No such payment_intent: '{intent_id}'")))
    }
}
