use crate::domain::order::{NewOrder, Order};
use crate::domain::ports::{OrderRepository, PromoRepository};
use crate::domain::promo::{NewPromo, Promo};
use crate::error::{Result, StorefrontError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for order records, keyed by big-endian id.
pub const CF_ORDERS: &str = "orders";
/// Column Family for promo records, keyed by big-endian id.
pub const CF_PROMOS: &str = "promos";
/// Transaction reference -> order id.
pub const CF_ORDER_TRANSACTIONS: &str = "order_transactions";
/// Transaction reference -> promo id.
pub const CF_PROMO_TRANSACTIONS: &str = "promo_transactions";

/// A persistent store for orders and promos using RocksDB.
///
/// Each record type lives in its own Column Family, with a second Column
/// Family indexing it by transaction reference. Records are stored as JSON.
///
/// `Clone` shares the underlying `Arc<DB>` and the id allocation lock.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    // Serializes id allocation and index checks across clones.
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at `path` with all column families present.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = [
            CF_ORDERS,
            CF_PROMOS,
            CF_ORDER_TRANSACTIONS,
            CF_PROMO_TRANSACTIONS,
        ]
        .into_iter()
        .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, cfs)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorefrontError::Storage(format!("column family {name} not found")))
    }

    fn next_id(&self, cf_name: &str) -> Result<u64> {
        let cf = self.cf(cf_name)?;
        let mut iter = self.db.iterator_cf(cf, IteratorMode::End);
        match iter.next() {
            Some(item) => {
                let (key, _) = item?;
                Ok(decode_id(&key)? + 1)
            }
            None => Ok(1),
        }
    }

    fn get_record<T: DeserializeOwned>(&self, cf_name: &str, id: u64) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put_record<T: Serialize>(&self, cf_name: &str, id: u64, record: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let value = serde_json::to_vec(record)?;
        self.db.put_cf(cf, id.to_be_bytes(), value)?;
        Ok(())
    }

    fn find_id_by_transaction(&self, index_cf: &str, transaction_id: &str) -> Result<Option<u64>> {
        let cf = self.cf(index_cf)?;
        self.db
            .get_cf(cf, transaction_id.as_bytes())?
            .map(|bytes| decode_id(&bytes))
            .transpose()
    }

    /// Writes a record and its transaction index entry in one batch,
    /// refusing to move a transaction reference from one record to another.
    fn update_record<T: Serialize>(
        &self,
        cf_name: &str,
        index_cf: &str,
        id: u64,
        transaction_id: Option<&str>,
        record: &T,
    ) -> Result<()> {
        let cf = self.cf(cf_name)?;
        if self.db.get_pinned_cf(cf, id.to_be_bytes())?.is_none() {
            return Err(StorefrontError::Storage(format!(
                "record {id} does not exist in {cf_name}"
            )));
        }
        let value = serde_json::to_vec(record)?;

        let mut batch = WriteBatch::default();
        if let Some(tx) = transaction_id {
            match self.find_id_by_transaction(index_cf, tx)? {
                Some(existing) if existing != id => {
                    return Err(StorefrontError::Storage(format!(
                        "transaction {tx} already belongs to record {existing}"
                    )));
                }
                Some(_) => {}
                None => batch.put_cf(self.cf(index_cf)?, tx.as_bytes(), id.to_be_bytes()),
            }
        }
        batch.put_cf(cf, id.to_be_bytes(), value);
        self.db.write(batch)?;
        Ok(())
    }

    fn scan<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }
}

fn decode_id(bytes: &[u8]) -> Result<u64> {
    let array: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StorefrontError::Storage(format!("corrupt id key of {} bytes", bytes.len())))?;
    Ok(u64::from_be_bytes(array))
}

#[async_trait]
impl OrderRepository for RocksDBStore {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        let _lock = self.write_lock.lock().await;
        let id = self.next_id(CF_ORDERS)?;
        let order = Order::from_new(id, order);
        self.put_record(CF_ORDERS, id, &order)?;
        Ok(order)
    }

    async fn get(&self, id: u64) -> Result<Option<Order>> {
        self.get_record(CF_ORDERS, id)
    }

    async fn find_by_transaction(&self, transaction_id: &str) -> Result<Option<Order>> {
        match self.find_id_by_transaction(CF_ORDER_TRANSACTIONS, transaction_id)? {
            Some(id) => self.get_record(CF_ORDERS, id),
            None => Ok(None),
        }
    }

    async fn update(&self, order: Order) -> Result<()> {
        let _lock = self.write_lock.lock().await;
        self.update_record(
            CF_ORDERS,
            CF_ORDER_TRANSACTIONS,
            order.id,
            order.transaction_id.as_deref(),
            &order,
        )
    }

    async fn list_by_owner(&self, owner: u64) -> Result<Vec<Order>> {
        let orders: Vec<Order> = self.scan(CF_ORDERS)?;
        Ok(orders.into_iter().filter(|o| o.owner == owner).collect())
    }

    async fn all(&self) -> Result<Vec<Order>> {
        self.scan(CF_ORDERS)
    }
}

#[async_trait]
impl PromoRepository for RocksDBStore {
    async fn create(&self, promo: NewPromo) -> Result<Promo> {
        let _lock = self.write_lock.lock().await;
        let id = self.next_id(CF_PROMOS)?;
        let promo = Promo::from_new(id, promo);
        self.put_record(CF_PROMOS, id, &promo)?;
        Ok(promo)
    }

    async fn get(&self, id: u64) -> Result<Option<Promo>> {
        self.get_record(CF_PROMOS, id)
    }

    async fn find_by_transaction(&self, transaction_id: &str) -> Result<Option<Promo>> {
        match self.find_id_by_transaction(CF_PROMO_TRANSACTIONS, transaction_id)? {
            Some(id) => self.get_record(CF_PROMOS, id),
            None => Ok(None),
        }
    }

    async fn update(&self, promo: Promo) -> Result<()> {
        let _lock = self.write_lock.lock().await;
        self.update_record(
            CF_PROMOS,
            CF_PROMO_TRANSACTIONS,
            promo.id,
            promo.transaction_id.as_deref(),
            &promo,
        )
    }

    async fn list_by_owner(&self, owner: u64) -> Result<Vec<Promo>> {
        let promos: Vec<Promo> = self.scan(CF_PROMOS)?;
        Ok(promos.into_iter().filter(|p| p.owner == owner).collect())
    }
}
