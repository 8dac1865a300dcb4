//! In-memory record sink
//!
//! Keeps the six tables in process memory with the same primary key,
//! foreign key and NOT NULL rules as the PostgreSQL schema. A transaction
//! works on a private copy of the committed tables and swaps it in on commit,
//! so uncommitted writes are never visible.
//!
//! Failures can be injected per entity kind or at commit time, which makes
//! this sink the workhorse of the loader's atomicity tests.

use crate::adapters::database::traits::{RecordBatch, RecordSink, SinkTransaction};
use crate::core::normalize::RecordCounts;
use crate::domain::{
    EntityKind, Item, ItemKey, LoadError, Product, Promo, Result, Store, Transaction, Venue,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Committed contents of the six tables
#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    pub venues: BTreeMap<i64, Venue>,
    pub stores: BTreeMap<i64, Store>,
    pub transactions: BTreeMap<i64, Transaction>,
    pub products: BTreeMap<i64, Product>,
    pub items: BTreeMap<ItemKey, Item>,
    /// `(surrogate id, promo)` in insertion order
    pub promos: Vec<(i64, Promo)>,
    next_promo_id: i64,
}

impl MemoryTables {
    pub fn counts(&self) -> RecordCounts {
        RecordCounts {
            venues: self.venues.len(),
            stores: self.stores.len(),
            transactions: self.transactions.len(),
            products: self.products.len(),
            items: self.items.len(),
            promos: self.promos.len(),
        }
    }

    fn insert(&mut self, batch: RecordBatch<'_>) -> std::result::Result<u64, String> {
        match batch {
            RecordBatch::Venues(rows) => {
                for row in rows {
                    require(&row.venue_name, "venue_name")?;
                    fits(&row.venue_name, 255)?;
                    unique(&self.venues, &row.venue_id, "venues_pkey")?;
                    self.venues.insert(row.venue_id, row.clone());
                }
            }
            RecordBatch::Stores(rows) => {
                for row in rows {
                    require(&row.store_name, "store_name")?;
                    fits(&row.store_name, 255)?;
                    unique(&self.stores, &row.store_id, "stores_pkey")?;
                    references(&self.venues, &row.venue_id, "stores_venue_id_fkey")?;
                    self.stores.insert(row.store_id, row.clone());
                }
            }
            RecordBatch::Transactions(rows) => {
                for row in rows {
                    require(&row.transaction_type, "transaction_type")?;
                    fits(&row.transaction_type, 50)?;
                    fits(&row.operator_number, 50)?;
                    fits(&row.operator_name, 255)?;
                    fits(&row.till_name, 255)?;
                    unique(&self.transactions, &row.transaction_id, "transactions_pkey")?;
                    references(&self.stores, &row.store_id, "transactions_store_id_fkey")?;
                    self.transactions.insert(row.transaction_id, row.clone());
                }
            }
            RecordBatch::Products(rows) => {
                for row in rows {
                    require(&row.product_name, "product_name")?;
                    fits(&row.product_name, 255)?;
                    fits(&row.category, 255)?;
                    fits(&row.category_group, 255)?;
                    fits(&row.size, 100)?;
                    fits(&row.size_unit, 50)?;
                    fits(&row.barcode, 100)?;
                    fits(&row.base, 50)?;
                    fits(&row.base_unit, 50)?;
                    unique(&self.products, &row.product_id, "products_pkey")?;
                    self.products.insert(row.product_id, row.clone());
                }
            }
            RecordBatch::Items(rows) => {
                for row in rows {
                    unique(&self.items, &row.key(), "items_pkey")?;
                    references(
                        &self.transactions,
                        &row.transaction_id,
                        "items_transaction_id_fkey",
                    )?;
                    references(&self.products, &row.product_id, "items_product_id_fkey")?;
                    self.items.insert(row.key(), row.clone());
                }
            }
            RecordBatch::Promos(rows) => {
                for row in rows {
                    references(&self.items, &row.item_key(), "promos_item_fkey")?;
                    fits(&row.promo_name, 255)?;
                    fits(&row.totaliser_name, 255)?;
                    self.next_promo_id += 1;
                    self.promos.push((self.next_promo_id, row.clone()));
                }
            }
        }
        Ok(batch.len() as u64)
    }
}

fn require(value: &Option<String>, column: &str) -> std::result::Result<(), String> {
    match value {
        Some(_) => Ok(()),
        None => Err(format!(
            "null value in column \"{column}\" violates not-null constraint"
        )),
    }
}

/// VARCHAR(n) bound, counted in characters
fn fits(value: &Option<String>, max: usize) -> std::result::Result<(), String> {
    match value {
        Some(v) if v.chars().count() > max => Err(format!(
            "value too long for type character varying({max})"
        )),
        _ => Ok(()),
    }
}

fn unique<K: Ord, V>(
    table: &BTreeMap<K, V>,
    key: &K,
    constraint: &str,
) -> std::result::Result<(), String> {
    if table.contains_key(key) {
        Err(format!(
            "duplicate key value violates unique constraint \"{constraint}\""
        ))
    } else {
        Ok(())
    }
}

fn references<K: Ord, V>(
    table: &BTreeMap<K, V>,
    key: &K,
    constraint: &str,
) -> std::result::Result<(), String> {
    if table.contains_key(key) {
        Ok(())
    } else {
        Err(format!(
            "insert violates foreign key constraint \"{constraint}\""
        ))
    }
}

#[derive(Debug, Default)]
struct Shared {
    tables: MemoryTables,
    version: u64,
}

/// Process-local transactional sink
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    shared: Arc<Mutex<Shared>>,
    fail_on: Option<EntityKind>,
    fail_commit: bool,
    begun: Arc<AtomicUsize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every bulk insert of `kind`
    pub fn with_failure_on(mut self, kind: EntityKind) -> Self {
        self.fail_on = Some(kind);
        self
    }

    /// Reject every commit
    pub fn with_commit_failure(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    /// Copy of the committed tables
    pub fn snapshot(&self) -> MemoryTables {
        lock(&self.shared).tables.clone()
    }

    /// Number of transactions opened so far
    pub fn transactions_begun(&self) -> usize {
        self.begun.load(Ordering::SeqCst)
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl RecordSink for MemorySink {
    fn sink_name(&self) -> &str {
        "memory"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn begin(&self) -> std::result::Result<Box<dyn SinkTransaction>, LoadError> {
        self.begun.fetch_add(1, Ordering::SeqCst);
        let (staged, base_version) = {
            let shared = lock(&self.shared);
            (shared.tables.clone(), shared.version)
        };

        Ok(Box::new(MemoryTransaction {
            shared: Arc::clone(&self.shared),
            base_version,
            staged,
            fail_on: self.fail_on,
            fail_commit: self.fail_commit,
        }))
    }

    async fn row_counts(&self) -> Result<RecordCounts> {
        Ok(lock(&self.shared).tables.counts())
    }
}

struct MemoryTransaction {
    shared: Arc<Mutex<Shared>>,
    base_version: u64,
    staged: MemoryTables,
    fail_on: Option<EntityKind>,
    fail_commit: bool,
}

#[async_trait]
impl SinkTransaction for MemoryTransaction {
    async fn bulk_insert(&mut self, batch: RecordBatch<'_>) -> std::result::Result<u64, LoadError> {
        let table = batch.kind().table_name();
        if self.fail_on == Some(batch.kind()) {
            return Err(LoadError::InsertFailed {
                table,
                message: "injected failure".to_string(),
            });
        }

        // a failed statement leaves the staged tables untouched
        let mut working = self.staged.clone();
        let written = working
            .insert(batch)
            .map_err(|message| LoadError::InsertFailed { table, message })?;
        self.staged = working;
        Ok(written)
    }

    async fn commit(self: Box<Self>) -> std::result::Result<(), LoadError> {
        let MemoryTransaction {
            shared,
            base_version,
            staged,
            fail_commit,
            ..
        } = *self;

        if fail_commit {
            return Err(LoadError::CommitFailed("injected failure".to_string()));
        }

        let mut committed = lock(&shared);
        if committed.version != base_version {
            return Err(LoadError::CommitFailed(
                "tables changed by a concurrent commit".to_string(),
            ));
        }
        committed.tables = staged;
        committed.version += 1;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> std::result::Result<(), LoadError> {
        Ok(())
    }
}
