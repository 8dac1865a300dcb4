//! Storage abstraction traits
//!
//! The loader talks to storage only through these traits: open a
//! transaction, bulk insert record batches, then commit or roll back.

use crate::core::normalize::{NormalizedRecords, RecordCounts};
use crate::domain::{EntityKind, Item, LoadError, Product, Promo, Result, Store, Transaction, Venue};
use async_trait::async_trait;

/// A borrowed slice of records of one entity kind
#[derive(Debug, Clone, Copy)]
pub enum RecordBatch<'a> {
    Venues(&'a [Venue]),
    Stores(&'a [Store]),
    Transactions(&'a [Transaction]),
    Products(&'a [Product]),
    Items(&'a [Item]),
    Promos(&'a [Promo]),
}

impl<'a> RecordBatch<'a> {
    pub fn kind(&self) -> EntityKind {
        match self {
            RecordBatch::Venues(_) => EntityKind::Venue,
            RecordBatch::Stores(_) => EntityKind::Store,
            RecordBatch::Transactions(_) => EntityKind::Transaction,
            RecordBatch::Products(_) => EntityKind::Product,
            RecordBatch::Items(_) => EntityKind::Item,
            RecordBatch::Promos(_) => EntityKind::Promo,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RecordBatch::Venues(rows) => rows.len(),
            RecordBatch::Stores(rows) => rows.len(),
            RecordBatch::Transactions(rows) => rows.len(),
            RecordBatch::Products(rows) => rows.len(),
            RecordBatch::Items(rows) => rows.len(),
            RecordBatch::Promos(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The batch of `kind` taken from a normalized record set
    pub fn of(records: &'a NormalizedRecords, kind: EntityKind) -> Self {
        match kind {
            EntityKind::Venue => RecordBatch::Venues(&records.venues),
            EntityKind::Store => RecordBatch::Stores(&records.stores),
            EntityKind::Transaction => RecordBatch::Transactions(&records.transactions),
            EntityKind::Product => RecordBatch::Products(&records.products),
            EntityKind::Item => RecordBatch::Items(&records.items),
            EntityKind::Promo => RecordBatch::Promos(&records.promos),
        }
    }
}

/// Transactional record storage
///
/// Implementations must enforce the primary and foreign keys of the six
/// tables so that a rejected batch surfaces as a [`LoadError`].
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Short name for logs ("postgresql", "memory")
    fn sink_name(&self) -> &str;

    /// Test the storage connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Create the six tables if they don't exist
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    async fn ensure_schema(&self) -> Result<()>;

    /// Open a new unit of work
    ///
    /// Nothing written through the returned transaction is visible to other
    /// readers until it is committed.
    async fn begin(&self) -> std::result::Result<Box<dyn SinkTransaction>, LoadError>;

    /// Committed row count of every table
    async fn row_counts(&self) -> Result<RecordCounts>;
}

/// An open unit of work on a [`RecordSink`]
///
/// Dropping a transaction without committing discards its writes.
#[async_trait]
pub trait SinkTransaction: Send {
    /// Insert every record of `batch`, returning the number of rows written
    async fn bulk_insert(&mut self, batch: RecordBatch<'_>) -> std::result::Result<u64, LoadError>;

    /// Make all writes of this transaction durable and visible
    async fn commit(self: Box<Self>) -> std::result::Result<(), LoadError>;

    /// Discard all writes of this transaction
    async fn rollback(self: Box<Self>) -> std::result::Result<(), LoadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_of_each_kind() {
        let mut records = NormalizedRecords::default();
        records.venues.push(Venue {
            venue_id: 1,
            venue_name: Some("North".to_string()),
        });

        for kind in EntityKind::LOAD_ORDER {
            let batch = RecordBatch::of(&records, kind);
            assert_eq!(batch.kind(), kind);
        }

        assert_eq!(RecordBatch::of(&records, EntityKind::Venue).len(), 1);
        assert!(RecordBatch::of(&records, EntityKind::Promo).is_empty());
    }
}
