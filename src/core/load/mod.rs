//! Bulk loader
//!
//! Persists a [`NormalizedRecords`] set as one unit of work: every batch is
//! inserted inside a single sink transaction in parent-before-child order,
//! and any failure rolls the whole unit back.

use crate::adapters::database::traits::{RecordBatch, RecordSink, SinkTransaction};
use crate::core::normalize::{NormalizedRecords, RecordCounts};
use crate::domain::{EntityKind, LoadError};
use std::sync::Arc;

/// Writes normalized records to a [`RecordSink`]
///
/// The loader never retries. A failed load leaves storage as it was before
/// the call.
pub struct BulkLoader {
    sink: Arc<dyn RecordSink>,
}

impl BulkLoader {
    pub fn new(sink: Arc<dyn RecordSink>) -> Self {
        Self { sink }
    }

    /// Insert all six record sequences and commit them together
    ///
    /// Returns the number of rows written per entity kind.
    ///
    /// # Errors
    ///
    /// Returns the first [`LoadError`] raised by the sink. The transaction is
    /// rolled back before returning.
    pub async fn load(&self, records: &NormalizedRecords) -> Result<RecordCounts, LoadError> {
        let mut tx = self.sink.begin().await?;

        match insert_all(tx.as_mut(), records).await {
            Ok(counts) => {
                tx.commit().await?;
                tracing::debug!(sink = self.sink.sink_name(), %counts, "Load committed");
                Ok(counts)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(
                        error = %rollback_err,
                        cause = %e,
                        "Rollback failed after load error"
                    );
                }
                Err(e)
            }
        }
    }
}

async fn insert_all(
    tx: &mut dyn SinkTransaction,
    records: &NormalizedRecords,
) -> Result<RecordCounts, LoadError> {
    let mut counts = RecordCounts::default();

    for kind in EntityKind::LOAD_ORDER {
        let batch = RecordBatch::of(records, kind);
        if batch.is_empty() {
            continue;
        }

        let written = tx.bulk_insert(batch).await?;
        counts.set(kind, usize::try_from(written).unwrap_or(batch.len()));
        tracing::debug!(entity = %kind, rows = written, "Batch inserted");
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemorySink;
    use crate::domain::{Item, Product, Promo, Store, Venue};

    fn records() -> NormalizedRecords {
        NormalizedRecords {
            venues: vec![Venue {
                venue_id: 1,
                venue_name: Some("North".to_string()),
            }],
            stores: vec![Store {
                store_id: 10,
                store_name: Some("Bar".to_string()),
                venue_id: 1,
            }],
            transactions: vec![],
            products: vec![Product {
                product_id: 7,
                product_name: Some("Lager".to_string()),
                category_id: None,
                category: None,
                category_group_id: None,
                category_group: None,
                active: true,
                price: Some(5.5),
                product_cost: None,
                size: None,
                size_volume: None,
                size_unit: None,
                barcode: None,
                base: None,
                base_volume: None,
                base_unit: None,
            }],
            items: Vec::<Item>::new(),
            promos: Vec::<Promo>::new(),
        }
    }

    #[tokio::test]
    async fn test_load_skips_empty_batches() {
        let sink = Arc::new(MemorySink::new());
        let loader = BulkLoader::new(sink.clone());

        let counts = loader.load(&records()).await.unwrap();

        assert_eq!(counts.venues, 1);
        assert_eq!(counts.stores, 1);
        assert_eq!(counts.transactions, 0);
        assert_eq!(counts.products, 1);
        assert_eq!(sink.row_counts().await.unwrap(), counts);
    }

    #[tokio::test]
    async fn test_failure_rolls_back_earlier_batches() {
        let sink = Arc::new(MemorySink::new().with_failure_on(EntityKind::Product));
        let loader = BulkLoader::new(sink.clone());

        let err = loader.load(&records()).await.unwrap_err();

        assert!(matches!(err, LoadError::InsertFailed { table: "products", .. }));
        assert_eq!(sink.row_counts().await.unwrap().total(), 0);
    }

    #[tokio::test]
    async fn test_commit_failure_persists_nothing() {
        let sink = Arc::new(MemorySink::new().with_commit_failure());
        let loader = BulkLoader::new(sink.clone());

        let err = loader.load(&records()).await.unwrap_err();

        assert!(matches!(err, LoadError::CommitFailed(_)));
        assert_eq!(sink.row_counts().await.unwrap().total(), 0);
    }

    #[tokio::test]
    async fn test_empty_record_set_commits_nothing() {
        let sink = Arc::new(MemorySink::new());
        let loader = BulkLoader::new(sink.clone());

        let counts = loader.load(&NormalizedRecords::default()).await.unwrap();

        assert_eq!(counts.total(), 0);
        assert_eq!(sink.transactions_begun(), 1);
    }
}
