//! Record normalization
//!
//! Walks the nested export depth-first in document order
//! (venue → stores → transactions → items → product and promos) and emits
//! six flat record sequences. Venues, stores, transactions, products and
//! items are kept on first sighting only; promos are emitted once per source
//! occurrence.
//!
//! # Example
//!
//! ```
//! use posload::core::normalize::{normalize, SourceDocument};
//!
//! let doc = SourceDocument::from_slice(br#"[
//!     {"VenueID": 1, "VenueName": "North", "Stores": [
//!         {"StoreID": 10, "StoreName": "Bar"},
//!         {"StoreID": 10, "StoreName": "Bar (again)"}
//!     ]}
//! ]"#).unwrap();
//!
//! let records = normalize(&doc).unwrap();
//! assert_eq!(records.stores.len(), 1);
//! assert_eq!(records.stores[0].store_name.as_deref(), Some("Bar"));
//! ```

pub mod coerce;
pub mod dedup;
pub mod source;

pub use dedup::{DedupIndex, IdentityKey};
pub use source::SourceDocument;

use crate::domain::{
    CoercionError, EntityKind, Item, ItemKey, Product, Promo, Store, Transaction, Venue,
};
use serde::Serialize;
use source::{RawItem, RawStore, RawTransaction, RawVenue};
use std::fmt;

/// The six normalized record sequences, each in first-occurrence order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecords {
    pub venues: Vec<Venue>,
    pub stores: Vec<Store>,
    pub transactions: Vec<Transaction>,
    pub products: Vec<Product>,
    pub items: Vec<Item>,
    pub promos: Vec<Promo>,
}

impl NormalizedRecords {
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

    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }
}

/// Row counts per entity kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub venues: usize,
    pub stores: usize,
    pub transactions: usize,
    pub products: usize,
    pub items: usize,
    pub promos: usize,
}

impl RecordCounts {
    pub fn get(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Venue => self.venues,
            EntityKind::Store => self.stores,
            EntityKind::Transaction => self.transactions,
            EntityKind::Product => self.products,
            EntityKind::Item => self.items,
            EntityKind::Promo => self.promos,
        }
    }

    pub fn set(&mut self, kind: EntityKind, count: usize) {
        let slot = match kind {
            EntityKind::Venue => &mut self.venues,
            EntityKind::Store => &mut self.stores,
            EntityKind::Transaction => &mut self.transactions,
            EntityKind::Product => &mut self.products,
            EntityKind::Item => &mut self.items,
            EntityKind::Promo => &mut self.promos,
        };
        *slot = count;
    }

    pub fn total(&self) -> usize {
        EntityKind::LOAD_ORDER.iter().map(|k| self.get(*k)).sum()
    }
}

impl fmt::Display for RecordCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} venues, {} stores, {} transactions, {} products, {} items, {} promos",
            self.venues, self.stores, self.transactions, self.products, self.items, self.promos
        )
    }
}

/// Normalize a parsed export document
///
/// # Errors
///
/// Fails on the first record whose fields cannot be coerced (bad or missing
/// `DateTimeUTC`, item without a product reference). Nothing is returned in
/// that case.
pub fn normalize(document: &SourceDocument) -> Result<NormalizedRecords, CoercionError> {
    let mut normalizer = Normalizer::default();
    for venue in &document.venues {
        normalizer.visit_venue(venue)?;
    }

    tracing::debug!(
        venues_seen = document.venues.len(),
        distinct_items = normalizer.index.distinct(EntityKind::Item),
        "Normalization finished"
    );

    Ok(normalizer.records)
}

#[derive(Default)]
struct Normalizer {
    index: DedupIndex,
    records: NormalizedRecords,
}

impl Normalizer {
    fn visit_venue(&mut self, venue: &RawVenue) -> Result<(), CoercionError> {
        if !self.index.seen_and_mark(IdentityKey::Venue(venue.venue_id)) {
            self.records.venues.push(coerce::venue_record(venue));
        }

        for store in venue.stores.iter().flatten() {
            self.visit_store(store, venue.venue_id)?;
        }
        Ok(())
    }

    fn visit_store(&mut self, store: &RawStore, venue_id: i64) -> Result<(), CoercionError> {
        if !self.index.seen_and_mark(IdentityKey::Store(store.store_id)) {
            self.records
                .stores
                .push(coerce::store_record(store, venue_id));
        }

        for transaction in store.transactions.iter().flatten() {
            self.visit_transaction(transaction, store.store_id)?;
        }
        Ok(())
    }

    fn visit_transaction(
        &mut self,
        transaction: &RawTransaction,
        store_id: i64,
    ) -> Result<(), CoercionError> {
        let transaction_id = transaction.transaction_id;
        if !self
            .index
            .seen_and_mark(IdentityKey::Transaction(transaction_id))
        {
            self.records
                .transactions
                .push(coerce::transaction_record(transaction, store_id)?);
        }

        for item in transaction.items.iter().flatten() {
            self.visit_item(item, transaction_id)?;
        }
        Ok(())
    }

    fn visit_item(&mut self, item: &RawItem, transaction_id: i64) -> Result<(), CoercionError> {
        if let Some(product) = &item.product {
            if !self
                .index
                .seen_and_mark(IdentityKey::Product(product.product_id))
            {
                self.records.products.push(coerce::product_record(product));
            }
        }

        let key = ItemKey::new(item.line_id, transaction_id);
        if !self.index.seen_and_mark(IdentityKey::Item(key)) {
            self.records
                .items
                .push(coerce::item_record(item, transaction_id)?);
        }

        // duplicates included: promos have no identity
        for promo in item.promos.iter().flatten() {
            self.records.promos.push(coerce::promo_record(promo, key));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize_json(json: &str) -> NormalizedRecords {
        let doc = SourceDocument::from_slice(json.as_bytes()).unwrap();
        normalize(&doc).unwrap()
    }

    #[test]
    fn test_empty_document() {
        let records = normalize_json("[]");
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_nested_sequences_are_empty() {
        let records = normalize_json(
            r#"[{"VenueID": 1, "VenueName": "A"},
                {"VenueID": 2, "Stores": [{"StoreID": 5, "Transactions": null}]}]"#,
        );
        assert_eq!(records.venues.len(), 2);
        assert_eq!(records.stores.len(), 1);
        assert_eq!(records.stores[0].venue_id, 2);
        assert!(records.transactions.is_empty());
    }

    #[test]
    fn test_parent_keys_come_from_enclosing_nodes() {
        let records = normalize_json(
            r#"[{"VenueID": 1, "Stores": [{"StoreID": 5, "Transactions": [
                {"TransactionID": 77, "DateTimeUTC": "01/01/2024 09:00:00 AM", "Items": [
                    {"LineID": 1, "ProductID": 3, "Product": {"ProductID": 3},
                     "Promos": [{"PromoID": 8}]}
                ]}
            ]}]}]"#,
        );
        assert_eq!(records.transactions[0].store_id, 5);
        assert_eq!(records.items[0].transaction_id, 77);
        assert_eq!(records.promos[0].item_key(), ItemKey::new(1, 77));
    }

    #[test]
    fn test_item_without_product_node_emits_no_product() {
        let records = normalize_json(
            r#"[{"VenueID": 1, "Stores": [{"StoreID": 5, "Transactions": [
                {"TransactionID": 1, "DateTimeUTC": "01/01/2024 09:00:00 AM", "Items": [
                    {"LineID": 1, "ProductID": 3}
                ]}
            ]}]}]"#,
        );
        assert!(records.products.is_empty());
        assert_eq!(records.items.len(), 1);
        assert_eq!(records.items[0].product_id, 3);
    }

    #[test]
    fn test_duplicate_transaction_children_still_visited() {
        let records = normalize_json(
            r#"[{"VenueID": 1, "Stores": [
                {"StoreID": 5, "Transactions": [
                    {"TransactionID": 1, "DateTimeUTC": "01/01/2024 09:00:00 AM", "Items": [
                        {"LineID": 1, "ProductID": 3}]}]},
                {"StoreID": 6, "Transactions": [
                    {"TransactionID": 1, "DateTimeUTC": "not even a date", "Items": [
                        {"LineID": 2, "ProductID": 3, "Promos": [{"PromoID": 1}]}]}]}
            ]}]"#,
        );
        // the duplicate's timestamp is never coerced
        assert_eq!(records.transactions.len(), 1);
        assert_eq!(records.transactions[0].store_id, 5);
        assert_eq!(records.items.len(), 2);
        assert_eq!(records.promos.len(), 1);
    }

    #[test]
    fn test_coercion_failure_aborts() {
        let doc = SourceDocument::from_slice(
            br#"[{"VenueID": 1, "Stores": [{"StoreID": 5, "Transactions": [
                {"TransactionID": 1, "DateTimeUTC": "2024-01-01 09:00"}]}]}]"#,
        )
        .unwrap();
        assert!(matches!(
            normalize(&doc),
            Err(CoercionError::InvalidTimestamp { transaction_id: 1, .. })
        ));
    }

    #[test]
    fn test_record_counts() {
        let mut counts = RecordCounts::default();
        counts.set(EntityKind::Item, 4);
        counts.set(EntityKind::Promo, 2);
        assert_eq!(counts.get(EntityKind::Item), 4);
        assert_eq!(counts.total(), 6);
        assert_eq!(
            counts.to_string(),
            "0 venues, 0 stores, 0 transactions, 0 products, 4 items, 2 promos"
        );
    }
}
