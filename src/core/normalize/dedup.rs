//! First-seen identity tracking
//!
//! One hash set per deduplicated entity kind. Promos have no identity key and
//! are never tracked.

use crate::domain::{EntityKind, ItemKey};
use std::collections::HashSet;

/// Natural key of a deduplicated entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Venue(i64),
    Store(i64),
    Transaction(i64),
    Product(i64),
    Item(ItemKey),
}

impl IdentityKey {
    pub fn kind(&self) -> EntityKind {
        match self {
            IdentityKey::Venue(_) => EntityKind::Venue,
            IdentityKey::Store(_) => EntityKind::Store,
            IdentityKey::Transaction(_) => EntityKind::Transaction,
            IdentityKey::Product(_) => EntityKind::Product,
            IdentityKey::Item(_) => EntityKind::Item,
        }
    }
}

#[derive(Debug, Default)]
pub struct DedupIndex {
    venues: HashSet<i64>,
    stores: HashSet<i64>,
    transactions: HashSet<i64>,
    products: HashSet<i64>,
    items: HashSet<ItemKey>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `key` was already marked; otherwise marks it and
    /// returns `false`.
    pub fn seen_and_mark(&mut self, key: IdentityKey) -> bool {
        let inserted = match key {
            IdentityKey::Venue(id) => self.venues.insert(id),
            IdentityKey::Store(id) => self.stores.insert(id),
            IdentityKey::Transaction(id) => self.transactions.insert(id),
            IdentityKey::Product(id) => self.products.insert(id),
            IdentityKey::Item(key) => self.items.insert(key),
        };
        !inserted
    }

    /// Number of distinct keys tracked for `kind` (always 0 for promos)
    pub fn distinct(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Venue => self.venues.len(),
            EntityKind::Store => self.stores.len(),
            EntityKind::Transaction => self.transactions.len(),
            EntityKind::Product => self.products.len(),
            EntityKind::Item => self.items.len(),
            EntityKind::Promo => 0,
        }
    }
}
