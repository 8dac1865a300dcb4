//! Normalized record types
//!
//! One flat struct per relational table. Records are built once by the
//! normalizer and never mutated afterwards; the loader only reads them.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// The six entity kinds, in foreign-key dependency order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Venue,
    Store,
    Transaction,
    Product,
    Item,
    Promo,
}

impl EntityKind {
    /// All kinds, parents before children. This is the load order.
    pub const LOAD_ORDER: [EntityKind; 6] = [
        EntityKind::Venue,
        EntityKind::Store,
        EntityKind::Transaction,
        EntityKind::Product,
        EntityKind::Item,
        EntityKind::Promo,
    ];

    /// Name of the backing table
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Venue => "venues",
            EntityKind::Store => "stores",
            EntityKind::Transaction => "transactions",
            EntityKind::Product => "products",
            EntityKind::Item => "items",
            EntityKind::Promo => "promos",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Venue => "Venue",
            EntityKind::Store => "Store",
            EntityKind::Transaction => "Transaction",
            EntityKind::Product => "Product",
            EntityKind::Item => "Item",
            EntityKind::Promo => "Promo",
        };
        f.write_str(name)
    }
}

/// Composite identity of a line item
///
/// LineIDs repeat across transactions, so the transaction is part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemKey {
    pub line_id: i64,
    pub transaction_id: i64,
}

impl ItemKey {
    pub fn new(line_id: i64, transaction_id: i64) -> Self {
        Self {
            line_id,
            transaction_id,
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line_id, self.transaction_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Venue {
    pub venue_id: i64,
    pub venue_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Store {
    pub store_id: i64,
    pub store_name: Option<String>,
    pub venue_id: i64,
}

/// A completed sale at a store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub transaction_id: i64,
    pub transaction_type: Option<String>,
    /// Parsed from `dd/mm/yyyy hh:mm:ss AM|PM`, interpreted as UTC
    pub date_time_utc: NaiveDateTime,
    pub operator_number: Option<String>,
    pub operator_name: Option<String>,
    pub till_id: Option<i64>,
    pub till_name: Option<String>,
    pub service_charge: f64,
    pub nett_total: Option<f64>,
    pub nett_sales: Option<f64>,
    pub gross_sales: Option<f64>,
    pub order_discount: f64,
    pub total_discount: f64,
    pub taxable: Option<f64>,
    pub non_taxable: Option<f64>,
    pub tax_amount: Option<f64>,
    /// Opaque, stored as JSON
    pub payments: Option<Value>,
    /// Opaque, stored as JSON
    pub account: Option<Value>,
    pub store_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub product_id: i64,
    pub product_name: Option<String>,
    pub category_id: Option<i64>,
    pub category: Option<String>,
    pub category_group_id: Option<i64>,
    pub category_group: Option<String>,
    pub active: bool,
    pub price: Option<f64>,
    pub product_cost: Option<f64>,
    pub size: Option<String>,
    pub size_volume: Option<f64>,
    pub size_unit: Option<String>,
    pub barcode: Option<String>,
    pub base: Option<String>,
    pub base_volume: Option<f64>,
    pub base_unit: Option<String>,
}

/// One line of a transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub line_id: i64,
    pub transaction_id: i64,
    pub product_id: i64,
    pub quantity: Option<f64>,
    pub nett_price: Option<f64>,
    pub gross_price: Option<f64>,
    pub item_discount: f64,
    pub is_condiment: bool,
    pub nett_total: Option<f64>,
}

impl Item {
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.line_id, self.transaction_id)
    }
}

/// A promotion applied to an item line
///
/// The surrogate id is assigned by storage, so it is not carried here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Promo {
    pub line_id: i64,
    pub transaction_id: i64,
    pub promo_id: Option<i64>,
    pub promo_name: Option<String>,
    pub totaliser_name: Option<String>,
    pub amount: Option<f64>,
    pub totaliser_id: Option<i64>,
}

impl Promo {
    pub fn item_key(&self) -> ItemKey {
        ItemKey::new(self.line_id, self.transaction_id)
    }
}
