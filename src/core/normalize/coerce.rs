//! Field coercion rules
//!
//! Converts source nodes into normalized records. Absent fields stay `None`
//! unless a default applies:
//!
//! | Field                                         | Default |
//! |-----------------------------------------------|---------|
//! | ServiceCharge, OrderDiscount, TotalDiscount   | `0.0`   |
//! | ItemDiscount                                  | `0.0`   |
//! | IsCondiment                                   | `false` |
//! | Product.Active                                | `true`  |
//!
//! An explicit `null` is treated the same as an absent key.

use super::source::{RawItem, RawProduct, RawPromo, RawStore, RawTransaction, RawVenue};
use crate::domain::{CoercionError, Item, ItemKey, Product, Promo, Store, Transaction, Venue};
use chrono::NaiveDateTime;

/// Format of `DateTimeUTC`, e.g. `25/12/2023 02:30:00 PM`
pub const TRANSACTION_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %I:%M:%S %p";

pub const DEFAULT_SERVICE_CHARGE: f64 = 0.0;
pub const DEFAULT_ORDER_DISCOUNT: f64 = 0.0;
pub const DEFAULT_TOTAL_DISCOUNT: f64 = 0.0;
pub const DEFAULT_ITEM_DISCOUNT: f64 = 0.0;
pub const DEFAULT_IS_CONDIMENT: bool = false;
pub const DEFAULT_PRODUCT_ACTIVE: bool = true;

/// Parse a transaction timestamp in the fixed export format
///
/// # Examples
///
/// ```
/// use posload::core::normalize::coerce::parse_transaction_timestamp;
///
/// let ts = parse_transaction_timestamp("25/12/2023 02:30:00 PM").unwrap();
/// assert_eq!(ts.to_string(), "2023-12-25 14:30:00");
/// ```
pub fn parse_transaction_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TRANSACTION_TIMESTAMP_FORMAT)
}

pub fn venue_record(raw: &RawVenue) -> Venue {
    Venue {
        venue_id: raw.venue_id,
        venue_name: raw.venue_name.clone(),
    }
}

pub fn store_record(raw: &RawStore, venue_id: i64) -> Store {
    Store {
        store_id: raw.store_id,
        store_name: raw.store_name.clone(),
        venue_id,
    }
}

/// Build a transaction record owned by `store_id`
///
/// # Errors
///
/// Fails when `DateTimeUTC` is missing or does not match
/// [`TRANSACTION_TIMESTAMP_FORMAT`].
pub fn transaction_record(
    raw: &RawTransaction,
    store_id: i64,
) -> Result<Transaction, CoercionError> {
    let value = raw
        .date_time_utc
        .as_deref()
        .ok_or_else(|| CoercionError::MissingField {
            entity: "Transaction",
            context: raw.transaction_id.to_string(),
            field: "DateTimeUTC",
        })?;

    let date_time_utc =
        parse_transaction_timestamp(value).map_err(|e| CoercionError::InvalidTimestamp {
            transaction_id: raw.transaction_id,
            value: value.to_string(),
            reason: e.to_string(),
        })?;

    Ok(Transaction {
        transaction_id: raw.transaction_id,
        transaction_type: raw.transaction_type.clone(),
        date_time_utc,
        operator_number: raw.operator_number.clone(),
        operator_name: raw.operator_name.clone(),
        till_id: raw.till_id,
        till_name: raw.till_name.clone(),
        service_charge: raw.service_charge.unwrap_or(DEFAULT_SERVICE_CHARGE),
        nett_total: raw.nett_total,
        nett_sales: raw.nett_sales,
        gross_sales: raw.gross_sales,
        order_discount: raw.order_discount.unwrap_or(DEFAULT_ORDER_DISCOUNT),
        total_discount: raw.total_discount.unwrap_or(DEFAULT_TOTAL_DISCOUNT),
        taxable: raw.taxable,
        non_taxable: raw.non_taxable,
        tax_amount: raw.tax_amount,
        payments: raw.payments.clone(),
        account: raw.account.clone(),
        store_id,
    })
}

pub fn product_record(raw: &RawProduct) -> Product {
    Product {
        product_id: raw.product_id,
        product_name: raw.product_name.clone(),
        category_id: raw.category_id,
        category: raw.category.clone(),
        category_group_id: raw.category_group_id,
        category_group: raw.category_group.clone(),
        active: raw.active.unwrap_or(DEFAULT_PRODUCT_ACTIVE),
        price: raw.price,
        product_cost: raw.product_cost,
        size: raw.size.clone(),
        size_volume: raw.size_volume,
        size_unit: raw.size_unit.clone(),
        barcode: raw.barcode.clone(),
        base: raw.base.clone(),
        base_volume: raw.base_volume,
        base_unit: raw.base_unit.clone(),
    }
}

/// Build an item record owned by `transaction_id`
///
/// The product reference comes from the item's own `ProductID`, falling back
/// to the nested product node.
///
/// # Errors
///
/// Fails when neither source carries a product id.
pub fn item_record(raw: &RawItem, transaction_id: i64) -> Result<Item, CoercionError> {
    let product_id = raw
        .product_id
        .or_else(|| raw.product.as_ref().map(|p| p.product_id))
        .ok_or_else(|| CoercionError::MissingField {
            entity: "Item",
            context: ItemKey::new(raw.line_id, transaction_id).to_string(),
            field: "ProductID",
        })?;

    Ok(Item {
        line_id: raw.line_id,
        transaction_id,
        product_id,
        quantity: raw.quantity,
        nett_price: raw.nett_price,
        gross_price: raw.gross_price,
        item_discount: raw.item_discount.unwrap_or(DEFAULT_ITEM_DISCOUNT),
        is_condiment: raw.is_condiment.unwrap_or(DEFAULT_IS_CONDIMENT),
        nett_total: raw.nett_total,
    })
}

pub fn promo_record(raw: &RawPromo, item: ItemKey) -> Promo {
    Promo {
        line_id: item.line_id,
        transaction_id: item.transaction_id,
        promo_id: raw.promo_id,
        promo_name: raw.promo_name.clone(),
        totaliser_name: raw.totaliser_name.clone(),
        amount: raw.amount,
        totaliser_id: raw.totaliser_id,
    }
}
