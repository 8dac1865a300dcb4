//! PostgreSQL row bindings
//!
//! Maps each normalized record onto the column list of its table and
//! builds the multi-row `INSERT ... VALUES` statements used for bulk loads.

use crate::domain::{Item, Product, Promo, Store, Transaction, Venue};
use tokio_postgres::types::ToSql;

/// Upper bound on bind parameters in a single PostgreSQL statement
pub const MAX_BIND_PARAMETERS: usize = 65_535;

/// A record that can be bound as one row of a multi-row insert
pub trait InsertRow: Sync {
    /// Target table
    const TABLE: &'static str;

    /// Inserted columns, in binding order
    const COLUMNS: &'static [&'static str];

    /// Append this row's values in [`Self::COLUMNS`] order
    fn push_params<'a>(&'a self, out: &mut Vec<&'a (dyn ToSql + Sync)>);
}

/// Rows per statement for a table with `columns` columns
pub fn rows_per_statement(columns: usize, chunk_size: usize) -> usize {
    (MAX_BIND_PARAMETERS / columns.max(1)).min(chunk_size).max(1)
}

/// `INSERT INTO table (cols) VALUES ($1, ..), (..)` for `rows` rows
pub fn insert_statement(table: &str, columns: &[&str], rows: usize) -> String {
    let width = columns.len();
    let mut sql = format!("INSERT INTO {} ({}) VALUES ", table, columns.join(", "));

    for row in 0..rows {
        if row > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for col in 0..width {
            if col > 0 {
                sql.push_str(", ");
            }
            sql.push('$');
            sql.push_str(&(row * width + col + 1).to_string());
        }
        sql.push(')');
    }

    sql
}

impl InsertRow for Venue {
    const TABLE: &'static str = "venues";
    const COLUMNS: &'static [&'static str] = &["venue_id", "venue_name"];

    fn push_params<'a>(&'a self, out: &mut Vec<&'a (dyn ToSql + Sync)>) {
        out.push(&self.venue_id);
        out.push(&self.venue_name);
    }
}

impl InsertRow for Store {
    const TABLE: &'static str = "stores";
    const COLUMNS: &'static [&'static str] = &["store_id", "store_name", "venue_id"];

    fn push_params<'a>(&'a self, out: &mut Vec<&'a (dyn ToSql + Sync)>) {
        out.push(&self.store_id);
        out.push(&self.store_name);
        out.push(&self.venue_id);
    }
}

impl InsertRow for Transaction {
    const TABLE: &'static str = "transactions";
    const COLUMNS: &'static [&'static str] = &[
        "transaction_id",
        "transaction_type",
        "date_time_utc",
        "operator_number",
        "operator_name",
        "till_id",
        "till_name",
        "service_charge",
        "nett_total",
        "nett_sales",
        "gross_sales",
        "order_discount",
        "total_discount",
        "taxable",
        "non_taxable",
        "tax_amount",
        "payments",
        "account",
        "store_id",
    ];

    fn push_params<'a>(&'a self, out: &mut Vec<&'a (dyn ToSql + Sync)>) {
        out.push(&self.transaction_id);
        out.push(&self.transaction_type);
        out.push(&self.date_time_utc);
        out.push(&self.operator_number);
        out.push(&self.operator_name);
        out.push(&self.till_id);
        out.push(&self.till_name);
        out.push(&self.service_charge);
        out.push(&self.nett_total);
        out.push(&self.nett_sales);
        out.push(&self.gross_sales);
        out.push(&self.order_discount);
        out.push(&self.total_discount);
        out.push(&self.taxable);
        out.push(&self.non_taxable);
        out.push(&self.tax_amount);
        out.push(&self.payments);
        out.push(&self.account);
        out.push(&self.store_id);
    }
}

impl InsertRow for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &[
        "product_id",
        "product_name",
        "category_id",
        "category",
        "category_group_id",
        "category_group",
        "active",
        "price",
        "product_cost",
        "size",
        "size_volume",
        "size_unit",
        "barcode",
        "base",
        "base_volume",
        "base_unit",
    ];

    fn push_params<'a>(&'a self, out: &mut Vec<&'a (dyn ToSql + Sync)>) {
        out.push(&self.product_id);
        out.push(&self.product_name);
        out.push(&self.category_id);
        out.push(&self.category);
        out.push(&self.category_group_id);
        out.push(&self.category_group);
        out.push(&self.active);
        out.push(&self.price);
        out.push(&self.product_cost);
        out.push(&self.size);
        out.push(&self.size_volume);
        out.push(&self.size_unit);
        out.push(&self.barcode);
        out.push(&self.base);
        out.push(&self.base_volume);
        out.push(&self.base_unit);
    }
}

impl InsertRow for Item {
    const TABLE: &'static str = "items";
    const COLUMNS: &'static [&'static str] = &[
        "line_id",
        "transaction_id",
        "product_id",
        "quantity",
        "nett_price",
        "gross_price",
        "item_discount",
        "is_condiment",
        "nett_total",
    ];

    fn push_params<'a>(&'a self, out: &mut Vec<&'a (dyn ToSql + Sync)>) {
        out.push(&self.line_id);
        out.push(&self.transaction_id);
        out.push(&self.product_id);
        out.push(&self.quantity);
        out.push(&self.nett_price);
        out.push(&self.gross_price);
        out.push(&self.item_discount);
        out.push(&self.is_condiment);
        out.push(&self.nett_total);
    }
}

impl InsertRow for Promo {
    const TABLE: &'static str = "promos";
    const COLUMNS: &'static [&'static str] = &[
        "line_id",
        "transaction_id",
        "promo_id",
        "promo_name",
        "totaliser_name",
        "amount",
        "totaliser_id",
    ];

    fn push_params<'a>(&'a self, out: &mut Vec<&'a (dyn ToSql + Sync)>) {
        out.push(&self.line_id);
        out.push(&self.transaction_id);
        out.push(&self.promo_id);
        out.push(&self.promo_name);
        out.push(&self.totaliser_name);
        out.push(&self.amount);
        out.push(&self.totaliser_id);
    }
}
