//! Typed view of the nested point-of-sale export
//!
//! The export is a JSON array of venues, each nesting stores, transactions,
//! line items, products and promos. Keys are PascalCase with upper-case `ID`
//! suffixes. Unknown keys are ignored. Nested sequences may be absent or
//! `null`; both read as empty.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Root of an export document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SourceDocument {
    pub venues: Vec<RawVenue>,
}

impl SourceDocument {
    /// Parse a document from raw bytes
    ///
    /// # Errors
    ///
    /// Returns the serde error if the bytes are not a JSON array of venues.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawVenue {
    #[serde(rename = "VenueID")]
    pub venue_id: i64,
    #[serde(default)]
    pub venue_name: Option<String>,
    #[serde(default)]
    pub stores: Option<Vec<RawStore>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawStore {
    #[serde(rename = "StoreID")]
    pub store_id: i64,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub transactions: Option<Vec<RawTransaction>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTransaction {
    #[serde(rename = "TransactionID")]
    pub transaction_id: i64,
    #[serde(default)]
    pub transaction_type: Option<String>,
    /// Kept as text here; coercion parses it
    #[serde(rename = "DateTimeUTC", default)]
    pub date_time_utc: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub operator_number: Option<String>,
    #[serde(default)]
    pub operator_name: Option<String>,
    #[serde(rename = "TillID", default)]
    pub till_id: Option<i64>,
    #[serde(default)]
    pub till_name: Option<String>,
    #[serde(default)]
    pub service_charge: Option<f64>,
    #[serde(default)]
    pub nett_total: Option<f64>,
    #[serde(default)]
    pub nett_sales: Option<f64>,
    #[serde(default)]
    pub gross_sales: Option<f64>,
    #[serde(default)]
    pub order_discount: Option<f64>,
    #[serde(default)]
    pub total_discount: Option<f64>,
    #[serde(default)]
    pub taxable: Option<f64>,
    #[serde(default)]
    pub non_taxable: Option<f64>,
    #[serde(default)]
    pub tax_amount: Option<f64>,
    #[serde(default)]
    pub payments: Option<Value>,
    #[serde(default)]
    pub account: Option<Value>,
    #[serde(default)]
    pub items: Option<Vec<RawItem>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawItem {
    #[serde(rename = "LineID")]
    pub line_id: i64,
    #[serde(rename = "ProductID", default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub nett_price: Option<f64>,
    #[serde(default)]
    pub gross_price: Option<f64>,
    #[serde(default)]
    pub item_discount: Option<f64>,
    #[serde(default)]
    pub is_condiment: Option<bool>,
    #[serde(default)]
    pub nett_total: Option<f64>,
    #[serde(default, deserialize_with = "non_empty_product")]
    pub product: Option<RawProduct>,
    #[serde(default)]
    pub promos: Option<Vec<RawPromo>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawProduct {
    #[serde(rename = "ProductID")]
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(rename = "CategoryID", default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "CategoryGroupID", default)]
    pub category_group_id: Option<i64>,
    #[serde(default)]
    pub category_group: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub product_cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub size: Option<String>,
    #[serde(default)]
    pub size_volume: Option<f64>,
    #[serde(default)]
    pub size_unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub barcode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub base: Option<String>,
    #[serde(default)]
    pub base_volume: Option<f64>,
    #[serde(default)]
    pub base_unit: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPromo {
    #[serde(rename = "PromoID", default)]
    pub promo_id: Option<i64>,
    #[serde(default)]
    pub promo_name: Option<String>,
    #[serde(default)]
    pub totaliser_name: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(rename = "TotaliserID", default)]
    pub totaliser_id: Option<i64>,
}

/// An empty `Product` object carries nothing and reads as absent
fn non_empty_product<'de, D>(deserializer: D) -> Result<Option<RawProduct>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Accept a code field written either as a string or as a bare number
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_venue() {
        let doc = SourceDocument::from_slice(br#"[{"VenueID": 1, "VenueName": "North"}]"#)
            .unwrap();
        assert_eq!(doc.venues.len(), 1);
        assert_eq!(doc.venues[0].venue_id, 1);
        assert!(doc.venues[0].stores.is_none());
    }

    #[test]
    fn test_null_nested_sequence_is_none() {
        let doc = SourceDocument::from_slice(br#"[{"VenueID": 1, "Stores": null}]"#).unwrap();
        assert!(doc.venues[0].stores.is_none());
    }

    #[test]
    fn test_missing_natural_key_is_error() {
        let err = SourceDocument::from_slice(br#"[{"VenueName": "North"}]"#).unwrap_err();
        assert!(err.to_string().contains("VenueID"));
    }

    #[test]
    fn test_lenient_string_accepts_numbers() {
        let product: RawProduct = serde_json::from_str(
            r#"{"ProductID": 9, "ProductName": "Cola", "Barcode": 9300675024235, "Size": "330ml"}"#,
        )
        .unwrap();
        assert_eq!(product.barcode.as_deref(), Some("9300675024235"));
        assert_eq!(product.size.as_deref(), Some("330ml"));
        assert_eq!(product.base, None);
    }

    #[test]
    fn test_lenient_string_rejects_objects() {
        let result: Result<RawProduct, _> =
            serde_json::from_str(r#"{"ProductID": 9, "Barcode": {"a": 1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_integer_amounts_read_as_float() {
        let promo: RawPromo =
            serde_json::from_str(r#"{"PromoID": 4, "Amount": 2, "TotaliserID": 11}"#).unwrap();
        assert_eq!(promo.amount, Some(2.0));
        assert_eq!(promo.totaliser_id, Some(11));
    }

    #[test]
    fn test_empty_product_object_is_absent() {
        let item: RawItem =
            serde_json::from_str(r#"{"LineID": 1, "ProductID": 9, "Product": {}}"#).unwrap();
        assert_eq!(item.product_id, Some(9));
        assert!(item.product.is_none());
    }

    #[test]
    fn test_partial_product_object_still_needs_id() {
        let result: Result<RawItem, _> =
            serde_json::from_str(r#"{"LineID": 1, "Product": {"ProductName": "Cola"}}"#);
        assert!(result.unwrap_err().to_string().contains("ProductID"));
    }

    #[test]
    fn test_not_an_array_is_error() {
        assert!(SourceDocument::from_slice(br#"{"VenueID": 1}"#).is_err());
    }
}
