//! Normalization properties: deduplication, ordering and defaults

use posload::core::normalize::{normalize, NormalizedRecords, SourceDocument};
use posload::domain::{CoercionError, ItemKey};
use test_case::test_case;

fn run(json: &str) -> NormalizedRecords {
    let doc = SourceDocument::from_slice(json.as_bytes()).unwrap();
    normalize(&doc).unwrap()
}

fn transaction(id: i64, items: &str) -> String {
    format!(
        r#"{{"TransactionID": {id}, "TransactionType": "Sale",
             "DateTimeUTC": "01/02/2024 10:00:00 AM", "Items": [{items}]}}"#
    )
}

fn store(id: i64, name: &str, transactions: &[String]) -> String {
    format!(
        r#"{{"StoreID": {id}, "StoreName": "{name}", "Transactions": [{}]}}"#,
        transactions.join(",")
    )
}

fn venue(id: i64, name: &str, stores: &[String]) -> String {
    format!(
        r#"{{"VenueID": {id}, "VenueName": "{name}", "Stores": [{}]}}"#,
        stores.join(",")
    )
}

#[test]
fn test_duplicate_venue_keeps_first() {
    let json = format!(
        "[{}, {}]",
        venue(1, "First", &[]),
        venue(1, "Second", &[])
    );
    let records = run(&json);

    assert_eq!(records.venues.len(), 1);
    assert_eq!(records.venues[0].venue_name.as_deref(), Some("First"));
}

#[test]
fn test_duplicate_store_under_other_venue_keeps_first_parent() {
    let json = format!(
        "[{}, {}]",
        venue(1, "North", &[store(10, "Bar", &[])]),
        venue(2, "South", &[store(10, "Bar copy", &[])])
    );
    let records = run(&json);

    assert_eq!(records.venues.len(), 2);
    assert_eq!(records.stores.len(), 1);
    assert_eq!(records.stores[0].venue_id, 1);
    assert_eq!(records.stores[0].store_name.as_deref(), Some("Bar"));
}

#[test]
fn test_duplicate_transaction_keeps_first() {
    let json = format!(
        "[{}]",
        venue(
            1,
            "North",
            &[
                store(10, "Bar", &[transaction(100, "")]),
                store(11, "Lounge", &[transaction(100, "")]),
            ]
        )
    );
    let records = run(&json);

    assert_eq!(records.transactions.len(), 1);
    assert_eq!(records.transactions[0].store_id, 10);
}

#[test]
fn test_items_use_composite_key() {
    let item = |line: i64, qty: i64| {
        format!(r#"{{"LineID": {line}, "ProductID": 5, "Quantity": {qty}}}"#)
    };
    let json = format!(
        "[{}]",
        venue(
            1,
            "North",
            &[store(
                10,
                "Bar",
                &[
                    transaction(100, &format!("{}, {}", item(1, 1), item(1, 9))),
                    transaction(200, &item(1, 2)),
                ]
            )]
        )
    );
    let records = run(&json);

    let keys: Vec<ItemKey> = records.items.iter().map(|i| i.key()).collect();
    assert_eq!(keys, vec![ItemKey::new(1, 100), ItemKey::new(1, 200)]);
    assert_eq!(records.items[0].quantity, Some(1.0));
}

#[test_case(1 ; "single promo")]
#[test_case(3 ; "three identical promos")]
#[test_case(0 ; "no promos")]
fn test_promo_multiplicity(count: usize) {
    let promo = r#"{"PromoID": 9, "PromoName": "2 for 1", "Amount": -2.5}"#;
    let promos = vec![promo; count].join(",");
    let item = format!(r#"{{"LineID": 1, "ProductID": 5, "Promos": [{promos}]}}"#);
    let json = format!(
        "[{}]",
        venue(1, "North", &[store(10, "Bar", &[transaction(100, &item)])])
    );
    let records = run(&json);

    assert_eq!(records.promos.len(), count);
    assert!(records
        .promos
        .iter()
        .all(|p| p.item_key() == ItemKey::new(1, 100)));
}

#[test]
fn test_first_occurrence_order() {
    let json = format!(
        "[{}, {}, {}]",
        venue(3, "C", &[]),
        venue(1, "A", &[]),
        venue(2, "B", &[])
    );
    let records = run(&json);

    let ids: Vec<i64> = records.venues.iter().map(|v| v.venue_id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[test]
fn test_defaults_applied() {
    let item = r#"{"LineID": 1, "Product": {"ProductID": 5, "ProductName": "Cola"}}"#;
    let json = format!(
        "[{}]",
        venue(1, "North", &[store(10, "Bar", &[transaction(100, item)])])
    );
    let records = run(&json);

    assert_eq!(records.items[0].item_discount, 0.0);
    assert!(!records.items[0].is_condiment);
    assert_eq!(records.items[0].product_id, 5);
    assert!(records.products[0].active);
    assert_eq!(records.transactions[0].service_charge, 0.0);
    assert_eq!(records.transactions[0].order_discount, 0.0);
    assert_eq!(records.transactions[0].total_discount, 0.0);
}

#[test]
fn test_explicit_inactive_product_kept() {
    let item = r#"{"LineID": 1, "Product": {"ProductID": 5, "ProductName": "Old", "Active": false}}"#;
    let json = format!(
        "[{}]",
        venue(1, "North", &[store(10, "Bar", &[transaction(100, item)])])
    );
    assert!(!run(&json).products[0].active);
}

#[test_case("31/12/2024 11:59:59 PM", true ; "end of year")]
#[test_case("01/01/2024 12:00:00 AM", true ; "midnight")]
#[test_case("2024-01-01 00:00:00", false ; "iso format")]
#[test_case("13/13/2024 10:00:00 AM", false ; "month out of range")]
#[test_case("", false ; "empty")]
fn test_timestamp_acceptance(value: &str, ok: bool) {
    let json = format!(
        r#"[{{"VenueID": 1, "VenueName": "North", "Stores": [{{"StoreID": 10, "StoreName": "Bar",
            "Transactions": [{{"TransactionID": 100, "TransactionType": "Sale", "DateTimeUTC": "{value}"}}]}}]}}]"#
    );
    let doc = SourceDocument::from_slice(json.as_bytes()).unwrap();
    let result = normalize(&doc);

    assert_eq!(result.is_ok(), ok, "{value}: {result:?}");
    if !ok {
        assert!(matches!(
            result,
            Err(CoercionError::InvalidTimestamp {
                transaction_id: 100,
                ..
            })
        ));
    }
}

#[test]
fn test_missing_timestamp_fails() {
    let json = r#"[{"VenueID": 1, "Stores": [{"StoreID": 10,
        "Transactions": [{"TransactionID": 100}]}]}]"#;
    let doc = SourceDocument::from_slice(json.as_bytes()).unwrap();

    assert!(matches!(
        normalize(&doc),
        Err(CoercionError::MissingField {
            field: "DateTimeUTC",
            ..
        })
    ));
}

#[test]
fn test_item_without_product_reference_fails() {
    let item = r#"{"LineID": 1, "Quantity": 1}"#;
    let json = format!(
        "[{}]",
        venue(1, "North", &[store(10, "Bar", &[transaction(100, item)])])
    );
    let doc = SourceDocument::from_slice(json.as_bytes()).unwrap();

    assert!(matches!(
        normalize(&doc),
        Err(CoercionError::MissingField {
            field: "ProductID",
            ..
        })
    ));
}

#[test]
fn test_empty_product_node_contributes_no_product() {
    let item = r#"{"LineID": 1, "ProductID": 9, "Product": {}}"#;
    let json = format!(
        "[{}]",
        venue(1, "North", &[store(10, "Bar", &[transaction(100, item)])])
    );
    let records = run(&json);

    assert!(records.products.is_empty());
    assert_eq!(records.items.len(), 1);
    assert_eq!(records.items[0].product_id, 9);
}

#[test]
fn test_empty_product_node_without_item_product_id_fails() {
    let item = r#"{"LineID": 1, "Product": {}}"#;
    let json = format!(
        "[{}]",
        venue(1, "North", &[store(10, "Bar", &[transaction(100, item)])])
    );
    let doc = SourceDocument::from_slice(json.as_bytes()).unwrap();

    assert!(matches!(
        normalize(&doc),
        Err(CoercionError::MissingField {
            field: "ProductID",
            ..
        })
    ));
}
