//! Store integration tests: schema, raw SQL execution, imports and sharing.

mod common;

use card_prices::{CardPriceError, CardPrices, Connection};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// schema
// ---------------------------------------------------------------------------

#[test]
fn init_schema_creates_tables() {
    let prices = common::setup_empty_db();

    for table in ["sets", "cards", "listings"] {
        let count = prices
            .connection()
            .execute_scalar(&format!("SELECT COUNT(*) FROM {table}"), &[])
            .unwrap();
        assert_eq!(count.unwrap().as_i64().unwrap(), 0);
    }
}

#[test]
fn init_schema_is_idempotent() {
    let prices = common::setup_sample_db();

    prices.connection().init_schema().unwrap();

    let count = prices
        .connection()
        .execute_scalar("SELECT COUNT(*) FROM cards", &[])
        .unwrap();
    assert_eq!(count.unwrap().as_i64().unwrap(), 10);
}

#[test]
fn card_identity_is_unique() {
    let prices = common::setup_sample_db();

    let err = prices
        .connection()
        .execute_batch(
            "INSERT INTO cards (id, name, set_id, collector_num, promo_type, finish) \
             VALUES (99, 'Lightning Bolt', 1, '141', '', 'nonfoil')",
        )
        .unwrap_err();
    assert!(matches!(err, CardPriceError::DuckDb(_)));
}

#[test]
fn ids_default_from_sequences() {
    let prices = common::setup_empty_db();
    let conn = prices.connection();

    conn.execute_batch(
        "INSERT INTO cards (name, set_id, collector_num, finish) VALUES ('Island', 1, '400', 'nonfoil');\n\
         INSERT INTO listings (card_id, price, created_date) VALUES (1, 0.10, DATE '2024-05-01');",
    )
    .unwrap();

    let rows = conn
        .execute("SELECT card_id, created_date FROM listings", &[])
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["card_id"], 1);
    assert_eq!(rows[0]["created_date"], "2024-05-01");
}

// ---------------------------------------------------------------------------
// execute / execute_scalar
// ---------------------------------------------------------------------------

#[test]
fn execute_with_params() {
    let prices = common::setup_sample_db();

    let rows = prices
        .sql(
            "SELECT id, name FROM cards WHERE name = ? ORDER BY id",
            &["Lightning Bolt".to_string()],
        )
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["id"], 1);
}

#[test]
fn execute_converts_decimals_and_nulls() {
    let prices = common::setup_sample_db();

    let rows = prices
        .sql(
            "SELECT l.price, c.alt_style FROM listings l JOIN cards c ON c.id = l.card_id WHERE l.id = 101",
            &[],
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    let price = rows[0]["price"].as_f64().unwrap();
    assert!((price - 2.5).abs() < f64::EPSILON);
    assert!(rows[0]["alt_style"].is_null());
}

#[test]
fn execute_scalar_returns_none_for_empty_result() {
    let prices = common::setup_sample_db();

    let result = prices
        .connection()
        .execute_scalar("SELECT id FROM cards WHERE name = ?", &["Nope".to_string()])
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn failing_query_names_the_query() {
    let conn = Connection::open_in_memory().unwrap();

    // No schema: the engine query cannot bind its tables.
    let err = card_prices::CardQuery::new(&conn)
        .list("", 1, 10)
        .unwrap_err();
    assert!(err.is_internal());
    assert!(err.to_string().starts_with("failed to fetch cards"));
}

// ---------------------------------------------------------------------------
// import_ndjson
// ---------------------------------------------------------------------------

#[test]
fn import_ndjson_appends_rows_by_name() {
    let prices = common::setup_sample_db();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"id": 50, "name": "Swords to Plowshares", "set_id": 4, "collector_num": "7", "promo_type": "", "finish": "nonfoil", "alt_style": "", "image_uri": "img/stp.jpg"}}"#
    )
    .unwrap();
    writeln!(
        file,
        r#"{{"id": 51, "name": "Swords to Plowshares", "set_id": 4, "collector_num": "7", "promo_type": "", "finish": "foil", "alt_style": "", "image_uri": "img/stp-foil.jpg"}}"#
    )
    .unwrap();
    file.flush().unwrap();

    let inserted = prices
        .connection()
        .import_ndjson("cards", file.path().to_str().unwrap())
        .unwrap();
    assert_eq!(inserted, 2);

    let cards = prices.cards().list("plowshares", 1, 50).unwrap();
    assert_eq!(cards.len(), 2);
    assert!(cards.iter().all(|c| c.curr_price.is_none()));
}

// ---------------------------------------------------------------------------
// builder / sharing
// ---------------------------------------------------------------------------

#[test]
fn file_store_reopens_read_only() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("nested").join("prices.duckdb");

    {
        let prices = CardPrices::builder().path(&path).build().unwrap();
        prices
            .connection()
            .execute_batch(
                "INSERT INTO cards (id, name, set_id, collector_num, finish) VALUES (1, 'Island', 1, '400', 'nonfoil')",
            )
            .unwrap();
    }

    let prices = CardPrices::builder()
        .path(&path)
        .read_only(true)
        .build()
        .unwrap();
    prices.ping().unwrap();
    assert_eq!(prices.cards().suggest_names("isl", 5).unwrap().len(), 1);
    assert!(prices
        .connection()
        .execute_batch("DELETE FROM cards")
        .is_err());
}

#[test]
fn from_connection_wraps_an_open_store() {
    let conn = Connection::open_in_memory().unwrap();
    conn.init_schema().unwrap();

    let prices = CardPrices::from_connection(conn);
    prices.ping().unwrap();
    assert!(prices.cards().list("", 1, 50).unwrap().is_empty());
}

#[test]
fn builder_can_skip_schema_creation() {
    let prices = CardPrices::builder()
        .in_memory()
        .init_schema(false)
        .build()
        .unwrap();

    assert!(prices.sql("SELECT COUNT(*) FROM cards", &[]).is_err());
}

#[test]
fn concurrent_queries_share_one_store() {
    let prices = Arc::new(common::setup_sample_db());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let prices = Arc::clone(&prices);
            std::thread::spawn(move || {
                let cards = prices.cards().list("", 1, 50).unwrap();
                let movers = prices
                    .price_diffs()
                    .top_movers(
                        common::date(common::START),
                        common::date(common::END),
                        10,
                        card_prices::SortOrder::Desc,
                    )
                    .unwrap();
                (cards.len(), movers.len())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), (10, 4));
    }
}
