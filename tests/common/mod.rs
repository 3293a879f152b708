//! Shared test fixtures for the card price integration tests.
//!
//! Provides `setup_sample_db()` which opens an in-memory store and seeds it
//! with a small set of printings and two days of listing snapshots
//! (2024-05-01 and 2024-05-02).
//!
//! | name           | id | finish  | alt_style | start min | end min | notes                      |
//! |----------------|----|---------|-----------|-----------|---------|----------------------------|
//! | Lightning Bolt | 1  | nonfoil | NULL      | 2.50      | 3.00    |                            |
//! | Lightning Bolt | 2  | nonfoil | NULL      | 2.00      | 3.00    | end tie, listed later      |
//! | Lightning Bolt | 3  | foil    | NULL      | 10.00     | 1.00    | foil, never canonical      |
//! | Counterspell   | 4  | nonfoil | NULL      | 4.00      | 2.00    | several listings per day   |
//! | Llanowar Elves | 5  | nonfoil | NULL      | 0.20      | 0.40    | below the noise floor      |
//! | Black Lotus    | 6  | nonfoil | showcase  | 1000.00   | 2000.00 | alt-style, never canonical |
//! | Dark Ritual    | 7  | nonfoil | NULL      | 0.00      | 1.00    | zero start price           |
//! | Brainstorm     | 8  | nonfoil | ''        | 1.00      | 1.10    | empty alt-style            |
//! | Sol Ring       | 9  | nonfoil | NULL      | -         | 5.00    | end date only              |
//! | Forest         | 10 | nonfoil | NULL      | -         | -       | never listed               |

#![allow(dead_code)]

use card_prices::CardPrices;
use chrono::NaiveDate;

pub const START: &str = "2024-05-01";
pub const END: &str = "2024-05-02";

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Open an in-memory store with the schema created but no rows.
pub fn setup_empty_db() -> CardPrices {
    CardPrices::builder().in_memory().build().unwrap()
}

/// Open an in-memory store seeded with the sample cards and listings.
pub fn setup_sample_db() -> CardPrices {
    let prices = setup_empty_db();

    // -- cards ----------------------------------------------------------------
    register_cards(&prices);

    // -- listings -------------------------------------------------------------
    register_listings(&prices);

    prices
}

fn register_cards(prices: &CardPrices) {
    prices
        .connection()
        .execute_batch(
            r#"
            INSERT INTO cards (id, name, set_id, collector_num, promo_type, finish, alt_style, image_uri) VALUES
                (1,  'Lightning Bolt', 1, '141', '', 'nonfoil', NULL,       'img/bolt-141.jpg'),
                (2,  'Lightning Bolt', 2, '150', '', 'nonfoil', NULL,       'img/bolt-150.jpg'),
                (3,  'Lightning Bolt', 1, '141', '', 'foil',    NULL,       'img/bolt-141-foil.jpg'),
                (4,  'Counterspell',   1, '50',  '', 'nonfoil', NULL,       'img/counterspell.jpg'),
                (5,  'Llanowar Elves', 1, '200', '', 'nonfoil', NULL,       'img/elves.jpg'),
                (6,  'Black Lotus',    3, '1',   '', 'nonfoil', 'showcase', 'img/lotus.jpg'),
                (7,  'Dark Ritual',    1, '90',  '', 'nonfoil', NULL,       'img/ritual.jpg'),
                (8,  'Brainstorm',     2, '10',  '', 'nonfoil', '',         'img/brainstorm.jpg'),
                (9,  'Sol Ring',       2, '20',  '', 'nonfoil', NULL,       'img/sol-ring.jpg'),
                (10, 'Forest',         1, '300', '', 'nonfoil', NULL,       NULL);
            "#,
        )
        .unwrap();
}

fn register_listings(prices: &CardPrices) {
    prices
        .connection()
        .execute_batch(
            r#"
            INSERT INTO listings (id, card_id, price, created_at, created_date) VALUES
                (101, 1, 2.50,    TIMESTAMP '2024-05-01 09:00:00', DATE '2024-05-01'),
                (102, 2, 2.00,    TIMESTAMP '2024-05-01 10:00:00', DATE '2024-05-01'),
                (103, 1, 3.00,    TIMESTAMP '2024-05-02 09:00:00', DATE '2024-05-02'),
                (104, 2, 3.00,    TIMESTAMP '2024-05-02 11:00:00', DATE '2024-05-02'),
                (105, 3, 10.00,   TIMESTAMP '2024-05-01 09:00:00', DATE '2024-05-01'),
                (106, 3, 1.00,    TIMESTAMP '2024-05-02 09:00:00', DATE '2024-05-02'),
                (107, 4, 4.00,    TIMESTAMP '2024-05-01 08:00:00', DATE '2024-05-01'),
                (118, 4, 6.00,    TIMESTAMP '2024-05-01 15:00:00', DATE '2024-05-01'),
                (119, 4, 2.00,    TIMESTAMP '2024-05-02 08:00:00', DATE '2024-05-02'),
                (108, 4, 3.00,    TIMESTAMP '2024-05-02 12:00:00', DATE '2024-05-02'),
                (109, 5, 0.20,    TIMESTAMP '2024-05-01 09:00:00', DATE '2024-05-01'),
                (110, 5, 0.40,    TIMESTAMP '2024-05-02 09:00:00', DATE '2024-05-02'),
                (111, 6, 1000.00, TIMESTAMP '2024-05-01 09:00:00', DATE '2024-05-01'),
                (112, 6, 2000.00, TIMESTAMP '2024-05-02 09:00:00', DATE '2024-05-02'),
                (113, 7, 0.00,    TIMESTAMP '2024-05-01 09:00:00', DATE '2024-05-01'),
                (114, 7, 1.00,    TIMESTAMP '2024-05-02 09:00:00', DATE '2024-05-02'),
                (115, 8, 1.00,    TIMESTAMP '2024-05-01 09:00:00', DATE '2024-05-01'),
                (116, 8, 1.10,    TIMESTAMP '2024-05-02 09:00:00', DATE '2024-05-02'),
                (117, 9, 5.00,    TIMESTAMP '2024-05-02 09:00:00', DATE '2024-05-02');
            "#,
        )
        .unwrap();
}

/// Add `count` extra priced cards named `Token 1..=count`; card `n` costs `n`.
pub fn register_tokens(prices: &CardPrices, count: usize) {
    let mut cards = Vec::new();
    let mut listings = Vec::new();
    for n in 1..=count {
        let id = 1000 + n;
        cards.push(format!(
            "({id}, 'Token {n}', 9, 'T{n}', '', 'nonfoil', NULL, NULL)"
        ));
        listings.push(format!(
            "({id}, {id}, {n}.00, TIMESTAMP '2024-05-02 09:00:00', DATE '2024-05-02')"
        ));
    }

    prices
        .connection()
        .execute_batch(&format!(
            "INSERT INTO cards (id, name, set_id, collector_num, promo_type, finish, alt_style, image_uri) VALUES {};\n\
             INSERT INTO listings (id, card_id, price, created_at, created_date) VALUES {};",
            cards.join(", "),
            listings.join(", ")
        ))
        .unwrap();
}
