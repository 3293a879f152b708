use duckdb::Row;
use serde::{Deserialize, Serialize};

/// Column list decoded by [`CardRecord::from_row`], in order.
pub const CARD_COLUMNS: &[&str] = &[
    "c.id",
    "c.name",
    "c.set_id",
    "c.collector_num",
    "c.promo_type",
    "c.finish",
    "c.alt_style",
    "c.image_uri",
];

// ---------------------------------------------------------------------------
// CardRecord — One printing of a card
// ---------------------------------------------------------------------------

/// A single printing, identified by set, collector number, promo type and finish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: i64,
    pub name: String,
    #[serde(rename = "set")]
    pub set_id: i64,
    #[serde(rename = "collector_number")]
    pub collector_num: String,
    pub promo_type: String,
    pub finish: String,
    pub alt_style: Option<String>,
    pub image_uri: Option<String>,
}

impl CardRecord {
    /// Decode a row whose leading columns are [`CARD_COLUMNS`].
    pub fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            set_id: row.get(2)?,
            collector_num: row.get(3)?,
            promo_type: row.get(4)?,
            finish: row.get(5)?,
            alt_style: row.get(6)?,
            image_uri: row.get(7)?,
        })
    }
}

// ---------------------------------------------------------------------------
// CardWithPrice — Card plus its most recent listing price
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardWithPrice {
    pub id: i64,
    pub name: String,
    pub set_id: i64,
    pub image_uri: Option<String>,
    pub collector_num: String,
    pub finish: String,
    pub promo_type: String,
    pub alt_style: Option<String>,
    /// `None` when the card has never been listed.
    pub curr_price: Option<f64>,
}

impl CardWithPrice {
    /// Decode a row of [`CARD_COLUMNS`] followed by the current price.
    pub fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        let card = CardRecord::from_row(row)?;
        Ok(Self {
            id: card.id,
            name: card.name,
            set_id: card.set_id,
            image_uri: card.image_uri,
            collector_num: card.collector_num,
            finish: card.finish,
            promo_type: card.promo_type,
            alt_style: card.alt_style,
            curr_price: row.get(CARD_COLUMNS.len())?,
        })
    }
}
