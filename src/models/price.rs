use duckdb::Row;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceChange — How a mover's price moved between the two snapshot dates
// ---------------------------------------------------------------------------

/// The change reported for one mover. Which variant appears depends on the
/// [`DiffStrategy`](crate::queries::DiffStrategy) the engine ran with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceChange {
    /// Absolute currency difference, `curr_price - start_price`.
    Absolute { price_diff: f64 },
    /// Whole-percent change; `None` when the start price is zero.
    Percent { price_diff_pct: Option<i64> },
}

impl PriceChange {
    /// The value rankings are sorted by, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            PriceChange::Absolute { price_diff } => Some(*price_diff),
            PriceChange::Percent { price_diff_pct } => price_diff_pct.map(|p| p as f64),
        }
    }
}

// ---------------------------------------------------------------------------
// PriceDiffResult — One top-mover row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDiffResult {
    /// Listing that represents the card on the end date.
    pub listing_id: i64,
    pub card_id: i64,
    pub name: String,
    pub curr_price: f64,
    pub start_price: f64,
    #[serde(flatten)]
    pub change: PriceChange,
    pub collector_num: String,
    pub finish: String,
    pub image_uri: Option<String>,
}

impl PriceDiffResult {
    /// Decode the common columns; column 5 is handed to `change` to decode
    /// the strategy-specific diff.
    pub(crate) fn from_row<F>(row: &Row<'_>, change: F) -> duckdb::Result<Self>
    where
        F: FnOnce(&Row<'_>, usize) -> duckdb::Result<PriceChange>,
    {
        Ok(Self {
            listing_id: row.get(0)?,
            card_id: row.get(1)?,
            name: row.get(2)?,
            curr_price: row.get(3)?,
            start_price: row.get(4)?,
            change: change(row, 5)?,
            collector_num: row.get(6)?,
            finish: row.get(7)?,
            image_uri: row.get(8)?,
        })
    }
}
