use std::path::PathBuf;

/// Default page for card listings (1-based).
pub const DEFAULT_PAGE: usize = 1;
/// Default page size for card listings.
pub const DEFAULT_CARD_LIMIT: usize = 50;
/// Default number of name suggestions.
pub const DEFAULT_SUGGEST_LIMIT: usize = 20;
/// Default number of top movers.
pub const DEFAULT_MOVERS_LIMIT: usize = 10;
/// Upper bound for any caller-supplied limit.
pub const MAX_LIMIT: usize = 500;

/// The only finish used for price trend computation.
pub const CANONICAL_FINISH: &str = "nonfoil";
/// A name is kept in percentage rankings only if its start or end price reaches this.
pub const NOISE_FLOOR: f64 = 0.50;

/// Date format of snapshot dates on the wire and in SQL parameters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn default_db_path() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("card-prices").join("prices.duckdb")
    } else {
        PathBuf::from("prices.duckdb")
    }
}
