//! Card lookups: paginated listing with current prices and name suggestions.

use crate::config::{DEFAULT_CARD_LIMIT, DEFAULT_PAGE, DEFAULT_SUGGEST_LIMIT, MAX_LIMIT};
use crate::error::Result;
use crate::models::{CardRecord, CardWithPrice, CARD_COLUMNS};
use crate::params::{CardListParams, SuggestParams};
use crate::sql_builder::SqlBuilder;

/// Latest listing per card by capture time; later ids win exact ties.
const LATEST_PRICE_JOIN: &str = "LEFT JOIN (\
     SELECT DISTINCT ON (card_id) card_id, CAST(price AS DOUBLE) AS price \
     FROM listings \
     ORDER BY card_id, created_at DESC, id DESC\
 ) latest ON latest.card_id = c.id";

// ---------------------------------------------------------------------------
// NameMatch
// ---------------------------------------------------------------------------

/// How a non-empty name filter is applied when listing cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatch {
    /// Case-insensitive substring match; `%` and `_` are literal.
    #[default]
    Substring,
    /// Exact, case-sensitive name.
    Exact,
}

// ---------------------------------------------------------------------------
// CardQuery
// ---------------------------------------------------------------------------

/// Query interface over the `cards` and `listings` tables.
pub struct CardQuery<'a> {
    conn: &'a crate::connection::Connection,
    name_match: NameMatch,
}

impl<'a> CardQuery<'a> {
    /// Create a new `CardQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self {
            conn,
            name_match: NameMatch::default(),
        }
    }

    /// Switch the name filter semantics used by [`list`](Self::list).
    pub fn with_name_match(mut self, name_match: NameMatch) -> Self {
        self.name_match = name_match;
        self
    }

    // -- Listing -----------------------------------------------------------

    /// List cards matching `name` with their most recent listing price.
    ///
    /// Ordered by current price, highest first, with never-listed cards ahead
    /// of every priced card. A `page` of 0 or a `limit` outside `1..=500`
    /// falls back to the defaults (page 1, 50 rows). An empty `name` matches
    /// every card.
    pub fn list(&self, name: &str, page: usize, limit: usize) -> Result<Vec<CardWithPrice>> {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let limit = clamp_limit(limit, DEFAULT_CARD_LIMIT);
        let offset = (page - 1).saturating_mul(limit);

        let mut cols: Vec<&str> = CARD_COLUMNS.to_vec();
        cols.push("latest.price AS curr_price");

        let (sql, params) = SqlBuilder::new("cards c")
            .select(&cols)
            .join(LATEST_PRICE_JOIN)
            .where_name(self.name_match, "c.name", name)
            .order_by(&["curr_price DESC NULLS FIRST", "c.id ASC"])
            .limit(limit)
            .offset(offset)
            .build();

        log::debug!(
            "Listing cards name={:?} match={:?} page={} limit={}",
            name,
            self.name_match,
            page,
            limit
        );
        self.conn
            .query_rows("fetch cards", &sql, &params, CardWithPrice::from_row)
    }

    /// [`list`](Self::list) driven by already parsed query parameters.
    pub fn list_with(&self, params: &CardListParams) -> Result<Vec<CardWithPrice>> {
        self.list(&params.name, params.page, params.limit)
    }

    // -- Suggestions -------------------------------------------------------

    /// One card per distinct name containing `name` (case-insensitive).
    ///
    /// The lowest id represents each name; rows are ordered by name. A
    /// `limit` outside `1..=500` falls back to 20.
    pub fn suggest_names(&self, name: &str, limit: usize) -> Result<Vec<CardRecord>> {
        let limit = clamp_limit(limit, DEFAULT_SUGGEST_LIMIT);

        let mut cols: Vec<String> = CARD_COLUMNS.iter().map(|c| c.to_string()).collect();
        cols[0] = format!("DISTINCT ON (c.name) {}", cols[0]);
        let cols: Vec<&str> = cols.iter().map(String::as_str).collect();

        let (sql, params) = SqlBuilder::new("cards c")
            .select(&cols)
            .where_name(NameMatch::Substring, "c.name", name)
            .order_by(&["c.name", "c.id"])
            .limit(limit)
            .build();

        self.conn
            .query_rows("fetch card names", &sql, &params, CardRecord::from_row)
    }

    /// [`suggest_names`](Self::suggest_names) driven by parsed query parameters.
    pub fn suggest_names_with(&self, params: &SuggestParams) -> Result<Vec<CardRecord>> {
        self.suggest_names(&params.name, params.limit)
    }
}

fn clamp_limit(limit: usize, default: usize) -> usize {
    if limit == 0 || limit > MAX_LIMIT {
        default
    } else {
        limit
    }
}
