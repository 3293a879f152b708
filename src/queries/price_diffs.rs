//! Top price movers between two snapshot dates.
//!
//! Two aggregation strategies exist and produce different result sets, so the
//! caller picks one explicitly:
//!
//! - [`DiffStrategy::CanonicalPercent`] (default) compares the cheapest
//!   canonical printing of each card *name* on both dates and ranks by whole
//!   percent change, ignoring names priced below the noise floor on both dates.
//! - [`DiffStrategy::DailyAbsolute`] compares each card *id*'s first listing
//!   of the start date with its last listing of the end date and ranks by the
//!   absolute difference, with no noise filter.

use chrono::NaiveDate;

use crate::config::{CANONICAL_FINISH, DATE_FORMAT, NOISE_FLOOR};
use crate::error::{CardPriceError, Result};
use crate::models::{PriceChange, PriceDiffResult};
use crate::params::{PriceDiffParams, SortOrder};

// ---------------------------------------------------------------------------
// DiffStrategy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffStrategy {
    /// Percent change of the cheapest nonfoil, non-alt-style printing per name.
    #[default]
    CanonicalPercent,
    /// Absolute change per card id, first-of-day vs last-of-day listing.
    DailyAbsolute,
}

// ---------------------------------------------------------------------------
// PriceDiffQuery
// ---------------------------------------------------------------------------

/// Query interface computing top movers from the `listings` snapshots.
pub struct PriceDiffQuery<'a> {
    conn: &'a crate::connection::Connection,
    strategy: DiffStrategy,
}

impl<'a> PriceDiffQuery<'a> {
    /// Create a new `PriceDiffQuery` using the default strategy.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self::with_strategy(conn, DiffStrategy::default())
    }

    pub fn with_strategy(conn: &'a crate::connection::Connection, strategy: DiffStrategy) -> Self {
        Self { conn, strategy }
    }

    pub fn strategy(&self) -> DiffStrategy {
        self.strategy
    }

    /// Rank movers between `start_date` and `end_date` and return at most
    /// `limit` of them.
    ///
    /// Ties in the diff are broken by card name (then card id) in the same
    /// direction, so `Asc` is always the exact reverse of `Desc`. An empty
    /// vector is returned when either date has no qualifying listings.
    pub fn top_movers(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        limit: usize,
        order: SortOrder,
    ) -> Result<Vec<PriceDiffResult>> {
        if limit == 0 {
            return Err(CardPriceError::InvalidArgument(
                "limit must be greater than zero".into(),
            ));
        }
        if start_date > end_date {
            return Err(CardPriceError::InvalidArgument(format!(
                "start date {start_date} is after end date {end_date}"
            )));
        }

        let start = start_date.format(DATE_FORMAT).to_string();
        let end = end_date.format(DATE_FORMAT).to_string();

        log::debug!(
            "Computing top movers {}..{} strategy={:?} order={} limit={}",
            start,
            end,
            self.strategy,
            order,
            limit
        );

        let rows = match self.strategy {
            DiffStrategy::CanonicalPercent => {
                let sql = canonical_percent_sql(order, limit);
                let params = vec![start, end.clone(), end];
                self.conn
                    .query_rows("fetch price diffs", &sql, &params, |row| {
                        PriceDiffResult::from_row(row, |row, idx| {
                            Ok(PriceChange::Percent {
                                price_diff_pct: row.get(idx)?,
                            })
                        })
                    })
            }
            DiffStrategy::DailyAbsolute => {
                let sql = daily_absolute_sql(order, limit);
                let params = vec![start, end];
                self.conn
                    .query_rows("fetch daily price diffs", &sql, &params, |row| {
                        PriceDiffResult::from_row(row, |row, idx| {
                            Ok(PriceChange::Absolute {
                                price_diff: row.get(idx)?,
                            })
                        })
                    })
            }
        }?;

        if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
            log::debug!(
                "{} mover(s), diff range {:?} .. {:?}",
                rows.len(),
                first.change.value(),
                last.change.value()
            );
        }
        Ok(rows)
    }

    /// [`top_movers`](Self::top_movers) driven by parsed query parameters.
    pub fn top_movers_with(&self, params: &PriceDiffParams) -> Result<Vec<PriceDiffResult>> {
        self.top_movers(params.start_date, params.end_date, params.limit, params.order)
    }
}

// ---------------------------------------------------------------------------
// SQL
// ---------------------------------------------------------------------------

/// Whole-percent change of `diff_cents` over `start_cents`, rounded half away
/// from zero in integer arithmetic. NULL when the start price is zero.
const ROUNDED_PERCENT: &str = "CASE WHEN m.start_cents = 0 THEN NULL \
     ELSE CAST(SIGN(m.diff_cents) * SIGN(m.start_cents) \
          * ((200 * ABS(m.diff_cents) + ABS(m.start_cents)) // (2 * ABS(m.start_cents))) AS BIGINT) \
     END";

/// Params: start date, end date, end date.
fn canonical_percent_sql(order: SortOrder, limit: usize) -> String {
    let dir = order.as_sql();
    format!(
        r#"
        WITH canonical AS (
            SELECT
                l.id AS listing_id,
                l.card_id,
                l.price,
                l.created_at,
                l.created_date,
                c.name,
                c.collector_num,
                c.finish,
                c.image_uri
            FROM listings l
            JOIN cards c ON l.card_id = c.id
            WHERE c.finish = '{finish}'
              AND COALESCE(c.alt_style, '') = ''
        ),
        start_min AS (
            SELECT name, MIN(price) AS start_price
            FROM canonical
            WHERE created_date = CAST(? AS DATE)
            GROUP BY name
        ),
        current_min AS (
            SELECT name, MIN(price) AS curr_price
            FROM canonical
            WHERE created_date = CAST(? AS DATE)
            GROUP BY name
        ),
        current_cheapest_printing AS (
            SELECT DISTINCT ON (name)
                listing_id,
                card_id,
                name,
                collector_num,
                finish,
                image_uri
            FROM canonical
            WHERE created_date = CAST(? AS DATE)
            ORDER BY name, price ASC, created_at DESC, listing_id DESC
        ),
        movement AS (
            SELECT
                sm.name,
                sm.start_price,
                cm.curr_price,
                CAST(sm.start_price * 100 AS BIGINT) AS start_cents,
                CAST((cm.curr_price - sm.start_price) * 100 AS BIGINT) AS diff_cents
            FROM start_min sm
            JOIN current_min cm ON sm.name = cm.name
            WHERE sm.start_price >= {floor} OR cm.curr_price >= {floor}
        )
        SELECT
            cp.listing_id,
            cp.card_id,
            cp.name,
            CAST(m.curr_price AS DOUBLE) AS curr_price,
            CAST(m.start_price AS DOUBLE) AS start_price,
            {pct} AS price_diff_pct,
            cp.collector_num,
            cp.finish,
            cp.image_uri
        FROM movement m
        JOIN current_cheapest_printing cp ON cp.name = m.name
        ORDER BY price_diff_pct {dir} {nulls}, cp.name {dir}, cp.card_id {dir}
        LIMIT {limit}
        "#,
        finish = CANONICAL_FINISH,
        floor = NOISE_FLOOR,
        pct = ROUNDED_PERCENT,
        dir = dir,
        nulls = order.nulls_sql(),
        limit = limit,
    )
}

/// Params: start date, end date.
fn daily_absolute_sql(order: SortOrder, limit: usize) -> String {
    let dir = order.as_sql();
    format!(
        r#"
        WITH daily AS (
            SELECT
                l.id AS listing_id,
                l.card_id,
                l.price,
                l.created_at,
                l.created_date,
                c.name,
                c.collector_num,
                c.finish,
                c.image_uri
            FROM listings l
            JOIN cards c ON l.card_id = c.id
            WHERE c.finish = '{finish}'
              AND c.alt_style IS NULL
        ),
        start_first AS (
            SELECT DISTINCT ON (card_id) card_id, price AS start_price
            FROM daily
            WHERE created_date = CAST(? AS DATE)
            ORDER BY card_id, created_at ASC, listing_id ASC
        ),
        end_last AS (
            SELECT DISTINCT ON (card_id)
                listing_id, card_id, name, price AS curr_price, collector_num, finish, image_uri
            FROM daily
            WHERE created_date = CAST(? AS DATE)
            ORDER BY card_id, created_at DESC, listing_id DESC
        )
        SELECT
            e.listing_id,
            e.card_id,
            e.name,
            CAST(e.curr_price AS DOUBLE) AS curr_price,
            CAST(s.start_price AS DOUBLE) AS start_price,
            CAST(e.curr_price - s.start_price AS DOUBLE) AS price_diff,
            e.collector_num,
            e.finish,
            e.image_uri
        FROM start_first s
        JOIN end_last e ON s.card_id = e.card_id
        ORDER BY price_diff {dir}, e.name {dir}, e.card_id {dir}
        LIMIT {limit}
        "#,
        finish = CANONICAL_FINISH,
        dir = dir,
        limit = limit,
    )
}
