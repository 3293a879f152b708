//! Lenient parsing of raw query-string values into engine inputs.
//!
//! Nothing here fails: malformed or out-of-range values fall back to their
//! defaults, matching how the HTTP surface has always treated bad input.

use chrono::{Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::config::{
    DATE_FORMAT, DEFAULT_CARD_LIMIT, DEFAULT_MOVERS_LIMIT, DEFAULT_PAGE, DEFAULT_SUGGEST_LIMIT,
    MAX_LIMIT,
};
use crate::error::CardPriceError;

// ---------------------------------------------------------------------------
// SortOrder
// ---------------------------------------------------------------------------

/// Ranking direction for top movers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse a query value, treating anything unrecognised as `Desc`.
    pub fn from_param(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// NULL placement that keeps `Asc` the exact reverse of `Desc`.
    pub fn nulls_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "NULLS LAST",
            SortOrder::Desc => "NULLS FIRST",
        }
    }
}

impl FromStr for SortOrder {
    type Err = CardPriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(CardPriceError::InvalidArgument(format!(
                "unknown sort order: {other}"
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

// ---------------------------------------------------------------------------
// Card listing / suggestion params
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardListParams {
    pub name: String,
    pub page: usize,
    pub limit: usize,
}

impl Default for CardListParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_CARD_LIMIT,
        }
    }
}

impl CardListParams {
    pub fn from_query(name: Option<&str>, page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            name: name.unwrap_or_default().to_string(),
            page: parse_positive(page, usize::MAX).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit, MAX_LIMIT).unwrap_or(DEFAULT_CARD_LIMIT),
        }
    }

    /// Rows to skip for the requested page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestParams {
    pub name: String,
    pub limit: usize,
}

impl SuggestParams {
    pub fn from_query(name: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            name: name.unwrap_or_default().to_string(),
            limit: parse_positive(limit, MAX_LIMIT).unwrap_or(DEFAULT_SUGGEST_LIMIT),
        }
    }
}

// ---------------------------------------------------------------------------
// PriceDiffParams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceDiffParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub limit: usize,
    pub order: SortOrder,
}

impl PriceDiffParams {
    /// Build params from raw values. `today` is the UTC date used when no end
    /// date is given; the start date defaults to the day before the end date.
    pub fn from_query(
        start_date: Option<&str>,
        end_date: Option<&str>,
        order: Option<&str>,
        limit: Option<&str>,
        today: NaiveDate,
    ) -> Self {
        let end_date = parse_date(end_date).unwrap_or(today);
        let day_before = end_date - Duration::days(1);
        let start_date = parse_date(start_date)
            .filter(|start| *start <= end_date)
            .unwrap_or(day_before);

        Self {
            start_date,
            end_date,
            limit: parse_positive(limit, MAX_LIMIT).unwrap_or(DEFAULT_MOVERS_LIMIT),
            order: SortOrder::from_param(order),
        }
    }

    /// Params for the default window ending on `today`.
    pub fn ending(today: NaiveDate) -> Self {
        Self::from_query(None, None, None, None, today)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_positive(value: Option<&str>, max: usize) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0 && *n <= max)
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v.trim(), DATE_FORMAT).ok())
}
