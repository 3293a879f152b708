//! SELECT builder used by the card engine.
//!
//! Caller text only ever reaches the statement as a bound `?` parameter.
//! Name filters are literal: `%` and `_` in a search term match themselves.
//!
//! ```rust
//! use card_prices::{NameMatch, SqlBuilder};
//!
//! let (sql, params) = SqlBuilder::new("cards c")
//!     .select(&["c.id", "c.name"])
//!     .where_name(NameMatch::Substring, "c.name", "bolt")
//!     .order_by(&["c.name"])
//!     .limit(10)
//!     .build();
//! assert!(sql.contains("contains(lower(c.name), lower(?))"));
//! assert_eq!(params, vec!["bolt"]);
//! ```

use crate::queries::NameMatch;

pub struct SqlBuilder {
    columns: Vec<String>,
    source: String,
    joins: Vec<String>,
    filters: Vec<String>,
    params: Vec<String>,
    ordering: Vec<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl SqlBuilder {
    /// Start a `SELECT *` over `source`, a table optionally followed by an
    /// alias (`"cards c"`).
    pub fn new(source: &str) -> Self {
        Self {
            columns: Vec::new(),
            source: source.to_string(),
            joins: Vec::new(),
            filters: Vec::new(),
            params: Vec::new(),
            ordering: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn select(&mut self, columns: &[&str]) -> &mut Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Append a full join expression, e.g. `"LEFT JOIN listings l ON ..."`.
    pub fn join(&mut self, clause: &str) -> &mut Self {
        self.joins.push(clause.to_string());
        self
    }

    /// Filter `column` by a user-supplied card name.
    ///
    /// An empty `name` adds no filter. [`NameMatch::Substring`] is a
    /// case-insensitive, wildcard-free containment test;
    /// [`NameMatch::Exact`] compares the whole value, case-sensitively.
    pub fn where_name(&mut self, mode: NameMatch, column: &str, name: &str) -> &mut Self {
        if name.is_empty() {
            return self;
        }
        self.filters.push(match mode {
            NameMatch::Substring => format!("contains(lower({column}), lower(?))"),
            NameMatch::Exact => format!("{column} = ?"),
        });
        self.params.push(name.to_string());
        self
    }

    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.ordering.extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset = Some(n);
        self
    }

    /// Render the statement, one clause per line, with its parameters in
    /// placeholder order.
    pub fn build(&self) -> (String, Vec<String>) {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };

        let mut sql = format!("SELECT {columns}\nFROM {}", self.source);
        for join in &self.joins {
            sql.push('\n');
            sql.push_str(join);
        }
        if !self.filters.is_empty() {
            sql.push_str("\nWHERE ");
            sql.push_str(&self.filters.join(" AND "));
        }
        if !self.ordering.is_empty() {
            sql.push_str("\nORDER BY ");
            sql.push_str(&self.ordering.join(", "));
        }
        if let Some(n) = self.limit {
            sql.push_str(&format!("\nLIMIT {n}"));
        }
        if let Some(n) = self.offset {
            sql.push_str(&format!("\nOFFSET {n}"));
        }

        (sql, self.params.clone())
    }
}
