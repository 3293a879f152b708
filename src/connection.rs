//! DuckDB store handle, schema setup and query execution.
//!
//! The handle owns one root database connection. Every query checks out its
//! own cloned connection, so concurrent callers never share a statement or
//! transaction; the root is locked only for the duration of the clone.

use crate::error::{CardPriceError, Result};
use duckdb::types::{TimeUnit, ValueRef};
use duckdb::{AccessMode, Config, Connection as DuckDbConnection, Row, ToSql};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

const SCHEMA: &str = r#"
CREATE SEQUENCE IF NOT EXISTS sets_id_seq START 1;
CREATE TABLE IF NOT EXISTS sets (
    id          BIGINT PRIMARY KEY DEFAULT nextval('sets_id_seq'),
    name        VARCHAR NOT NULL,
    code        VARCHAR NOT NULL UNIQUE,
    released_at DATE
);

CREATE SEQUENCE IF NOT EXISTS cards_id_seq START 1;
CREATE TABLE IF NOT EXISTS cards (
    id            BIGINT PRIMARY KEY DEFAULT nextval('cards_id_seq'),
    name          VARCHAR NOT NULL,
    set_id        BIGINT NOT NULL,
    collector_num VARCHAR NOT NULL,
    promo_type    VARCHAR NOT NULL DEFAULT '',
    finish        VARCHAR NOT NULL,
    alt_style     VARCHAR,
    image_uri     VARCHAR,
    UNIQUE (set_id, collector_num, promo_type, finish)
);

CREATE SEQUENCE IF NOT EXISTS listings_id_seq START 1;
CREATE TABLE IF NOT EXISTS listings (
    id           BIGINT PRIMARY KEY DEFAULT nextval('listings_id_seq'),
    card_id      BIGINT NOT NULL REFERENCES cards(id),
    price        DECIMAL(12, 2) NOT NULL,
    created_at   TIMESTAMP NOT NULL DEFAULT current_timestamp,
    created_date DATE NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_listings_card_date ON listings (card_id, created_date);
"#;

/// Shared store handle injected into every query engine.
pub struct Connection {
    root: Mutex<DuckDbConnection>,
}

impl Connection {
    /// Open (or create) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = DuckDbConnection::open(path.as_ref())?;
        log::info!("Opened card price store: {}", path.as_ref().display());
        Ok(Self::from_raw(conn))
    }

    /// Open an existing database file without write access.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::default().access_mode(AccessMode::ReadOnly)?;
        let conn = DuckDbConnection::open_with_flags(path.as_ref(), config)?;
        log::info!(
            "Opened card price store (read-only): {}",
            path.as_ref().display()
        );
        Ok(Self::from_raw(conn))
    }

    /// Open a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self::from_raw(conn))
    }

    /// Wrap an already opened DuckDB connection.
    pub fn from_raw(conn: DuckDbConnection) -> Self {
        Self {
            root: Mutex::new(conn),
        }
    }

    /// Create the `sets`, `cards` and `listings` tables if they are missing.
    pub fn init_schema(&self) -> Result<()> {
        self.execute_batch(SCHEMA)?;
        log::info!("Card price schema initialized");
        Ok(())
    }

    /// Check that the store answers a trivial query.
    pub fn ping(&self) -> Result<()> {
        let conn = self.checkout()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
            .map_err(CardPriceError::query("ping store"))?;
        Ok(())
    }

    /// Check out an independent connection to the same database.
    pub fn checkout(&self) -> Result<DuckDbConnection> {
        let root = self
            .root
            .lock()
            .map_err(|_| CardPriceError::StoreUnavailable("store lock poisoned".into()))?;
        Ok(root.try_clone()?)
    }

    /// Run one or more semicolon-separated statements without parameters.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.checkout()?.execute_batch(sql)?;
        Ok(())
    }

    /// Execute a parameterized query and decode every row with `decode`.
    ///
    /// `context` names the query in the error returned when execution fails.
    pub fn query_rows<T, F>(
        &self,
        context: &'static str,
        sql: &str,
        params: &[String],
        decode: F,
    ) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> duckdb::Result<T>,
    {
        let conn = self.checkout()?;
        let mut stmt = conn.prepare(sql).map_err(CardPriceError::query(context))?;

        let param_values: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();

        let rows = stmt
            .query_map(param_values.as_slice(), decode)
            .map_err(CardPriceError::query(context))?
            .collect::<duckdb::Result<Vec<T>>>()
            .map_err(CardPriceError::query(context))?;

        log::debug!("{}: {} row(s)", context, rows.len());
        Ok(rows)
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Escape hatch for ad-hoc queries; engine queries go through
    /// [`query_rows`](Self::query_rows) with typed decoders.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let conn = self.checkout()?;
        let mut stmt = conn.prepare(sql)?;

        let param_values: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the statement has run
        let (column_names, column_count) = {
            let executed = rows_result.as_ref().ok_or_else(|| {
                CardPriceError::StoreUnavailable("statement produced no result set".into())
            })?;
            let names: Vec<String> = executed
                .column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect();
            (names, executed.column_count())
        };

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::new();
            for (i, col_name) in column_names.iter().enumerate().take(column_count) {
                let value = convert_value_ref(row.get_ref(i)?);
                map.insert(col_name.clone(), value);
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let conn = self.checkout()?;
        let mut stmt = conn.prepare(sql)?;
        let param_values: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Append the rows of a newline-delimited JSON export to an existing table.
    ///
    /// Columns are matched by name; columns absent from the file take their
    /// table defaults. Returns the number of rows inserted.
    pub fn import_ndjson(&self, table_name: &str, ndjson_path: &str) -> Result<usize> {
        if table_name.is_empty()
            || !table_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(CardPriceError::InvalidArgument(format!(
                "invalid table name: {table_name}"
            )));
        }

        let path_fwd = ndjson_path.replace('\\', "/").replace('\'', "''");
        let inserted = self.checkout()?.execute(
            &format!(
                "INSERT INTO {} BY NAME SELECT * FROM read_json_auto('{}', format='newline_delimited')",
                table_name, path_fwd
            ),
            [],
        )?;
        log::info!("Imported {} row(s) into {}", inserted, table_name);
        Ok(inserted)
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => float_value(f as f64),
        ValueRef::Double(f) => float_value(f),
        ValueRef::Decimal(d) => d
            .to_string()
            .parse::<f64>()
            .map(float_value)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        ValueRef::Date32(days) => chrono::NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days as i64)))
            .map(|d| serde_json::Value::String(d.format(crate::config::DATE_FORMAT).to_string()))
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Timestamp(unit, value) => {
            let micros = match unit {
                TimeUnit::Second => value.saturating_mul(1_000_000),
                TimeUnit::Millisecond => value.saturating_mul(1_000),
                TimeUnit::Microsecond => value,
                TimeUnit::Nanosecond => value / 1_000,
            };
            chrono::DateTime::from_timestamp_micros(micros)
                .map(|ts| serde_json::Value::String(ts.naive_utc().to_string()))
                .unwrap_or(serde_json::Value::Null)
        }
        // Intervals, lists, structs and blobs are not part of the card schema
        _ => serde_json::Value::Null,
    }
}

fn float_value(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}
