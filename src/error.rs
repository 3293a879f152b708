#[derive(Debug, thiserror::Error)]
pub enum CardPriceError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// A named engine query failed against the store.
    #[error("failed to {context}: {source}")]
    Query {
        context: &'static str,
        #[source]
        source: duckdb::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CardPriceError {
    /// Wrap a DuckDB error with the name of the query that produced it.
    pub fn query(context: &'static str) -> impl FnOnce(duckdb::Error) -> Self {
        move |source| CardPriceError::Query { context, source }
    }

    /// True for failures of the store itself, as opposed to bad caller input.
    pub fn is_internal(&self) -> bool {
        !matches!(self, CardPriceError::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, CardPriceError>;
