use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use card_prices::{PriceDiffParams, PriceDiffResult};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListingsParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub order: Option<String>,
    pub limit: Option<String>,
}

/// GET /api/listings?start_date=2024-05-01&end_date=2024-05-02&order=desc&limit=10
///
/// Top price movers between two snapshot dates. The end date defaults to
/// today (UTC) and the start date to the day before it.
pub async fn top_movers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingsParams>,
) -> Result<Json<Vec<PriceDiffResult>>, AppError> {
    let today = chrono::Utc::now().date_naive();
    let params = PriceDiffParams::from_query(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        params.order.as_deref(),
        params.limit.as_deref(),
        today,
    );
    log::debug!(
        "top movers {} .. {} ({}, limit {})",
        params.start_date,
        params.end_date,
        params.order,
        params.limit
    );

    let movers = state
        .prices
        .run(move |p| p.price_diffs().top_movers_with(&params))
        .await?;

    Ok(Json(movers))
}
