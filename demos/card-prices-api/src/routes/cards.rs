use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use card_prices::{CardListParams, SuggestParams};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

// Raw strings so malformed values fall back to defaults instead of a 400.
#[derive(Deserialize)]
pub struct ListCardsParams {
    pub name: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Deserialize)]
pub struct SuggestCardsParams {
    pub name: Option<String>,
    pub limit: Option<String>,
}

/// GET /api/cards?name=bolt&page=1&limit=50
///
/// Cards matching a name substring with their most recent price, priciest first.
pub async fn list_cards(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListCardsParams>,
) -> Result<Json<Value>, AppError> {
    let params = CardListParams::from_query(
        params.name.as_deref(),
        params.page.as_deref(),
        params.limit.as_deref(),
    );
    let (page, limit) = (params.page, params.limit);

    let cards = state
        .prices
        .run(move |p| p.cards().list_with(&params))
        .await?;

    Ok(Json(json!({ "page": page, "limit": limit, "data": cards })))
}

/// GET /api/cards/suggest?name=bol&limit=20
///
/// One representative card per distinct matching name, for search boxes.
pub async fn suggest_cards(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestCardsParams>,
) -> Result<Json<Value>, AppError> {
    let params = SuggestParams::from_query(params.name.as_deref(), params.limit.as_deref());
    let limit = params.limit;

    let cards = state
        .prices
        .run(move |p| p.cards().suggest_names_with(&params))
        .await?;

    Ok(Json(json!({ "limit": limit, "data": cards })))
}
