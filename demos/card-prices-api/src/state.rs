/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// The async store wrapper. Engine calls run on the blocking pool.
    pub prices: card_prices::AsyncCardPrices,
}
