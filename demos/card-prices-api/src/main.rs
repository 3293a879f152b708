mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use state::AppState;

const DEFAULT_PORT: &str = "8080";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the process environment still applies.
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut builder = card_prices::AsyncCardPrices::builder();
    if let Ok(path) = std::env::var("CARD_PRICES_DB") {
        builder = builder.path(path);
    }
    let prices = builder.build().await?;
    prices.ping().await?;
    log::info!("Card price store ready");

    let origin = std::env::var("CORS_ORIGIN").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.into());
    let cors = CorsLayer::new()
        .allow_origin(origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET]);

    let state = Arc::new(AppState { prices });

    let app = Router::new()
        .route("/api/cards", get(routes::cards::list_cards))
        .route("/api/cards/suggest", get(routes::cards::suggest_cards))
        .route("/api/listings", get(routes::listings::top_movers))
        .layer(cors)
        .with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.into());
    let addr = format!("0.0.0.0:{port}");
    log::info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
