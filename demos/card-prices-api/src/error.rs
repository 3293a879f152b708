use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// Renders as a JSON `{"error": "..."}` response with an HTTP status code.
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<card_prices::CardPriceError> for AppError {
    fn from(e: card_prices::CardPriceError) -> Self {
        if e.is_internal() {
            // Store details stay in the log; callers get a generic message.
            log::error!("{e}");
            AppError::internal("internal server error")
        } else {
            AppError::bad_request(e.to_string())
        }
    }
}
