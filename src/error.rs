use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("No unspent outputs found: {0}")]
    NoUtxoFound(String),

    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),

    #[error("Value conservation violated: {0}")]
    ValueConservationViolation(String),

    #[error("Signing failed: {0}")]
    SigningFailure(String),

    #[error("Broadcast failed: {0}")]
    BroadcastFailure(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl IntoResponse for WalletError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            WalletError::InvalidKey(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::InvalidAddress(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::NoUtxoFound(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::InsufficientBalance(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::BroadcastFailure(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            WalletError::Network(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
