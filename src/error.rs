//! Errors returned by timer commands

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{settings::SettingsError, store::StoreError};

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl IntoResponse for TimerError {
    fn into_response(self) -> Response {
        let status = match self {
            TimerError::InvalidSettings { .. } | TimerError::MalformedRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            TimerError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
