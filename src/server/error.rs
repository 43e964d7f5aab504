//! Error-to-HTTP response conversion for the JSON error paths.
//!
//! Update and delete report failures as `{"message": ..., "type": "danger"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use userbook_common::{Error, StatusMessage};

/// A failed write reported to the client as a JSON status message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: StatusMessage,
}

impl ApiError {
    pub fn new(status: StatusCode, message: StatusMessage) -> Self {
        Self { status, message }
    }

    /// The record does not exist (or the id could never name one).
    pub fn user_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, StatusMessage::danger("User not found"))
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        let status = match &e {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Database(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self::new(status, StatusMessage::danger(e.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                error = %self.message.message,
                "Server error in user handler"
            );
        }

        (self.status, Json(self.message)).into_response()
    }
}
