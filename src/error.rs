use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// ApiError
///
/// The request-level error taxonomy. Every failure a handler (or extractor)
/// can produce falls into exactly one of these categories, and each category
/// maps to a fixed HTTP status. No error is retried; all are terminal for the
/// request that raised them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed or illegal input (bad enum value, unparseable id). 400.
    #[error("{0}")]
    InputValidation(String),

    /// Missing/invalid/expired token, unknown identity, or bad credentials. 401.
    ///
    /// The message is kept uniform within each failure class so a caller
    /// cannot tell an unknown login from a wrong password, or a forged token
    /// from one whose subject no longer exists.
    #[error("{0}")]
    Authentication(String),

    /// The referenced listing does not exist. 404.
    #[error("{0}")]
    NotFound(String),

    /// The server is missing required configuration (signing secret). 500.
    /// Fatal to the request, not to the process.
    #[error("{0}")]
    Configuration(String),

    /// Underlying persistence failure. 500, with a generic external message.
    #[error("{0}")]
    Storage(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InputValidation(_) => StatusCode::BAD_REQUEST,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Configuration(_) | ApiError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// ErrorBody
///
/// The JSON shape of every failure response: a single `error` message string.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    /// The internal database error is logged here and replaced with a generic
    /// message; storage details never reach the caller.
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("storage failure: {:?}", err);
        ApiError::Storage("Unexpected storage failure".to_string())
    }
}
