//! Error types for the temperature lookup pipeline.
//!
//! Every failure in the pipeline is classified here and mapped to an HTTP
//! status exactly once, at the axum boundary. Resolvers never decide a
//! status themselves; they return the classified error verbatim.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::models::ErrorBody;

/// Main error type for the temperature lookup service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The postal code is not an 8-digit numeric string.
    #[error("invalid zipcode")]
    InvalidPostalCode,

    /// The address provider explicitly reported the postal code as unknown.
    #[error("can not find zipcode")]
    PostalCodeNotFound,

    /// An upstream provider answered with a non-success status.
    #[error("unexpected status code {status}")]
    UpstreamStatus { status: StatusCode },

    /// The request to an upstream provider could not be completed.
    #[error("requesting upstream service: {0}")]
    Transport(#[source] reqwest::Error),

    /// An upstream response body could not be decoded.
    #[error("decoding upstream response: {0}")]
    UpstreamDecode(#[source] reqwest::Error),

    /// The weather report carried no current-condition entry.
    #[error("no condition found")]
    NoConditionData,

    /// The weather report's Celsius field is not a number.
    #[error("converting temperature number: {0}")]
    TemperatureFormat(#[source] std::num::ParseFloatError),

    /// The entry service could not relay the request downstream.
    #[error("relaying request downstream: {0}")]
    Relay(#[source] reqwest::Error),
}

impl ServiceError {
    /// HTTP status for this error class.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidPostalCode => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::PostalCodeNotFound => StatusCode::NOT_FOUND,
            ServiceError::UpstreamStatus { .. }
            | ServiceError::Transport(_)
            | ServiceError::UpstreamDecode(_)
            | ServiceError::NoConditionData
            | ServiceError::TemperatureFormat(_)
            | ServiceError::Relay(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
