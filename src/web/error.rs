//! Web page errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures while rendering the page
#[derive(Debug, Error)]
pub enum WebError {
    /// The on-demand USD rate could not be fetched
    #[error("Error fetching USD rate: {0}")]
    UsdRate(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Page render failed");
        let message = match self {
            WebError::UsdRate(_) => "Error fetching USD rate",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
