use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::errors::SubscriptionError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// HTTP face of [`SubscriptionError`].
#[derive(Debug, Error)]
#[error(transparent)]
pub struct AppError(#[from] pub SubscriptionError);

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            err if err.is_client_error() => StatusCode::BAD_REQUEST,
            SubscriptionError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self.0 {
            SubscriptionError::Storage(err) => {
                // Detail stays in the log.
                error!(status = status.as_u16(), error = ?err, "http: request failed");
                "internal server error".to_string()
            }
            other => {
                warn!(status = status.as_u16(), error = %other, "http: request rejected");
                other.to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        let errors = [
            SubscriptionError::ValidationFailed("service_name: too short".into()),
            SubscriptionError::InvalidDateFormat("2025-01".into()),
            SubscriptionError::InvalidPrice,
            SubscriptionError::InvalidDateRange,
            SubscriptionError::InvalidPeriod,
            SubscriptionError::MissingPeriod,
            SubscriptionError::InvalidPeriodBound {
                bound: "from",
                value: "2025-01".into(),
            },
            SubscriptionError::InvalidQuery,
            SubscriptionError::InvalidIdentifier("id"),
            SubscriptionError::InvalidBody,
        ];

        for err in errors {
            assert_eq!(AppError(err).status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn missing_subscription_maps_to_not_found() {
        assert_eq!(
            AppError(SubscriptionError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn storage_failure_hides_detail() {
        let response =
            AppError(SubscriptionError::Storage(anyhow::anyhow!("connection refused")))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
