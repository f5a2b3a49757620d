//! Mapping of action errors to HTTP responses.
//!
//! Every failure is returned as `{"error": <kind>, "message": <text>}` so
//! clients can branch on the kind instead of parsing messages.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::GritError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

pub fn status_for(error: &GritError) -> StatusCode {
    match error {
        GritError::WalletUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        GritError::WrongNetwork { .. } => StatusCode::CONFLICT,
        GritError::TransactionRejected(_) => StatusCode::BAD_GATEWAY,
        GritError::Decode { .. } => StatusCode::BAD_GATEWAY,
        GritError::Rpc(_) => StatusCode::BAD_GATEWAY,
        GritError::Timeout(_) | GritError::ConfirmationTimeout { .. } => {
            StatusCode::GATEWAY_TIMEOUT
        }
        GritError::Busy => StatusCode::TOO_MANY_REQUESTS,
        GritError::NotConnected => StatusCode::UNAUTHORIZED,
        GritError::GoalNotFound(_) => StatusCode::NOT_FOUND,
        GritError::AlreadyAchieved(_) => StatusCode::CONFLICT,
        GritError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        GritError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for GritError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::ChainId;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&GritError::Busy), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            status_for(&GritError::WrongNetwork {
                expected: ChainId(5),
                actual: ChainId(1)
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&GritError::WalletUnavailable("none".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&GritError::InvalidRequest("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&GritError::Config(crate::config::ConfigError::Validation(Vec::new()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body() {
        let response = GritError::GoalNotFound(9).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "goal_not_found");
        assert_eq!(body["message"], "Goal 9 not found");
    }
}
