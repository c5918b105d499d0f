//! API response types and the error envelope

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::transfer::{ErrorKind, Transfer, TransferError, TransferPage};

// ============================================================================
// Success envelopes
// ============================================================================

/// Single-transfer envelope: `{"transfer": {...}}`
#[derive(Debug, Serialize, ToSchema)]
pub struct TransferEnvelope {
    pub transfer: Transfer,
}

/// Paged history listing
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferListResponse {
    pub data: Vec<Transfer>,
    #[schema(example = 1)]
    pub page: i64,
    #[schema(example = 20)]
    pub page_size: i64,
    #[schema(example = 42)]
    pub total: i64,
}

impl From<TransferPage> for TransferListResponse {
    fn from(page: TransferPage) -> Self {
        Self {
            data: page.data,
            page: page.page,
            page_size: page.page_size,
            total: page.total,
        }
    }
}

// ============================================================================
// Error envelope
// ============================================================================

/// Error body: `{"error": CODE, "message": human readable}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "VALIDATION_ERROR")]
    pub error: &'static str,
    #[schema(example = "amount must be positive")]
    pub message: String,
}

/// Error half of every handler result; renders as status + [`ErrorBody`].
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        let status = StatusCode::from_u16(err.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        // Store internals stay in the logs, not in client responses.
        let message = if err.kind() == ErrorKind::System {
            tracing::error!("internal error: {err}");
            "an unexpected error occurred".to_string()
        } else {
            err.to_string()
        };
        Self {
            status,
            body: ErrorBody {
                error: err.code(),
                message,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_rule_maps_to_409() {
        let api_err = ApiError::from(TransferError::SenderInactive);
        assert_eq!(api_err.status, StatusCode::CONFLICT);
        assert_eq!(api_err.body.error, "BUSINESS_RULE_VIOLATION");
        assert_eq!(api_err.body.message, "sender inactive");
    }

    #[test]
    fn test_validation_maps_to_400() {
        let api_err = ApiError::from(TransferError::InvalidAmount);
        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_err.body.error, "VALIDATION_ERROR");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let api_err = ApiError::from(TransferError::TransferNotFound("k".into()));
        assert_eq!(api_err.status, StatusCode::NOT_FOUND);
        assert_eq!(api_err.body.error, "NOT_FOUND");
    }

    #[test]
    fn test_system_error_message_is_masked() {
        let api_err = ApiError::from(TransferError::Store("connection refused".into()));
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.body.error, "INTERNAL_ERROR");
        assert_eq!(api_err.body.message, "an unexpected error occurred");
    }

    #[test]
    fn test_error_body_shape() {
        let api_err = ApiError::from(TransferError::SameAccount);
        let json = serde_json::to_value(&api_err.body).unwrap();
        assert_eq!(json["error"], "VALIDATION_ERROR");
        assert!(json["message"].is_string());
    }
}
