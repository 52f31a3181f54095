//! Common API DTOs and error mapping

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope
///
/// Every REST endpoint returns data in this wrapper.
/// On success: `{"success": true, "data": {...}}`,
/// on error: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty response for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// Pagination parameters for list requests
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PaginationParams {
    /// Page number (1-based). Default: 1
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (1-100). Default: 50
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

/// Paginated response: one page of items plus page metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    /// Items on the current page
    pub items: Vec<T>,
    /// Total item count across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Total number of pages
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = ((total as f64) / (limit as f64)).ceil() as u32;
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

// ── Domain error → HTTP response ───────────────────────────────

/// Responder wrapping a `DomainError`; handlers return
/// `Result<_, ApiError>` and use `?` on service calls.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::SlotNotFound(_)
            | DomainError::BookingNotFound(_)
            | DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::DuplicateActiveBooking
            | DomainError::SlotTimeConflict
            | DomainError::InvalidTransition { .. }
            | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::NotAuthorized(_) => StatusCode::FORBIDDEN,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "Request failed");
        }
        let body = Json(ApiResponse::<EmptyData>::error(self.0.to_string()));
        (status, body).into_response()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shapes() {
        let ok = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"], 42);
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(ApiResponse::<i32>::error("boom")).unwrap();
        assert_eq!(err["success"], false);
        assert_eq!(err["error"], "boom");
    }

    #[test]
    fn pagination_math() {
        let page = PaginatedResponse::new(vec![1, 2], 5, 1, 2);
        assert_eq!(page.total_pages, 3);
        let page = PaginatedResponse::new(Vec::<i32>::new(), 0, 1, 10);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn error_status_mapping() {
        assert_eq!(
            ApiError(DomainError::SlotNotFound("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(DomainError::DuplicateActiveBooking).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(DomainError::SlotTimeConflict).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(DomainError::NotAuthorized("no".into())).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError(DomainError::invalid_transition("completed", "cancelled")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(DomainError::Storage("db".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
