use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

/// HTTP-facing error. Domain errors are folded into the three classes the
/// API contract exposes: 400, 404 and 500. Conflict-class domain errors
/// (insufficient stock, deleting a paid order) surface as 400 per contract.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(msg) | DomainError::Conflict(msg) => AppError::BadRequest(msg),
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::Database(err) => AppError::Internal(err.to_string()),
            DomainError::Pool(err) => AppError::Internal(err.to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::NotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn bad_request_returns_400() {
        let resp = AppError::BadRequest("insufficient stock".to_string()).error_response();
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("order with id 1 not found".to_string()).error_response();
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let app_err: AppError = DomainError::validation("a buyer id is required").into();
        assert!(matches!(app_err, AppError::BadRequest(_)));
    }

    #[test]
    fn conflict_maps_to_bad_request() {
        let app_err: AppError = DomainError::conflict("a paid order cannot be deleted").into();
        assert!(matches!(app_err, AppError::BadRequest(_)));
    }

    #[test]
    fn not_found_maps_to_not_found() {
        let app_err: AppError = DomainError::not_found("order with id 7 not found").into();
        assert!(matches!(app_err, AppError::NotFound(_)));
    }

    #[test]
    fn internal_keeps_the_underlying_message() {
        let app_err: AppError = DomainError::Internal("oops".to_string()).into();
        assert_eq!(app_err.to_string(), "Internal error: oops");
    }
}
