//! Application error types and their HTTP renderings.
//!
//! Pages render errors as HTML; the API renders them as JSON. Both carry the
//! request id so a user report can be matched to the logs.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::middleware::RequestId;
use crate::picker::PickError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Pick(#[from] PickError),

    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Pick(PickError::BackingStoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error kind for API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Pick(PickError::BackingStoreUnavailable(_)) => "backing_store_unavailable",
            AppError::Pick(PickError::EmptyCatalog) => "empty_catalog",
            AppError::Template(_) | AppError::Internal(_) => "internal",
        }
    }

    /// Message safe to show to users.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Pick(e) => e.to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    fn log(&self, request_id: &RequestId) {
        match self {
            AppError::Pick(PickError::BackingStoreUnavailable(_)) => {
                tracing::warn!(request_id = %request_id.0, error = %self, "Backing store unavailable");
            }
            _ => {
                tracing::error!(request_id = %request_id.0, error = ?self, "Request failed");
            }
        }
    }
}

/// An `AppError` rendered as an HTML error page.
#[derive(Debug)]
pub struct AppErrorResponse {
    pub error: AppError,
    pub request_id: RequestId,
}

impl IntoResponse for AppErrorResponse {
    fn into_response(self) -> Response {
        self.error.log(&self.request_id);
        let status = self.error.status();

        let body = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Error {}</title>
    <link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
    <div class="container">
        <div class="error-page">
            <h1>Error {}</h1>
            <p>{}</p>
            <p class="request-id">Request ID: {}</p>
            <a href="/">Return to homepage</a>
        </div>
    </div>
</body>
</html>"#,
            status.as_u16(),
            status.as_u16(),
            self.error.public_message(),
            self.request_id.0
        );

        (status, no_store(), Html(body)).into_response()
    }
}

/// JSON body returned by API endpoints on failure.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: &'static str,
    pub message: String,
    pub request_id: String,
}

/// An `AppError` rendered as JSON.
#[derive(Debug)]
pub struct ApiErrorResponse {
    pub error: AppError,
    pub request_id: RequestId,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        self.error.log(&self.request_id);

        let body = ApiErrorBody {
            error: self.error.kind(),
            message: self.error.public_message(),
            request_id: self.request_id.0.to_string(),
        };

        (self.error.status(), no_store(), Json(body)).into_response()
    }
}

/// Error responses must not be kept by shared caches.
fn no_store() -> [(header::HeaderName, HeaderValue); 1] {
    [(
        header::CACHE_CONTROL,
        HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
    )]
}

/// Attach a request id to an error on its way out of a handler.
pub trait ResultExt<T> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse>;

    fn with_api_request_id(self, request_id: &RequestId) -> Result<T, ApiErrorResponse>;
}

impl<T, E: Into<AppError>> ResultExt<T> for Result<T, E> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse> {
        self.map_err(|e| AppErrorResponse {
            error: e.into(),
            request_id: request_id.clone(),
        })
    }

    fn with_api_request_id(self, request_id: &RequestId) -> Result<T, ApiErrorResponse> {
        self.map_err(|e| ApiErrorResponse {
            error: e.into(),
            request_id: request_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use uuid::Uuid;

    use super::*;
    use crate::store::StoreError;

    fn unavailable() -> AppError {
        AppError::Pick(PickError::BackingStoreUnavailable(StoreError::Timeout(
            Duration::from_secs(1),
        )))
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(unavailable().status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            AppError::Pick(PickError::EmptyCatalog).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(unavailable().kind(), "backing_store_unavailable");
        assert_eq!(AppError::Pick(PickError::EmptyCatalog).kind(), "empty_catalog");
        assert_eq!(AppError::Internal("boom".into()).kind(), "internal");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Internal("secret path /etc/shadow".into());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_api_error_response_status() {
        let response = ApiErrorResponse {
            error: unavailable(),
            request_id: RequestId(Uuid::nil()),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_error_page_is_not_cacheable() {
        let response = AppErrorResponse {
            error: AppError::Internal("template missing".into()),
            request_id: RequestId(Uuid::nil()),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    }

    #[test]
    fn test_result_ext_attaches_request_id() {
        let id = RequestId(Uuid::new_v4());
        let result: Result<(), PickError> = Err(PickError::EmptyCatalog);
        let err = result.with_api_request_id(&id).unwrap_err();
        assert_eq!(err.request_id.0, id.0);
        assert!(matches!(err.error, AppError::Pick(PickError::EmptyCatalog)));
    }
}
