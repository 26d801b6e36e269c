use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

const INTERNAL_MESSAGE: &str = "internal server error";

/// JSON error body: `{"error": title, "message": detail, "code": n}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
    pub code: u16,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail, code: status.as_u16() }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.title,
            "message": self.detail.unwrap_or_default(),
            "code": self.code,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let code = e.code();
        let api = match &e {
            ServiceError::NotFound(msg) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg.clone())),
            ServiceError::Conflict(msg) => JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(msg.clone())),
            _ if e.is_validation() => JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string())),
            _ => {
                // 细节只写日志，不返回给调用方
                error!(err = %e, code, "request failed");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", Some(INTERNAL_MESSAGE.into()))
            }
        };
        api.with_code(code)
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
