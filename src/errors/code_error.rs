use std::fmt;

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use serde_derive::Serialize;
use tracing::Level;
use utoipa::ToSchema;

use crate::{
    domain::pagination::PageRequestError, repository::StoreError, services::error::ServiceError,
};

pub type HandlerResponse<T> = Result<T, CodeErrorResp>;

pub struct CodeError {
    pub success: bool,
    pub error_code: u16,
    pub http_status_code: StatusCode,
    pub message: &'static str,
    pub log_level: Level,
}

impl CodeError {
    pub const POOL_ERROR: CodeError = CodeError {
        success: false,
        error_code: 0,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Could not get a connection out of the pool",
        log_level: Level::ERROR,
    };
    pub const DB_QUERY_ERROR: CodeError = CodeError {
        success: false,
        error_code: 1,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Database query failed",
        log_level: Level::ERROR,
    };
    pub const VALIDATION_ERROR: CodeError = CodeError {
        success: false,
        error_code: 2,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Request failed validation",
        log_level: Level::INFO,
    };
    pub const CONFLICT: CodeError = CodeError {
        success: false,
        error_code: 3,
        http_status_code: StatusCode::CONFLICT,
        message: "Resource already exists",
        log_level: Level::INFO,
    };
    pub const NOT_FOUND: CodeError = CodeError {
        success: false,
        error_code: 4,
        http_status_code: StatusCode::NOT_FOUND,
        message: "Resource not found",
        log_level: Level::INFO,
    };
    pub const FORBIDDEN: CodeError = CodeError {
        success: false,
        error_code: 5,
        http_status_code: StatusCode::FORBIDDEN,
        message: "Not permitted",
        log_level: Level::WARN,
    };
    pub const UNAUTHORIZED_ACCESS: CodeError = CodeError {
        success: false,
        error_code: 6,
        http_status_code: StatusCode::UNAUTHORIZED,
        message: "Could not validate credentials",
        log_level: Level::WARN,
    };
    pub const CREDENTIAL_ERROR: CodeError = CodeError {
        success: false,
        error_code: 7,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Credential processing failed",
        log_level: Level::ERROR,
    };
    pub const UPLOAD_FAILED: CodeError = CodeError {
        success: false,
        error_code: 8,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Upload rejected",
        log_level: Level::INFO,
    };
    pub const INVALID_REQUEST: CodeError = CodeError {
        success: false,
        error_code: 9,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Malformed request",
        log_level: Level::INFO,
    };
}

pub fn code_err(cerr: CodeError, e: impl ToString) -> CodeErrorResp {
    CodeErrorResp {
        success: cerr.success,
        error_code: cerr.error_code,
        http_status_code: cerr.http_status_code,
        message: cerr.message.to_string(),
        error_message: e.to_string(),
        log_level: cerr.log_level,
    }
}

impl From<CodeError> for CodeErrorResp {
    fn from(cerr: CodeError) -> Self {
        let detail = cerr.message;
        code_err(cerr, detail)
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CodeErrorResp {
    pub success: bool,
    pub error_code: u16,
    #[serde(serialize_with = "serialize_status_code")]
    #[schema(value_type = u16)]
    pub http_status_code: StatusCode,
    pub message: String,
    pub error_message: String,
    #[serde(skip)]
    pub log_level: Level,
}

fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

impl fmt::Display for CodeErrorResp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.error_message)
    }
}

impl std::error::Error for CodeErrorResp {}

impl From<ServiceError> for CodeErrorResp {
    fn from(e: ServiceError) -> Self {
        match &e {
            ServiceError::Validation(_) => code_err(CodeError::VALIDATION_ERROR, e),
            ServiceError::Conflict { .. } => code_err(CodeError::CONFLICT, e),
            ServiceError::NotFound { .. } => code_err(CodeError::NOT_FOUND, e),
            ServiceError::Permission(_) => code_err(CodeError::FORBIDDEN, e),
            ServiceError::Unauthenticated(_) => code_err(CodeError::UNAUTHORIZED_ACCESS, e),
            ServiceError::Storage(StoreError::Connection { .. }) => {
                code_err(CodeError::POOL_ERROR, e)
            }
            ServiceError::Storage(_) => code_err(CodeError::DB_QUERY_ERROR, e),
            ServiceError::Credential(_) => code_err(CodeError::CREDENTIAL_ERROR, e),
        }
    }
}

impl From<PageRequestError> for CodeErrorResp {
    fn from(e: PageRequestError) -> Self {
        code_err(CodeError::VALIDATION_ERROR, e)
    }
}

fn header_safe(value: &str) -> HeaderValue {
    let cleaned: String = value
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect();
    HeaderValue::from_str(&cleaned).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Error details ride out on `x-error-*` headers so the logging layer can
/// emit one ERSP line; it strips them before the response leaves.
impl IntoResponse for CodeErrorResp {
    fn into_response(self) -> axum::response::Response {
        let mut headers = HeaderMap::new();
        headers.insert("x-error-log-level", header_safe(self.log_level.as_str()));
        headers.insert(
            "x-error-status-code",
            header_safe(&self.http_status_code.as_u16().to_string()),
        );
        headers.insert("x-error-code", header_safe(&self.error_code.to_string()));
        headers.insert("x-error-message", header_safe(&self.message));
        headers.insert("x-error-detail", header_safe(&self.error_message));

        let status = self.http_status_code;
        (status, headers, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(ServiceError::validation("bad"), StatusCode::BAD_REQUEST)]
    #[case(ServiceError::conflict("email", "a@b.c"), StatusCode::CONFLICT)]
    #[case(ServiceError::not_found("post", 1), StatusCode::NOT_FOUND)]
    #[case(ServiceError::permission("Inactive user"), StatusCode::FORBIDDEN)]
    #[case(ServiceError::unauthenticated("no"), StatusCode::UNAUTHORIZED)]
    #[case(
        ServiceError::Storage(StoreError::query("boom")),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[case(ServiceError::Credential("argon".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn service_errors_map_to_status(#[case] error: ServiceError, #[case] status: StatusCode) {
        let resp = CodeErrorResp::from(error);
        assert_eq!(resp.http_status_code, status);
    }

    #[test]
    fn error_detail_travels_in_headers() {
        let resp = CodeErrorResp::from(ServiceError::permission("Inactive user")).into_response();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let headers = resp.headers();
        assert_eq!(headers.get("x-error-status-code").unwrap(), "403");
        assert_eq!(headers.get("x-error-detail").unwrap(), "Inactive user");
        assert_eq!(headers.get("x-error-log-level").unwrap(), "WARN");
    }

    #[test]
    fn bad_page_size_is_a_validation_error() {
        let err = crate::domain::pagination::PageRequest::new(1, 0, 100).unwrap_err();
        assert_eq!(
            CodeErrorResp::from(err).http_status_code,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn non_ascii_detail_does_not_break_headers() {
        let resp = code_err(CodeError::VALIDATION_ERROR, "café\nbad").into_response();
        assert_eq!(resp.headers().get("x-error-detail").unwrap(), "caf??bad");
    }
}
