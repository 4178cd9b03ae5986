use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::auth::AuthError;

/// Code returned for requests rejected by shape validation.
pub const INVALID_ARGUMENT_CODE: u16 = 1000;

/// Error as the client sees it: a status, a short message and a stable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub code: u16,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    code: u16,
}

impl ApiError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into(), code: INVALID_ARGUMENT_CODE }
    }

    /// Translate a domain failure. `internal_message` replaces the detail of
    /// `Internal` errors, which never leaves the process.
    pub fn from_auth(err: &AuthError, internal_message: &'static str) -> Self {
        let (status, message) = match err {
            AuthError::InvalidCredentials => (StatusCode::BAD_REQUEST, "invalid email or password"),
            AuthError::InvalidAppId => (StatusCode::BAD_REQUEST, "invalid app_id"),
            AuthError::UserAlreadyExists => (StatusCode::CONFLICT, "user already exists"),
            AuthError::NotFound => (StatusCode::NOT_FOUND, "user not found"),
            AuthError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, internal_message),
        };
        Self { status, message: message.to_string(), code: err.code() }
    }
}

/// A body that is not a JSON object of the expected shape (wrong content type,
/// null or wrong-typed field, number out of range) is an invalid argument too.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_argument(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: &self.message, code: self.code };
        (self.status, Json(body)).into_response()
    }
}
