//! Errors surfaced by the service layer and their HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use travelblog_core::error::{DocumentStoreError, ErrorKind};

pub type BlogResult<T> = Result<T, BlogError>;

#[derive(Error, Debug)]
pub enum BlogError {
    /// A record or sub-record is absent. Carries the client-facing message.
    #[error("{0}")]
    NotFound(String),
    /// The write clashes with existing data.
    #[error("{0}")]
    Conflict(String),
    /// The request body or a field in it is malformed.
    #[error("{0}")]
    Validation(String),
    #[error("No current user")]
    Unauthorized,
    #[error(transparent)]
    Store(#[from] DocumentStoreError),
}

impl BlogError {
    pub fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_string())
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            BlogError::NotFound(_) => Some(ErrorKind::NotFound),
            BlogError::Conflict(_) => Some(ErrorKind::Conflict),
            BlogError::Validation(_) => Some(ErrorKind::ValidationFailure),
            BlogError::Unauthorized => None,
            BlogError::Store(e) => Some(e.kind()),
        }
    }

    fn status(&self) -> StatusCode {
        match self.kind() {
            None => StatusCode::UNAUTHORIZED,
            Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            Some(ErrorKind::Conflict | ErrorKind::ValidationFailure) => StatusCode::BAD_REQUEST,
            Some(ErrorKind::StorageUnavailable) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Client-facing message for a missing record of `collection`.
fn missing_message(collection: &str) -> &'static str {
    match collection {
        "users" => "User not found",
        "posts" => "Post not found",
        _ => "Record not found",
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            BlogError::Store(DocumentStoreError::DocumentNotFound(_, collection)) => {
                json!({ "error": missing_message(collection) })
            }
            BlogError::Store(DocumentStoreError::Conflict(message)) => json!({ "error": message }),
            BlogError::Store(DocumentStoreError::InvalidDocument(details)) => {
                json!({ "error": "Invalid document", "details": details })
            }
            BlogError::Store(e) => {
                error!(error = %e, "storage failure");
                json!({ "error": "Storage unavailable", "details": e.to_string() })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kinds() {
        let cases = [
            (BlogError::not_found("User not found"), StatusCode::NOT_FOUND),
            (BlogError::Conflict("Post already in favorites".into()), StatusCode::BAD_REQUEST),
            (BlogError::Validation("email is required".into()), StatusCode::BAD_REQUEST),
            (BlogError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                DocumentStoreError::DocumentNotFound("9".into(), "posts".into()).into(),
                StatusCode::NOT_FOUND,
            ),
            (
                DocumentStoreError::Conflict("email already exists".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                DocumentStoreError::StorageUnavailable("users.json".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
