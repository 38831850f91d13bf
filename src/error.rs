use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

/// Application error taxonomy. Every handler returns `Result<_, AppError>`
/// and the boundary turns the variant into its status code and a
/// `{"error": ...}` body.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    NotFound(String),

    /// Deliberately undifferentiated between "no such account" and
    /// "wrong password".
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    InvalidFileType(String),

    #[error("Uploaded file is too large")]
    PayloadTooLarge,

    #[error("Password already set for this account")]
    AlreadySet,

    /// A mutation left the store in a state it promised not to be in.
    #[error("{0}")]
    Integrity(String),

    #[error("Password hashing backend unavailable")]
    CredentialBackend,

    #[error("database error")]
    Database(DbErr),

    #[error("i/o error")]
    Io(#[from] std::io::Error),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        let sql_err = err.sql_err();
        classify_db_err(sql_err, err)
    }
}

// The look-then-insert pre-checks give nicer messages, but the unique
// constraint is the authoritative guard under concurrent writers; a
// duplicate-key failure lands here.
fn classify_db_err(sql_err: Option<SqlErr>, err: DbErr) -> AppError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = sql_err {
        return AppError::Duplicate("Identifier already registered".to_string());
    }
    AppError::Database(err)
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::Duplicate(_)
            | AppError::InvalidFileType(_)
            | AppError::AlreadySet => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Integrity(_)
            | AppError::CredentialBackend
            | AppError::Database(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                "Internal server error".to_string()
            }
            AppError::Io(err) => {
                tracing::error!(error = %err, "i/o error");
                "Internal server error".to_string()
            }
            AppError::Integrity(msg) => {
                tracing::error!(error = %msg, "integrity violation");
                msg.clone()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_taxonomy() {
        assert_eq!(
            AppError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Duplicate("dup".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("missing".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::PayloadTooLarge.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(AppError::AlreadySet.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Integrity("stale".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::CredentialBackend.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn credential_failure_message_does_not_leak_cause() {
        assert_eq!(AppError::InvalidCredentials.to_string(), "Invalid credentials");
    }

    #[test]
    fn unique_violations_become_duplicate() {
        let raw = DbErr::Custom("duplicate key value violates unique constraint".to_string());
        let mapped = classify_db_err(
            Some(SqlErr::UniqueConstraintViolation(
                "duplicate key value violates unique constraint".to_string(),
            )),
            raw,
        );
        assert!(matches!(mapped, AppError::Duplicate(_)));
        assert_eq!(mapped.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_db_errors_stay_internal() {
        let mapped = classify_db_err(None, DbErr::Custom("connection reset".to_string()));
        assert!(matches!(mapped, AppError::Database(_)));
        assert_eq!(mapped.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
