//! Application error type and failure classification.
//!
//! Handlers never build error bodies themselves. They return
//! `Result<_, AppError>` and let `?` wrap whatever failed (a database error,
//! an unparseable id, a validation report, a JWT decode error). When the
//! error is turned into a response, [`AppError::classify`] decides the status
//! code and the user-facing message, first match wins:
//!
//! | Failure | Status | Message |
//! |---|---|---|
//! | malformed resource id (`uuid::Error`) | 404 | `Resource not found` |
//! | uniqueness violation on field `F` | 409 | `F already exists` |
//! | field validation errors | 400 | field messages joined by `, ` |
//! | malformed credential | 401 | `Invalid token` |
//! | expired credential | 401 | `Token expired` |
//! | explicit status set by the caller | that status | the error's message |
//! | anything else | 500 | `Server Error` |
//!
//! The response carries an [`ErrorReport`] extension so the terminal
//! reporting middleware can log the failure (and, outside production, expose
//! the stack) without classifying twice.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgDatabaseError;
use utoipa::ToSchema;
use validator::ValidationErrors;

pub const RESOURCE_NOT_FOUND: &str = "Resource not found";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const TOKEN_EXPIRED: &str = "Token expired";
pub const SERVER_ERROR: &str = "Server Error";

/// A uniqueness constraint was violated on `field`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} already exists")]
pub struct DuplicateKey {
    pub field: String,
}

impl DuplicateKey {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

/// JSON body of every classified error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// The outcome of classifying a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: StatusCode,
    pub message: String,
}

/// Attached to the response extensions of every classified error.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
    /// Full error chain (and backtrace when captured) of the original error.
    pub stack: String,
}

#[derive(Debug)]
pub struct AppError {
    /// Status chosen by the caller; `None` leaves the decision to the classifier.
    pub status: Option<StatusCode>,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status: Some(status),
            error: err.into(),
        }
    }

    /// Wraps an error without choosing a status.
    pub fn unclassified<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status: None,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    pub fn forbidden<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::FORBIDDEN, err)
    }

    pub fn service_unavailable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, err)
    }

    /// Decides status and message. Pure: the same error always classifies the same way.
    pub fn classify(&self) -> Classification {
        classify(&self.error, self.status)
    }

    /// Debug rendering of the error chain, used as the stack trace.
    pub fn stack(&self) -> String {
        format!("{:?}", self.error)
    }

    pub fn report(&self) -> ErrorReport {
        let Classification { status, message } = self.classify();
        ErrorReport {
            status,
            message,
            stack: self.stack(),
        }
    }
}

pub fn classify(error: &Error, explicit: Option<StatusCode>) -> Classification {
    if find::<uuid::Error>(error).is_some() {
        return Classification {
            status: StatusCode::NOT_FOUND,
            message: RESOURCE_NOT_FOUND.to_string(),
        };
    }

    if let Some(field) = duplicate_field(error) {
        return Classification {
            status: StatusCode::CONFLICT,
            message: format!("{} already exists", field),
        };
    }

    if let Some(message) = find::<ValidationErrors>(error).and_then(validation_message) {
        return Classification {
            status: StatusCode::BAD_REQUEST,
            message,
        };
    }

    if let Some(jwt_error) = find::<jsonwebtoken::errors::Error>(error) {
        let message = match jwt_error.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TOKEN_EXPIRED,
            _ => INVALID_TOKEN,
        };
        return Classification {
            status: StatusCode::UNAUTHORIZED,
            message: message.to_string(),
        };
    }

    match explicit {
        Some(status) => Classification {
            status,
            message: error.to_string(),
        },
        None => Classification {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: SERVER_ERROR.to_string(),
        },
    }
}

fn find<T>(error: &Error) -> Option<&T>
where
    T: std::error::Error + 'static,
{
    error.chain().find_map(|cause| cause.downcast_ref::<T>())
}

fn duplicate_field(error: &Error) -> Option<String> {
    if let Some(duplicate) = find::<DuplicateKey>(error) {
        return Some(duplicate.field.clone());
    }

    let sqlx::Error::Database(db_error) = find::<sqlx::Error>(error)? else {
        return None;
    };
    if !db_error.is_unique_violation() {
        return None;
    }

    let from_detail = db_error
        .try_downcast_ref::<PgDatabaseError>()
        .and_then(|pg| pg.detail())
        .and_then(field_from_key_detail);

    Some(
        from_detail
            .or_else(|| db_error.constraint().and_then(field_from_constraint))
            .unwrap_or_else(|| "value".to_string()),
    )
}

/// Extracts the column list from a PostgreSQL detail line such as
/// `Key (email)=(a@b.c) already exists.`
pub fn field_from_key_detail(detail: &str) -> Option<String> {
    let rest = detail.strip_prefix("Key (")?;
    let end = rest.find(")=")?;
    let field = rest[..end].trim();
    (!field.is_empty()).then(|| field.to_string())
}

/// Falls back to the default PostgreSQL constraint naming, `<table>_<column>_key`.
pub fn field_from_constraint(constraint: &str) -> Option<String> {
    let stem = constraint.strip_suffix("_key")?;
    let (_, field) = stem.split_once('_')?;
    (!field.is_empty()).then(|| field.to_string())
}

fn validation_message(errors: &ValidationErrors) -> Option<String> {
    let mut fields: Vec<_> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| (field.to_string(), errors))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();

    (!messages.is_empty()).then(|| messages.join(", "))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let report = self.report();
        let body = Json(ErrorResponse::new(report.message.clone()));

        let mut response = (report.status, body).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::unclassified(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};
    use jsonwebtoken::errors::ErrorKind;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct SignupForm {
        #[validate(length(min = 1, message = "Email is required"))]
        email: String,
        #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
        password: String,
    }

    #[test]
    fn malformed_id_is_not_found() {
        let err = uuid::Uuid::parse_str("not-a-uuid").unwrap_err();
        let classified = AppError::from(err).classify();
        assert_eq!(classified.status, StatusCode::NOT_FOUND);
        assert_eq!(classified.message, RESOURCE_NOT_FOUND);
    }

    #[test]
    fn malformed_id_wins_over_explicit_status() {
        let err = uuid::Uuid::parse_str("zzz").unwrap_err();
        let classified = AppError::bad_request(err).classify();
        assert_eq!(classified.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_key_is_conflict() {
        let classified = AppError::from(DuplicateKey::new("email")).classify();
        assert_eq!(classified.status, StatusCode::CONFLICT);
        assert_eq!(classified.message, "email already exists");
    }

    #[test]
    fn duplicate_key_found_behind_context() {
        let err = Err::<(), _>(DuplicateKey::new("title"))
            .context("Failed to insert quiz")
            .unwrap_err();
        let classified = AppError::from(err).classify();
        assert_eq!(classified.status, StatusCode::CONFLICT);
        assert_eq!(classified.message, "title already exists");
    }

    #[test]
    fn validation_errors_are_joined() {
        let form = SignupForm {
            email: String::new(),
            password: "short".to_string(),
        };
        let errors = form.validate().unwrap_err();
        let classified = AppError::from(errors).classify();
        assert_eq!(classified.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            classified.message,
            "Email is required, Password must be at least 8 characters"
        );
    }

    #[test]
    fn expired_jwt_is_token_expired() {
        let err = jsonwebtoken::errors::Error::from(ErrorKind::ExpiredSignature);
        let classified = AppError::from(err).classify();
        assert_eq!(classified.status, StatusCode::UNAUTHORIZED);
        assert_eq!(classified.message, TOKEN_EXPIRED);
    }

    #[test]
    fn malformed_jwt_is_invalid_token() {
        let err = jsonwebtoken::errors::Error::from(ErrorKind::InvalidToken);
        let classified = AppError::from(err).classify();
        assert_eq!(classified.status, StatusCode::UNAUTHORIZED);
        assert_eq!(classified.message, INVALID_TOKEN);

        let err = jsonwebtoken::errors::Error::from(ErrorKind::InvalidSignature);
        assert_eq!(AppError::from(err).classify().message, INVALID_TOKEN);
    }

    #[test]
    fn explicit_status_keeps_own_message() {
        let classified = AppError::forbidden(anyhow!("Only the quiz owner can do that")).classify();
        assert_eq!(classified.status, StatusCode::FORBIDDEN);
        assert_eq!(classified.message, "Only the quiz owner can do that");
    }

    #[test]
    fn unrecognized_error_is_server_error() {
        let classified = AppError::from(anyhow!("connection reset by peer")).classify();
        assert_eq!(classified.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(classified.message, SERVER_ERROR);
    }

    #[test]
    fn classification_is_idempotent() {
        let err = AppError::from(DuplicateKey::new("email"));
        assert_eq!(err.classify(), err.classify());

        let err = AppError::from(anyhow!("boom"));
        let first = err.report();
        let second = err.report();
        assert_eq!(first.status, second.status);
        assert_eq!(first.message, second.message);
        assert_eq!(first.stack, second.stack);
    }

    #[test]
    fn response_carries_report_extension() {
        let response = AppError::from(DuplicateKey::new("email")).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let report = response.extensions().get::<ErrorReport>().unwrap();
        assert_eq!(report.message, "email already exists");
        assert!(report.stack.contains("email already exists"));
    }

    #[test]
    fn key_detail_parsing() {
        assert_eq!(
            field_from_key_detail("Key (email)=(a@b.c) already exists."),
            Some("email".to_string())
        );
        assert_eq!(
            field_from_key_detail("Key (quiz_id, student_id)=(1, 2) already exists."),
            Some("quiz_id, student_id".to_string())
        );
        assert_eq!(field_from_key_detail("something else"), None);
    }

    #[test]
    fn constraint_name_parsing() {
        assert_eq!(
            field_from_constraint("users_email_key"),
            Some("email".to_string())
        );
        assert_eq!(field_from_constraint("users_pkey"), None);
    }

    #[test]
    fn error_response_omits_missing_stack() {
        let body = serde_json::to_value(ErrorResponse::new("Server Error")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "message": "Server Error" })
        );

        let body = serde_json::to_value(ErrorResponse::new("x").with_stack("trace")).unwrap();
        assert_eq!(body["stack"], "trace");
    }
}
