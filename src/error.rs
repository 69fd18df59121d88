use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Field-level validation messages, keyed by payload field name.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Ok when nothing was recorded, otherwise a `Validation` error.
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Validation error: {0}")]
    Validation(FieldErrors),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Database(err) => {
                tracing::error!("Database error: {}", err);
                json!({ "error": "Internal server error", "status": status.as_u16() })
            }
            AppError::Configuration(msg) | AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                json!({ "error": "Internal server error", "status": status.as_u16() })
            }
            AppError::Validation(fields) => json!({
                "error": "Invalid input.",
                "status": status.as_u16(),
                "fields": fields,
            }),
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => json!({ "error": msg, "status": status.as_u16() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return AppError::Validation(FieldErrors::single(
                    "non_field_errors",
                    "A record with these values already exists.",
                ));
            }
        }
        AppError::Database(err)
    }
}

/// Malformed write bodies become 400s in the common error envelope. Type
/// mismatches are reported under the offending top-level field.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => AppError::Validation(data_error_fields(&err.body_text())),
            JsonRejection::JsonSyntaxError(err) => AppError::Validation(FieldErrors::single(
                "non_field_errors",
                format!("JSON parse error - {}", strip_rejection_prefix(&err.body_text())),
            )),
            JsonRejection::MissingJsonContentType(_) => {
                AppError::BadRequest("Expected request with `Content-Type: application/json`.".to_string())
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

fn strip_rejection_prefix(text: &str) -> &str {
    text.split_once(": ").map(|(_, detail)| detail).unwrap_or(text)
}

/// `Failed to deserialize ...: tags[0]: invalid type: ...` → `{"tags": ["invalid type: ..."]}`.
fn data_error_fields(text: &str) -> FieldErrors {
    let detail = strip_rejection_prefix(text);
    if let Some((path, message)) = detail.split_once(": ") {
        let field = path.split(['[', '.']).next().unwrap_or_default();
        let is_field = !field.is_empty()
            && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if is_field {
            return FieldErrors::single(field, message);
        }
    }
    FieldErrors::single("non_field_errors", detail)
}

pub type AppResult<T> = Result<T, AppError>;
