use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use captionary_core::error::CoreError;
use captionary_db::StoreError;
use serde_json::json;

use crate::templates::{render_template, ErrorPage};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent JSON error responses; HTML handlers wrap it in
/// [`PageError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `captionary_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence gateway error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A page template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A path that names no resource, such as a non-numeric id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const GENERIC_MESSAGE: &str = "An internal error occurred";

impl AppError {
    /// Shorthand for the 401 returned when no session is present.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Core(CoreError::Unauthorized(message.into()))
    }

    /// Map the error to an HTTP status, error code, and client-safe message.
    ///
    /// Storage, template and internal failures are logged here and replaced
    /// by a generic message.
    pub fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::UniqueConstraint { field } => (
                    StatusCode::CONFLICT,
                    "UNIQUE_VIOLATION",
                    format!("{field} is already in use"),
                ),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            AppError::Store(err) => classify_store_error(err),

            AppError::Template(err) => {
                tracing::error!(error = %err, "Template rendering failed");
                internal()
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Error returned by HTML handlers; renders the error page.
#[derive(Debug)]
pub struct PageError(pub AppError);

/// Convenience type alias for HTML handler return values.
pub type PageResult<T> = Result<T, PageError>;

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError(err)
    }
}

impl From<CoreError> for PageError {
    fn from(err: CoreError) -> Self {
        PageError(AppError::Core(err))
    }
}

impl From<StoreError> for PageError {
    fn from(err: StoreError) -> Self {
        PageError(AppError::Store(err))
    }
}

impl From<askama::Error> for PageError {
    fn from(err: askama::Error) -> Self {
        PageError(AppError::Template(err))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, _code, message) = self.0.classify();
        let failure = PageFailure { status, message };
        let mut response = failure.render(None);
        response.extensions_mut().insert(failure);
        response
    }
}

/// Status and message of a rendered error page, left on the response so
/// [`crate::middleware::error_page`] can re-render it for a signed-in viewer.
#[derive(Debug, Clone)]
pub(crate) struct PageFailure {
    status: StatusCode,
    message: String,
}

impl PageFailure {
    pub(crate) fn render(&self, viewer: Option<String>) -> Response {
        let page = ErrorPage {
            viewer,
            status: self.status.as_u16(),
            message: self.message.clone(),
        };
        match render_template(page) {
            Ok(html) => (self.status, html).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Error page failed to render");
                (self.status, GENERIC_MESSAGE).into_response()
            }
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        GENERIC_MESSAGE.to_string(),
    )
}

/// Classify a gateway error into an HTTP status, error code, and message.
///
/// - Unique violations map to 409.
/// - Foreign key violations mean a referenced row vanished: 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::UniqueViolation { constraint } => (
            StatusCode::CONFLICT,
            "UNIQUE_VIOLATION",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        StoreError::ForeignKeyViolation { constraint } => {
            tracing::warn!(constraint = %constraint, "Foreign key violation");
            (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Referenced resource not found".to_string(),
            )
        }
        StoreError::Database(db_err) => {
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_expected_statuses() {
        let cases = [
            (
                AppError::Core(CoreError::NotFound { entity: "Image", id: 9 }),
                StatusCode::NOT_FOUND,
                "Image with id 9 not found",
            ),
            (
                AppError::Core(CoreError::Validation("text is required".into())),
                StatusCode::BAD_REQUEST,
                "text is required",
            ),
            (
                AppError::Core(CoreError::UniqueConstraint { field: "email" }),
                StatusCode::CONFLICT,
                "email is already in use",
            ),
            (
                AppError::unauthorized("Please log in"),
                StatusCode::UNAUTHORIZED,
                "Please log in",
            ),
        ];

        for (err, status, message) in cases {
            let (got_status, _, got_message) = err.classify();
            assert_eq!(got_status, status);
            assert_eq!(got_message, message);
        }
    }

    #[test]
    fn store_violations_map_to_client_errors() {
        let unique = AppError::Store(StoreError::UniqueViolation {
            constraint: "uq_users_email".into(),
        });
        assert_eq!(unique.classify().0, StatusCode::CONFLICT);

        let (status, code, message) = AppError::Store(StoreError::ForeignKeyViolation {
            constraint: "fk_captions_image".into(),
        })
        .classify();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
        assert!(!message.contains("fk_captions_image"));
    }

    #[test]
    fn internal_messages_are_sanitized() {
        let (status, _, message) =
            AppError::InternalError("secret stack trace".into()).classify();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("secret"));
    }
}
