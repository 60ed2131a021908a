use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reviews_core::error::CoreError;
use serde_json::json;
use uuid::Uuid;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{ "error", "code" }`, plus `field` for input errors and
/// `reference` for server errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `reviews_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A domain error caused by one input field.
    #[error("Invalid {field}: {source}")]
    Field {
        field: &'static str,
        source: CoreError,
    },

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Attribute input errors to `field`; other errors pass through.
    ///
    /// ```ignore
    /// validate_star_rating(input.star_rating).map_err(AppError::field("star_rating"))?;
    /// ```
    pub fn field(field: &'static str) -> impl FnOnce(CoreError) -> AppError {
        move |err| match err {
            CoreError::Validation(_) | CoreError::InvalidSlugString(_) => {
                AppError::Field { field, source: err }
            }
            other => AppError::Core(other),
        }
    }
}

/// The parts of an error response.
struct ErrorBody {
    status: StatusCode,
    code: &'static str,
    message: String,
    field: Option<&'static str>,
    reference: Option<Uuid>,
}

impl ErrorBody {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            field: None,
            reference: None,
        }
    }

    fn with_field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }

    /// A 500 whose details are only logged, under a random reference id.
    fn internal(detail: &dyn std::fmt::Display) -> Self {
        let reference = Uuid::new_v4();
        tracing::error!(%reference, error = %detail, "Internal error");
        Self {
            reference: Some(reference),
            ..Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred",
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Field { field, source } => match source {
                CoreError::Validation(msg) | CoreError::InvalidSlugString(msg) => {
                    ErrorBody::new(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "VALIDATION_ERROR",
                        msg.clone(),
                    )
                    .with_field(*field)
                }
                other => classify_core_error(other),
            },
            AppError::Database(err) => classify_sqlx_error(err),
        };

        let mut json = json!({
            "error": body.message,
            "code": body.code,
        });
        if let Some(field) = body.field {
            json["field"] = json!(field);
        }
        if let Some(reference) = body.reference {
            json["reference"] = json!(reference);
        }

        (body.status, axum::Json(json)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> ErrorBody {
    match err {
        // Deleted documents are reported exactly like missing ones.
        CoreError::NotFound { entity, id } | CoreError::RevisionDeleted { entity, id } => {
            let message = if id.is_nil() {
                format!("{entity} not found")
            } else {
                format!("{entity} with id {id} not found")
            };
            ErrorBody::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
        }
        CoreError::RevisionStale { entity, id } => ErrorBody::new(
            StatusCode::CONFLICT,
            "REVISION_STALE",
            format!("This version of {entity} {id} is outdated"),
        ),
        CoreError::RevisionConflict { entity, id } => ErrorBody::new(
            StatusCode::CONFLICT,
            "EDIT_CONFLICT",
            format!("{entity} {id} was changed by someone else; reload and try again"),
        ),
        CoreError::InvalidSlugString(msg) => ErrorBody::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            msg.clone(),
        )
        .with_field("slug"),
        CoreError::SlugConflict { name } => {
            tracing::warn!(slug = %name, "Slug allocation kept colliding");
            ErrorBody::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "TRY_AGAIN",
                "The name is being claimed concurrently; please try again",
            )
        }
        CoreError::Validation(msg) => {
            ErrorBody::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        CoreError::Unauthorized(msg) => {
            ErrorBody::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
        }
        CoreError::Forbidden(msg) => {
            ErrorBody::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
        }
        CoreError::Storage(store_err) => ErrorBody::internal(store_err),
        CoreError::Internal(msg) => ErrorBody::internal(msg),
    }
}

/// Classify a sqlx error raised outside the stores.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a logged reference.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorBody {
    match err {
        sqlx::Error::RowNotFound => {
            ErrorBody::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        other => ErrorBody::internal(other),
    }
}
