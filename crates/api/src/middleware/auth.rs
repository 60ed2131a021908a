//! The acting user of a write request.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use reviews_core::error::CoreError;
use reviews_core::types::UserId;

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::state::AppState;

/// Role allowed to edit and delete any document.
pub const ADMIN_ROLE: &str = "admin";

/// The user behind the request's bearer token.
///
/// Handlers that take an `AuthUser` reject anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Recorded as `rev_user` on every revision this request writes.
    pub user_id: UserId,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    /// Allow the document's creator or an admin; anyone else is forbidden.
    pub fn require_owner_or_admin(&self, creator: UserId, entity: &str) -> Result<(), AppError> {
        if self.user_id == creator || self.is_admin() {
            return Ok(());
        }
        Err(CoreError::Forbidden(format!("Only the creator of this {entity} can change it")).into())
    }
}

/// The token of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Result<&str, CoreError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?;
    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            CoreError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = verify_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            CoreError::Unauthorized("Invalid or expired token".into())
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
