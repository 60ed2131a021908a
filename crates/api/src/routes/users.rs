//! Routes for user profiles, mounted at `/users`.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// ```text
/// GET    /{id}/bio          -> get_bio
/// PUT    /{id}/bio          -> put_bio (own profile only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/bio", get(users::get_bio).put(users::put_bio))
}
