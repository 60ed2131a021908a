//! Routes for team blog posts, mounted at `/posts`.

use axum::routing::get;
use axum::Router;

use crate::handlers::posts;
use crate::state::AppState;

/// ```text
/// GET    /{id}              -> get_post
/// DELETE /{id}              -> delete_post
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(posts::get_post).delete(posts::delete_post))
}
