//! Routes for review subjects, mounted at `/things`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::things;
use crate::state::AppState;

/// ```text
/// POST   /                  -> create_thing
/// GET    /{id}              -> get_thing (id or slug; 308 to canonical slug)
/// PUT    /{id}              -> update_thing
/// GET    /{id}/revisions    -> list_thing_revisions
/// GET    /{id}/reviews      -> list_thing_reviews
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(things::create_thing))
        .route("/{id}", get(things::get_thing).put(things::update_thing))
        .route("/{id}/revisions", get(things::list_thing_revisions))
        .route("/{id}/reviews", get(things::list_thing_reviews))
}
