//! Routes for reviews, mounted at `/reviews`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// ```text
/// POST   /                     -> create_review
/// GET    /{id}                 -> get_review
/// PUT    /{id}                 -> update_review
/// DELETE /{id}?with_thing=     -> delete_review
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(reviews::create_review)).route(
        "/{id}",
        get(reviews::get_review)
            .put(reviews::update_review)
            .delete(reviews::delete_review),
    )
}
