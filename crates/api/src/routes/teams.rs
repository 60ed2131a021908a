//! Routes for teams and their blogs, mounted at `/teams`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{posts, teams};
use crate::state::AppState;

/// ```text
/// POST   /                  -> create_team
/// GET    /{id}              -> get_team (id or slug; 308 to canonical slug)
/// PUT    /{id}              -> update_team
/// DELETE /{id}              -> delete_team
/// GET    /{id}/posts        -> list_team_posts
/// POST   /{id}/posts        -> create_post
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(teams::create_team))
        .route(
            "/{id}",
            get(teams::get_team)
                .put(teams::update_team)
                .delete(teams::delete_team),
        )
        .route(
            "/{id}/posts",
            get(posts::list_team_posts).post(posts::create_post),
        )
}
