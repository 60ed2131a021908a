pub mod health;
pub mod posts;
pub mod reviews;
pub mod teams;
pub mod things;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /things                                 create
/// /things/{id}                            get (slug or id), edit
/// /things/{id}/revisions                  revision history
/// /things/{id}/reviews                    live reviews of a thing
///
/// /reviews                                create (existing thing or URL)
/// /reviews/{id}                           get with thing, edit, delete
///
/// /teams                                  create
/// /teams/{id}                             get (slug or id), edit, delete
/// /teams/{id}/posts                       list, create blog post
///
/// /posts/{id}                             get with team, delete
///
/// /users/{id}/bio                         get, create or edit own bio
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/things", things::router())
        .nest("/reviews", reviews::router())
        .nest("/teams", teams::router())
        .nest("/posts", posts::router())
        .nest("/users", users::router())
}
