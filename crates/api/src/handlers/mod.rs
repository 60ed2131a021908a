pub mod posts;
pub mod reviews;
pub mod teams;
pub mod things;
pub mod users;

use axum::response::{IntoResponse, Redirect, Response};

/// 308 to the canonical slug URL of a document under `collection`.
pub(crate) fn redirect_to_slug(collection: &str, slug: &str) -> Response {
    Redirect::permanent(&format!("/api/v1/{collection}/{slug}")).into_response()
}
