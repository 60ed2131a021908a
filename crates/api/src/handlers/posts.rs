//! Handlers for team blog posts.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use reviews_core::error::CoreError;
use reviews_core::revision::{create_first_revision, delete_all_revisions, fetch_current, save};
use reviews_core::validation::validate_text;
use reviews_db::models::blog_post::{BlogPost, BlogPostWithTeam, CreateBlogPost};
use reviews_db::repositories::BlogPostRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of posts per listing.
const DEFAULT_POST_LIMIT: i64 = 10;
/// Upper bound for the `limit` query parameter.
const MAX_POST_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListPostsParams {
    pub limit: Option<i64>,
}

/// GET /teams/{id}/posts
///
/// Live posts of a team, newest first.
pub async fn list_team_posts(
    State(state): State<AppState>,
    Path(team_id): Path<Uuid>,
    Query(params): Query<ListPostsParams>,
) -> AppResult<impl IntoResponse> {
    fetch_current(&state.stores.teams, team_id).await?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_POST_LIMIT)
        .clamp(1, MAX_POST_LIMIT);

    let posts = BlogPostRepo::list_current_for_team(&state.pool, team_id, limit).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// POST /teams/{id}/posts
///
/// Publish a post on a team blog. Teams with `only_mods_can_blog` accept
/// posts from moderators and admins only.
pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(team_id): Path<Uuid>,
    Json(input): Json<CreateBlogPost>,
) -> AppResult<impl IntoResponse> {
    validate_text(&input.title, "title").map_err(AppError::field("title"))?;
    validate_text(&input.post, "post").map_err(AppError::field("post"))?;
    let language = state.config.language_or_default(input.language);

    let team = fetch_current(&state.stores.teams, team_id).await?;
    if team.data.only_mods_can_blog && !team.data.is_moderator(auth.user_id) && !auth.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only moderators can post on this team's blog".into(),
        )));
    }

    let mut post = create_first_revision(
        BlogPost::new(team.id, &input, language, auth.user_id),
        auth.user_id,
        &["create-via-form"],
    );
    save(&state.stores.blog_posts, &mut post).await?;

    tracing::info!(user_id = %auth.user_id, post_id = %post.id, team_id = %team.id, "Blog post created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: BlogPostWithTeam { post, team },
        }),
    ))
}

/// GET /posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let post = BlogPostRepo::fetch_current_with_team(&state.pool, id).await?;
    Ok(Json(DataResponse { data: post }))
}

/// DELETE /posts/{id}
///
/// The author, the team's moderator or an admin may delete a post.
pub async fn delete_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let BlogPostWithTeam { post, team } =
        BlogPostRepo::fetch_current_with_team(&state.pool, id).await?;
    if !team.data.is_moderator(auth.user_id) {
        auth.require_owner_or_admin(post.data.created_by, "blog post")?;
    }

    delete_all_revisions(&state.stores.blog_posts, post, auth.user_id, &["delete-via-form"])
        .await?;

    tracing::info!(user_id = %auth.user_id, post_id = %id, "Blog post deleted");
    Ok(StatusCode::NO_CONTENT)
}
