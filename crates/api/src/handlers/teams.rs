//! Handlers for teams.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use reviews_core::canonical_slug::{resolve_slug_or_id, update_slug};
use reviews_core::revision::{
    create_first_revision, delete_all_revisions, fetch_current, new_revision, save,
};
use reviews_core::validation::validate_text;
use reviews_db::models::team::{CreateTeam, Team, UpdateTeam};

use crate::error::{AppError, AppResult};
use crate::handlers::redirect_to_slug;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /teams
///
/// Found a team. The founder becomes its moderator.
pub async fn create_team(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTeam>,
) -> AppResult<impl IntoResponse> {
    validate_text(&input.name, "name").map_err(AppError::field("name"))?;
    let language = state.config.language_or_default(input.language);

    let mut doc = create_first_revision(
        Team::new(&input, language, auth.user_id),
        auth.user_id,
        &["create-via-form"],
    );
    update_slug(
        &state.stores.team_slugs,
        &state.config.slug_policy,
        &mut doc,
        auth.user_id,
        language,
    )
    .await
    .map_err(AppError::field("name"))?;
    save(&state.stores.teams, &mut doc).await?;

    tracing::info!(
        user_id = %auth.user_id,
        team_id = %doc.id,
        slug = ?doc.data.canonical_slug_name,
        "Team created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: doc })))
}

/// GET /teams/{slug_or_id}
pub async fn get_team(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> AppResult<Response> {
    let resolved =
        resolve_slug_or_id(&state.stores.teams, &state.stores.team_slugs, &segment).await?;

    if let Some(canonical) = &resolved.redirect_to {
        return Ok(redirect_to_slug("teams", canonical));
    }
    Ok(Json(DataResponse {
        data: resolved.document,
    })
    .into_response())
}

/// PUT /teams/{id}
///
/// Edit team details in one language. Moderators and admins only.
pub async fn update_team(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTeam>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_text(name, "name").map_err(AppError::field("name"))?;
    }
    let language = state.config.language_or_default(input.language);

    let head = fetch_current(&state.stores.teams, id).await?;
    auth.require_owner_or_admin(head.data.created_by, "team")?;

    let mut doc = new_revision(&state.stores.teams, head, auth.user_id, &["edit-via-form"]).await?;
    doc.data.apply(&input, language);
    update_slug(
        &state.stores.team_slugs,
        &state.config.slug_policy,
        &mut doc,
        auth.user_id,
        language,
    )
    .await
    .map_err(AppError::field("name"))?;
    save(&state.stores.teams, &mut doc).await?;

    tracing::info!(user_id = %auth.user_id, team_id = %id, rev_id = %doc.meta.rev_id, "Team edited");

    Ok(Json(DataResponse { data: doc }))
}

/// DELETE /teams/{id}
pub async fn delete_team(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let head = fetch_current(&state.stores.teams, id).await?;
    auth.require_owner_or_admin(head.data.created_by, "team")?;

    delete_all_revisions(&state.stores.teams, head, auth.user_id, &["delete-via-form"]).await?;

    tracing::info!(user_id = %auth.user_id, team_id = %id, "Team deleted");
    Ok(StatusCode::NO_CONTENT)
}
