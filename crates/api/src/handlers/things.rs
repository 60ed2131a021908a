//! Handlers for review subjects ("things").
//!
//! Things are addressable by id or by slug. Every edit archives the previous
//! head and may move the canonical slug; old slugs keep resolving and answer
//! with a permanent redirect.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use reviews_core::canonical_slug::{resolve_slug_or_id, update_slug};
use reviews_core::revision::{
    create_first_revision, fetch_current, list_revisions, new_revision, save,
};
use reviews_core::validation::{validate_required, validate_text, validate_urls};
use reviews_db::models::thing::{CreateThing, Thing, UpdateThing};
use reviews_db::repositories::ReviewRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::redirect_to_slug;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /things
///
/// Create a thing and allocate a slug from its label.
pub async fn create_thing(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateThing>,
) -> AppResult<impl IntoResponse> {
    validate_urls(&input.urls).map_err(AppError::field("urls"))?;
    let language = state.config.language_or_default(input.language);

    let thing = Thing::new(&input, language, auth.user_id);
    validate_required(&thing.label, "label").map_err(AppError::field("label"))?;

    let mut doc = create_first_revision(thing, auth.user_id, &["create-via-form"]);
    update_slug(
        &state.stores.thing_slugs,
        &state.config.slug_policy,
        &mut doc,
        auth.user_id,
        language,
    )
    .await
    .map_err(AppError::field("label"))?;
    save(&state.stores.things, &mut doc).await?;

    tracing::info!(
        user_id = %auth.user_id,
        thing_id = %doc.id,
        slug = ?doc.data.canonical_slug_name,
        "Thing created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: doc })))
}

/// GET /things/{slug_or_id}
///
/// Fetch the live thing. Any segment other than the canonical slug is
/// answered with a permanent redirect to it.
pub async fn get_thing(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> AppResult<Response> {
    let resolved =
        resolve_slug_or_id(&state.stores.things, &state.stores.thing_slugs, &segment).await?;

    if let Some(canonical) = &resolved.redirect_to {
        return Ok(redirect_to_slug("things", canonical));
    }
    Ok(Json(DataResponse {
        data: resolved.document,
    })
    .into_response())
}

/// PUT /things/{id}
///
/// Edit a thing in one language, producing a new revision.
pub async fn update_thing(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateThing>,
) -> AppResult<impl IntoResponse> {
    if let Some(urls) = &input.urls {
        validate_urls(urls).map_err(AppError::field("urls"))?;
    }
    if let Some(label) = &input.label {
        validate_text(label, "label").map_err(AppError::field("label"))?;
    }
    let language = state.config.language_or_default(input.language);

    let head = fetch_current(&state.stores.things, id).await?;
    auth.require_owner_or_admin(head.data.created_by, "thing")?;

    let mut doc = new_revision(&state.stores.things, head, auth.user_id, &["edit-via-form"]).await?;
    doc.data.apply(&input, language);
    update_slug(
        &state.stores.thing_slugs,
        &state.config.slug_policy,
        &mut doc,
        auth.user_id,
        language,
    )
    .await
    .map_err(AppError::field("label"))?;
    save(&state.stores.things, &mut doc).await?;

    tracing::info!(user_id = %auth.user_id, thing_id = %id, rev_id = %doc.meta.rev_id, "Thing edited");

    Ok(Json(DataResponse { data: doc }))
}

/// GET /things/{id}/revisions
///
/// The head and every archived revision, newest first.
pub async fn list_thing_revisions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let revisions = list_revisions(&state.stores.things, id).await?;
    Ok(Json(DataResponse { data: revisions }))
}

/// GET /things/{id}/reviews
pub async fn list_thing_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    fetch_current(&state.stores.things, id).await?;
    let reviews = ReviewRepo::list_current_for_thing(&state.pool, id).await?;
    Ok(Json(DataResponse { data: reviews }))
}
