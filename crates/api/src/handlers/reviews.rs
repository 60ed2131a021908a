//! Handlers for reviews.
//!
//! A review is written about an existing thing or about a URL. An unknown
//! URL creates its thing on the fly. Deleting a review can take its thing
//! along when no other live review refers to it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use reviews_core::canonical_slug::update_slug;
use reviews_core::cascade::delete_with_dependent;
use reviews_core::error::CoreError;
use reviews_core::language::Language;
use reviews_core::revision::{
    create_first_revision, delete_all_revisions, fetch_current, new_revision, save, Document,
};
use reviews_core::types::UserId;
use reviews_core::validation::{validate_star_rating, validate_text, validate_url};
use reviews_db::models::review::{
    CreateReview, DeleteReviewParams, Review, ReviewWithThing, UpdateReview,
};
use reviews_db::models::thing::{CreateThing, Thing};
use reviews_db::repositories::{ReviewRepo, ThingRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// The thing a new review is about: by id, by known URL, or newly created.
async fn resolve_subject(
    state: &AppState,
    input: &CreateReview,
    language: Language,
    actor: UserId,
) -> AppResult<Document<Thing>> {
    if let Some(thing_id) = input.thing_id {
        return Ok(fetch_current(&state.stores.things, thing_id).await?);
    }

    let url = input.url.as_deref().ok_or_else(|| AppError::Field {
        field: "thing_id",
        source: CoreError::Validation("Either thing_id or url is required".into()),
    })?;
    validate_url(url).map_err(AppError::field("url"))?;

    if let Some(thing) = ThingRepo::find_current_by_url(&state.pool, url).await? {
        return Ok(thing);
    }

    let new_thing = CreateThing {
        urls: vec![url.to_string()],
        label: input.label.clone(),
        description: None,
        language: Some(language),
    };
    let mut thing = create_first_revision(
        Thing::new(&new_thing, language, actor),
        actor,
        &["create-via-review"],
    );
    update_slug(
        &state.stores.thing_slugs,
        &state.config.slug_policy,
        &mut thing,
        actor,
        language,
    )
    .await
    .map_err(AppError::field("label"))?;
    save(&state.stores.things, &mut thing).await?;

    tracing::info!(user_id = %actor, thing_id = %thing.id, url, "Thing created via review");
    Ok(thing)
}

/* --------------------------------------------------------------------------
Review CRUD
-------------------------------------------------------------------------- */

/// POST /reviews
///
/// Create a review of an existing thing or of a URL.
pub async fn create_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReview>,
) -> AppResult<impl IntoResponse> {
    validate_text(&input.title, "title").map_err(AppError::field("title"))?;
    validate_text(&input.text, "text").map_err(AppError::field("text"))?;
    validate_star_rating(input.star_rating).map_err(AppError::field("star_rating"))?;
    let language = state.config.language_or_default(input.language);

    let thing = resolve_subject(&state, &input, language, auth.user_id).await?;

    let mut review = create_first_revision(
        Review::new(thing.id, &input, language, auth.user_id),
        auth.user_id,
        &["create-via-form"],
    );
    save(&state.stores.reviews, &mut review).await?;

    tracing::info!(
        user_id = %auth.user_id,
        review_id = %review.id,
        thing_id = %thing.id,
        "Review created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ReviewWithThing { review, thing },
        }),
    ))
}

/// GET /reviews/{id}
///
/// Fetch a live review together with its thing.
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let review = ReviewRepo::fetch_current_with_thing(&state.pool, id).await?;
    Ok(Json(DataResponse { data: review }))
}

/// PUT /reviews/{id}
pub async fn update_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateReview>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        validate_text(title, "title").map_err(AppError::field("title"))?;
    }
    if let Some(text) = &input.text {
        validate_text(text, "text").map_err(AppError::field("text"))?;
    }
    if let Some(rating) = input.star_rating {
        validate_star_rating(rating).map_err(AppError::field("star_rating"))?;
    }
    let language = state.config.language_or_default(input.language);

    let head = fetch_current(&state.stores.reviews, id).await?;
    auth.require_owner_or_admin(head.data.created_by, "review")?;

    let mut doc =
        new_revision(&state.stores.reviews, head, auth.user_id, &["edit-via-form"]).await?;
    doc.data.apply(&input, language);
    save(&state.stores.reviews, &mut doc).await?;

    tracing::info!(user_id = %auth.user_id, review_id = %id, rev_id = %doc.meta.rev_id, "Review edited");

    Ok(Json(DataResponse { data: doc }))
}

/// DELETE /reviews/{id}?with_thing=true
///
/// Delete a review. With `with_thing`, the reviewed thing is deleted too,
/// which is only allowed while this is its only live review.
pub async fn delete_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteReviewParams>,
) -> AppResult<impl IntoResponse> {
    let review = fetch_current(&state.stores.reviews, id).await?;
    auth.require_owner_or_admin(review.data.created_by, "review")?;

    if !params.with_thing {
        delete_all_revisions(&state.stores.reviews, review, auth.user_id, &["delete-via-form"])
            .await?;
        tracing::info!(user_id = %auth.user_id, review_id = %id, "Review deleted");
        return Ok(StatusCode::NO_CONTENT);
    }

    let thing = fetch_current(&state.stores.things, review.data.thing_id).await?;
    auth.require_owner_or_admin(thing.data.created_by, "thing")?;

    let live_reviews = ReviewRepo::count_live_for_thing(&state.pool, thing.id).await?;
    if live_reviews != 1 {
        return Err(AppError::Field {
            field: "with_thing",
            source: CoreError::Validation(format!(
                "The thing has {live_reviews} live reviews; it can only be deleted with its only review"
            )),
        });
    }

    delete_with_dependent(
        &state.stores.reviews,
        review,
        &state.stores.things,
        thing,
        auth.user_id,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
