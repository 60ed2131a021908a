//! Handlers for user bios.
//!
//! A bio is a revisioned `user_meta` document. The first write creates it;
//! later writes add revisions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use reviews_core::error::CoreError;
use reviews_core::mlstring::MlString;
use reviews_core::revision::{create_first_revision, new_revision, save, Revisioned};
use reviews_core::types::UserId;
use reviews_db::models::user_meta::{UpdateBio, UserMeta};
use reviews_db::repositories::UserMetaRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /users/{id}/bio
pub async fn get_bio(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<impl IntoResponse> {
    let meta = UserMetaRepo::find_current_for_user(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: UserMeta::ENTITY,
            id: user_id,
        })?;
    Ok(Json(DataResponse { data: meta }))
}

/// PUT /users/{id}/bio
///
/// Create or edit the caller's own bio. Returns 201 on first write.
pub async fn put_bio(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(input): Json<UpdateBio>,
) -> AppResult<impl IntoResponse> {
    if auth.user_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Users can only edit their own bio".into(),
        )));
    }
    let language = state.config.language_or_default(input.language);

    let (status, doc) = match UserMetaRepo::find_current_for_user(&state.pool, user_id).await? {
        Some(head) => {
            let mut doc =
                new_revision(&state.stores.user_metas, head, auth.user_id, &["edit-via-form"])
                    .await?;
            doc.data.bio.set(language, input.bio.trim());
            save(&state.stores.user_metas, &mut doc).await?;
            (StatusCode::OK, doc)
        }
        None => {
            let meta = UserMeta {
                user_id,
                bio: MlString::single(language, input.bio.trim()),
                original_language: language,
            };
            let mut doc = create_first_revision(meta, auth.user_id, &["create-via-form"]);
            save(&state.stores.user_metas, &mut doc).await?;
            (StatusCode::CREATED, doc)
        }
    };

    tracing::info!(user_id = %user_id, rev_id = %doc.meta.rev_id, "Bio saved");
    Ok((status, Json(DataResponse { data: doc })))
}
