//! Queries over the `user_metas` table.

use reviews_core::error::CoreError;
use reviews_core::revision::{ensure_current, Document};
use reviews_core::types::UserId;
use sqlx::PgPool;

use crate::error::store_error;
use crate::models::user_meta::UserMeta;
use crate::store::{RevisionRow, REVISION_COLUMNS};

/// Provides lookups of profile documents by user.
pub struct UserMetaRepo;

impl UserMetaRepo {
    /// The user's profile head. A deleted profile yields
    /// [`CoreError::RevisionDeleted`].
    pub async fn find_current_for_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<Document<UserMeta>>, CoreError> {
        let query = format!(
            "SELECT {REVISION_COLUMNS} FROM user_metas
             WHERE rev_of IS NULL AND (content->>'user_id')::uuid = $1"
        );
        let row = sqlx::query_as::<_, RevisionRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(store_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let meta = row.into_document::<UserMeta>()?;
        ensure_current(&meta)?;
        Ok(Some(meta))
    }
}
