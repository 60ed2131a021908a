//! Queries over the `blog_posts` table.

use reviews_core::error::CoreError;
use reviews_core::revision::{ensure_current, fetch_current, Document};
use reviews_core::types::DocId;
use sqlx::PgPool;

use crate::error::store_error;
use crate::models::blog_post::{BlogPost, BlogPostWithTeam};
use crate::models::team::Team;
use crate::store::{PgRevisionStore, RevisionRow, REVISION_COLUMNS};

/// Provides team-scoped blog post queries.
pub struct BlogPostRepo;

impl BlogPostRepo {
    /// Load a live post and its team, guarding both.
    pub async fn fetch_current_with_team(
        pool: &PgPool,
        id: DocId,
    ) -> Result<BlogPostWithTeam, CoreError> {
        let post: Document<BlogPost> =
            fetch_current(&PgRevisionStore::new(pool.clone()), id).await?;
        let team: Document<Team> =
            fetch_current(&PgRevisionStore::new(pool.clone()), post.data.team_id).await?;
        Ok(BlogPostWithTeam { post, team })
    }

    /// Live posts of a team, newest first.
    pub async fn list_current_for_team(
        pool: &PgPool,
        team_id: DocId,
        limit: i64,
    ) -> Result<Vec<Document<BlogPost>>, CoreError> {
        let query = format!(
            "SELECT {REVISION_COLUMNS} FROM blog_posts
             WHERE rev_of IS NULL AND rev_deleted = false
               AND (content->>'team_id')::uuid = $1
             ORDER BY (content->>'created_on')::timestamptz DESC
             LIMIT $2"
        );
        let rows = sqlx::query_as::<_, RevisionRow>(&query)
            .bind(team_id)
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(store_error)?;

        rows.into_iter()
            .map(|row| -> Result<_, CoreError> {
                let post = row.into_document::<BlogPost>()?;
                ensure_current(&post)?;
                Ok(post)
            })
            .collect()
    }
}
