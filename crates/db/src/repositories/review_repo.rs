//! Queries over the `reviews` table.

use reviews_core::error::CoreError;
use reviews_core::revision::{ensure_current, fetch_current, Document};
use reviews_core::types::DocId;
use sqlx::PgPool;

use crate::error::store_error;
use crate::models::review::{Review, ReviewWithThing};
use crate::models::thing::Thing;
use crate::store::{PgRevisionStore, RevisionRow, REVISION_COLUMNS};

/// Provides lookups of reviews by subject.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Load a live review and the thing it reviews, guarding both.
    pub async fn fetch_current_with_thing(
        pool: &PgPool,
        id: DocId,
    ) -> Result<ReviewWithThing, CoreError> {
        let review: Document<Review> =
            fetch_current(&PgRevisionStore::new(pool.clone()), id).await?;
        let thing: Document<Thing> =
            fetch_current(&PgRevisionStore::new(pool.clone()), review.data.thing_id).await?;
        Ok(ReviewWithThing { review, thing })
    }

    /// Number of live reviews of a thing.
    pub async fn count_live_for_thing(pool: &PgPool, thing_id: DocId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM reviews
             WHERE rev_of IS NULL AND rev_deleted = false
               AND (content->>'thing_id')::uuid = $1",
        )
        .bind(thing_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Live reviews of a thing, newest first.
    pub async fn list_current_for_thing(
        pool: &PgPool,
        thing_id: DocId,
    ) -> Result<Vec<Document<Review>>, CoreError> {
        let query = format!(
            "SELECT {REVISION_COLUMNS} FROM reviews
             WHERE rev_of IS NULL AND rev_deleted = false
               AND (content->>'thing_id')::uuid = $1
             ORDER BY (content->>'created_on')::timestamptz DESC"
        );
        let rows = sqlx::query_as::<_, RevisionRow>(&query)
            .bind(thing_id)
            .fetch_all(pool)
            .await
            .map_err(store_error)?;

        let mut reviews = Vec::with_capacity(rows.len());
        for row in rows {
            let review = row.into_document::<Review>()?;
            ensure_current(&review)?;
            reviews.push(review);
        }
        Ok(reviews)
    }
}
