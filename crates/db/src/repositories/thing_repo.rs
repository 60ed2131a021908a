//! Queries over the `things` table.

use reviews_core::error::CoreError;
use reviews_core::revision::{ensure_current, Document};
use sqlx::PgPool;

use crate::error::store_error;
use crate::models::thing::Thing;
use crate::store::{RevisionRow, REVISION_COLUMNS};

/// Provides lookups of things by URL.
pub struct ThingRepo;

impl ThingRepo {
    /// The live thing that lists `url` among its URLs, if any.
    pub async fn find_current_by_url(
        pool: &PgPool,
        url: &str,
    ) -> Result<Option<Document<Thing>>, CoreError> {
        let query = format!(
            "SELECT {REVISION_COLUMNS} FROM things
             WHERE rev_of IS NULL AND rev_deleted = false
               AND content->'urls' ? $1
             ORDER BY rev_date DESC
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, RevisionRow>(&query)
            .bind(url.trim())
            .fetch_optional(pool)
            .await
            .map_err(store_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let thing = row.into_document::<Thing>()?;
        ensure_current(&thing)?;
        Ok(Some(thing))
    }
}
