//! Rows of the `thing_slugs` and `team_slugs` tables.

use reviews_core::slug::Slug;
use reviews_core::types::{DocId, Timestamp, UserId};
use sqlx::FromRow;

/// A slug row with its owner column aliased to `owner_id`.
#[derive(Debug, Clone, FromRow)]
pub struct SlugRow {
    pub name: String,
    pub base_name: String,
    pub qualifier_part: Option<String>,
    pub owner_id: DocId,
    pub created_on: Timestamp,
    pub created_by: UserId,
}

impl From<SlugRow> for Slug {
    fn from(row: SlugRow) -> Self {
        Slug {
            name: row.name,
            base_name: row.base_name,
            qualifier_part: row.qualifier_part,
            owner_id: row.owner_id,
            created_on: row.created_on,
            created_by: row.created_by,
        }
    }
}
