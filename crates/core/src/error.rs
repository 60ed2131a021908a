use crate::store::StoreError;
use crate::types::DocId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DocId },

    /// The addressed row is a historical revision, not the current head.
    #[error("Outdated revision of {entity} {id}")]
    RevisionStale { entity: &'static str, id: DocId },

    /// The revision chain has been soft-deleted.
    #[error("Deleted revision of {entity} {id}")]
    RevisionDeleted { entity: &'static str, id: DocId },

    /// Another writer saved a newer head since this one was loaded.
    #[error("Concurrent edit of {entity} {id}")]
    RevisionConflict { entity: &'static str, id: DocId },

    #[error("Invalid slug source: {0}")]
    InvalidSlugString(String),

    /// Concurrent allocations kept picking the same qualified slug name.
    #[error("Slug conflict on '{name}'")]
    SlugConflict { name: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
