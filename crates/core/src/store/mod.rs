//! Persistence seams consumed by the revision and slug algorithms.
//!
//! [`RevisionStore`] and [`SlugStore`] are implemented for PostgreSQL in
//! `reviews-db` and in memory by [`memory`].

pub mod memory;

use async_trait::async_trait;

use crate::revision::{Document, Revisioned};
use crate::slug::Slug;
use crate::types::{DocId, RevId};

/// Failures reported by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint (primary key included) rejected the write.
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A guarded write found a different revision than expected.
    #[error("Write conflict: {0}")]
    Conflict(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Row-level access to one revisioned table.
///
/// The table holds heads and historical rows side by side; `rev_of`
/// distinguishes them.
#[async_trait]
pub trait RevisionStore<T: Revisioned>: Send + Sync {
    /// Load the row stored under `id`, whether head or historical.
    async fn fetch(&self, id: DocId) -> Result<Option<Document<T>>, StoreError>;

    /// Insert a historical snapshot. Archiving the same snapshot twice is a no-op.
    async fn archive(&self, snapshot: &Document<T>) -> Result<(), StoreError>;

    /// Write a head row.
    ///
    /// With `expected = None` the row must not exist yet. Otherwise the stored
    /// row must still carry revision `expected`, or [`StoreError::Conflict`]
    /// is returned and nothing is written.
    async fn save_head(&self, head: &Document<T>, expected: Option<RevId>)
        -> Result<(), StoreError>;

    /// Write a deleted head (guarded like [`save_head`](Self::save_head)) and
    /// mark every historical row of its chain deleted.
    ///
    /// Returns the number of historical rows marked.
    async fn delete_chain(
        &self,
        head: &Document<T>,
        expected: Option<RevId>,
    ) -> Result<u64, StoreError>;

    /// Every row of the chain for `id`, newest revision first.
    async fn list_chain(&self, id: DocId) -> Result<Vec<Document<T>>, StoreError>;
}

/// Access to one slug namespace. `name` is unique across the namespace.
#[async_trait]
pub trait SlugStore: Send + Sync {
    /// Insert a new slug; a taken name yields [`StoreError::UniqueViolation`].
    async fn insert(&self, slug: &Slug) -> Result<(), StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Slug>, StoreError>;

    async fn find_by_base_for_owner(
        &self,
        base_name: &str,
        owner_id: DocId,
    ) -> Result<Option<Slug>, StoreError>;

    /// The most recently created slug with this base name, across owners.
    async fn find_latest_by_base(&self, base_name: &str) -> Result<Option<Slug>, StoreError>;

    /// All slugs ever assigned to `owner_id`, oldest first.
    async fn list_for_owner(&self, owner_id: DocId) -> Result<Vec<Slug>, StoreError>;
}
