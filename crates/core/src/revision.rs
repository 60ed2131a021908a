//! Revision chains for user-editable documents.
//!
//! A document is never overwritten in place. Each edit first archives the
//! current head as a historical row (`rev_of` set to the document id), then
//! gives the head fresh revision metadata. Deleting appends a deleted
//! revision and marks the whole chain deleted.
//!
//! Historical rows are stored under the `rev_id` they had as heads, so
//! re-running an interrupted archive step writes nothing new.

use serde::Serialize;
use uuid::Uuid;

use crate::error::CoreError;
use crate::store::{RevisionStore, StoreError};
use crate::types::{DocId, RevId, Timestamp, UserId};

/// Tag prepended to the tags of every deletion revision.
pub const DELETE_TAG: &str = "delete";

/// Content types stored in a revisioned table.
pub trait Revisioned: Clone + Send + Sync + 'static {
    /// Entity name used in errors, logs and cross-reference tags.
    const ENTITY: &'static str;
}

/// Revision bookkeeping carried on every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionMeta {
    pub rev_id: RevId,
    pub rev_user: UserId,
    pub rev_date: Timestamp,
    /// Set to the document id on historical rows.
    pub rev_of: Option<DocId>,
    pub rev_deleted: bool,
    pub rev_tags: Vec<String>,
}

impl RevisionMeta {
    fn fresh(actor: UserId, tags: &[&str]) -> Self {
        Self {
            rev_id: Uuid::new_v4(),
            rev_user: actor,
            rev_date: chrono::Utc::now(),
            rev_of: None,
            rev_deleted: false,
            rev_tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Whether a row is the live head or an archived revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionKind {
    Head,
    Historical { of: DocId },
}

/// One row of a revisioned table: storage id, revision metadata and content.
#[derive(Debug, Clone, Serialize)]
pub struct Document<T> {
    /// Storage id. Equals the stable document id for heads.
    pub id: DocId,
    #[serde(flatten)]
    pub meta: RevisionMeta,
    #[serde(flatten)]
    pub data: T,
    /// Revision currently persisted under `id`, if the row was ever saved.
    #[serde(skip)]
    pub(crate) stored_rev: Option<RevId>,
}

impl<T> Document<T> {
    /// Rebuild a document from a stored row.
    pub fn from_storage(id: DocId, meta: RevisionMeta, data: T) -> Self {
        let stored_rev = Some(meta.rev_id);
        Self {
            id,
            meta,
            data,
            stored_rev,
        }
    }

    pub fn kind(&self) -> RevisionKind {
        match self.meta.rev_of {
            None => RevisionKind::Head,
            Some(of) => RevisionKind::Historical { of },
        }
    }

    pub fn is_head(&self) -> bool {
        self.meta.rev_of.is_none()
    }

    pub fn is_deleted(&self) -> bool {
        self.meta.rev_deleted
    }

    /// The stable id of the document this row belongs to.
    pub fn document_id(&self) -> DocId {
        self.meta.rev_of.unwrap_or(self.id)
    }

    /// The revision persisted for this row, `None` if never saved.
    pub fn stored_rev(&self) -> Option<RevId> {
        self.stored_rev
    }
}

/// Start a new document with its first revision. Nothing is persisted.
pub fn create_first_revision<T: Revisioned>(data: T, actor: UserId, tags: &[&str]) -> Document<T> {
    Document {
        id: Uuid::new_v4(),
        meta: RevisionMeta::fresh(actor, tags),
        data,
        stored_rev: None,
    }
}

/// Fail unless `doc` is a live head.
///
/// Must be applied to every document loaded for display or editing,
/// including documents pulled in through joins.
pub fn ensure_current<T: Revisioned>(doc: &Document<T>) -> Result<(), CoreError> {
    if doc.meta.rev_deleted {
        return Err(CoreError::RevisionDeleted {
            entity: T::ENTITY,
            id: doc.document_id(),
        });
    }
    if doc.meta.rev_of.is_some() {
        return Err(CoreError::RevisionStale {
            entity: T::ENTITY,
            id: doc.id,
        });
    }
    Ok(())
}

/// Load the head stored under `id`, rejecting historical and deleted rows.
pub async fn fetch_current<T, S>(store: &S, id: DocId) -> Result<Document<T>, CoreError>
where
    T: Revisioned,
    S: RevisionStore<T> + ?Sized,
{
    let doc = store.fetch(id).await?.ok_or(CoreError::NotFound {
        entity: T::ENTITY,
        id,
    })?;
    ensure_current(&doc)?;
    Ok(doc)
}

/// Archive `head` and return it as the pending next revision.
///
/// The historical copy is persisted before the head is touched. The returned
/// head carries a new `rev_id`, `actor`, the current time and `tags`, and must
/// be persisted by the caller with [`save`].
pub async fn new_revision<T, S>(
    store: &S,
    mut head: Document<T>,
    actor: UserId,
    tags: &[&str],
) -> Result<Document<T>, CoreError>
where
    T: Revisioned,
    S: RevisionStore<T> + ?Sized,
{
    ensure_current(&head)?;

    let mut snapshot = head.clone();
    snapshot.id = head.meta.rev_id;
    snapshot.meta.rev_of = Some(head.id);
    snapshot.stored_rev = None;
    store.archive(&snapshot).await?;

    tracing::debug!(
        entity = T::ENTITY,
        doc_id = %head.id,
        archived_rev = %snapshot.id,
        "Revision archived"
    );

    head.meta = RevisionMeta::fresh(actor, tags);
    Ok(head)
}

/// Persist a head, inserting it on first save.
///
/// Later saves only succeed if the stored row still carries the revision
/// this document was loaded with; otherwise another writer got there first
/// and [`CoreError::RevisionConflict`] is returned.
pub async fn save<T, S>(store: &S, doc: &mut Document<T>) -> Result<(), CoreError>
where
    T: Revisioned,
    S: RevisionStore<T> + ?Sized,
{
    if !doc.is_head() {
        return Err(CoreError::RevisionStale {
            entity: T::ENTITY,
            id: doc.id,
        });
    }
    store
        .save_head(doc, doc.stored_rev)
        .await
        .map_err(|e| conflict_or_storage::<T>(e, doc.id))?;
    doc.stored_rev = Some(doc.meta.rev_id);
    tracing::debug!(entity = T::ENTITY, doc_id = %doc.id, rev_id = %doc.meta.rev_id, "Head saved");
    Ok(())
}

/// Soft-delete a document and its whole history.
///
/// Appends a deleted revision tagged `delete` followed by `tags`. If the
/// archive step fails nothing is deleted.
pub async fn delete_all_revisions<T, S>(
    store: &S,
    head: Document<T>,
    actor: UserId,
    tags: &[&str],
) -> Result<(), CoreError>
where
    T: Revisioned,
    S: RevisionStore<T> + ?Sized,
{
    let delete_tags: Vec<&str> = std::iter::once(DELETE_TAG)
        .chain(tags.iter().copied())
        .collect();
    let mut head = new_revision(store, head, actor, &delete_tags).await?;
    head.meta.rev_deleted = true;

    let marked = store
        .delete_chain(&head, head.stored_rev)
        .await
        .map_err(|e| conflict_or_storage::<T>(e, head.id))?;

    tracing::info!(
        entity = T::ENTITY,
        doc_id = %head.id,
        historical_rows = marked,
        user_id = %actor,
        "Revision chain deleted"
    );
    Ok(())
}

/// The head and every historical revision of a live document, newest first.
pub async fn list_revisions<T, S>(store: &S, id: DocId) -> Result<Vec<Document<T>>, CoreError>
where
    T: Revisioned,
    S: RevisionStore<T> + ?Sized,
{
    fetch_current(store, id).await?;
    Ok(store.list_chain(id).await?)
}

fn conflict_or_storage<T: Revisioned>(err: StoreError, id: DocId) -> CoreError {
    match err {
        StoreError::Conflict(_) | StoreError::UniqueViolation { .. } => {
            CoreError::RevisionConflict {
                entity: T::ENTITY,
                id,
            }
        }
        other => CoreError::Storage(other),
    }
}
