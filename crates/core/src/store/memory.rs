//! In-memory stores with the same guarantees as the PostgreSQL ones.
//!
//! Every operation takes a single lock, so each call is atomic. Used by unit
//! tests and local tooling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{RevisionStore, SlugStore, StoreError};
use crate::revision::{Document, Revisioned};
use crate::slug::Slug;
use crate::types::{DocId, RevId};

/// A revisioned table held in a map keyed by storage id.
pub struct MemoryStore<T> {
    rows: RwLock<HashMap<DocId, Document<T>>>,
    unavailable: AtomicBool,
}

impl<T: Revisioned> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with [`StoreError::Backend`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of every stored row, heads and history alike.
    pub async fn rows(&self) -> Vec<Document<T>> {
        self.rows.read().await.values().cloned().collect()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("memory store unavailable".into()));
        }
        Ok(())
    }

    fn write_head(
        rows: &mut HashMap<DocId, Document<T>>,
        head: &Document<T>,
        expected: Option<RevId>,
    ) -> Result<(), StoreError> {
        match (rows.get(&head.id), expected) {
            (Some(_), None) => {
                return Err(StoreError::UniqueViolation {
                    constraint: format!("{}_pkey", T::ENTITY),
                })
            }
            (None, Some(rev)) => {
                return Err(StoreError::Conflict(format!(
                    "{} {} missing, expected revision {rev}",
                    T::ENTITY,
                    head.id
                )))
            }
            (Some(stored), Some(rev)) if stored.meta.rev_id != rev || !stored.is_head() => {
                return Err(StoreError::Conflict(format!(
                    "{} {} is at revision {}, expected {rev}",
                    T::ENTITY,
                    head.id,
                    stored.meta.rev_id
                )))
            }
            _ => {}
        }
        let mut row = head.clone();
        row.stored_rev = Some(row.meta.rev_id);
        rows.insert(row.id, row);
        Ok(())
    }
}

impl<T: Revisioned> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Revisioned> RevisionStore<T> for MemoryStore<T> {
    async fn fetch(&self, id: DocId) -> Result<Option<Document<T>>, StoreError> {
        self.check_available()?;
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn archive(&self, snapshot: &Document<T>) -> Result<(), StoreError> {
        self.check_available()?;
        let mut rows = self.rows.write().await;
        rows.entry(snapshot.id).or_insert_with(|| {
            let mut row = snapshot.clone();
            row.stored_rev = Some(row.meta.rev_id);
            row
        });
        Ok(())
    }

    async fn save_head(
        &self,
        head: &Document<T>,
        expected: Option<RevId>,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut rows = self.rows.write().await;
        Self::write_head(&mut rows, head, expected)
    }

    async fn delete_chain(
        &self,
        head: &Document<T>,
        expected: Option<RevId>,
    ) -> Result<u64, StoreError> {
        self.check_available()?;
        let mut rows = self.rows.write().await;
        Self::write_head(&mut rows, head, expected)?;
        let mut marked = 0;
        for row in rows.values_mut() {
            if row.meta.rev_of == Some(head.id) && !row.meta.rev_deleted {
                row.meta.rev_deleted = true;
                marked += 1;
            }
        }
        Ok(marked)
    }

    async fn list_chain(&self, id: DocId) -> Result<Vec<Document<T>>, StoreError> {
        self.check_available()?;
        let mut chain: Vec<_> = self
            .rows
            .read()
            .await
            .values()
            .filter(|row| row.id == id || row.meta.rev_of == Some(id))
            .cloned()
            .collect();
        chain.sort_by(|a, b| b.meta.rev_date.cmp(&a.meta.rev_date));
        Ok(chain)
    }
}

/// A slug namespace held in creation order.
#[derive(Default)]
pub struct MemorySlugStore {
    slugs: RwLock<Vec<Slug>>,
}

impl MemorySlugStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.slugs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slugs.read().await.is_empty()
    }
}

#[async_trait]
impl SlugStore for MemorySlugStore {
    async fn insert(&self, slug: &Slug) -> Result<(), StoreError> {
        let mut slugs = self.slugs.write().await;
        if slugs.iter().any(|s| s.name == slug.name) {
            return Err(StoreError::UniqueViolation {
                constraint: "slugs_pkey".into(),
            });
        }
        slugs.push(slug.clone());
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Slug>, StoreError> {
        Ok(self
            .slugs
            .read()
            .await
            .iter()
            .find(|s| s.name == name)
            .cloned())
    }

    async fn find_by_base_for_owner(
        &self,
        base_name: &str,
        owner_id: DocId,
    ) -> Result<Option<Slug>, StoreError> {
        Ok(self
            .slugs
            .read()
            .await
            .iter()
            .rev()
            .find(|s| s.base_name == base_name && s.owner_id == owner_id)
            .cloned())
    }

    async fn find_latest_by_base(&self, base_name: &str) -> Result<Option<Slug>, StoreError> {
        Ok(self
            .slugs
            .read()
            .await
            .iter()
            .rev()
            .find(|s| s.base_name == base_name)
            .cloned())
    }

    async fn list_for_owner(&self, owner_id: DocId) -> Result<Vec<Slug>, StoreError> {
        Ok(self
            .slugs
            .read()
            .await
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect())
    }
}
