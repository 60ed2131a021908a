//! Unique slug assignment on top of a [`SlugStore`].
//!
//! The store's primary key on `name` is the only arbiter between concurrent
//! allocators; everything here is read-then-write and relies on it.

use crate::error::CoreError;
use crate::slug::{Slug, SlugPolicy};
use crate::store::{SlugStore, StoreError};
use crate::types::{DocId, UserId};

/// Assign a slug derived from `candidate` to `owner_id`.
///
/// 1. Unless `candidate` is reserved, try to claim it as-is.
/// 2. If it is taken (or reserved), reuse a slug this owner already holds
///    for the same base name.
/// 3. Otherwise claim `{candidate}-{n}`, where `n` follows the qualifier of
///    the latest slug with this base name.
///
/// Name collisions never fail the call, except when concurrent allocators
/// keep claiming the same qualified name, which yields
/// [`CoreError::SlugConflict`].
pub async fn allocate<S>(
    store: &S,
    policy: &SlugPolicy,
    candidate: &str,
    owner_id: DocId,
    actor: UserId,
) -> Result<Slug, CoreError>
where
    S: SlugStore + ?Sized,
{
    if !policy.is_reserved(candidate) {
        let slug = Slug::new(candidate, owner_id, actor);
        match store.insert(&slug).await {
            Ok(()) => {
                tracing::info!(slug = %slug.name, owner_id = %owner_id, "Slug allocated");
                return Ok(slug);
            }
            Err(StoreError::UniqueViolation { .. }) => {}
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(existing) = store.find_by_base_for_owner(candidate, owner_id).await? {
        tracing::debug!(slug = %existing.name, owner_id = %owner_id, "Slug already held by owner");
        return Ok(existing);
    }

    allocate_qualified(store, policy, candidate, owner_id, actor).await
}

async fn allocate_qualified<S>(
    store: &S,
    policy: &SlugPolicy,
    base_name: &str,
    owner_id: DocId,
    actor: UserId,
) -> Result<Slug, CoreError>
where
    S: SlugStore + ?Sized,
{
    let mut last_tried: Option<u64> = None;
    for attempt in 1..=policy.max_qualify_attempts.max(1) {
        let latest = store.find_latest_by_base(base_name).await?;
        let mut qualifier = next_qualifier(latest.as_ref());
        if let Some(tried) = last_tried {
            qualifier = qualifier.max(tried + 1);
        }

        let slug = Slug::qualified(base_name, qualifier, owner_id, actor);
        match store.insert(&slug).await {
            Ok(()) => {
                tracing::info!(
                    slug = %slug.name,
                    base_name,
                    owner_id = %owner_id,
                    "Qualified slug allocated"
                );
                return Ok(slug);
            }
            Err(StoreError::UniqueViolation { .. }) => {
                tracing::warn!(slug = %slug.name, attempt, "Qualified slug already taken");
                last_tried = Some(qualifier);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let name = format!("{base_name}-{}", last_tried.unwrap_or(2));
    Err(CoreError::SlugConflict { name })
}

/// Qualifier following `latest`: its numeric qualifier plus one, else 2.
pub fn next_qualifier(latest: Option<&Slug>) -> u64 {
    latest.and_then(Slug::qualifier).map_or(2, |q| q.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::store::memory::MemorySlugStore;

    fn ids() -> (DocId, UserId) {
        (Uuid::new_v4(), Uuid::new_v4())
    }

    #[tokio::test]
    async fn first_allocation_is_unqualified() {
        let store = MemorySlugStore::new();
        let (owner, actor) = ids();
        let slug = allocate(&store, &SlugPolicy::default(), "zombo.com", owner, actor)
            .await
            .unwrap();
        assert_eq!(slug.name, "zombo.com");
        assert_eq!(slug.base_name, "zombo.com");
        assert_eq!(slug.qualifier_part, None);
        assert_eq!(slug.owner_id, owner);
        assert_eq!(slug.created_by, actor);
    }

    #[tokio::test]
    async fn same_owner_reallocation_is_idempotent() {
        let store = MemorySlugStore::new();
        let policy = SlugPolicy::default();
        let (owner, actor) = ids();
        let a = allocate(&store, &policy, "x", owner, actor).await.unwrap();
        let b = allocate(&store, &policy, "x", owner, actor).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn other_owners_get_increasing_qualifiers() {
        let store = MemorySlugStore::new();
        let policy = SlugPolicy::default();
        let actor = Uuid::new_v4();
        let owners = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];

        let mut got = Vec::new();
        for owner in owners {
            got.push(allocate(&store, &policy, "x", owner, actor).await.unwrap());
        }
        let got: Vec<_> = got.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(got, vec!["x", "x-2", "x-3"]);
    }

    #[tokio::test]
    async fn qualified_owner_keeps_its_slug() {
        let store = MemorySlugStore::new();
        let policy = SlugPolicy::default();
        let actor = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        allocate(&store, &policy, "x", a, actor).await.unwrap();
        let first = allocate(&store, &policy, "x", b, actor).await.unwrap();
        let again = allocate(&store, &policy, "x", b, actor).await.unwrap();
        assert_eq!(first.name, "x-2");
        assert_eq!(again, first);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn reserved_names_are_always_qualified() {
        let store = MemorySlugStore::new();
        let policy = SlugPolicy::default();
        let (owner, actor) = ids();
        let slug = allocate(&store, &policy, "register", owner, actor).await.unwrap();
        assert_eq!(slug.name, "register-2");
        assert_eq!(slug.base_name, "register");
        assert_eq!(slug.qualifier_part.as_deref(), Some("2"));

        let again = allocate(&store, &policy, "register", owner, actor).await.unwrap();
        assert_eq!(again, slug);
    }

    #[tokio::test]
    async fn non_numeric_latest_qualifier_restarts_at_two() {
        let store = MemorySlugStore::new();
        let actor = Uuid::new_v4();
        let mut odd = Slug::new("x", Uuid::new_v4(), actor);
        odd.qualifier_part = Some("legacy".into());
        store.insert(&odd).await.unwrap();

        let slug = allocate(&store, &SlugPolicy::default(), "x", Uuid::new_v4(), actor)
            .await
            .unwrap();
        assert_eq!(slug.name, "x-2");
    }

    #[tokio::test]
    async fn unrelated_name_holding_next_qualifier_is_skipped() {
        let store = MemorySlugStore::new();
        let policy = SlugPolicy::default();
        let actor = Uuid::new_v4();
        allocate(&store, &policy, "x", Uuid::new_v4(), actor).await.unwrap();
        // A document literally named "X 2".
        allocate(&store, &policy, "x-2", Uuid::new_v4(), actor).await.unwrap();

        let slug = allocate(&store, &policy, "x", Uuid::new_v4(), actor).await.unwrap();
        assert_eq!(slug.name, "x-3");
    }

    /// Lets a rival claim the next `races_left` qualified names just before us.
    struct RacingStore {
        inner: MemorySlugStore,
        races_left: AtomicUsize,
    }

    #[async_trait]
    impl SlugStore for RacingStore {
        async fn insert(&self, slug: &Slug) -> Result<(), StoreError> {
            let raced = slug.qualifier_part.is_some()
                && self
                    .races_left
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                    .is_ok();
            if raced {
                let mut rival = slug.clone();
                rival.owner_id = Uuid::new_v4();
                rival.qualifier_part = Some("rival".into());
                self.inner.insert(&rival).await?;
            }
            self.inner.insert(slug).await
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Slug>, StoreError> {
            self.inner.find_by_name(name).await
        }

        async fn find_by_base_for_owner(
            &self,
            base_name: &str,
            owner_id: DocId,
        ) -> Result<Option<Slug>, StoreError> {
            self.inner.find_by_base_for_owner(base_name, owner_id).await
        }

        async fn find_latest_by_base(&self, base_name: &str) -> Result<Option<Slug>, StoreError> {
            self.inner.find_latest_by_base(base_name).await
        }

        async fn list_for_owner(&self, owner_id: DocId) -> Result<Vec<Slug>, StoreError> {
            self.inner.list_for_owner(owner_id).await
        }
    }

    #[tokio::test]
    async fn persistent_race_surfaces_slug_conflict() {
        let store = RacingStore {
            inner: MemorySlugStore::new(),
            races_left: AtomicUsize::new(usize::MAX),
        };
        let policy = SlugPolicy::default();
        let actor = Uuid::new_v4();
        store
            .inner
            .insert(&Slug::new("x", Uuid::new_v4(), actor))
            .await
            .unwrap();

        assert_matches!(
            allocate(&store, &policy, "x", Uuid::new_v4(), actor).await,
            Err(CoreError::SlugConflict { name }) if name == "x-3"
        );
    }

    #[tokio::test]
    async fn lost_race_is_retried_with_next_qualifier() {
        let store = RacingStore {
            inner: MemorySlugStore::new(),
            races_left: AtomicUsize::new(1),
        };
        let actor = Uuid::new_v4();
        store
            .inner
            .insert(&Slug::new("x", Uuid::new_v4(), actor))
            .await
            .unwrap();

        let slug = allocate(&store, &SlugPolicy::default(), "x", Uuid::new_v4(), actor)
            .await
            .unwrap();
        assert_eq!(slug.name, "x-3");
        assert_eq!(slug.qualifier_part.as_deref(), Some("3"));
    }

    #[test]
    fn next_qualifier_follows_latest() {
        let actor = Uuid::new_v4();
        assert_eq!(next_qualifier(None), 2);
        assert_eq!(next_qualifier(Some(&Slug::new("x", Uuid::new_v4(), actor))), 2);
        assert_eq!(
            next_qualifier(Some(&Slug::qualified("x", 7, Uuid::new_v4(), actor))),
            8
        );
    }

    #[test]
    fn next_qualifier_saturates_at_max() {
        let actor = Uuid::new_v4();
        let latest = Slug::qualified("x", u64::MAX, Uuid::new_v4(), actor);
        assert_eq!(next_qualifier(Some(&latest)), u64::MAX);
    }
}
