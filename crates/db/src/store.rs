//! PostgreSQL implementations of the `reviews-core` storage traits.
//!
//! Every revisioned table has the same shape: typed revision columns plus a
//! JSONB `content` column holding the entity payload. Heads and historical
//! rows share the table; `rev_of IS NULL` marks a head.

use std::marker::PhantomData;

use async_trait::async_trait;
use reviews_core::revision::{Document, RevisionMeta, Revisioned};
use reviews_core::slug::Slug;
use reviews_core::store::{RevisionStore, SlugStore, StoreError};
use reviews_core::types::{DocId, RevId, Timestamp, UserId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::{FromRow, PgExecutor, PgPool};

use crate::error::{content_error, store_error};
use crate::models::blog_post::BlogPost;
use crate::models::file::File;
use crate::models::review::Review;
use crate::models::slug::SlugRow;
use crate::models::team::Team;
use crate::models::thing::Thing;
use crate::models::user_meta::UserMeta;

/// Column list shared by every revisioned table.
pub(crate) const REVISION_COLUMNS: &str =
    "id, rev_id, rev_user, rev_date, rev_of, rev_deleted, rev_tags, content";

/// Content types with a revisioned table of their own.
pub trait RevisionTable: Revisioned + Serialize + DeserializeOwned {
    const TABLE: &'static str;
}

// ---------------------------------------------------------------------------
// Revision rows
// ---------------------------------------------------------------------------

/// A raw row of any revisioned table.
#[derive(Debug, FromRow)]
pub(crate) struct RevisionRow {
    pub id: DocId,
    pub rev_id: RevId,
    pub rev_user: UserId,
    pub rev_date: Timestamp,
    pub rev_of: Option<DocId>,
    pub rev_deleted: bool,
    pub rev_tags: Vec<String>,
    pub content: Json<serde_json::Value>,
}

impl RevisionRow {
    pub(crate) fn into_document<T: RevisionTable>(self) -> Result<Document<T>, StoreError> {
        let data = serde_json::from_value(self.content.0)
            .map_err(|e| content_error(T::TABLE, e))?;
        let meta = RevisionMeta {
            rev_id: self.rev_id,
            rev_user: self.rev_user,
            rev_date: self.rev_date,
            rev_of: self.rev_of,
            rev_deleted: self.rev_deleted,
            rev_tags: self.rev_tags,
        };
        Ok(Document::from_storage(self.id, meta, data))
    }
}

fn content_of<T: RevisionTable>(doc: &Document<T>) -> Result<Json<serde_json::Value>, StoreError> {
    serde_json::to_value(&doc.data)
        .map(Json)
        .map_err(|e| content_error(T::TABLE, e))
}

/// Insert or compare-and-swap a head row.
async fn write_head<'e, T, E>(
    executor: E,
    head: &Document<T>,
    expected: Option<RevId>,
) -> Result<(), StoreError>
where
    T: RevisionTable,
    E: PgExecutor<'e>,
{
    let content = content_of(head)?;
    let meta = &head.meta;

    let Some(expected) = expected else {
        let query = format!(
            "INSERT INTO {} ({REVISION_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            T::TABLE
        );
        sqlx::query(&query)
            .bind(head.id)
            .bind(meta.rev_id)
            .bind(meta.rev_user)
            .bind(meta.rev_date)
            .bind(meta.rev_of)
            .bind(meta.rev_deleted)
            .bind(&meta.rev_tags)
            .bind(content)
            .execute(executor)
            .await
            .map_err(store_error)?;
        return Ok(());
    };

    let query = format!(
        "UPDATE {} SET
            rev_id = $2,
            rev_user = $3,
            rev_date = $4,
            rev_deleted = $5,
            rev_tags = $6,
            content = $7
         WHERE id = $1 AND rev_id = $8 AND rev_of IS NULL",
        T::TABLE
    );
    let result = sqlx::query(&query)
        .bind(head.id)
        .bind(meta.rev_id)
        .bind(meta.rev_user)
        .bind(meta.rev_date)
        .bind(meta.rev_deleted)
        .bind(&meta.rev_tags)
        .bind(content)
        .bind(expected)
        .execute(executor)
        .await
        .map_err(store_error)?;

    if result.rows_affected() == 0 {
        return Err(StoreError::Conflict(format!(
            "{} {} is no longer at revision {expected}",
            T::ENTITY,
            head.id
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Revision store
// ---------------------------------------------------------------------------

/// [`RevisionStore`] over the table named by `T::TABLE`.
pub struct PgRevisionStore<T> {
    pool: PgPool,
    _content: PhantomData<fn() -> T>,
}

impl<T: RevisionTable> PgRevisionStore<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _content: PhantomData,
        }
    }
}

impl<T> Clone for PgRevisionStore<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _content: PhantomData,
        }
    }
}

#[async_trait]
impl<T: RevisionTable> RevisionStore<T> for PgRevisionStore<T> {
    async fn fetch(&self, id: DocId) -> Result<Option<Document<T>>, StoreError> {
        let query = format!("SELECT {REVISION_COLUMNS} FROM {} WHERE id = $1", T::TABLE);
        sqlx::query_as::<_, RevisionRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?
            .map(RevisionRow::into_document::<T>)
            .transpose()
    }

    async fn archive(&self, snapshot: &Document<T>) -> Result<(), StoreError> {
        let content = content_of(snapshot)?;
        let meta = &snapshot.meta;
        let query = format!(
            "INSERT INTO {} ({REVISION_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (id) DO NOTHING",
            T::TABLE
        );
        sqlx::query(&query)
            .bind(snapshot.id)
            .bind(meta.rev_id)
            .bind(meta.rev_user)
            .bind(meta.rev_date)
            .bind(meta.rev_of)
            .bind(meta.rev_deleted)
            .bind(&meta.rev_tags)
            .bind(content)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn save_head(
        &self,
        head: &Document<T>,
        expected: Option<RevId>,
    ) -> Result<(), StoreError> {
        write_head(&self.pool, head, expected).await
    }

    async fn delete_chain(
        &self,
        head: &Document<T>,
        expected: Option<RevId>,
    ) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        write_head(&mut *tx, head, expected).await?;

        let query = format!(
            "UPDATE {} SET rev_deleted = true WHERE rev_of = $1 AND rev_deleted = false",
            T::TABLE
        );
        let marked = sqlx::query(&query)
            .bind(head.id)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?
            .rows_affected();

        tx.commit().await.map_err(store_error)?;
        Ok(marked)
    }

    async fn list_chain(&self, id: DocId) -> Result<Vec<Document<T>>, StoreError> {
        let query = format!(
            "SELECT {REVISION_COLUMNS} FROM {}
             WHERE id = $1 OR rev_of = $1
             ORDER BY rev_date DESC",
            T::TABLE
        );
        sqlx::query_as::<_, RevisionRow>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(RevisionRow::into_document::<T>)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Slug store
// ---------------------------------------------------------------------------

/// The two slug namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugTable {
    Thing,
    Team,
}

impl SlugTable {
    fn table(self) -> &'static str {
        match self {
            SlugTable::Thing => "thing_slugs",
            SlugTable::Team => "team_slugs",
        }
    }

    fn owner_column(self) -> &'static str {
        match self {
            SlugTable::Thing => "thing_id",
            SlugTable::Team => "team_id",
        }
    }

    fn columns(self) -> String {
        format!(
            "name, base_name, qualifier_part, {} AS owner_id, created_on, created_by",
            self.owner_column()
        )
    }
}

/// [`SlugStore`] over one slug table. The primary key on `name` arbitrates
/// concurrent inserts.
#[derive(Clone)]
pub struct PgSlugStore {
    pool: PgPool,
    table: SlugTable,
}

impl PgSlugStore {
    pub fn new(pool: PgPool, table: SlugTable) -> Self {
        Self { pool, table }
    }

    /// A select over this table, newest slug first. Among slugs created in
    /// the same instant the highest numeric qualifier wins.
    fn latest_first(&self, filter: &str) -> String {
        format!(
            "SELECT {} FROM {} WHERE {filter}
             ORDER BY created_on DESC,
                      CASE WHEN qualifier_part ~ '^[0-9]{{1,18}}$'
                           THEN qualifier_part::bigint END DESC NULLS LAST
             LIMIT 1",
            self.table.columns(),
            self.table.table()
        )
    }
}

#[async_trait]
impl SlugStore for PgSlugStore {
    async fn insert(&self, slug: &Slug) -> Result<(), StoreError> {
        let query = format!(
            "INSERT INTO {} (name, base_name, qualifier_part, {}, created_on, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)",
            self.table.table(),
            self.table.owner_column()
        );
        sqlx::query(&query)
            .bind(&slug.name)
            .bind(&slug.base_name)
            .bind(&slug.qualifier_part)
            .bind(slug.owner_id)
            .bind(slug.created_on)
            .bind(slug.created_by)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Slug>, StoreError> {
        let query = self.latest_first("name = $1");
        let row = sqlx::query_as::<_, SlugRow>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(row.map(Slug::from))
    }

    async fn find_by_base_for_owner(
        &self,
        base_name: &str,
        owner_id: DocId,
    ) -> Result<Option<Slug>, StoreError> {
        let filter = format!("base_name = $1 AND {} = $2", self.table.owner_column());
        let query = self.latest_first(&filter);
        let row = sqlx::query_as::<_, SlugRow>(&query)
            .bind(base_name)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(row.map(Slug::from))
    }

    async fn find_latest_by_base(&self, base_name: &str) -> Result<Option<Slug>, StoreError> {
        let query = self.latest_first("base_name = $1");
        let row = sqlx::query_as::<_, SlugRow>(&query)
            .bind(base_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(row.map(Slug::from))
    }

    async fn list_for_owner(&self, owner_id: DocId) -> Result<Vec<Slug>, StoreError> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = $1 ORDER BY created_on",
            self.table.columns(),
            self.table.table(),
            self.table.owner_column()
        );
        let rows = sqlx::query_as::<_, SlugRow>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Slug::from).collect())
    }
}

// ---------------------------------------------------------------------------
// Store bundle
// ---------------------------------------------------------------------------

/// One store per table, sharing a pool.
#[derive(Clone)]
pub struct Stores {
    pub things: PgRevisionStore<Thing>,
    pub reviews: PgRevisionStore<Review>,
    pub teams: PgRevisionStore<Team>,
    pub blog_posts: PgRevisionStore<BlogPost>,
    pub files: PgRevisionStore<File>,
    pub user_metas: PgRevisionStore<UserMeta>,
    pub thing_slugs: PgSlugStore,
    pub team_slugs: PgSlugStore,
}

impl Stores {
    pub fn new(pool: PgPool) -> Self {
        Self {
            things: PgRevisionStore::new(pool.clone()),
            reviews: PgRevisionStore::new(pool.clone()),
            teams: PgRevisionStore::new(pool.clone()),
            blog_posts: PgRevisionStore::new(pool.clone()),
            files: PgRevisionStore::new(pool.clone()),
            user_metas: PgRevisionStore::new(pool.clone()),
            thing_slugs: PgSlugStore::new(pool.clone(), SlugTable::Thing),
            team_slugs: PgSlugStore::new(pool, SlugTable::Team),
        }
    }
}
