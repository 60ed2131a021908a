//! Binding documents to their canonical slug and resolving URL segments.

use uuid::Uuid;

use crate::error::CoreError;
use crate::language::Language;
use crate::mlstring::MlString;
use crate::revision::{ensure_current, fetch_current, Document, Revisioned};
use crate::slug::{generate_slug_name, is_uuid, SlugPolicy};
use crate::slug_allocator::allocate;
use crate::store::{RevisionStore, SlugStore};
use crate::types::UserId;

/// Documents that are addressable by a slug derived from one of their fields.
pub trait Sluggable: Revisioned {
    /// The multilingual field slugs are derived from.
    fn slug_source(&self) -> &MlString;

    /// Language the document was originally written in.
    fn original_language(&self) -> Language;

    fn canonical_slug_name(&self) -> Option<&str>;

    fn set_canonical_slug_name(&mut self, name: String);
}

/// A document found by [`resolve_slug_or_id`].
#[derive(Debug, Clone)]
pub struct SlugResolution<T> {
    pub document: Document<T>,
    /// Canonical slug to redirect to when the segment used was not it.
    pub redirect_to: Option<String>,
}

impl<T> SlugResolution<T> {
    pub fn redirect_required(&self) -> bool {
        self.redirect_to.is_some()
    }
}

/// Point `doc` at a slug derived from its source field in `language`.
///
/// Does nothing unless `language` is the document's original language and
/// the field has text in it, or when the derived name is already canonical.
/// The document itself is not saved.
pub async fn update_slug<T, L>(
    slugs: &L,
    policy: &SlugPolicy,
    doc: &mut Document<T>,
    actor: UserId,
    language: Language,
) -> Result<(), CoreError>
where
    T: Sluggable,
    L: SlugStore + ?Sized,
{
    if doc.data.original_language() != language {
        return Ok(());
    }
    let Some(source) = doc.data.slug_source().get(language) else {
        return Ok(());
    };
    let candidate = generate_slug_name(source)?;
    if doc.data.canonical_slug_name() == Some(candidate.as_str()) {
        return Ok(());
    }
    ensure_current(doc)?;

    let slug = allocate(slugs, policy, &candidate, doc.id, actor).await?;
    if doc.data.canonical_slug_name() != Some(slug.name.as_str()) {
        tracing::info!(
            entity = T::ENTITY,
            doc_id = %doc.id,
            previous = ?doc.data.canonical_slug_name(),
            slug = %slug.name,
            "Canonical slug changed"
        );
        doc.data.set_canonical_slug_name(slug.name);
    }
    Ok(())
}

/// Resolve a URL path segment that is either a document id or a slug.
///
/// Slugs that are no longer canonical still resolve; the result then asks for
/// a redirect to the canonical name. The stale/deleted guard applies.
pub async fn resolve_slug_or_id<T, S, L>(
    store: &S,
    slugs: &L,
    segment: &str,
) -> Result<SlugResolution<T>, CoreError>
where
    T: Sluggable,
    S: RevisionStore<T> + ?Sized,
    L: SlugStore + ?Sized,
{
    let document = if is_uuid(segment) {
        let id = Uuid::parse_str(segment)
            .map_err(|e| CoreError::Internal(format!("Unparseable id '{segment}': {e}")))?;
        fetch_current(store, id).await?
    } else {
        let slug = slugs
            .find_by_name(segment)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: T::ENTITY,
                id: Uuid::nil(),
            })?;
        fetch_current(store, slug.owner_id).await?
    };

    let redirect_to = document
        .data
        .canonical_slug_name()
        .filter(|canonical| *canonical != segment)
        .map(str::to_string);

    Ok(SlugResolution {
        document,
        redirect_to,
    })
}
