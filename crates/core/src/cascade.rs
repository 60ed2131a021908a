//! Deleting a document together with a dependent it exclusively references.

use futures::future::join;

use crate::error::CoreError;
use crate::revision::{delete_all_revisions, Document, Revisioned};
use crate::store::RevisionStore;
use crate::types::UserId;

/// Delete `primary` and `dependent` concurrently.
///
/// The primary chain is tagged `delete-with-<dependent>` and the dependent
/// chain `delete-via-<primary>`. Both deletions always run to completion; if
/// either fails, the first failure is returned and the other side stays
/// deleted. Both documents must already be loaded.
pub async fn delete_with_dependent<P, D, SP, SD>(
    primary_store: &SP,
    primary: Document<P>,
    dependent_store: &SD,
    dependent: Document<D>,
    actor: UserId,
) -> Result<(), CoreError>
where
    P: Revisioned,
    D: Revisioned,
    SP: RevisionStore<P> + ?Sized,
    SD: RevisionStore<D> + ?Sized,
{
    let primary_id = primary.id;
    let dependent_id = dependent.id;
    let primary_tag = format!("delete-with-{}", D::ENTITY);
    let dependent_tag = format!("delete-via-{}", P::ENTITY);

    let (primary_result, dependent_result) = join(
        delete_all_revisions(primary_store, primary, actor, &[primary_tag.as_str()]),
        delete_all_revisions(dependent_store, dependent, actor, &[dependent_tag.as_str()]),
    )
    .await;

    match (primary_result, dependent_result) {
        (Ok(()), Ok(())) => {
            tracing::info!(
                primary = P::ENTITY,
                primary_id = %primary_id,
                dependent = D::ENTITY,
                dependent_id = %dependent_id,
                "Deleted document with dependent"
            );
            Ok(())
        }
        (Err(e), Ok(())) => {
            tracing::error!(
                error = %e,
                primary_id = %primary_id,
                dependent_id = %dependent_id,
                "{} delete failed after its {} was deleted",
                P::ENTITY,
                D::ENTITY
            );
            Err(e)
        }
        (Ok(()), Err(e)) => {
            tracing::error!(
                error = %e,
                primary_id = %primary_id,
                dependent_id = %dependent_id,
                "{} delete failed after its {} was deleted",
                D::ENTITY,
                P::ENTITY
            );
            Err(e)
        }
        (Err(e), Err(other)) => {
            tracing::error!(error = %e, other = %other, "Both deletes failed");
            Err(e)
        }
    }
}
