//! Uploaded media files and their licensing metadata.

use reviews_core::mlstring::MlString;
use reviews_core::revision::Revisioned;
use reviews_core::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};

use crate::store::RevisionTable;

/// Content of a row in the `files` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    /// Stored file name.
    pub name: String,
    pub description: MlString,
    pub creator: MlString,
    pub source: MlString,
    /// License identifier, e.g. `cc-by`.
    pub license: String,
    pub mime_type: String,
    pub uploaded_by: UserId,
    pub uploaded_on: Timestamp,
    /// False until the uploader has supplied the metadata.
    pub completed: bool,
}

impl Revisioned for File {
    const ENTITY: &'static str = "file";
}

impl RevisionTable for File {
    const TABLE: &'static str = "files";
}
