//! Per-user profile data that is edited like any other document.

use reviews_core::language::Language;
use reviews_core::mlstring::MlString;
use reviews_core::revision::Revisioned;
use reviews_core::types::UserId;
use serde::{Deserialize, Serialize};

use crate::store::RevisionTable;

/// Content of a row in the `user_metas` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMeta {
    /// The user this profile belongs to. At most one live head per user.
    pub user_id: UserId,
    pub bio: MlString,
    pub original_language: Language,
}

impl Revisioned for UserMeta {
    const ENTITY: &'static str = "user_meta";
}

impl RevisionTable for UserMeta {
    const TABLE: &'static str = "user_metas";
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBio {
    pub bio: String,
    pub language: Option<Language>,
}
