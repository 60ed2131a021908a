//! Team blog posts.

use reviews_core::language::Language;
use reviews_core::mlstring::MlString;
use reviews_core::revision::{Document, Revisioned};
use reviews_core::types::{DocId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

use crate::models::team::Team;
use crate::store::RevisionTable;

/// Content of a row in the `blog_posts` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub team_id: DocId,
    pub title: MlString,
    pub post: MlString,
    pub original_language: Language,
    pub created_on: Timestamp,
    pub created_by: UserId,
}

impl BlogPost {
    pub fn new(team_id: DocId, input: &CreateBlogPost, language: Language, actor: UserId) -> Self {
        Self {
            team_id,
            title: MlString::single(language, input.title.trim()),
            post: MlString::single(language, input.post.trim()),
            original_language: language,
            created_on: chrono::Utc::now(),
            created_by: actor,
        }
    }
}

impl Revisioned for BlogPost {
    const ENTITY: &'static str = "blog_post";
}

impl RevisionTable for BlogPost {
    const TABLE: &'static str = "blog_posts";
}

/// A blog post together with the team it was published in.
#[derive(Debug, Clone, Serialize)]
pub struct BlogPostWithTeam {
    pub post: Document<BlogPost>,
    pub team: Document<Team>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlogPost {
    pub title: String,
    pub post: String,
    pub language: Option<Language>,
}
