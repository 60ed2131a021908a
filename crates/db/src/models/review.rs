//! Reviews of things.

use reviews_core::language::Language;
use reviews_core::mlstring::MlString;
use reviews_core::revision::{Document, Revisioned};
use reviews_core::types::{DocId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

use crate::models::thing::Thing;
use crate::store::RevisionTable;

/// Content of a row in the `reviews` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub thing_id: DocId,
    pub title: MlString,
    pub text: MlString,
    /// `text` rendered for display.
    pub html: MlString,
    pub star_rating: i16,
    pub original_language: Language,
    pub created_on: Timestamp,
    pub created_by: UserId,
}

impl Review {
    pub fn new(thing_id: DocId, input: &CreateReview, language: Language, actor: UserId) -> Self {
        let text = MlString::single(language, input.text.trim());
        Self {
            thing_id,
            title: MlString::single(language, input.title.trim()),
            html: text.render_plain_html(),
            text,
            star_rating: input.star_rating,
            original_language: language,
            created_on: chrono::Utc::now(),
            created_by: actor,
        }
    }

    pub fn apply(&mut self, input: &UpdateReview, language: Language) {
        if let Some(title) = &input.title {
            self.title.set(language, title.trim());
        }
        if let Some(text) = &input.text {
            self.text.set(language, text.trim());
            self.html = self.text.render_plain_html();
        }
        if let Some(rating) = input.star_rating {
            self.star_rating = rating;
        }
    }
}

impl Revisioned for Review {
    const ENTITY: &'static str = "review";
}

impl RevisionTable for Review {
    const TABLE: &'static str = "reviews";
}

/// A review together with the thing it is about.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewWithThing {
    pub review: Document<Review>,
    pub thing: Document<Thing>,
}

/// DTO for creating a review.
///
/// The subject is either an existing thing (`thing_id`) or a URL, which is
/// matched against known things and otherwise creates a new one.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    pub thing_id: Option<DocId>,
    pub url: Option<String>,
    /// Label for a thing created from `url`.
    pub label: Option<String>,
    pub title: String,
    pub text: String,
    pub star_rating: i16,
    pub language: Option<Language>,
}

/// DTO for editing a review in one language.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReview {
    pub title: Option<String>,
    pub text: Option<String>,
    pub star_rating: Option<i16>,
    pub language: Option<Language>,
}

/// Query parameters for review deletion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteReviewParams {
    /// Also delete the reviewed thing. Only allowed for its sole review.
    #[serde(default)]
    pub with_thing: bool,
}
